pub mod parsers;
