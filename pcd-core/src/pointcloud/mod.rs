pub mod point;
pub mod result;
