mod sink;

use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use glob::glob;
use log::LevelFilter;

use coordinate_transformer::{ProjBackend, DEFAULT_TARGET_CRS};
use pcd_core::pointcloud::point::Coord;
use pcd_parser::parsers::{get_extension, las::LasParserProvider};
use pcd_transformer::{commit, ImportError, ImportOptions, Importer};

use crate::sink::JsonSceneSink;

#[derive(Parser, Debug)]
#[command(
    name = "lidar-import",
    about = "Reproject LAS/LAZ point clouds into a scene CRS and anchor them together",
    author = "MIERUNE Inc.",
    version = "0.0.1"
)]
struct Cli {
    #[arg(short, long, required = true, num_args = 1.., value_name = "FILE")]
    input: Vec<String>,

    /// CRS for files without CRS metadata
    #[arg(short, long, value_name = "CRS")]
    fallback_crs: String,

    #[arg(short, long, value_name = "CRS", default_value = DEFAULT_TARGET_CRS)]
    target_crs: String,

    #[arg(short, long, default_value_t = 1.0)]
    scale: f64,

    /// Keep absolute coordinates instead of centering each file
    #[arg(long)]
    no_center: bool,

    /// Import files in parallel
    #[arg(long)]
    parallel: bool,

    /// Scene origin in the target CRS, as "x,y"
    #[arg(long, value_parser = parse_origin, value_name = "X,Y")]
    origin: Option<Coord>,

    /// Include point coordinates in the output
    #[arg(long)]
    with_points: bool,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Extra directory searched for proj.db and grids
    #[arg(long, value_name = "DIR")]
    proj_data: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("invalid glob pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("no input file matched")]
    NoInput,
    #[error("unsupported file {0:?}, expected .las or .laz")]
    UnsupportedExtension(PathBuf),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("failed to serialize the scene")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn parse_origin(value: &str) -> Result<Coord, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(format!("expected \"x,y\" or \"x,y,z\", got {value:?}"));
    }
    let mut origin = [0.0; 3];
    for (axis, part) in parts.iter().enumerate() {
        origin[axis] = part
            .parse()
            .map_err(|e| format!("invalid coordinate {part:?}: {e}"))?;
    }
    Ok(origin)
}

fn expand_globs(input_patterns: &[String]) -> Result<Vec<PathBuf>, AppError> {
    let mut paths = Vec::new();
    for pattern in input_patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let entries = glob(pattern).map_err(|source| AppError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            for entry in entries {
                match entry {
                    Ok(path) => paths.push(path),
                    Err(e) => log::warn!("skipping unreadable path: {e}"),
                }
            }
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }
    Ok(paths)
}

fn check_extensions(paths: &[PathBuf]) -> Result<(), AppError> {
    match paths.iter().find(|path| get_extension(path).is_none()) {
        Some(path) => Err(AppError::UnsupportedExtension(path.clone())),
        None => Ok(()),
    }
}

fn run(args: Cli) -> Result<(), AppError> {
    let input_files = expand_globs(&args.input)?;
    if input_files.is_empty() {
        return Err(AppError::NoInput);
    }
    check_extensions(&input_files)?;
    log::info!("Expanded input files: {:?}", input_files);

    let mut backend = ProjBackend::new();
    if let Some(dir) = &args.proj_data {
        backend = backend.with_proj_data_dir(dir);
    }
    let options = ImportOptions {
        fallback_crs: args.fallback_crs,
        target_crs: Some(args.target_crs),
        scale: args.scale,
        centering: !args.no_center,
        parallel: args.parallel,
    };
    let importer = Importer::new(&backend, &LasParserProvider, options);

    log::info!("start importing...");
    let start_local = std::time::Instant::now();
    let batch = importer.import_batch(&input_files)?;
    log::info!("Finish importing in {:?}", start_local.elapsed());

    let fallbacks = batch.files.iter().filter(|f| f.used_fallback()).count();
    if fallbacks > 0 {
        log::warn!(
            "{} of {} files had no usable CRS metadata and were read as {}",
            fallbacks,
            batch.len(),
            importer.options().fallback_crs
        );
    }

    let mut sink = JsonSceneSink::new(args.origin.unwrap_or([0.0; 3]), args.with_points);
    commit(&batch, &mut sink).unwrap_or_else(|never| match never {});
    let json = serde_json::to_string_pretty(&sink.into_document())?;

    match args.output {
        Some(path) => {
            log::info!("write scene: {:?}", path);
            std::fs::write(&path, json).map_err(|source| AppError::Write { path, source })?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Cli::parse();

    log::info!("input files: {:?}", args.input);
    log::info!("fallback CRS: {}", args.fallback_crs);
    log::info!("target CRS: {}", args.target_crs);
    log::info!("scale: {}", args.scale);

    let start = std::time::Instant::now();
    if let Err(e) = run(args) {
        log::error!("{e}");
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            log::error!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
    log::info!("Elapsed: {:?}", start.elapsed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_parsing() {
        assert_eq!(parse_origin("10,-2.5").unwrap(), [10.0, -2.5, 0.0]);
        assert_eq!(parse_origin(" 1, 2, 3 ").unwrap(), [1.0, 2.0, 3.0]);
        assert!(parse_origin("1").is_err());
        assert!(parse_origin("a,b").is_err());
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["lidar-import", "-i", "a.laz", "-f", "EPSG:6677"]);
        assert_eq!(cli.target_crs, "EPSG:3857");
        assert_eq!(cli.scale, 1.0);
        assert!(!cli.no_center);
        assert!(cli.origin.is_none());
    }

    #[test]
    fn globs_expand_and_literals_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.las"), b"").unwrap();
        std::fs::write(dir.path().join("b.las"), b"").unwrap();
        let pattern = format!("{}/*.las", dir.path().display());

        let paths = expand_globs(&[pattern, "c.laz".to_string()]).unwrap();

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], PathBuf::from("c.laz"));
        assert!(check_extensions(&paths).is_ok());
        assert!(check_extensions(&[PathBuf::from("x.csv")]).is_err());
    }
}
