//! stepcheck CLI: valida directorios de archivos con un árbol de steps.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stepcheck_adapters::{FileStatusManager, PropertyStore};
use stepcheck_rust::config::{init_logging, AppConfig};
use stepcheck_rust::pipeline::{validate_directory, ValidationOptions};
use stepcheck_rust::report::{exit_code, render_json, render_text};
use stepcheck_rust::AppError;

#[derive(Parser)]
#[command(name = "stepcheck")]
#[command(about = "Run step-based validation over a directory of files")]
#[command(version)]
struct Cli {
    /// Properties file (.properties or .xml); overrides STEPCHECK_PROPERTIES
    #[arg(long, global = true)]
    properties: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the files of a directory
    Validate {
        /// Directory to scan
        dir: PathBuf,

        /// File extension to select (default from properties, else xml)
        #[arg(long)]
        ext: Option<String>,

        /// Mark well-formed files as processed
        #[arg(long)]
        mark: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove processed markers so every file is eligible again
    Reset {
        /// Directory to clean (recursive)
        dir: PathBuf,
    },

    /// Check that a database connection can be acquired
    DbPing,
}

fn main() -> ExitCode {
    let app = AppConfig::from_env();
    init_logging(&app.log_filter);
    let cli = Cli::parse();

    let result = app.load_properties(cli.properties.as_deref())
                    .map_err(AppError::from)
                    .and_then(|props| match cli.command {
                        Commands::Validate { dir, ext, mark, json } => run_validate(&props, dir, ext, mark, json),
                        Commands::Reset { dir } => run_reset(&dir),
                        Commands::DbPing => db_ping(&props),
                    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run_validate(props: &PropertyStore,
                dir: PathBuf,
                ext: Option<String>,
                mark: bool,
                json: bool)
                -> Result<u8, AppError> {
    let opts = ValidationOptions::resolve(dir, props, ext, mark);
    let report = validate_directory(&opts, FileStatusManager::new())?;
    if json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(exit_code(&report))
}

fn run_reset(dir: &Path) -> Result<u8, AppError> {
    let deleted = FileStatusManager::new().clear_markers(dir, &[])?;
    println!("removed {deleted} marker file(s) under {}", dir.display());
    Ok(0)
}

#[cfg(feature = "postgres")]
fn db_ping(props: &PropertyStore) -> Result<u8, AppError> {
    use stepcheck_persistence::pg::{ping, postgres_pool};
    use stepcheck_persistence::DbConfig;

    let cfg = if props.is_empty() {
        DbConfig::from_env()?
    } else {
        DbConfig::from_properties(props)?
    };
    let pool = postgres_pool(&cfg)?;
    ping(&pool)?;
    println!("connected to {}", cfg.redacted_url());
    pool.shutdown();
    Ok(0)
}

#[cfg(not(feature = "postgres"))]
fn db_ping(_props: &PropertyStore) -> Result<u8, AppError> {
    Err(AppError::Internal("database support was not compiled in (enable feature `postgres`)".into()))
}
