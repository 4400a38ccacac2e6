//! Errores de los servicios colaboradores (config, documentos, archivos).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Properties file, {}, could not be found.", .0.display())]
    NotFound(PathBuf),
    #[error("The properties file defined by {var} could not be found at {}", .path.display())]
    EnvPathNotFound { var: &'static str, path: PathBuf },
    #[error("Problem loading properties file: {}. {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("Problem opening properties file: {}. {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("The expected xml file does not exist at the configured location: {}", .0.display())]
    NotFound(PathBuf),
    #[error("malformed xml in {origin}: {reason}")]
    Malformed { origin: String, reason: String },
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum FileStatusError {
    #[error("target has no file name: {}", .0.display())]
    InvalidTarget(PathBuf),
    #[error("Error while getting status of {} - {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
