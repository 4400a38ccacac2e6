use stepcheck_adapters::{ConfigError, FileStatusError};
use stepcheck_core::StepError;
use stepcheck_persistence::PersistenceError;
use thiserror::Error;

/// Errores de la aplicación (binario `stepcheck`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(#[from] ConfigError),
    #[error("Error en step: {0}")]
    Step(#[from] StepError),
    #[error("Error de estado de archivo: {0}")]
    FileStatus(#[from] FileStatusError),
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Error interno: {0}")]
    Internal(String),
}
