//! Errores de persistencia.
//! Mapea fallos de configuración y del pool a variantes semánticas.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("missing database configuration: {}", .missing.join(", "))]
    Configuration { missing: Vec<String> },
    #[error("invalid database configuration: {0}")]
    InvalidConfiguration(String),
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl From<r2d2::Error> for PersistenceError {
    fn from(err: r2d2::Error) -> Self {
        Self::TransientIo(format!("pool error: {err}"))
    }
}

#[cfg(feature = "postgres")]
impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error as DieselError;
        match err {
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::DatabaseError(kind, info) => {
                Self::Unknown(format!("db error kind {:?}: {}", kind, info.message()))
            }
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}
