//! Errores específicos del core.
//!
//! - `ResultError`: mal uso del API de `ExecutionResult` (índice fuera de rango).
//! - `ContextError`: lecturas tipadas / asertivas sobre `ExecutionContext`.
//! - `StepError`: cualquier fallo que un `Step::execute` puede devolver. El
//!   motor lo absorbe en `run_children` y lo convierte en estado + mensajes.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ResultError {
    #[error("message index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ContextError {
    #[error("Attempted to get value for key: '{key}' of type: {expected} but the value is actually of type: {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("'{0}' does not exist in the current context.")]
    MissingKey(String),
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StepError {
    /// Envuelve un error arbitrario de un colaborador.
    pub fn other<E>(err: E) -> Self
        where E: std::error::Error + Send + Sync + 'static
    {
        Self::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_key_and_both_types() {
        let err = ContextError::TypeMismatch { key: "input directory".into(),
                                               expected: "alloc::string::String",
                                               actual: "i32" };
        let msg = err.to_string();
        assert!(msg.contains("input directory"));
        assert!(msg.contains("alloc::string::String"));
        assert!(msg.contains("i32"));
    }

    #[test]
    fn missing_key_format() {
        let err = ContextError::MissingKey("candidate files".into());
        assert_eq!(err.to_string(), "'candidate files' does not exist in the current context.");
    }

    #[test]
    fn io_variant_from() {
        let err: StepError = std::io::Error::other("disk gone").into();
        assert_eq!(err.to_string(), "io error: disk gone");
    }
}
