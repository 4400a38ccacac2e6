//! Modelos neutrales (mensajes, resultado, contexto compartido).

pub mod context;
pub mod message;
pub mod result;

pub use context::{ContextKey, ExecutionContext};
pub use message::{MessageCategory, OutcomeMessage};
pub use result::ExecutionResult;
