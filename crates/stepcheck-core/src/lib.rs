//! stepcheck-core: motor jerárquico de steps de validación/procesamiento.
pub mod errors;
pub mod model;
pub mod step;

pub use errors::{ContextError, ResultError, StepError};
pub use model::{ContextKey, ExecutionContext, ExecutionResult, MessageCategory, OutcomeMessage};
pub use step::{RunReport, StatusSeverity, Step, StepKind, StepNode, StepReport};
