//! Definiciones relacionadas a Steps.
//!
//! Un Step es un nodo de un árbol de ejecución: ejecuta su propia lógica
//! contra un `ExecutionContext` compartido, acumula estado + mensajes en su
//! `ExecutionResult` y opcionalmente ejecuta hijos en orden. Este módulo
//! define:
//! - `StatusSeverity`: orden total de resultados usado en el rollup.
//! - `Step` / `StepNode` / `StepKind`: contrato de ejecución y estado propio.
//! - `StepReport` / `RunReport`: instantáneas para reportar.

pub mod definition;
pub mod report;
mod status;

pub use definition::{Step, StepKind, StepNode};
pub use report::{RunReport, StepReport};
pub use status::StatusSeverity;
