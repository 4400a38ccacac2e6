//! stepcheck
//!
//! Librería del binario `stepcheck`:
//! - `config`: configuración de la aplicación y logging.
//! - `errors`: `AppError`, que envuelve los errores de los crates del
//!   workspace.
//! - `pipeline`: armado y ejecución de la suite de validación.
//! - `report`: presentación del reporte y código de salida.

pub mod config;
pub mod errors;
pub mod pipeline;
pub mod report;

pub use errors::AppError;
