//! stepcheck-adapters: servicios colaboradores y steps concretos.
//!
//! Este crate provee:
//! - `PropertyStore`: configuración desde archivos `.properties` o XML.
//! - `DocumentLoader`: XML -> estructuras `serde`.
//! - `FileStatusManager`: elegibilidad por archivo marcador.
//! - `fs_utils`: borrado por extensión y helpers de rutas.
//! - `keys` + `steps`: claves canónicas y steps de validación de directorios.
//!
//! Ninguno de estos servicios participa del protocolo de ejecución; los
//! steps los reciben inyectados al construirse.

pub mod document;
pub mod error;
pub mod file_status;
pub mod fs_utils;
pub mod keys;
pub mod properties;
pub mod steps;

pub use document::DocumentLoader;
pub use error::{ConfigError, FileStatusError, ParseError};
pub use file_status::{FileStatus, FileStatusManager};
pub use properties::PropertyStore;
