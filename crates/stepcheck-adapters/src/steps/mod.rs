//! Steps concretos de validación de archivos.
//!
//! Cada step declara sus claves requeridas, las lee con los getters
//! asertivos del contexto (si faltan, deja un mensaje ERROR y termina como
//! `Skipped`) y publica sus salidas en el contexto para los hermanos que
//! siguen.

pub mod freshness;
pub mod scan;
pub mod suite;
pub mod well_formed;

pub use freshness::FreshnessFilterStep;
pub use scan::{DirectoryScanStep, DEFAULT_EXTENSION};
pub use suite::ValidationSuite;
pub use well_formed::WellFormedXmlStep;
