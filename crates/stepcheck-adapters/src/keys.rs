//! Claves canónicas del contexto compartidas por los steps de este crate.
//!
//! Productores y consumidores deben usar estas mismas instancias: las claves
//! se comparan por identidad.
use once_cell::sync::Lazy;
use stepcheck_core::ContextKey;

/// `PathBuf` con el directorio a revisar.
pub static INPUT_DIR: Lazy<ContextKey> = Lazy::new(|| ContextKey::new("input directory"));
/// `String` con la extensión (sin punto) de los archivos a revisar.
pub static FILE_EXTENSION: Lazy<ContextKey> = Lazy::new(|| ContextKey::new("file extension"));
/// `Vec<PathBuf>` producido por el escaneo.
pub static CANDIDATE_FILES: Lazy<ContextKey> = Lazy::new(|| ContextKey::new("candidate files"));
/// `Vec<PathBuf>` con los candidatos modificados desde su último proceso.
pub static ELIGIBLE_FILES: Lazy<ContextKey> = Lazy::new(|| ContextKey::new("eligible files"));
/// `bool`: marcar como procesados los archivos válidos.
pub static MARK_PROCESSED: Lazy<ContextKey> = Lazy::new(|| ContextKey::new("mark processed flag"));
