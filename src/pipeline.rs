//! Armado y ejecución de la suite de validación de un directorio.
use std::path::PathBuf;

use stepcheck_adapters::keys::{FILE_EXTENSION, INPUT_DIR, MARK_PROCESSED};
use stepcheck_adapters::steps::{ValidationSuite, DEFAULT_EXTENSION};
use stepcheck_adapters::{DocumentLoader, FileStatusManager, PropertyStore};
use stepcheck_core::{ExecutionContext, RunReport, Step, StepError};
use tracing::{info, warn};

use crate::config::{DEFAULT_EXTENSION_PROPERTY, MARK_PROCESSED_PROPERTY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    pub dir: PathBuf,
    pub extension: String,
    pub mark_processed: bool,
}

impl ValidationOptions {
    /// Los argumentos explícitos tienen prioridad sobre las propiedades.
    pub fn resolve(dir: PathBuf, props: &PropertyStore, extension: Option<String>, mark: bool) -> Self {
        let extension = extension.unwrap_or_else(|| props.get_string(DEFAULT_EXTENSION_PROPERTY, DEFAULT_EXTENSION));
        Self { dir,
               extension: extension.trim_start_matches('.').to_string(),
               mark_processed: mark || props.get_bool(MARK_PROCESSED_PROPERTY, false) }
    }
}

/// Ejecuta `ValidationSuite[scan, freshness, well-formed]` sobre el
/// directorio y captura el reporte del árbol.
pub fn validate_directory(opts: &ValidationOptions, status_manager: FileStatusManager) -> Result<RunReport, StepError> {
    let mut suite = ValidationSuite::xml_directory(DocumentLoader::new(), status_manager);
    let mut ctx = ExecutionContext::with_capacity(3);
    ctx.put(&INPUT_DIR, opts.dir.clone());
    ctx.put(&FILE_EXTENSION, opts.extension.clone());
    ctx.put(&MARK_PROCESSED, opts.mark_processed);

    let missing = suite.missing_context_keys(&ctx);
    if !missing.is_empty() {
        warn!(?missing, "context is missing required keys");
    }
    info!(dir = %opts.dir.display(), ext = %opts.extension, "validating directory");
    let status = suite.execute(&mut ctx)?.status();
    info!(%status, "validation finished");
    Ok(RunReport::capture(&suite))
}
