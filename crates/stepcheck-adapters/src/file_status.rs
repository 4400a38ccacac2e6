//! Estado de procesamiento de un archivo mediante un archivo marcador
//! hermano (`<nombre>.<ext marcador>`).
//!
//! Flujo:
//! 1. Sin marcador -> el archivo es elegible.
//! 2. Con marcador -> elegible sólo si el archivo se modificó después que
//!    el marcador.
//! 3. Tras procesar con éxito se crea (o se "toca") el marcador; si el
//!    procesamiento falla no se toca, y el archivo vuelve a ser elegible.
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, info};

use crate::error::FileStatusError;
use crate::fs_utils::delete_files;

pub const DEFAULT_MARKER_EXT: &str = "stepcheck-stat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    EligibleToProcess,
    NotEligibleToProcess,
}

#[derive(Debug, Clone)]
pub struct FileStatusManager {
    marker_ext: String,
}

impl Default for FileStatusManager {
    fn default() -> Self {
        Self::with_marker_ext(DEFAULT_MARKER_EXT)
    }
}

impl FileStatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker_ext(ext: impl Into<String>) -> Self {
        Self { marker_ext: ext.into() }
    }

    pub fn marker_ext(&self) -> &str {
        &self.marker_ext
    }

    pub fn marker_path(&self, target: &Path) -> Result<PathBuf, FileStatusError> {
        let name = target.file_name()
                         .ok_or_else(|| FileStatusError::InvalidTarget(target.to_path_buf()))?;
        let mut marker = name.to_os_string();
        marker.push(".");
        marker.push(&self.marker_ext);
        Ok(target.with_file_name(marker))
    }

    pub fn status(&self, target: &Path) -> Result<FileStatus, FileStatusError> {
        let marker = self.marker_path(target)?;
        if !marker.is_file() {
            debug!("marker file does not exist for {}", target.display());
            return Ok(FileStatus::EligibleToProcess);
        }
        let target_modified = modified(target)?;
        let marker_modified = modified(&marker)?;
        debug!("{} modified {:?}, marker modified {:?}", target.display(), target_modified, marker_modified);
        if target_modified > marker_modified {
            Ok(FileStatus::EligibleToProcess)
        } else {
            Ok(FileStatus::NotEligibleToProcess)
        }
    }

    /// Crea el marcador o actualiza su fecha de modificación. `false` si el
    /// destino no existe o no es un archivo regular.
    pub fn mark_processed(&self, target: &Path) -> Result<bool, FileStatusError> {
        if !target.exists() {
            info!("marker was not created because target does not exist: {}", target.display());
            return Ok(false);
        }
        if !target.is_file() {
            info!("marker was not created because target is not a file: {}", target.display());
            return Ok(false);
        }
        let marker = self.marker_path(target)?;
        let io_err = |source| FileStatusError::Io { path: marker.clone(),
                                                    source };
        if marker.exists() {
            let file = File::options().write(true).open(&marker).map_err(io_err)?;
            file.set_modified(SystemTime::now()).map_err(io_err)?;
        } else {
            File::create(&marker).map_err(io_err)?;
        }
        Ok(true)
    }

    /// Borra el marcador si existe; `true` cuando ya no queda marcador.
    pub fn clear_marker(&self, target: &Path) -> Result<bool, FileStatusError> {
        let marker = self.marker_path(target)?;
        if !marker.exists() {
            return Ok(true);
        }
        fs::remove_file(&marker).map_err(|source| FileStatusError::Io { path: marker.clone(),
                                                                        source })?;
        Ok(true)
    }

    /// Borra todos los marcadores bajo `dir` (recursivo), sin descender a
    /// `excluded`. Devuelve cuántos se borraron.
    pub fn clear_markers(&self, dir: &Path, excluded: &[PathBuf]) -> Result<usize, FileStatusError> {
        let deleted = delete_files(dir, &self.marker_ext, excluded).map_err(|source| {
                                                                       FileStatusError::Io { path: dir.to_path_buf(),
                                                                                             source }
                                                                   })?;
        info!("removed {deleted} marker file(s) under {}", dir.display());
        Ok(deleted)
    }
}

fn modified(path: &Path) -> Result<SystemTime, FileStatusError> {
    fs::metadata(path).and_then(|m| m.modified())
                      .map_err(|source| FileStatusError::Io { path: path.to_path_buf(),
                                                              source })
}
