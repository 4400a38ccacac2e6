//! DirectoryScanStep: lista los archivos candidatos de un directorio.
use std::fs;
use std::path::{Path, PathBuf};

use stepcheck_core::{ContextKey, ExecutionContext, ExecutionResult, MessageCategory, StatusSeverity, Step,
                     StepError, StepKind, StepNode};

use crate::fs_utils::is_alphanumeric;
use crate::keys::{CANDIDATE_FILES, FILE_EXTENSION, INPUT_DIR};

/// Extensión usada cuando el contexto no define `FILE_EXTENSION`.
pub const DEFAULT_EXTENSION: &str = "xml";

#[derive(Debug)]
pub struct DirectoryScanStep {
    node: StepNode,
}

impl DirectoryScanStep {
    pub const KIND: StepKind = StepKind::new("directory_scan");

    pub fn new() -> Self {
        Self { node: StepNode::new(Self::KIND) }
    }
}

impl Default for DirectoryScanStep {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for DirectoryScanStep {
    fn node(&self) -> &StepNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut StepNode {
        &mut self.node
    }

    fn required_context_keys(&self) -> Vec<ContextKey> {
        vec![(*INPUT_DIR).clone()]
    }

    fn execute(&mut self, ctx: &mut ExecutionContext) -> Result<&ExecutionResult, StepError> {
        self.set_status(StatusSeverity::InProcess);
        let Some(dir) = ctx.require_as::<PathBuf>(&INPUT_DIR, self.node.result_mut())?.cloned() else {
            self.set_status(StatusSeverity::Skipped);
            return Ok(self.result());
        };
        if !dir.is_dir() {
            self.add_message_with(MessageCategory::Error, format!("Directory not found: {}", dir.display()));
            self.set_status(StatusSeverity::DirectoryNotFound);
            return Ok(self.result());
        }

        let ext = ctx.get::<String>(&FILE_EXTENSION)?
                     .cloned()
                     .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        if !is_alphanumeric(Some(ext.as_str())) {
            self.add_message_with(MessageCategory::Error, format!("Invalid file extension: '{ext}'"));
            self.set_status(StatusSeverity::ValidationError);
            return Ok(self.result());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && has_extension(&path, &ext) {
                files.push(path);
            }
        }
        files.sort();

        self.add_message_with(MessageCategory::Info,
                              format!("Found {} .{} file(s) in {}", files.len(), ext, dir.display()));
        ctx.put(&CANDIDATE_FILES, files);
        self.set_status(StatusSeverity::Success);
        Ok(self.result())
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
