//! WellFormedXmlStep: valida que cada archivo elegible sea XML bien formado.
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use stepcheck_core::{ContextKey, ExecutionContext, ExecutionResult, MessageCategory, StatusSeverity, Step,
                     StepError, StepKind, StepNode};

use crate::document::DocumentLoader;
use crate::file_status::FileStatusManager;
use crate::fs_utils::file_path_tail;
use crate::keys::{ELIGIBLE_FILES, MARK_PROCESSED};

/// Segmentos finales de la ruta mostrados en los mensajes.
const REPORTED_SEGMENTS: usize = 2;

#[derive(Debug)]
pub struct WellFormedXmlStep {
    node: StepNode,
    loader: DocumentLoader,
    status_manager: FileStatusManager,
}

impl WellFormedXmlStep {
    pub const KIND: StepKind = StepKind::new("well_formed_xml");

    pub fn new(loader: DocumentLoader, status_manager: FileStatusManager) -> Self {
        Self { node: StepNode::new(Self::KIND),
               loader,
               status_manager }
    }
}

impl Step for WellFormedXmlStep {
    fn node(&self) -> &StepNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut StepNode {
        &mut self.node
    }

    fn required_context_keys(&self) -> Vec<ContextKey> {
        vec![(*ELIGIBLE_FILES).clone()]
    }

    fn execute(&mut self, ctx: &mut ExecutionContext) -> Result<&ExecutionResult, StepError> {
        self.set_status(StatusSeverity::InProcess);
        let Some(files) = ctx.require_as::<Vec<PathBuf>>(&ELIGIBLE_FILES, self.node.result_mut())?.cloned() else {
            self.set_status(StatusSeverity::Skipped);
            return Ok(self.result());
        };
        let mark = ctx.get::<bool>(&MARK_PROCESSED)?.copied().unwrap_or(false);

        let (mut valid, mut missing, mut invalid) = (0usize, false, false);
        for path in &files {
            let shown = file_path_tail(&path.to_string_lossy(), REPORTED_SEGMENTS);
            let content = match fs::read(path) {
                Ok(c) => c,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    missing = true;
                    self.add_message_with(MessageCategory::Error, format!("File not found: {shown}"));
                    continue;
                }
                Err(e) => {
                    invalid = true;
                    self.add_message_with(MessageCategory::Error, format!("Unable to read {shown}: {e}"));
                    continue;
                }
            };
            match self.loader.check_well_formed_bytes(&content) {
                Ok(()) => {
                    valid += 1;
                    if mark && !self.status_manager.mark_processed(path).map_err(StepError::other)? {
                        self.add_message_with(MessageCategory::Warning,
                                              format!("{shown} could not be marked as processed"));
                    }
                }
                Err(e) => {
                    invalid = true;
                    self.add_message_with(MessageCategory::Error, format!("{shown}: {e}"));
                }
            }
        }

        self.add_message_with(MessageCategory::Info,
                              format!("{valid} of {} file(s) are well-formed XML", files.len()));
        let status = if invalid {
            StatusSeverity::ValidationError
        } else if missing {
            StatusSeverity::FileNotFound
        } else {
            StatusSeverity::Success
        };
        self.set_status(status);
        Ok(self.result())
    }
}
