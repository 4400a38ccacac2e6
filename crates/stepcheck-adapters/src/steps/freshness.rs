//! FreshnessFilterStep: descarta candidatos sin cambios desde el último
//! proceso exitoso.
use std::path::PathBuf;

use log::debug;
use stepcheck_core::{ContextKey, ExecutionContext, ExecutionResult, MessageCategory, StatusSeverity, Step,
                     StepError, StepKind, StepNode};

use crate::file_status::{FileStatus, FileStatusManager};
use crate::keys::{CANDIDATE_FILES, ELIGIBLE_FILES};

#[derive(Debug)]
pub struct FreshnessFilterStep {
    node: StepNode,
    status_manager: FileStatusManager,
}

impl FreshnessFilterStep {
    pub const KIND: StepKind = StepKind::new("freshness_filter");

    pub fn new(status_manager: FileStatusManager) -> Self {
        Self { node: StepNode::new(Self::KIND),
               status_manager }
    }
}

impl Step for FreshnessFilterStep {
    fn node(&self) -> &StepNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut StepNode {
        &mut self.node
    }

    fn required_context_keys(&self) -> Vec<ContextKey> {
        vec![(*CANDIDATE_FILES).clone()]
    }

    fn execute(&mut self, ctx: &mut ExecutionContext) -> Result<&ExecutionResult, StepError> {
        self.set_status(StatusSeverity::InProcess);
        let Some(candidates) = ctx.require_as::<Vec<PathBuf>>(&CANDIDATE_FILES, self.node.result_mut())?.cloned()
        else {
            self.set_status(StatusSeverity::Skipped);
            return Ok(self.result());
        };

        let mut eligible = Vec::with_capacity(candidates.len());
        for path in candidates {
            match self.status_manager.status(&path).map_err(StepError::other)? {
                FileStatus::EligibleToProcess => eligible.push(path),
                FileStatus::NotEligibleToProcess => {
                    debug!("{} unchanged since last run", path.display());
                    self.add_message_with(MessageCategory::Info,
                                          format!("{} is unchanged since it was last processed", path.display()));
                }
            }
        }

        if eligible.is_empty() {
            self.add_message_with(MessageCategory::Info, "No files are eligible for processing.");
            self.set_status(StatusSeverity::Skipped);
        } else {
            self.set_status(StatusSeverity::Success);
        }
        ctx.put(&ELIGIBLE_FILES, eligible);
        Ok(self.result())
    }
}
