//! ValidationSuite: contenedor que ejecuta sus hijos en orden y adopta el
//! rollup de ellos como estado propio.
use stepcheck_core::{ContextKey, ExecutionContext, ExecutionResult, MessageCategory, StatusSeverity, Step,
                     StepError, StepKind, StepNode};

use crate::document::DocumentLoader;
use crate::file_status::FileStatusManager;
use crate::steps::{DirectoryScanStep, FreshnessFilterStep, WellFormedXmlStep};

#[derive(Debug)]
pub struct ValidationSuite {
    node: StepNode,
    label: String,
}

impl ValidationSuite {
    pub const KIND: StepKind = StepKind::new("validation_suite");

    pub fn new(label: impl Into<String>) -> Self {
        Self { node: StepNode::new(Self::KIND),
               label: label.into() }
    }

    /// Suite estándar: escaneo -> filtro de frescura -> XML bien formado.
    pub fn xml_directory(loader: DocumentLoader, status_manager: FileStatusManager) -> Self {
        Self::new("xml directory validation").with_child(DirectoryScanStep::new())
                                             .with_child(FreshnessFilterStep::new(status_manager.clone()))
                                             .with_child(WellFormedXmlStep::new(loader, status_manager))
    }
}

impl Step for ValidationSuite {
    fn node(&self) -> &StepNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut StepNode {
        &mut self.node
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn required_context_keys(&self) -> Vec<ContextKey> {
        Vec::new()
    }

    fn execute(&mut self, ctx: &mut ExecutionContext) -> Result<&ExecutionResult, StepError> {
        self.set_status(StatusSeverity::InProcess);
        self.run_children(ctx);
        let status = self.aggregate_child_status();
        let summary = format!("{} sub-step(s) run; overall status {status}", self.children().len());
        self.add_message_with(MessageCategory::Info, summary);
        self.set_status(status);
        Ok(self.result())
    }
}
