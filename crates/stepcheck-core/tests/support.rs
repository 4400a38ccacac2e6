//! Steps mínimos compartidos por las pruebas de integración del core.
#![allow(dead_code)]

use once_cell::sync::Lazy;
use stepcheck_core::{ContextKey, ExecutionContext, ExecutionResult, StatusSeverity, Step, StepError, StepKind,
                     StepNode};

pub static VISITS: Lazy<ContextKey> = Lazy::new(|| ContextKey::new("visit log"));

/// Registra su nombre en `VISITS` y termina con el estado indicado, un
/// error o un pánico según `Behaviour`.
pub enum Behaviour {
    Finish(StatusSeverity),
    Fail(&'static str),
    Panic(&'static str),
}

pub struct Probe {
    node: StepNode,
    label: &'static str,
    behaviour: Behaviour,
}

impl Probe {
    pub const KIND: StepKind = StepKind::new("probe");

    pub fn new(label: &'static str, behaviour: Behaviour) -> Self {
        Self { node: StepNode::new(Self::KIND),
               label,
               behaviour }
    }
}

impl Step for Probe {
    fn node(&self) -> &StepNode {
        &self.node
    }
    fn node_mut(&mut self) -> &mut StepNode {
        &mut self.node
    }
    fn name(&self) -> &str {
        self.label
    }
    fn required_context_keys(&self) -> Vec<ContextKey> {
        vec![(*VISITS).clone()]
    }
    fn execute(&mut self, ctx: &mut ExecutionContext) -> Result<&ExecutionResult, StepError> {
        if !ctx.exists_and_not_null(&VISITS) {
            ctx.put(&VISITS, Vec::<String>::new());
        }
        if let Some(log) = ctx.get_mut::<Vec<String>>(&VISITS)? {
            log.push(self.label.to_string());
        }
        match self.behaviour {
            Behaviour::Finish(status) => self.set_status(status),
            Behaviour::Fail(msg) => return Err(StepError::Validation(msg.to_string())),
            Behaviour::Panic(msg) => panic!("{}", msg),
        }
        Ok(self.result())
    }
}

/// Contenedor que corre a sus hijos y adopta el rollup como estado propio.
pub struct Batch {
    node: StepNode,
}

impl Batch {
    pub fn new() -> Self {
        Self { node: StepNode::new(StepKind::new("batch")) }
    }
}

impl Step for Batch {
    fn node(&self) -> &StepNode {
        &self.node
    }
    fn node_mut(&mut self) -> &mut StepNode {
        &mut self.node
    }
    fn required_context_keys(&self) -> Vec<ContextKey> {
        Vec::new()
    }
    fn execute(&mut self, ctx: &mut ExecutionContext) -> Result<&ExecutionResult, StepError> {
        self.set_status(StatusSeverity::InProcess);
        self.run_children(ctx);
        let status = self.aggregate_child_status();
        self.set_status(status);
        Ok(self.result())
    }
}

pub fn visits(ctx: &ExecutionContext) -> Vec<String> {
    ctx.get::<Vec<String>>(&VISITS).unwrap().cloned().unwrap_or_default()
}
