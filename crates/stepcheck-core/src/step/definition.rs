use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, warn};
use serde::Serialize;

use super::StatusSeverity;
use crate::errors::{ResultError, StepError};
use crate::model::{ContextKey, ExecutionContext, ExecutionResult, MessageCategory};

/// Discriminador estable del tipo concreto de un Step.
///
/// Se fija al construir el `StepNode` y es lo que compara `add_child` para
/// rechazar que un contenedor se anide a sí mismo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StepKind(&'static str);

impl StepKind {
    pub const fn new(label: &'static str) -> Self {
        Self(label)
    }

    pub const fn label(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Estado que todo Step posee en exclusiva: su tipo, su único resultado y la
/// lista ordenada de hijos.
pub struct StepNode {
    kind: StepKind,
    result: ExecutionResult,
    children: Vec<Box<dyn Step>>,
}

impl StepNode {
    pub fn new(kind: StepKind) -> Self {
        Self { kind,
               result: ExecutionResult::new(),
               children: Vec::new() }
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn result(&self) -> &ExecutionResult {
        &self.result
    }

    pub fn result_mut(&mut self) -> &mut ExecutionResult {
        &mut self.result
    }

    pub fn children(&self) -> &[Box<dyn Step>] {
        &self.children
    }
}

impl fmt::Debug for StepNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepNode")
         .field("kind", &self.kind)
         .field("status", &self.result.status())
         .field("children", &self.children.iter().map(|c| c.name()).collect::<Vec<_>>())
         .finish()
    }
}

/// Unidad de trabajo del árbol de ejecución.
///
/// Implementadores sólo escriben `node`/`node_mut`, `required_context_keys`
/// y `execute`; el resto (hijos, aislamiento de fallos, rollup) viene dado.
///
/// `execute` lee sus entradas del contexto (vía `require`/`require_as`),
/// muta su propio resultado, opcionalmente escribe salidas en el contexto y
/// devuelve el resultado. Llamarlo dos veces sobrescribe el resultado en
/// sitio; no hay guardia de reentrada.
pub trait Step {
    fn node(&self) -> &StepNode;

    fn node_mut(&mut self) -> &mut StepNode;

    /// Claves que la lógica del step necesita. El motor no las fuerza; sirven
    /// para pre-validar un contexto y para documentación.
    fn required_context_keys(&self) -> Vec<ContextKey>;

    fn execute(&mut self, ctx: &mut ExecutionContext) -> Result<&ExecutionResult, StepError>;

    /// Claves requeridas ausentes (o nulas) en `ctx`, en orden declarado.
    fn missing_context_keys(&self, ctx: &ExecutionContext) -> Vec<ContextKey> {
        self.required_context_keys()
            .into_iter()
            .filter(|k| !ctx.exists_and_not_null(k))
            .collect()
    }

    fn kind(&self) -> StepKind {
        self.node().kind()
    }

    /// Nombre amigable (por defecto el kind).
    fn name(&self) -> &str {
        self.node().kind().label()
    }

    fn result(&self) -> &ExecutionResult {
        self.node().result()
    }

    fn result_mut(&mut self) -> &mut ExecutionResult {
        self.node_mut().result_mut()
    }

    fn children(&self) -> &[Box<dyn Step>] {
        self.node().children()
    }

    /// Agrega un hijo al final salvo que sea del mismo kind que `self`
    /// (guardia superficial; ciclos profundos entre kinds distintos son
    /// responsabilidad de quien arma el árbol).
    fn add_child(&mut self, child: Box<dyn Step>) -> bool {
        if child.kind() == self.kind() {
            warn!("Skip adding step: {} to its own sub-step list.", self.kind());
            return false;
        }
        self.node_mut().children.push(child);
        true
    }

    /// Variante encadenable de `add_child` para construir árboles.
    fn with_child<S>(mut self, child: S) -> Self
        where Self: Sized,
              S: Step + 'static
    {
        self.add_child(Box::new(child));
        self
    }

    /// Ejecuta cada hijo en orden declarado, secuencialmente.
    ///
    /// Un hijo que devuelve error o entra en pánico no aborta a sus hermanos
    /// ni se propaga: su estado pasa a `UnexpectedSystemError` y se le
    /// agregan dos mensajes ERROR (quién lo ejecutaba y el detalle).
    ///
    /// El hook de pánico del proceso sigue activo: un pánico contenido aún
    /// imprime su línea "thread ... panicked" en stderr. Quien necesite
    /// silenciarla debe instalar su propio hook con `std::panic::set_hook`.
    fn run_children(&mut self, ctx: &mut ExecutionContext) {
        let parent = self.name().to_string();
        for child in self.node_mut().children.iter_mut() {
            debug!("Performing {} sub-step of {}.", child.name(), parent);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| child.execute(ctx).map(|_| ())));
            let detail = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(payload) => panic_detail(payload.as_ref()),
            };
            error!("sub-step {} of {} failed: {}", child.name(), parent, detail);
            let result = child.result_mut();
            result.set_status(StatusSeverity::UnexpectedSystemError);
            result.add_message_with(MessageCategory::Error,
                                    format!("An unexpected error occurred while performing a sub-step of {parent}"));
            result.add_message_with(MessageCategory::Error, detail);
        }
    }

    /// Peor estado entre los hijos directos; `Success` si no hay hijos,
    /// independientemente del estado propio.
    fn aggregate_child_status(&self) -> StatusSeverity {
        StatusSeverity::worst(self.children().iter().map(|c| c.result().status())).unwrap_or(StatusSeverity::Success)
    }

    /// Peor estado entre el propio y el de todos los descendientes.
    fn deep_status(&self) -> StatusSeverity {
        self.children()
            .iter()
            .map(|c| c.deep_status())
            .fold(self.result().status(), StatusSeverity::max)
    }

    fn set_status(&mut self, status: StatusSeverity) {
        self.result_mut().set_status(status);
    }

    fn add_message<S: Into<String>>(&mut self, text: S)
        where Self: Sized
    {
        self.result_mut().add_message(text);
    }

    fn add_message_with<S: Into<String>>(&mut self, category: MessageCategory, text: S)
        where Self: Sized
    {
        self.result_mut().add_message_with(category, text);
    }

    fn insert_message<S: Into<String>>(&mut self, index: usize, text: S) -> Result<(), ResultError>
        where Self: Sized
    {
        self.result_mut().insert_message(index, text)
    }

    fn insert_message_with<S: Into<String>>(&mut self,
                                            index: usize,
                                            category: MessageCategory,
                                            text: S)
                                            -> Result<(), ResultError>
        where Self: Sized
    {
        self.result_mut().insert_message_with(index, category, text)
    }

    fn add_messages<I, S>(&mut self, texts: I)
        where Self: Sized,
              I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.result_mut().add_messages(texts);
    }

    fn add_messages_with<I, S>(&mut self, category: MessageCategory, texts: I)
        where Self: Sized,
              I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.result_mut().add_messages_with(category, texts);
    }
}

impl<'a> fmt::Debug for dyn Step + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node().fmt(f)
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "step panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAF: StepKind = StepKind::new("leaf");
    const GROUP: StepKind = StepKind::new("group");

    struct Leaf {
        node: StepNode,
        outcome: StatusSeverity,
    }

    impl Leaf {
        fn new(outcome: StatusSeverity) -> Self {
            Self { node: StepNode::new(LEAF),
                   outcome }
        }
    }

    impl Step for Leaf {
        fn node(&self) -> &StepNode {
            &self.node
        }
        fn node_mut(&mut self) -> &mut StepNode {
            &mut self.node
        }
        fn required_context_keys(&self) -> Vec<ContextKey> {
            Vec::new()
        }
        fn execute(&mut self, _ctx: &mut ExecutionContext) -> Result<&ExecutionResult, StepError> {
            self.set_status(self.outcome);
            Ok(self.result())
        }
    }

    struct Group {
        node: StepNode,
    }

    impl Step for Group {
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
            self.run_children(ctx);
            let status = self.aggregate_child_status();
            self.set_status(status);
            Ok(self.result())
        }
    }

    fn group() -> Group {
        Group { node: StepNode::new(GROUP) }
    }

    #[test]
    fn childless_rollup_is_success_regardless_of_own_status() {
        let mut g = group();
        g.set_status(StatusSeverity::ValidationError);
        assert_eq!(g.aggregate_child_status(), StatusSeverity::Success);
    }

    #[test]
    fn same_kind_child_is_rejected() {
        let mut g = group();
        assert!(!g.add_child(Box::new(group())));
        assert!(g.children().is_empty());
        assert!(g.add_child(Box::new(Leaf::new(StatusSeverity::Success))));
        assert_eq!(g.children().len(), 1);
    }

    #[test]
    fn rollup_is_direct_children_only() {
        let inner = group().with_child(Leaf::new(StatusSeverity::UnexpectedSystemError));
        let mut holder = Leaf::new(StatusSeverity::Success).with_child(inner);
        let mut ctx = ExecutionContext::new();
        holder.execute(&mut ctx).unwrap();
        // Leaf no ejecuta a sus hijos: `inner` queda NOT_RUN
        assert_eq!(holder.aggregate_child_status(), StatusSeverity::NotRun);
        assert_eq!(holder.deep_status(), StatusSeverity::Success);
    }

    #[test]
    fn deep_status_sees_grandchildren() {
        let mut outer = Leaf::new(StatusSeverity::Success).with_child(group().with_child(Leaf::new(StatusSeverity::ValidationError)));
        let mut ctx = ExecutionContext::new();
        outer.run_children(&mut ctx);
        outer.execute(&mut ctx).unwrap();
        assert_eq!(outer.result().status(), StatusSeverity::Success);
        assert_eq!(outer.aggregate_child_status(), StatusSeverity::ValidationError);
        assert_eq!(outer.deep_status(), StatusSeverity::ValidationError);
    }

    #[test]
    fn rank_order_drives_rollup() {
        let mut g = group().with_child(Leaf::new(StatusSeverity::ValidationError))
                           .with_child(Leaf::new(StatusSeverity::Success))
                           .with_child(Leaf::new(StatusSeverity::UnexpectedSystemError));
        let mut ctx = ExecutionContext::new();
        g.execute(&mut ctx).unwrap();
        assert_eq!(g.aggregate_child_status(), StatusSeverity::UnexpectedSystemError);
        assert_eq!(g.result().status(), StatusSeverity::UnexpectedSystemError);
    }

    #[test]
    fn forwarding_mutators_reach_owned_result() {
        let mut l = Leaf::new(StatusSeverity::Success);
        l.add_message("b");
        l.insert_message(0, "a").unwrap();
        l.add_messages_with(MessageCategory::Warning, ["w"]);
        assert!(l.insert_message_with(9, MessageCategory::Info, "x").is_err());
        assert_eq!(l.result().messages(), vec!["a", "b", "w"]);
        assert!(format!("{:?}", &l as &dyn Step).contains("leaf"));
    }
}
