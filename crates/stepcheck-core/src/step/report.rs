//! Instantánea serializable de un árbol de steps ya ejecutado.
//!
//! Es la forma "saliente" del motor: tras ejecutar la raíz, quien invoca
//! captura el resultado de cada nodo para construir un reporte.
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{StatusSeverity, Step, StepKind};
use crate::model::OutcomeMessage;

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub kind: StepKind,
    pub name: String,
    pub status: StatusSeverity,
    pub messages: Vec<OutcomeMessage>,
    pub children: Vec<StepReport>,
}

impl StepReport {
    pub fn capture<S: Step + ?Sized>(step: &S) -> Self {
        Self { kind: step.kind(),
               name: step.name().to_string(),
               status: step.result().status(),
               messages: step.result().entries().to_vec(),
               children: step.children().iter().map(|c| StepReport::capture(c.as_ref())).collect() }
    }

    /// Rollup profundo: peor estado de todo el subárbol (incluye el propio).
    pub fn worst_status(&self) -> StatusSeverity {
        self.children
            .iter()
            .map(StepReport::worst_status)
            .fold(self.status, StatusSeverity::max)
    }

    /// Recorrido en profundidad (preorden) con la profundidad de cada nodo.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(usize, &'a StepReport)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(usize, &'a StepReport)) {
        visit(depth, self);
        for c in &self.children {
            c.walk_at(depth + 1, visit);
        }
    }
}

/// Reporte de una invocación raíz.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub root: StepReport,
}

impl RunReport {
    pub fn capture<S: Step + ?Sized>(root: &S) -> Self {
        Self::from_root(StepReport::capture(root))
    }

    /// Envuelve una instantánea ya construida con un id y fecha nuevos.
    pub fn from_root(root: StepReport) -> Self {
        Self { run_id: Uuid::new_v4(),
               captured_at: Utc::now(),
               root }
    }

    pub fn worst_status(&self) -> StatusSeverity {
        self.root.worst_status()
    }
}
