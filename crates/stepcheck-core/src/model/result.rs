//! Acumulador de estado + mensajes de un Step.
//!
//! Invariante: los mensajes nunca se reordenan ni deduplican; todos los
//! filtros preservan el orden de inserción.
use serde::Serialize;

use super::{MessageCategory, OutcomeMessage};
use crate::errors::ResultError;
use crate::step::StatusSeverity;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    status: StatusSeverity,
    messages: Vec<OutcomeMessage>,
}

impl ExecutionResult {
    /// Estado inicial `NotRun`, sin mensajes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusSeverity {
        self.status
    }

    /// Reemplaza el estado sin validar contra el anterior.
    pub fn set_status(&mut self, status: StatusSeverity) {
        self.status = status;
    }

    pub fn add_message(&mut self, text: impl Into<String>) {
        self.add_message_with(MessageCategory::Default, text);
    }

    pub fn add_message_with(&mut self, category: MessageCategory, text: impl Into<String>) {
        self.messages.push(OutcomeMessage::new(category, text));
    }

    /// Inserta en `index` (0..=len).
    pub fn insert_message(&mut self, index: usize, text: impl Into<String>) -> Result<(), ResultError> {
        self.insert_message_with(index, MessageCategory::Default, text)
    }

    pub fn insert_message_with(&mut self,
                               index: usize,
                               category: MessageCategory,
                               text: impl Into<String>)
                               -> Result<(), ResultError> {
        let len = self.messages.len();
        if index > len {
            return Err(ResultError::IndexOutOfBounds { index, len });
        }
        self.messages.insert(index, OutcomeMessage::new(category, text));
        Ok(())
    }

    pub fn add_messages<I, S>(&mut self, texts: I)
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.add_messages_with(MessageCategory::Default, texts);
    }

    /// Misma categoría para todos los mensajes.
    pub fn add_messages_with<I, S>(&mut self, category: MessageCategory, texts: I)
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        for t in texts {
            self.add_message_with(category, t);
        }
    }

    pub fn add_categorized_messages(&mut self, messages: impl IntoIterator<Item = OutcomeMessage>) {
        self.messages.extend(messages);
    }

    /// Todos los textos en orden de inserción.
    pub fn messages(&self) -> Vec<&str> {
        self.messages.iter().map(OutcomeMessage::text).collect()
    }

    /// Sólo la categoría exacta.
    pub fn messages_of(&self, category: MessageCategory) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| m.category() == category)
            .map(OutcomeMessage::text)
            .collect()
    }

    /// Categoría con rango >= `min` (inclusive).
    pub fn messages_min_category(&self, min: MessageCategory) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| m.category().is_at_least(min))
            .map(OutcomeMessage::text)
            .collect()
    }

    pub fn entries(&self) -> &[OutcomeMessage] {
        &self.messages
    }

    /// Vacía los mensajes; el estado no cambia.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }
}
