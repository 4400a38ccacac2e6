//! Mensajes categorizados de un `ExecutionResult`.
//!
//! La categoría permite filtrar durante el reporte manteniendo el orden de
//! inserción.
use serde::{Deserialize, Serialize};

/// Categorías de mensaje, ordenadas por rango ascendente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageCategory {
    #[default]
    Default,
    Info,
    Warning,
    Error,
}

impl MessageCategory {
    /// Rango numérico fijo (DEFAULT=0, INFO=10, WARNING=20, ERROR=30).
    pub const fn rank(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::Info => 10,
            Self::Warning => 20,
            Self::Error => 30,
        }
    }

    /// `true` si el rango es >= al de `min`.
    pub fn is_at_least(self, min: MessageCategory) -> bool {
        self.rank() >= min.rank()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl PartialOrd for MessageCategory {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MessageCategory {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Mensaje inmutable `(categoría, texto)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMessage {
    category: MessageCategory,
    text: String,
}

impl OutcomeMessage {
    pub fn new(category: MessageCategory, text: impl Into<String>) -> Self {
        Self { category,
               text: text.into() }
    }

    pub fn category(&self) -> MessageCategory {
        self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<String> for OutcomeMessage {
    fn from(text: String) -> Self {
        Self::new(MessageCategory::Default, text)
    }
}

impl From<&str> for OutcomeMessage {
    fn from(text: &str) -> Self {
        Self::new(MessageCategory::Default, text)
    }
}
