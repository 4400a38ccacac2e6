use serde::{Deserialize, Serialize};

/// Resultado de ejecución de un Step, con orden total por rango.
///
/// El rango sólo se usa para comparar magnitudes (filtrado "al menos" y
/// reducción al máximo). Transiciones típicas:
/// - `NotRun` -> `InProcess` (implícito, sólo visible si el step lo fija)
/// - `InProcess` -> cualquier estado terminal
///
/// `NotRun` es inicial y también terminal válido (un step que nunca corrió).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusSeverity {
    #[default]
    NotRun,
    InProcess,
    Skipped,
    FileNotFound,
    DirectoryNotFound,
    Success,
    ValidationError,
    UnexpectedSystemError,
}

impl StatusSeverity {
    pub const fn rank(self) -> u8 {
        match self {
            Self::NotRun => 0,
            Self::InProcess => 10,
            Self::Skipped => 11,
            Self::FileNotFound => 12,
            Self::DirectoryNotFound => 13,
            Self::Success => 20,
            Self::ValidationError => 40,
            Self::UnexpectedSystemError => 50,
        }
    }

    pub fn is_at_least(self, min: StatusSeverity) -> bool {
        self.rank() >= min.rank()
    }

    /// Peor estado (mayor rango) de una colección; `None` si está vacía.
    pub fn worst<I>(statuses: I) -> Option<StatusSeverity>
        where I: IntoIterator<Item = StatusSeverity>
    {
        statuses.into_iter().max()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotRun => "NOT_RUN",
            Self::InProcess => "IN_PROCESS",
            Self::Skipped => "SKIPPED",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::DirectoryNotFound => "DIRECTORY_NOT_FOUND",
            Self::Success => "SUCCESS",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UnexpectedSystemError => "UNEXPECTED_SYSTEM_ERROR",
        }
    }
}

impl PartialOrd for StatusSeverity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StatusSeverity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl std::fmt::Display for StatusSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
