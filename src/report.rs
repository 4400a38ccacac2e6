//! Presentación del reporte de una corrida y código de salida.
use std::fmt::Write as _;

use stepcheck_core::{RunReport, StatusSeverity};

/// Código de salida de una corrida.
///
/// FILE_NOT_FOUND y DIRECTORY_NOT_FOUND rankean por debajo de SUCCESS, así
/// que el peor estado solo no alcanza: su presencia en cualquier nodo
/// también cuenta como fallo.
pub fn exit_code(report: &RunReport) -> u8 {
    let worst = report.worst_status();
    if worst > StatusSeverity::ValidationError {
        return 2;
    }
    if worst == StatusSeverity::ValidationError {
        return 1;
    }
    let mut not_found = false;
    report.root.walk(&mut |_, step| {
        not_found |= matches!(step.status, StatusSeverity::FileNotFound | StatusSeverity::DirectoryNotFound);
    });
    if not_found {
        2
    } else {
        0
    }
}

/// Árbol indentado: una línea por step y una por mensaje.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "run {} at {}", report.run_id, report.captured_at.to_rfc3339());
    report.root.walk(&mut |depth, step| {
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{indent}{} [{}]: {}", step.name, step.kind, step.status);
        for msg in &step.messages {
            let _ = writeln!(out, "{indent}  - {}: {}", msg.category(), msg.text());
        }
    });
    let _ = writeln!(out, "overall: {}", report.worst_status());
    out
}

pub fn render_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    use stepcheck_core::{MessageCategory, OutcomeMessage, StepKind, StepReport};

    fn node(status: StatusSeverity, children: Vec<StepReport>) -> StepReport {
        StepReport { kind: StepKind::new("probe"),
                     name: "probe".into(),
                     status,
                     messages: vec![OutcomeMessage::new(MessageCategory::Info, "hello")],
                     children }
    }

    fn run(root: StepReport) -> RunReport {
        RunReport::from_root(root)
    }

    #[test]
    fn exit_codes_follow_worst_status() {
        use StatusSeverity::*;
        assert_eq!(exit_code(&run(node(Success, vec![node(Skipped, vec![])]))), 0);
        assert_eq!(exit_code(&run(node(ValidationError, vec![node(Success, vec![])]))), 1);
        assert_eq!(exit_code(&run(node(Success, vec![node(DirectoryNotFound, vec![])]))), 2);
        assert_eq!(exit_code(&run(node(Success, vec![node(UnexpectedSystemError, vec![])]))), 2);
    }

    #[test]
    fn text_rendering_indents_children_and_messages() {
        let text = render_text(&run(node(StatusSeverity::Success, vec![node(StatusSeverity::Skipped, vec![])])));
        assert!(text.contains("probe [probe]: SUCCESS\n  - INFO: hello\n"), "{text}");
        assert!(text.contains("\n  probe [probe]: SKIPPED\n    - INFO: hello\n"), "{text}");
        assert!(text.ends_with("overall: SUCCESS\n"));
    }
}
