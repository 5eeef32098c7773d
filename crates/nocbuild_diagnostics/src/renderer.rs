//! Diagnostic rendering for terminal output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E201]: unresolved connection (blockA:out0 -> blockA:out0)
///    = note: source or destination port not found
///    = help: block ports are connected output (src) to input (dst)
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        // Header line: severity[CODE]: message
        let header = format!("{}[{}]", diag.severity, diag.code);
        if self.color {
            let color_code = match diag.severity {
                crate::Severity::Error => "\x1b[1;31m",
                crate::Severity::Warning => "\x1b[1;33m",
                crate::Severity::Note => "\x1b[1;36m",
            };
            out.push_str(&format!("{color_code}{header}\x1b[0m: {}\n", diag.message));
        } else {
            out.push_str(&format!("{header}: {}\n", diag.message));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::codes;

    #[test]
    fn render_error() {
        let diag = Diagnostic::error(
            codes::UNRESOLVED_CONNECTION,
            "unresolved connection (a:out0 -> b:out0)",
        )
        .with_note("destination is not a declared input")
        .with_help("block ports are connected output (src) to input (dst)");

        let renderer = TerminalRenderer::new(false);
        let output = renderer.render(&diag);

        assert!(output.contains("error[E201]: unresolved connection (a:out0 -> b:out0)"));
        assert!(output.contains("= note: destination is not a declared input"));
        assert!(output.contains("= help: block ports are connected output (src) to input (dst)"));
    }

    #[test]
    fn render_warning_plain() {
        let diag = Diagnostic::warning(codes::UNKNOWN_PARAMETER, "unknown parameter");
        let renderer = TerminalRenderer::new(false);
        let output = renderer.render(&diag);
        assert!(output.starts_with("warning[W101]: unknown parameter"));
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn render_with_color_wraps_header() {
        let diag = Diagnostic::error(codes::UNRESOLVED_CONNECTION, "boom");
        let renderer = TerminalRenderer::new(true);
        let output = renderer.render(&diag);
        assert!(output.contains("\x1b[1;31m"));
        assert!(output.contains("\x1b[0m"));
    }
}
