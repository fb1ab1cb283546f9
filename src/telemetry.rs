//! Operator-facing diagnostics: warning formatting and tracing setup.
//!
//! Render warnings are data first (see
//! [`RenderWarning`](crate::renderer::RenderWarning)); this module turns
//! them into readable output for admin tooling, with ANSI color when the
//! destination is a terminal.

use std::io::IsTerminal;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::renderer::RenderWarning;

pub const CONTEXT_COLOR: &str = "\x1b[32m"; // green
pub const LINE_COLOR: &str = "\x1b[33m"; // yellow
pub const RESET_COLOR: &str = "\x1b[0m";

/// Install the process-wide tracing subscriber.
///
/// Reads filter directives from the environment (`RUST_LOG`), preloading a
/// `.env` file when present, and attaches an [`ErrorLayer`] for span-aware
/// error reports. Safe to call more than once; later calls are no-ops.
pub fn init() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(true))
        .with(ErrorLayer::default())
        .try_init()
        .ok();
}

/// Formatter color mode for warning output.
///
/// - [`FormatterMode::Auto`]: detects TTY capability via `stderr.is_terminal()`
/// - [`FormatterMode::Colored`]: always include color codes
/// - [`FormatterMode::Plain`]: never include color codes (for logs/files)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatterMode {
    /// Auto-detect TTY capability.
    #[default]
    Auto,
    /// Always include ANSI color codes.
    Colored,
    /// Never include ANSI color codes.
    Plain,
}

impl FormatterMode {
    /// Auto-detect formatter mode based on stderr TTY capability.
    #[must_use]
    pub fn auto_detect() -> Self {
        if std::io::stderr().is_terminal() {
            Self::Colored
        } else {
            Self::Plain
        }
    }

    /// Returns true if this mode should use colored output.
    ///
    /// For `Auto` mode, performs TTY detection on each call.
    #[must_use]
    pub fn is_colored(&self) -> bool {
        match self {
            Self::Auto => std::io::stderr().is_terminal(),
            Self::Colored => true,
            Self::Plain => false,
        }
    }
}

/// Rendered output for one warning, ready for a sink to write.
#[derive(Clone, Debug, Default)]
pub struct WarningRender {
    pub context: Option<String>,
    pub lines: Vec<String>,
}

impl WarningRender {
    #[must_use]
    pub fn join_lines(&self) -> String {
        self.lines.join("")
    }
}

/// Plain text warning formatter with optional ANSI color codes.
pub struct PlainFormatter {
    mode: FormatterMode,
}

impl PlainFormatter {
    /// Create a new formatter with auto-detected color mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: FormatterMode::Auto,
        }
    }

    /// Create a new formatter with explicit color mode.
    #[must_use]
    pub fn with_mode(mode: FormatterMode) -> Self {
        Self { mode }
    }

    fn color<'a>(&self, ansi_code: &'a str) -> &'a str {
        if self.mode.is_colored() { ansi_code } else { "" }
    }

    fn reset(&self) -> &str {
        if self.mode.is_colored() {
            RESET_COLOR
        } else {
            ""
        }
    }

    /// Render a batch of warnings, one [`WarningRender`] per warning.
    #[must_use]
    pub fn render_warnings(&self, warnings: &[RenderWarning]) -> Vec<WarningRender> {
        warnings
            .iter()
            .enumerate()
            .map(|(i, warning)| {
                let context = format!("widget:{}", warning.widget_type);
                let lines = vec![
                    format!(
                        "[{i}] {} | {}{}{}\n",
                        warning.when,
                        self.color(CONTEXT_COLOR),
                        context,
                        self.reset()
                    ),
                    format!(
                        "{}  warning: {}{}\n",
                        self.color(LINE_COLOR),
                        warning,
                        self.reset()
                    ),
                ];
                WarningRender {
                    context: Some(context),
                    lines,
                }
            })
            .collect()
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mode_emits_no_ansi() {
        let formatter = PlainFormatter::with_mode(FormatterMode::Plain);
        let warnings = vec![RenderWarning::missing_type("a", "retired-widget")];
        let rendered = formatter.render_warnings(&warnings);
        assert_eq!(rendered.len(), 1);
        let text = rendered[0].join_lines();
        assert!(!text.contains('\x1b'));
        assert!(text.contains("retired-widget"));
    }

    #[test]
    fn colored_mode_emits_ansi() {
        let formatter = PlainFormatter::with_mode(FormatterMode::Colored);
        let warnings = vec![RenderWarning::missing_type("a", "retired-widget")];
        let text = formatter.render_warnings(&warnings)[0].join_lines();
        assert!(text.contains(CONTEXT_COLOR));
        assert!(text.contains(RESET_COLOR));
    }
}
