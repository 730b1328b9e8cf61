//! Operator-facing output.
//!
//! [`Output`] is the CLI's [`Reporter`]: status lines go to stdout,
//! warnings and errors to stderr. Each stream is styled only when it is a
//! terminal.

use super::actor::TerminalProgress;
use super::theme::Theme;
use crossterm::style::{StyledContent, Stylize};
use relpub_core::Reporter;
use relpub_core::RegistryError;
use relpub_core::io::ProgressSink;
use relpub_core::publish::PublishError;
use std::sync::Arc;

/// Terminal output handle.
#[derive(Debug, Clone)]
pub struct Output {
    theme: Theme,
    /// stdout is a terminal: styling and the progress bar.
    interactive: bool,
    /// stderr is a terminal: styled warning and error labels.
    styled_stderr: bool,
}

impl Default for Output {
    fn default() -> Self {
        use crossterm::tty::IsTty;

        Self {
            theme: Theme::default(),
            interactive: std::io::stdout().is_tty(),
            styled_stderr: std::io::stderr().is_tty(),
        }
    }
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress sink for an upload of `total` bytes.
    ///
    /// Only interactive terminals get a bar; redirected output gets none.
    pub fn progress(&self, total: u64) -> Option<Arc<dyn ProgressSink>> {
        if !self.interactive {
            return None;
        }
        let bar = TerminalProgress::spawn(total, self.theme.bar.clone(), std::io::stdout());
        Some(Arc::new(bar))
    }

    /// Final line of a successful publish.
    pub fn published(&self, release_id: &str) {
        let id = paint(self.interactive, release_id, Stylize::italic);
        self.success(&format!("published release {id}"));
    }

    /// Print the one-line failure report.
    pub fn failure(&self, err: &anyhow::Error) {
        self.error(&describe(err, self.styled_stderr));
    }

    fn warning_line(&self, msg: &str) -> String {
        let label = paint(self.styled_stderr, "warning:", |s| s.yellow().bold());
        format!("{label} {msg}")
    }

    fn error_line(&self, msg: &str) -> String {
        let label = paint(self.styled_stderr, "error:", |s| s.red().bold());
        format!("{label} {msg}")
    }
}

/// Apply `style` to `text` when `enabled`, otherwise leave it plain.
fn paint<'a>(
    enabled: bool,
    text: &'a str,
    style: impl FnOnce(&'a str) -> StyledContent<&'a str>,
) -> String {
    if enabled {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Render an error, italicizing registry error codes when `styled`.
pub fn describe(err: &anyhow::Error, styled: bool) -> String {
    let api = err
        .downcast_ref::<PublishError>()
        .and_then(|e| match e {
            PublishError::Registry(r) => Some(r),
            _ => None,
        })
        .or_else(|| err.downcast_ref::<RegistryError>());

    match api {
        Some(RegistryError::Api {
            code,
            title,
            detail,
        }) => format!(
            "{} - {title}: {detail}",
            paint(styled, code, Stylize::italic)
        ),
        _ => err.to_string(),
    }
}

impl Reporter for Output {
    fn info(&self, msg: &str) {
        let icon = paint(self.interactive, self.theme.icons.info, Stylize::dark_grey);
        println!("{icon} {msg}");
    }

    fn success(&self, msg: &str) {
        let icon = paint(self.interactive, self.theme.icons.success, Stylize::green);
        println!("{icon} {msg}");
    }

    fn warning(&self, msg: &str) {
        eprintln!("{}", self.warning_line(msg));
    }

    fn error(&self, msg: &str) {
        eprintln!("{}", self.error_line(msg));
    }
}
