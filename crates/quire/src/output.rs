//! Colored terminal output on stderr.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Plain message, e.g. JSON dumps.
    pub(crate) fn info(&self, msg: &str) {
        self.line(None, msg);
    }

    /// Completed action (green).
    pub(crate) fn success(&self, msg: &str) {
        self.line(Some(Style::new().green()), msg);
    }

    /// Failure (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(Some(Style::new().red()), msg);
    }

    /// Heading for the page being shown (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        self.line(Some(Style::new().cyan().bold()), msg);
    }

    fn line(&self, style: Option<Style>, msg: &str) {
        // Nothing useful to do if stderr is gone
        let _ = match style {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }
}
