use tracing::debug;

/// One-line user-visible feedback.
pub trait StatusReporter {
    fn show_status(&mut self, message: &str);
}

/// The editor's status line: holds the most recent message.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: String,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn clear(&mut self) {
        self.message.clear();
    }
}

impl StatusReporter for StatusLine {
    fn show_status(&mut self, message: &str) {
        debug!(status = message);
        self.message.clear();
        // the status bar is one row; keep only the first line
        self.message
            .push_str(message.lines().next().unwrap_or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_keeps_latest_single_line() {
        let mut status = StatusLine::new();
        status.show_status("first");
        status.show_status("second\nignored");

        assert_eq!(status.message(), "second");

        status.clear();
        assert_eq!(status.message(), "");
    }
}
