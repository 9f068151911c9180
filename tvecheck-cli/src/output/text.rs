//! Text output for scan passes.

use chrono::{DateTime, Local};
use tvecheck_core::{ProbeResult, ScanOutcome};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

/// Text formatter with optional colors.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Header printed before a pass.
    pub fn format_pass_header(&self, started: DateTime<Local>, server: &str) -> String {
        self.bold(&format!(
            "TVE channel check - {} ({server})",
            started.format("%Y-%m-%d %H:%M:%S")
        ))
    }

    /// One line per probed channel: `#6010 (ESPN): OK`.
    pub fn format_result(&self, result: &ProbeResult) -> String {
        let status = if result.success {
            self.green("OK")
        } else {
            let error = result.error.as_deref().unwrap_or("Unknown error");
            format!("{} - {error}", self.red("FAILED"))
        };
        format!(
            "#{} ({}): {status}",
            result.channel_number, result.channel_name
        )
    }

    /// Totals for a finished pass.
    pub fn format_summary(&self, outcome: &ScanOutcome) -> String {
        format!(
            "Passed: {}, Failed: {}, Total: {} ({:.1}s)",
            self.green(&outcome.passed.len().to_string()),
            if outcome.failed.is_empty() {
                "0".to_string()
            } else {
                self.red(&outcome.failed.len().to_string())
            },
            outcome.total(),
            outcome.elapsed.as_secs_f64()
        )
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tvecheck_core::Channel;

    fn channel() -> Channel {
        Channel::new(6010_u32, "ESPN")
    }

    #[test]
    fn test_format_passed_result() {
        let formatter = TextFormatter::new(false);
        let line = formatter.format_result(&ProbeResult::passed(&channel()));
        assert_eq!(line, "#6010 (ESPN): OK");
    }

    #[test]
    fn test_format_failed_result() {
        let formatter = TextFormatter::new(false);
        let line = formatter.format_result(&ProbeResult::failed(&channel(), "HTTP 503"));
        assert_eq!(line, "#6010 (ESPN): FAILED - HTTP 503");
    }

    #[test]
    fn test_colors_wrap_status_only() {
        let formatter = TextFormatter::new(true);
        let line = formatter.format_result(&ProbeResult::passed(&channel()));
        assert_eq!(line, "#6010 (ESPN): \x1b[32mOK\x1b[0m");
    }

    #[test]
    fn test_format_summary() {
        let mut outcome = ScanOutcome::new();
        outcome.record(ProbeResult::passed(&Channel::new(1_u32, "A")));
        outcome.record(ProbeResult::failed(&Channel::new(2_u32, "B"), "HTTP 503"));
        outcome.elapsed = Duration::from_millis(2500);

        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_summary(&outcome),
            "Passed: 1, Failed: 1, Total: 2 (2.5s)"
        );
    }
}
