//! Scan report rendering.
//!
//! A [`Report`] is a snapshot of one pass, sorted for display, that renders
//! into a mail subject plus plain-text and HTML bodies.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use tvecheck_core::{ChannelNumber, FailedChannel, friendly_error};

/// Version shown in the report footer.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One failed channel as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLine {
    /// Channel number.
    pub number: ChannelNumber,
    /// Display name.
    pub name: String,
    /// Error with its category prefix, e.g. `"Timeout (...)"`.
    pub error: String,
    /// Human-readable failure duration, when the ledger knows it.
    pub failing_for: Option<String>,
}

/// One passed channel as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassedLine {
    /// Channel number.
    pub number: ChannelNumber,
    /// Display name.
    pub name: String,
}

/// Rendered view of a scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    server: String,
    failed: Vec<FailedLine>,
    passed: Vec<PassedLine>,
}

impl Report {
    /// Builds a report from one pass's results.
    ///
    /// `failing_for` looks up how long a channel has been failing.
    /// Both lists are ordered by name, case-insensitively.
    pub fn build<F>(
        passed: &BTreeMap<ChannelNumber, String>,
        failed: &BTreeMap<ChannelNumber, FailedChannel>,
        failing_for: F,
        server: impl Into<String>,
    ) -> Self
    where
        F: Fn(&ChannelNumber) -> Option<String>,
    {
        let mut failed: Vec<FailedLine> = failed
            .iter()
            .map(|(number, channel)| FailedLine {
                number: number.clone(),
                name: channel.name.clone(),
                error: friendly_error(&channel.error),
                failing_for: failing_for(number),
            })
            .collect();
        failed.sort_by_cached_key(|line| line.name.to_lowercase());

        let mut passed: Vec<PassedLine> = passed
            .iter()
            .map(|(number, name)| PassedLine {
                number: number.clone(),
                name: name.clone(),
            })
            .collect();
        passed.sort_by_cached_key(|line| line.name.to_lowercase());

        Self {
            server: server.into(),
            failed,
            passed,
        }
    }

    /// Failed channels in display order.
    pub fn failed(&self) -> &[FailedLine] {
        &self.failed
    }

    /// Passed channels in display order.
    pub fn passed(&self) -> &[PassedLine] {
        &self.passed
    }

    /// Returns true if any channel failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Mail subject line.
    pub fn subject(&self) -> String {
        format!(
            "Channels DVR TVE Test Results - {} Failed, {} Passed",
            self.failed.len(),
            self.passed.len()
        )
    }

    /// Plain-text body.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Channels DVR TVE Test Results");
        let _ = writeln!(
            out,
            "Passed: {}  Failed: {}  Total: {}",
            self.passed.len(),
            self.failed.len(),
            self.passed.len() + self.failed.len()
        );
        out.push('\n');

        if self.failed.is_empty() {
            let _ = writeln!(out, "All channels passed!");
        } else {
            let _ = writeln!(out, "Failed Channels");
            for line in &self.failed {
                let _ = write!(out, "  - {} #{}: {}", line.name, line.number, line.error);
                if let Some(duration) = &line.failing_for {
                    let _ = write!(out, " \u{2022} Failing for: {duration}");
                }
                out.push('\n');
            }
        }

        if !self.passed.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "Passed Channels");
            for line in &self.passed {
                let _ = writeln!(out, "  - {} #{}: OK", line.name, line.number);
            }
        }

        out.push('\n');
        let _ = writeln!(out, "Server: {}", self.server);
        let _ = writeln!(out, "Generated by tvecheck v{VERSION}");
        out
    }

    /// HTML body.
    pub fn html(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str(HTML_HEAD);

        let _ = write!(
            out,
            r#"<div class="summary"><div class="stats">
<div class="stat-box"><div class="stat-number passed">{passed}</div><div>Passed</div></div>
<div class="stat-box"><div class="stat-number failed">{failed}</div><div>Failed</div></div>
<div class="stat-box"><div class="stat-number">{total}</div><div>Total</div></div>
</div></div>
"#,
            passed = self.passed.len(),
            failed = self.failed.len(),
            total = self.passed.len() + self.failed.len(),
        );

        if self.failed.is_empty() {
            out.push_str("<h2 class=\"passed\">\u{2705} All channels passed!</h2>\n");
        } else {
            out.push_str(
                "<h2 class=\"failed\">\u{274c} Failed Channels</h2><ul class=\"channel-list\">\n",
            );
            for line in &self.failed {
                let duration = line
                    .failing_for
                    .as_deref()
                    .map(|d| format!(" \u{2022} Failing for: {}", escape_html(d)))
                    .unwrap_or_default();
                let _ = write!(
                    out,
                    r#"<li class="channel-item channel-failed"><div>
<span class="channel-name">{name}</span><span class="channel-number">#{number}</span>
<div class="error-message">{error}{duration}</div>
</div><span class="status status-fail">FAILED</span></li>
"#,
                    name = escape_html(&line.name),
                    number = escape_html(line.number.as_str()),
                    error = escape_html(&line.error),
                );
            }
            out.push_str("</ul>\n");
        }

        if !self.passed.is_empty() {
            out.push_str(
                "<h2 class=\"passed\">\u{2705} Passed Channels</h2><ul class=\"channel-list\">\n",
            );
            for line in &self.passed {
                let _ = write!(
                    out,
                    r#"<li class="channel-item channel-passed"><div>
<span class="channel-name">{name}</span><span class="channel-number">#{number}</span>
</div><span class="status status-ok">OK</span></li>
"#,
                    name = escape_html(&line.name),
                    number = escape_html(line.number.as_str()),
                );
            }
            out.push_str("</ul>\n");
        }

        let _ = write!(
            out,
            r#"<div class="footer">
<p>Server: {server}</p>
<p>Generated by tvecheck v{VERSION}</p>
</div>
</div>
</body>
</html>
"#,
            server = escape_html(&self.server),
        );
        out
    }
}

const HTML_HEAD: &str = r#"<html>
<head>
<style>
body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
.container { max-width: 800px; margin: 0 auto; background-color: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
h1 { color: #333; border-bottom: 3px solid #4CAF50; padding-bottom: 10px; }
h2 { color: #555; margin-top: 30px; }
.summary { background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin: 20px 0; }
.stats { display: flex; justify-content: space-around; text-align: center; }
.stat-box { flex: 1; padding: 10px; }
.stat-number { font-size: 36px; font-weight: bold; }
.passed { color: #4CAF50; }
.failed { color: #f44336; }
.channel-list { list-style: none; padding: 0; }
.channel-item { padding: 12px; margin: 8px 0; border-radius: 5px; display: flex; justify-content: space-between; align-items: center; }
.channel-passed { background-color: #e8f5e9; border-left: 4px solid #4CAF50; }
.channel-failed { background-color: #ffebee; border-left: 4px solid #f44336; }
.channel-number { color: #888; font-size: 14px; margin-left: 8px; }
.channel-name { font-weight: bold; font-size: 18px; color: #333; }
.status { font-weight: bold; padding: 4px 12px; border-radius: 3px; font-size: 14px; }
.status-ok { background-color: #4CAF50; color: white; }
.status-fail { background-color: #f44336; color: white; }
.footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd; color: #888; font-size: 12px; text-align: center; }
.error-message { color: #d32f2f; font-size: 12px; margin-top: 4px; }
</style>
</head>
<body>
<div class="container">
<h1>&#128250; Channels DVR TVE Test Results</h1>
"#;

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
