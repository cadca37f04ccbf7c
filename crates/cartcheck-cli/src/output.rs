//! Output formatting and progress reporting

use cartcheck::{Scenario, SuiteResults, TestResult};
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

/// Output format for results and listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Progress reporter for a suite run; writes to stderr
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over the suite
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Report one finished scenario
    pub fn on_result(&self, result: &TestResult) {
        let line = format_result_line(result);
        if result.passed {
            self.success(&line);
        } else {
            self.failure(&line);
        }
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn write_line(&self, line: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.println(line),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.write_line("");
        self.write_line(&styled);
    }

    /// Print the suite summary
    pub fn summary(&self, results: &SuiteResults) {
        let failed = results.failed_count();
        if self.quiet && failed == 0 && results.skipped == 0 {
            return;
        }

        self.write_line("");
        let passed = results.passed_count();
        let skipped = results.skipped;
        let total = results.total() + skipped;
        let secs = results.duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if results.all_passed() {
                passed_style.apply_to("PASSED")
            } else {
                failed_style.apply_to("FAILED")
            };

            self.write_line(&format!(
                "{} {} scenarios in {:.2}s ({} passed, {} failed, {} skipped)",
                status,
                total,
                secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped)
            ));
        } else {
            self.write_line(&summary_line(results));
        }
    }
}

/// One line per scenario result
#[must_use]
pub fn format_result_line(result: &TestResult) -> String {
    let ms = result.duration.as_millis();
    match (&result.error, result.phase) {
        (Some(error), Some(phase)) => {
            format!("{} ({ms}ms) [{phase:?}] {error}", result.name)
        }
        _ => format!("{} ({ms}ms)", result.name),
    }
}

/// Uncolored summary line
#[must_use]
pub fn summary_line(results: &SuiteResults) -> String {
    let status = if results.all_passed() { "PASSED" } else { "FAILED" };
    format!(
        "{status} {} scenarios in {:.2}s ({} passed, {} failed, {} skipped)",
        results.total() + results.skipped,
        results.duration.as_secs_f64(),
        results.passed_count(),
        results.failed_count(),
        results.skipped
    )
}

/// Scenario catalog as aligned text
#[must_use]
pub fn render_list_text(scenarios: &[Scenario]) -> String {
    let width = scenarios
        .iter()
        .map(|s| s.name().len())
        .max()
        .unwrap_or_default();
    scenarios
        .iter()
        .map(|s| format!("{:<width$}  {}\n", s.name(), s.id.description()))
        .collect()
}

#[derive(Serialize)]
struct ListEntry<'a> {
    name: String,
    scenario: &'a str,
    product: Option<u8>,
    description: &'a str,
}

/// Scenario catalog as pretty JSON
pub fn render_list_json(scenarios: &[Scenario]) -> serde_json::Result<String> {
    let entries: Vec<ListEntry<'_>> = scenarios
        .iter()
        .map(|s| ListEntry {
            name: s.name(),
            scenario: s.id.name(),
            product: s.product.map(u8::from),
            description: s.id.description(),
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}
