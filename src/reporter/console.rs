//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::{FileReport, Issue, Severity};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    use_colors: bool,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Also show the description text and the single-step fix
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print a single file report
    pub fn report(&self, report: &FileReport) {
        print!("{}", self.render(report));
    }

    /// Print several reports followed by a summary
    pub fn report_many(&self, reports: &[FileReport], stats: &AggregateStats) {
        print!("{}", self.render_many(reports, stats));
    }

    /// Print one line per file
    pub fn report_quiet(&self, report: &FileReport) {
        println!("{}", self.render_quiet(report));
    }

    pub fn render(&self, report: &FileReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.paint(
                &format!("Test Descriptions: {}", report.file_path.display()),
                |s| s.bold()
            )
        );
        let _ = writeln!(
            out,
            "   Descriptions: {} | Issues: {} | Fixable: {}",
            report.descriptions_checked,
            report.issues.len(),
            report.fixable()
        );
        let _ = writeln!(out);

        if report.issues.is_empty() {
            let _ = writeln!(out, "   {} All descriptions follow the convention", self.paint("✓", |s| s.green()));
        } else {
            for issue in &report.issues {
                self.render_issue(&mut out, issue);
            }
        }
        out
    }

    pub fn render_many(&self, reports: &[FileReport], stats: &AggregateStats) -> String {
        let mut out = String::new();
        for report in reports {
            out.push_str(&self.render(report));
            let _ = writeln!(out, "{}", "─".repeat(60));
        }
        out.push_str(&self.render_summary(stats));
        out
    }

    pub fn render_quiet(&self, report: &FileReport) -> String {
        let issues = report.issues.len();
        let count = format!("{} issue{}", issues, if issues == 1 { "" } else { "s" });
        let count = if issues == 0 {
            self.paint(&count, |s| s.green())
        } else if report.count(Severity::Error) > 0 {
            self.paint(&count, |s| s.red())
        } else {
            self.paint(&count, |s| s.yellow())
        };
        format!(
            "{}: {} ({} fixable)",
            report.file_path.display(),
            count,
            report.fixable()
        )
    }

    fn render_issue(&self, out: &mut String, issue: &Issue) {
        let icon = match issue.severity {
            Severity::Error => self.paint("✗", |s| s.red()),
            Severity::Warning => self.paint("⚠", |s| s.yellow()),
            Severity::Info => self.paint("ℹ", |s| s.blue()),
        };

        let location = format!("{}:{}", issue.location.line, issue.location.column);
        let _ = writeln!(
            out,
            "   {} {} {} {} [{}]",
            icon,
            self.paint(&location, |s| s.dimmed()),
            issue.severity,
            issue.message,
            self.paint(&issue.kind.to_string(), |s| s.dimmed())
        );

        if self.verbose {
            let _ = writeln!(
                out,
                "       {} \"{}\"",
                self.paint("↳", |s| s.dimmed()),
                issue.description
            );
        }

        if let Some(ref fix) = issue.fix {
            let arrow = self.paint("→", |s| s.dimmed());
            if self.verbose && fix.passes > 1 {
                let _ = writeln!(out, "       {} {}", arrow, self.paint(&fix.replacement, |s| s.italic()));
                let _ = writeln!(
                    out,
                    "       {} {} (after {} fixes)",
                    arrow,
                    self.paint(&fix.final_replacement, |s| s.italic()),
                    fix.passes
                );
            } else {
                let _ = writeln!(
                    out,
                    "       {} {}",
                    arrow,
                    self.paint(&fix.final_replacement, |s| s.italic())
                );
            }
        }
    }

    fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.paint("Summary", |s| s.bold()));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "   Files analyzed: {}", stats.files_analyzed);
        let _ = writeln!(out, "   Descriptions:   {}", stats.descriptions_checked);
        let _ = writeln!(
            out,
            "   Issues:         {} ({} errors, {} warnings)",
            stats.total_issues, stats.errors, stats.warnings
        );
        let _ = writeln!(out, "   Fixable:        {} (run with --fix)", stats.fixable);
        out
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
