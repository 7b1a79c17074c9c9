//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::FileReport;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single file as JSON
    pub fn report(&self, report: &FileReport) -> String {
        self.to_json(report, "{}")
    }

    /// Report several files as a JSON array
    pub fn report_many(&self, reports: &[FileReport]) -> String {
        self.to_json(reports, "[]")
    }

    /// Report several files with a summary object
    pub fn report_with_summary(&self, reports: &[FileReport], stats: &AggregateStats) -> String {
        self.to_json(
            &JsonOutput {
                results: reports,
                summary: stats,
            },
            "{}",
        )
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [FileReport],
    summary: &'a AggregateStats,
}
