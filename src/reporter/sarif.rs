//! SARIF 2.1 reporter for GitHub Code Scanning / VS Code SARIF viewer

use crate::lexicon::messages;
use crate::{FileReport, Fix, Severity, ViolationKind};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: &'static str,
    version: &'static str,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    short_description: SarifMessage,
    full_description: SarifMessage,
    default_configuration: SarifDefaultConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDefaultConfig {
    level: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fixes: Vec<SarifFix>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: usize,
    start_column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_column: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifFix {
    description: SarifMessage,
    artifact_changes: Vec<SarifArtifactChange>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifArtifactChange {
    artifact_location: SarifArtifactLocation,
    replacements: Vec<SarifReplacement>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifReplacement {
    deleted_region: SarifByteRegion,
    inserted_content: SarifContent,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifByteRegion {
    byte_offset: usize,
    byte_length: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifContent {
    text: String,
}

fn severity_to_level(s: Severity) -> &'static str {
    match s {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

/// Convert a path to a URI (file://)
fn path_to_uri(p: &Path) -> String {
    let path = p.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{}", path)
    } else {
        format!("file:///{}", path)
    }
}

fn sarif_fix(uri: &str, fix: &Fix) -> SarifFix {
    SarifFix {
        description: SarifMessage {
            text: format!("Replace with {}", fix.final_replacement),
        },
        artifact_changes: vec![SarifArtifactChange {
            artifact_location: SarifArtifactLocation {
                uri: uri.to_string(),
            },
            replacements: vec![SarifReplacement {
                deleted_region: SarifByteRegion {
                    byte_offset: fix.range.start,
                    byte_length: fix.range.len(),
                },
                inserted_content: SarifContent {
                    text: fix.final_replacement.clone(),
                },
            }],
        }],
    }
}

/// SARIF reporter for GitHub Code Scanning integration
pub struct SarifReporter;

impl SarifReporter {
    pub fn new() -> Self {
        Self
    }

    /// Produce SARIF 2.1 JSON for one or more file reports
    pub fn report(&self, reports: &[FileReport]) -> String {
        // One rule per reported kind, in a stable order
        let kinds: BTreeSet<String> = reports
            .iter()
            .flat_map(|r| r.issues.iter().map(|i| i.kind.to_string()))
            .collect();

        let rules = kinds
            .into_iter()
            .filter_map(|id| ViolationKind::from_id(&id).map(|kind| (id, kind)))
            .map(|(id, kind)| SarifRule {
                short_description: SarifMessage {
                    text: id.replace('-', " "),
                },
                full_description: SarifMessage {
                    text: messages::message(kind).to_string(),
                },
                default_configuration: SarifDefaultConfig { level: "warning" },
                id,
            })
            .collect();

        let results = reports
            .iter()
            .flat_map(|report| {
                let uri = path_to_uri(&report.file_path);
                report.issues.iter().map(move |issue| SarifResult {
                    rule_id: issue.kind.to_string(),
                    level: severity_to_level(issue.severity),
                    message: SarifMessage {
                        text: issue.message.clone(),
                    },
                    locations: vec![SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation { uri: uri.clone() },
                            region: SarifRegion {
                                start_line: issue.location.line,
                                start_column: issue.location.column,
                                end_line: issue.location.end_line,
                                end_column: issue.location.end_column,
                            },
                        },
                    }],
                    fixes: issue.fix.iter().map(|fix| sarif_fix(&uri, fix)).collect(),
                })
            })
            .collect();

        let log = SarifLog {
            schema: SARIF_SCHEMA,
            version: "2.1.0",
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: "Tenor",
                        version: env!("CARGO_PKG_VERSION"),
                        rules,
                    },
                },
                results,
            }],
        };

        serde_json::to_string_pretty(&log).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for SarifReporter {
    fn default() -> Self {
        Self::new()
    }
}
