//! SARIF 2.1 reporter for GitHub Code Scanning / VS Code SARIF viewer

use crate::fixer::TextEdit;
use crate::{FileReport, Severity};
use serde::Serialize;
use std::path::Path;

/// SARIF 2.1.0 minimal structure for one run
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
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
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    short_description: SarifMessage,
    full_description: Option<SarifMessage>,
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
    level: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: String,
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
    start_column: Option<usize>,
    end_line: Option<usize>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    inserted_content: Option<SarifContent>,
}

/// Region addressed by byte offset
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
    let path = p.to_string_lossy();
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{}", path)
    } else {
        format!("file:///{}", path)
    }
}

fn replacement(edit: &TextEdit) -> SarifReplacement {
    SarifReplacement {
        deleted_region: SarifByteRegion {
            byte_offset: edit.span.start,
            byte_length: edit.span.end - edit.span.start,
        },
        inserted_content: (!edit.text.is_empty()).then(|| SarifContent {
            text: edit.text.clone(),
        }),
    }
}

/// SARIF reporter for GitHub Code Scanning integration
pub struct SarifReporter;

impl SarifReporter {
    pub fn new() -> Self {
        Self
    }

    /// Produce SARIF 2.1 JSON for one or more lint results
    pub fn report(&self, results: &[FileReport]) -> String {
        let mut rule_ids = std::collections::BTreeSet::new();
        for r in results {
            for d in &r.diagnostics {
                rule_ids.insert(d.rule.to_string());
            }
        }

        let rules: Vec<SarifRule> = rule_ids
            .iter()
            .map(|id| SarifRule {
                id: id.clone(),
                short_description: SarifMessage {
                    text: "Avoid using a callback in asynchronous tests and hooks".to_string(),
                },
                full_description: None,
                default_configuration: SarifDefaultConfig {
                    level: "error".to_string(),
                },
            })
            .collect();

        let mut sarif_results = Vec::new();
        for result in results {
            let file_uri = path_to_uri(&result.file_path);
            for diagnostic in &result.diagnostics {
                let fixes = diagnostic
                    .suggestions
                    .iter()
                    .map(|s| SarifFix {
                        description: SarifMessage {
                            text: s.message.clone(),
                        },
                        artifact_changes: vec![SarifArtifactChange {
                            artifact_location: SarifArtifactLocation {
                                uri: file_uri.clone(),
                            },
                            replacements: s.edits.sorted().into_iter().map(replacement).collect(),
                        }],
                    })
                    .collect();
                sarif_results.push(SarifResult {
                    rule_id: diagnostic.rule.to_string(),
                    level: severity_to_level(diagnostic.severity).to_string(),
                    message: SarifMessage {
                        text: diagnostic.message.clone(),
                    },
                    locations: vec![SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation {
                                uri: file_uri.clone(),
                            },
                            region: SarifRegion {
                                start_line: diagnostic.location.line,
                                start_column: Some(diagnostic.location.column),
                                end_line: diagnostic.location.end_line,
                                end_column: diagnostic.location.end_column,
                            },
                        },
                    }],
                    fixes,
                });
            }
        }

        let run = SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "nodone".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results: sarif_results,
        };

        let log = SarifLog {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json".to_string(),
            version: "2.1.0".to_string(),
            runs: vec![run],
        };

        serde_json::to_string_pretty(&log).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for SarifReporter {
    fn default() -> Self {
        Self::new()
    }
}
