use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::model::{Collection, FieldWarning, LineError};

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Errors listed per collection on the console; the JSON report has all of them.
const CONSOLE_ERROR_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityGate {
    Pass,
    Warn,
    Fail,
}

impl QualityGate {
    /// Unknown values downgrade to WARN before invalid records fail the gate.
    pub fn evaluate(invalid: usize, unknown: usize) -> Self {
        if invalid == 0 && unknown == 0 {
            QualityGate::Pass
        } else if unknown > 0 {
            QualityGate::Warn
        } else {
            QualityGate::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityGate::Pass => "PASS",
            QualityGate::Warn => "WARN",
            QualityGate::Fail => "FAIL",
        }
    }

    fn badge(&self) -> &'static str {
        match self {
            QualityGate::Pass => "✓ PASS",
            QualityGate::Warn => "⚠ WARN",
            QualityGate::Fail => "✗ FAIL",
        }
    }
}

impl fmt::Display for QualityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    pub collection: String,
    pub total_lines: usize,
    pub valid_items: usize,
    pub invalid_items: usize,
    pub normalized_fields: usize,
    pub unknown_fields: usize,
    pub errors: Vec<LineError>,
    pub warnings: Vec<FieldWarning>,
}

impl CollectionReport {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection: collection.name().to_string(),
            total_lines: 0,
            valid_items: 0,
            invalid_items: 0,
            normalized_fields: 0,
            unknown_fields: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn gate(&self) -> QualityGate {
        QualityGate::evaluate(self.invalid_items, self.unknown_fields)
    }

    pub fn render(&self) -> String {
        let mut out = vec![
            format!("  Total lines:       {}", self.total_lines),
            format!("  Valid items:       {}", self.valid_items),
            format!("  Invalid items:     {}", self.invalid_items),
            format!("  Normalized fields: {}", self.normalized_fields),
            format!("  Unknown fields:    {}", self.unknown_fields),
        ];

        if !self.errors.is_empty() {
            out.push("  Errors:".to_string());
            for err in self.errors.iter().take(CONSOLE_ERROR_LIMIT) {
                out.push(format!("    Line {}: {}", err.line, err.error));
            }
            if self.errors.len() > CONSOLE_ERROR_LIMIT {
                out.push(format!(
                    "    ... and {} more",
                    self.errors.len() - CONSOLE_ERROR_LIMIT
                ));
            }
        }

        out.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_valid: usize,
    pub total_invalid: usize,
    pub total_normalized: usize,
    pub total_unknown: usize,
    pub status: QualityGate,
}

impl Summary {
    pub fn from_reports(reports: &[CollectionReport]) -> Self {
        let (total_valid, total_invalid, total_normalized, total_unknown) =
            reports.iter().fold((0, 0, 0, 0), |(v, i, n, u), r| {
                (
                    v + r.valid_items,
                    i + r.invalid_items,
                    n + r.normalized_fields,
                    u + r.unknown_fields,
                )
            });

        Self {
            total_valid,
            total_invalid,
            total_normalized,
            total_unknown,
            status: QualityGate::evaluate(total_invalid, total_unknown),
        }
    }
}

/// Contents of `import_report.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub dry_run: bool,
    pub reports: Vec<CollectionReport>,
    pub summary: Summary,
}

fn serialize_timestamp<S: serde::Serializer>(
    ts: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl ImportReport {
    pub fn new(reports: Vec<CollectionReport>, dry_run: bool, timestamp: DateTime<Utc>) -> Self {
        let summary = Summary::from_reports(&reports);
        Self {
            timestamp,
            dry_run,
            reports,
            summary,
        }
    }

    pub fn status(&self) -> QualityGate {
        self.summary.status
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_summary(&self) -> String {
        let mut out = vec![
            RULE.to_string(),
            "  IMPORT REPORT SUMMARY".to_string(),
            RULE.to_string(),
        ];

        for r in &self.reports {
            out.push(format!(
                "  {} {}: {}/{} valid, {} normalized, {} unknown",
                r.gate().badge(),
                r.collection,
                r.valid_items,
                r.total_lines,
                r.normalized_fields,
                r.unknown_fields
            ));
        }

        let s = &self.summary;
        out.push(String::new());
        out.push(format!(
            "  Total: {} valid, {} invalid, {} normalized, {} unknown",
            s.total_valid, s.total_invalid, s.total_normalized, s.total_unknown
        ));
        out.push(format!("  Quality Gate: {}", s.status));
        out.push(RULE.to_string());

        out.join("\n")
    }
}
