use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::report::CollectionReport;

/// A seed collection known to the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Scenarios,
    CommonErrors,
    QuestionBank,
}

impl Collection {
    /// Processing order.
    pub const ALL: [Collection; 3] = [
        Collection::Scenarios,
        Collection::CommonErrors,
        Collection::QuestionBank,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Scenarios => "scenarios",
            Collection::CommonErrors => "common_errors",
            Collection::QuestionBank => "question_bank",
        }
    }

    pub fn default_file(&self) -> String {
        format!("{}.jsonl", self.name())
    }

    pub fn normalized_file(&self) -> String {
        format!("{}_normalized.jsonl", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| {
                let known: Vec<&str> = Collection::ALL.iter().map(|c| c.name()).collect();
                format!("unknown collection '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// One successfully parsed line of a seed file.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedLine {
    /// 1-based physical line number in the source file.
    pub line: usize,
    pub value: serde_json::Value,
}

/// Everything extracted from a single collection file.
#[derive(Debug, Clone)]
pub struct SeedBatch {
    pub collection: Collection,
    pub source: String,
    /// Non-blank lines seen in the file.
    pub total_lines: usize,
    pub lines: Vec<SeedLine>,
    /// Parse failures, or the missing-file entry.
    pub errors: Vec<LineError>,
    pub missing: bool,
}

impl SeedBatch {
    pub fn missing(collection: Collection, source: String) -> Self {
        Self {
            collection,
            errors: vec![LineError::new(0, format!("File not found: {}", source))],
            source,
            total_lines: 0,
            lines: Vec::new(),
            missing: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineError {
    pub line: usize,
    pub error: String,
}

impl LineError {
    pub fn new(line: usize, error: impl Into<String>) -> Self {
        Self {
            line,
            error: error.into(),
        }
    }
}

/// A field whose raw value was rewritten by a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWarning {
    pub line: usize,
    pub field: String,
    pub original: String,
    pub normalized: String,
}

#[derive(Debug, Clone)]
pub struct CollectionOutcome {
    pub collection: Collection,
    pub report: CollectionReport,
    /// Serialized normalized records, input order.
    pub normalized: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub outcomes: Vec<CollectionOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_from_str() {
        assert_eq!("scenarios".parse::<Collection>(), Ok(Collection::Scenarios));
        assert_eq!(
            "common_errors".parse::<Collection>(),
            Ok(Collection::CommonErrors)
        );
        assert_eq!(
            " question_bank ".parse::<Collection>(),
            Ok(Collection::QuestionBank)
        );
        let err = "lessons".parse::<Collection>().unwrap_err();
        assert!(err.contains("lessons"));
        assert!(err.contains("question_bank"));
    }

    #[test]
    fn test_collection_files() {
        assert_eq!(Collection::CommonErrors.default_file(), "common_errors.jsonl");
        assert_eq!(
            Collection::QuestionBank.normalized_file(),
            "question_bank_normalized.jsonl"
        );
    }

    #[test]
    fn test_missing_batch_records_line_zero() {
        let batch = SeedBatch::missing(Collection::Scenarios, "seed/scenarios.jsonl".into());
        assert!(batch.missing);
        assert_eq!(batch.total_lines, 0);
        assert_eq!(
            batch.errors,
            vec![LineError::new(0, "File not found: seed/scenarios.jsonl")]
        );
    }
}
