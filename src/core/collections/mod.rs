//! Per-collection processors: validate a record, coalesce its aliases and
//! emit the canonical JSON line.

mod common_errors;
mod question_bank;
mod scenarios;

pub use common_errors::CommonErrorProcessor;
pub use question_bank::QuestionBankProcessor;
pub use scenarios::ScenarioProcessor;

use serde_json::{Map, Value};

use crate::core::report::CollectionReport;
use crate::core::schema::Schema;
use crate::domain::model::{Collection, CollectionOutcome, FieldWarning, LineError, SeedBatch};
use crate::utils::error::Result;

/// Alias-aware view over one validated record.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    record: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(record: &'a Map<String, Value>) -> Self {
        Self { record }
    }

    /// First alias present with a non-null value.
    pub fn value(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|alias| self.record.get(*alias))
            .find(|v| !v.is_null())
    }

    /// First alias holding a string.
    pub fn str(&self, aliases: &[&str]) -> Option<&'a str> {
        self.value(aliases).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessedRecord {
    pub json: String,
    pub warnings: Vec<FieldWarning>,
    pub normalized_fields: usize,
    pub unknown_fields: usize,
}

impl ProcessedRecord {
    pub(crate) fn warn(&mut self, line: usize, field: &str, original: &str, normalized: &str) {
        self.warnings.push(FieldWarning {
            line,
            field: field.to_string(),
            original: original.to_string(),
            normalized: normalized.to_string(),
        });
        self.normalized_fields += 1;
    }
}

pub trait CollectionProcessor: Send + Sync {
    fn schema(&self) -> &Schema;

    fn process(&self, line: usize, fields: Fields<'_>) -> Result<ProcessedRecord>;
}

pub fn processor_for(collection: Collection) -> &'static dyn CollectionProcessor {
    match collection {
        Collection::Scenarios => &ScenarioProcessor,
        Collection::CommonErrors => &CommonErrorProcessor,
        Collection::QuestionBank => &QuestionBankProcessor,
    }
}

/// Runs every parsed line of a batch through its collection's processor.
/// Bad records are counted and reported; they never stop the batch.
pub fn process_batch(batch: SeedBatch) -> Result<CollectionOutcome> {
    let collection = batch.collection;
    let mut report = CollectionReport::new(collection);
    let mut normalized = Vec::with_capacity(batch.lines.len());

    report.total_lines = batch.total_lines;
    report.invalid_items = batch.errors.len();
    report.errors = batch.errors;

    if batch.missing {
        return Ok(CollectionOutcome {
            collection,
            report,
            normalized,
        });
    }

    let processor = processor_for(collection);
    for seed in &batch.lines {
        let record = match processor.schema().check(&seed.value) {
            Ok(record) => record,
            Err(issues) => {
                tracing::debug!(
                    collection = %collection,
                    line = seed.line,
                    "record rejected: {}",
                    issues.join("; ")
                );
                report.invalid_items += 1;
                report.errors.push(LineError::new(seed.line, issues.join("; ")));
                continue;
            }
        };

        let processed = processor.process(seed.line, Fields::new(record))?;
        report.valid_items += 1;
        report.normalized_fields += processed.normalized_fields;
        report.unknown_fields += processed.unknown_fields;
        report.warnings.extend(processed.warnings);
        normalized.push(processed.json);
    }

    report.errors.sort_by_key(|e| e.line);

    Ok(CollectionOutcome {
        collection,
        report,
        normalized,
    })
}
