use chrono::{DateTime, Utc};
use std::path::Path;

use crate::core::collections::process_batch;
use crate::core::report::ImportReport;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{Collection, LineError, SeedBatch, SeedLine, TransformResult};
use crate::utils::error::Result;

/// Reads JSONL seed files, normalizes each collection and writes the
/// normalized files plus `import_report.json`.
pub struct JsonlImportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    clock: fn() -> DateTime<Utc>,
}

impl<S: Storage, C: ConfigProvider> JsonlImportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            clock: Utc::now,
        }
    }

    /// Overrides the report timestamp source.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Collections selected by the enable flags and the `--collection` filter.
    pub fn selected_collections(&self) -> Vec<Collection> {
        Collection::ALL
            .into_iter()
            .filter(|c| self.config.is_enabled(*c))
            .filter(|c| self.config.collection_filter().map_or(true, |only| only == *c))
            .collect()
    }

    pub fn seed_path(&self, collection: Collection) -> String {
        join(self.config.seed_dir(), &self.config.file_for(collection))
    }

    pub fn output_path(&self, collection: Collection) -> String {
        join(self.config.output_dir(), &collection.normalized_file())
    }
}

fn join(dir: &str, file: &str) -> String {
    Path::new(dir).join(file).to_string_lossy().into_owned()
}

/// Splits JSONL content into parsed lines and parse errors. Blank lines are
/// skipped; line numbers are physical, 1-based.
pub fn parse_jsonl(content: &str) -> (usize, Vec<SeedLine>, Vec<LineError>) {
    let mut total = 0;
    let mut lines = Vec::new();
    let mut errors = Vec::new();

    for (idx, raw) in content.split('\n').enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        total += 1;
        match serde_json::from_str(raw) {
            Ok(value) => lines.push(SeedLine {
                line: idx + 1,
                value,
            }),
            Err(e) => errors.push(LineError::new(idx + 1, format!("JSON parse error: {}", e))),
        }
    }

    (total, lines, errors)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for JsonlImportPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SeedBatch>> {
        let mut batches = Vec::new();

        for collection in self.selected_collections() {
            let source = self.seed_path(collection);
            tracing::info!("── Processing: {} ({}) ──", collection, source);

            if !self.storage.exists(&source).await {
                tracing::warn!("✗ File not found: {}", source);
                batches.push(SeedBatch::missing(collection, source));
                continue;
            }

            let bytes = self.storage.read_file(&source).await?;
            let content = String::from_utf8_lossy(&bytes);
            let (total_lines, lines, errors) = parse_jsonl(&content);

            tracing::debug!(
                collection = %collection,
                total_lines,
                parse_errors = errors.len(),
                "seed file read"
            );

            batches.push(SeedBatch {
                collection,
                source,
                total_lines,
                lines,
                errors,
                missing: false,
            });
        }

        Ok(batches)
    }

    async fn transform(&self, batches: Vec<SeedBatch>) -> Result<TransformResult> {
        let mut result = TransformResult::default();

        for batch in batches {
            let outcome = process_batch(batch)?;
            let r = &outcome.report;
            tracing::info!(
                collection = %r.collection,
                valid = r.valid_items,
                invalid = r.invalid_items,
                normalized = r.normalized_fields,
                unknown = r.unknown_fields,
                "collection processed"
            );
            result.outcomes.push(outcome);
        }

        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<ImportReport> {
        let dry_run = self.config.dry_run();
        let mut reports = Vec::with_capacity(result.outcomes.len());

        for outcome in result.outcomes {
            if !dry_run && !outcome.normalized.is_empty() {
                let out_path = self.output_path(outcome.collection);
                let mut body = outcome.normalized.join("\n");
                body.push('\n');
                self.storage.write_file(&out_path, body.as_bytes()).await?;
                tracing::info!("✓ Written: {}", out_path);
            }

            reports.push(outcome.report);
        }

        let report = ImportReport::new(reports, dry_run, (self.clock)());
        let json = report.to_json_pretty()?;
        self.storage
            .write_file(self.config.report_path(), json.as_bytes())
            .await?;
        tracing::info!("Report saved: {}", self.config.report_path());

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jsonl_skips_blank_lines_and_keeps_numbers() {
        let content = "{\"id\":\"a\"}\n\n   \n{broken\n{\"id\":\"b\"}\n";
        let (total, lines, errors) = parse_jsonl(content);
        assert_eq!(total, 3);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[1].line, 5);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 4);
        assert!(errors[0].error.starts_with("JSON parse error: "));
    }

    #[test]
    fn test_parse_jsonl_handles_crlf() {
        let (total, lines, errors) = parse_jsonl("{\"id\":\"a\"}\r\n{\"id\":\"b\"}\r\n");
        assert_eq!(total, 2);
        assert_eq!(lines.len(), 2);
        assert!(errors.is_empty());
    }
}
