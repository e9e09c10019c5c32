use serde::Serialize;
use serde_json::{json, Value};

use super::{CollectionProcessor, Fields, ProcessedRecord};
use crate::core::normalize::{
    normalize_language, normalize_level, normalize_topic_domain, UNKNOWN_LEVEL,
};
use crate::core::schema::{Schema, QUESTION_BANK};
use crate::utils::error::Result;

const DEFAULT_TIMING_SECONDS: u32 = 60;

const DEFAULT_PHASE: &str = "1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Question<'a> {
    id: &'a str,
    language: &'static str,
    target_level: &'static str,
    topic_domain: String,
    question_text: &'a str,
    followups: Value,
    timing_seconds: Value,
    variants: Value,
    phase: &'a str,
    needs_review: bool,
}

pub struct QuestionBankProcessor;

impl CollectionProcessor for QuestionBankProcessor {
    fn schema(&self) -> &Schema {
        &QUESTION_BANK
    }

    fn process(&self, line: usize, fields: Fields<'_>) -> Result<ProcessedRecord> {
        let mut out = ProcessedRecord::default();

        let raw_level = fields
            .str(&["level_target", "levelTarget"])
            .unwrap_or(UNKNOWN_LEVEL);
        let level = normalize_level(Some(raw_level));
        if level != raw_level {
            out.warn(line, "level_target", raw_level, level);
        }
        if level == UNKNOWN_LEVEL {
            out.unknown_fields += 1;
        }

        let raw_domain = fields.str(&["topic_domain", "topicDomain"]);
        let domain = normalize_topic_domain(raw_domain);
        if let Some(raw) = raw_domain.filter(|raw| *raw != domain) {
            out.warn(line, "topic_domain", raw, &domain);
        }

        let question = Question {
            id: fields.str(&["id"]).unwrap_or_default(),
            language: normalize_language(fields.str(&["language"])).tag(),
            target_level: level,
            topic_domain: domain,
            question_text: fields.str(&["question_text", "questionText"]).unwrap_or(""),
            followups: fields.value(&["followups"]).cloned().unwrap_or_else(|| json!([])),
            timing_seconds: fields
                .value(&["timing_seconds", "timingSeconds"])
                .cloned()
                .unwrap_or_else(|| json!(DEFAULT_TIMING_SECONDS)),
            variants: fields.value(&["variants"]).cloned().unwrap_or_else(|| json!([])),
            phase: fields.str(&["phase"]).unwrap_or(DEFAULT_PHASE),
            needs_review: level == UNKNOWN_LEVEL,
        };

        out.json = serde_json::to_string(&question)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(value: Value) -> (Value, ProcessedRecord) {
        let record = value.as_object().unwrap();
        let out = QuestionBankProcessor.process(2, Fields::new(record)).unwrap();
        (serde_json::from_str(&out.json).unwrap(), out)
    }

    #[test]
    fn test_defaults() {
        let (json, out) = run(json!({"id": "Q-001", "language": "FR", "level_target": "C"}));
        assert_eq!(
            json,
            json!({
                "id": "Q-001",
                "language": "fr",
                "targetLevel": "C",
                "topicDomain": "Workplace",
                "questionText": "",
                "followups": [],
                "timingSeconds": 60,
                "variants": [],
                "phase": "1",
                "needsReview": false
            })
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_camel_case_aliases() {
        let (json, out) = run(json!({
            "id": "Q-002",
            "language": "EN",
            "levelTarget": "advanced",
            "topicDomain": "svc",
            "questionText": "Describe a recent project.",
            "timingSeconds": 90,
            "followups": ["What went well?"]
        }));
        assert_eq!(json["targetLevel"], "C");
        assert_eq!(json["topicDomain"], "Service");
        assert_eq!(json["questionText"], "Describe a recent project.");
        assert_eq!(json["timingSeconds"], 90);
        assert_eq!(json["followups"], json!(["What went well?"]));
        assert_eq!(out.normalized_fields, 2);
    }

    #[test]
    fn test_missing_level_needs_review() {
        let (json, out) = run(json!({"id": "Q-003", "language": "FR"}));
        assert_eq!(json["targetLevel"], "unknown");
        assert_eq!(json["needsReview"], true);
        assert_eq!(out.unknown_fields, 1);
        assert_eq!(out.normalized_fields, 0);
    }
}
