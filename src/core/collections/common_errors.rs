use serde::Serialize;
use serde_json::{json, Value};

use super::{CollectionProcessor, Fields, ProcessedRecord};
use crate::core::normalize::{
    normalize_criterion, normalize_language, normalize_level, Language, DEFAULT_CRITERION,
    UNKNOWN_LEVEL,
};
use crate::core::schema::{Schema, COMMON_ERROR};
use crate::utils::error::Result;

const ALL_LEVELS: &str = "all";

const DEFAULT_SEVERITY: u8 = 3;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommonError<'a> {
    error_id: &'a str,
    language: &'static str,
    category: &'a str,
    severity_level: Value,
    pattern: &'a str,
    correction: &'a str,
    correction_rule: &'a str,
    feedback_text_fr: Option<&'a str>,
    feedback_text_en: Option<&'a str>,
    level_impact: String,
    criterion_affected: String,
    examples: Value,
    tags: Value,
    needs_review: bool,
}

/// Catalogue of recurring learner errors and their corrections.
pub struct CommonErrorProcessor;

impl CollectionProcessor for CommonErrorProcessor {
    fn schema(&self) -> &Schema {
        &COMMON_ERROR
    }

    fn process(&self, line: usize, fields: Fields<'_>) -> Result<ProcessedRecord> {
        let mut out = ProcessedRecord::default();

        let raw_level = fields
            .str(&["level_impact", "levelImpact"])
            .unwrap_or(ALL_LEVELS);
        // Unrecognized impacts (including the `all` default) are flagged for
        // review but do not count against the quality gate.
        let level = normalize_level(Some(raw_level));
        let needs_review = level == UNKNOWN_LEVEL;
        let level_impact = if needs_review {
            if !raw_level.trim().eq_ignore_ascii_case(ALL_LEVELS) {
                out.warn(line, "level_impact", raw_level, ALL_LEVELS);
            }
            ALL_LEVELS.to_string()
        } else {
            level.to_lowercase()
        };

        let raw_criterion = fields
            .str(&["criterion_affected", "criterionAffected"])
            .unwrap_or(DEFAULT_CRITERION);
        let criterion = normalize_criterion(Some(raw_criterion));
        if criterion != raw_criterion.to_lowercase() {
            out.warn(line, "criterion_affected", raw_criterion, &criterion);
        }

        // Feedback lands in the field of the normalized language, so a value
        // outside FR/EN falls back to French like the record's language.
        let language = normalize_language(fields.str(&["language"]));
        let feedback = fields.str(&["feedback_text", "feedbackText"]);

        // Required by the schema, so present as strings here.
        let pattern = fields.str(&["pattern"]).unwrap_or_default();
        let correction = fields.str(&["correction"]).unwrap_or_default();

        let error = CommonError {
            error_id: fields.str(&["id"]).unwrap_or_default(),
            language: language.tag(),
            category: fields.str(&["category"]).unwrap_or_default(),
            severity_level: fields
                .value(&["severity_level", "severityLevel"])
                .cloned()
                .unwrap_or_else(|| json!(DEFAULT_SEVERITY)),
            pattern,
            correction,
            correction_rule: fields
                .str(&["feedback_text", "feedbackText", "correction_rule"])
                .unwrap_or(""),
            feedback_text_fr: (language == Language::Fr).then(|| feedback.unwrap_or("")),
            feedback_text_en: (language == Language::En).then(|| feedback.unwrap_or("")),
            level_impact,
            criterion_affected: criterion,
            examples: fields
                .value(&["examples"])
                .cloned()
                .unwrap_or_else(|| json!([{ "incorrect": pattern, "correct": correction }])),
            tags: fields.value(&["tags"]).cloned().unwrap_or_else(|| json!([])),
            needs_review,
        };

        out.json = serde_json::to_string(&error)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(value: Value) -> (Value, ProcessedRecord) {
        let record = value.as_object().unwrap();
        let out = CommonErrorProcessor.process(4, Fields::new(record)).unwrap();
        (serde_json::from_str(&out.json).unwrap(), out)
    }

    fn base() -> Value {
        json!({
            "id": "ERR-FR-001",
            "language": "FR",
            "category": "gender",
            "pattern": "le table",
            "correction": "la table"
        })
    }

    #[test]
    fn test_defaults() {
        let (json, out) = run(base());
        assert_eq!(json["errorId"], "ERR-FR-001");
        assert_eq!(json["language"], "fr");
        assert_eq!(json["severityLevel"], 3);
        assert_eq!(json["correctionRule"], "");
        assert_eq!(json["feedbackTextFr"], "");
        assert!(json["feedbackTextEn"].is_null());
        assert_eq!(json["levelImpact"], "all");
        assert_eq!(json["criterionAffected"], "grammar");
        assert_eq!(
            json["examples"],
            json!([{"incorrect": "le table", "correct": "la table"}])
        );
        assert_eq!(json["tags"], json!([]));
        assert_eq!(json["needsReview"], true);
        assert!(out.warnings.is_empty());
        assert_eq!(out.unknown_fields, 0);
    }

    #[test]
    fn test_criterion_rewrite_warns() {
        let mut value = base();
        value["criterionAffected"] = json!("Lexical_Richness");
        value["levelImpact"] = json!("B");
        value["feedbackText"] = json!("Table est féminin.");
        let (json, out) = run(value);

        assert_eq!(json["criterionAffected"], "vocabulary");
        assert_eq!(json["levelImpact"], "b");
        assert_eq!(json["correctionRule"], "Table est féminin.");
        assert_eq!(json["feedbackTextFr"], "Table est féminin.");
        assert_eq!(out.normalized_fields, 1);
        assert_eq!(out.warnings[0].original, "Lexical_Richness");
    }

    #[test]
    fn test_english_feedback_and_unknown_level() {
        let mut value = base();
        value["language"] = json!("english");
        value["feedback_text"] = json!("Use the article.");
        value["level_impact"] = json!("expert");
        let (json, out) = run(value);

        assert_eq!(json["language"], "en");
        assert!(json["feedbackTextFr"].is_null());
        assert_eq!(json["feedbackTextEn"], "Use the article.");
        assert_eq!(json["levelImpact"], "all");
        assert_eq!(json["needsReview"], true);
        assert_eq!(out.unknown_fields, 0);
        assert_eq!(out.warnings[0].field, "level_impact");
        assert_eq!(out.normalized_fields, 1);
    }

    #[test]
    fn test_known_level_clears_review() {
        let mut value = base();
        value["level_impact"] = json!("Advanced");
        let (json, out) = run(value);
        assert_eq!(json["levelImpact"], "c");
        assert_eq!(json["needsReview"], false);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_empty_criterion_falls_back_to_grammar() {
        let mut value = base();
        value["criterion_affected"] = json!("");
        let (json, out) = run(value);
        assert_eq!(json["criterionAffected"], "grammar");
        assert_eq!(out.normalized_fields, 1);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].original, "");
    }

    #[test]
    fn test_other_language_feedback_goes_to_french() {
        let mut value = base();
        value["language"] = json!("es");
        value["feedback_text"] = json!("Usa el artículo.");
        let (json, _) = run(value);
        assert_eq!(json["language"], "fr");
        assert_eq!(json["feedbackTextFr"], "Usa el artículo.");
        assert!(json["feedbackTextEn"].is_null());
    }

    #[test]
    fn test_lowercase_only_criterion_not_counted() {
        let mut value = base();
        value["criterion_affected"] = json!("Fluency");
        let (json, out) = run(value);
        assert_eq!(json["criterionAffected"], "fluency");
        assert_eq!(out.normalized_fields, 0);
    }
}
