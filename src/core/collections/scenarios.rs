use serde::Serialize;
use serde_json::{json, Value};

use super::{CollectionProcessor, Fields, ProcessedRecord};
use crate::core::normalize::{
    normalize_language, normalize_level, normalize_topic_domain, CRITERIA, DEFAULT_TOPIC_DOMAIN,
    UNKNOWN_LEVEL,
};
use crate::core::schema::{Schema, SCENARIO};
use crate::utils::error::Result;

const DEFAULT_DURATION_TAG: &str = "full_simulation";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OralScenario<'a> {
    scenario_id: String,
    language: &'static str,
    target_level: &'static str,
    topic_domain: String,
    duration_tag: &'a str,
    context_prompt: &'a str,
    examiner_role: Option<&'a str>,
    question_sequence: Value,
    expected_functions: Value,
    expected_vocabulary: Value,
    register_constraints: Value,
    scoring_focus: Value,
    tags: Value,
    needs_review: bool,
}

/// Oral exam simulation scenarios.
pub struct ScenarioProcessor;

impl CollectionProcessor for ScenarioProcessor {
    fn schema(&self) -> &Schema {
        &SCENARIO
    }

    fn process(&self, line: usize, fields: Fields<'_>) -> Result<ProcessedRecord> {
        let mut out = ProcessedRecord::default();

        let raw_level = fields
            .str(&["target_level", "targetLevel", "level_target"])
            .unwrap_or(UNKNOWN_LEVEL);
        let level = normalize_level(Some(raw_level));
        if level != raw_level {
            out.warn(line, "target_level", raw_level, level);
        }
        if level == UNKNOWN_LEVEL {
            out.unknown_fields += 1;
        }

        let language = normalize_language(fields.str(&["language"]));

        let raw_domain = fields
            .str(&["topic_domain", "topicDomain"])
            .unwrap_or(DEFAULT_TOPIC_DOMAIN);
        let domain = normalize_topic_domain(Some(raw_domain));
        if domain != raw_domain {
            out.warn(line, "topic_domain", raw_domain, &domain);
        }

        let scenario_id = fields
            .str(&["scenario_id", "scenarioId", "id"])
            .map(str::to_string)
            .unwrap_or_else(|| format!("SCN-{}-{:03}", language.code(), line));

        let flagged = fields
            .value(&["needs_review", "needsReview"])
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let scenario = OralScenario {
            scenario_id,
            language: language.tag(),
            target_level: level,
            topic_domain: domain,
            duration_tag: fields
                .str(&["duration_tag", "durationTag"])
                .unwrap_or(DEFAULT_DURATION_TAG),
            context_prompt: fields
                .str(&["context_prompt", "contextPrompt", "context"])
                .unwrap_or(""),
            examiner_role: fields.str(&["examiner_role", "examinerRole"]),
            question_sequence: or_default(&fields, &["question_sequence", "questionSequence"], json!([])),
            expected_functions: or_default(&fields, &["expected_functions", "expectedFunctions"], json!([])),
            expected_vocabulary: or_default(
                &fields,
                &["expected_vocabulary", "expectedVocabulary"],
                json!([]),
            ),
            register_constraints: or_default(
                &fields,
                &["register_constraints", "registerConstraints"],
                Value::Null,
            ),
            scoring_focus: or_default(&fields, &["scoring_focus", "scoringFocus"], json!(CRITERIA)),
            tags: or_default(&fields, &["tags"], json!({})),
            needs_review: level == UNKNOWN_LEVEL || flagged,
        };

        out.json = serde_json::to_string(&scenario)?;
        Ok(out)
    }
}

fn or_default(fields: &Fields<'_>, aliases: &[&str], default: Value) -> Value {
    fields.value(aliases).cloned().unwrap_or(default)
}
