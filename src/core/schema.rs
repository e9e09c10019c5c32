//! Shape checks applied to every seed record before normalization.
//!
//! Records must be JSON objects. Listed fields are type-checked; fields not
//! listed pass through untouched.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
    Number,
    Array,
    StringArray,
    Any,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        name,
        kind,
        required: false,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    rules: &'static [FieldRule],
}

impl Schema {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    /// Returns the record as an object, or every issue found.
    pub fn check<'a>(&self, value: &'a Value) -> Result<&'a Map<String, Value>, Vec<String>> {
        let Value::Object(record) = value else {
            return Err(vec![format!("Expected object, received {}", type_name(value))]);
        };

        let issues: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| check_field(rule, record.get(rule.name)))
            .collect();

        if issues.is_empty() {
            Ok(record)
        } else {
            Err(issues)
        }
    }
}

fn check_field(rule: &FieldRule, value: Option<&Value>) -> Option<String> {
    let Some(value) = value else {
        return rule.required.then(|| format!("{}: Required", rule.name));
    };

    let matches = match rule.kind {
        FieldKind::Any => true,
        FieldKind::String => value.is_string(),
        FieldKind::Bool => value.is_boolean(),
        FieldKind::Number => value.is_number(),
        FieldKind::Array => value.is_array(),
        FieldKind::StringArray => match value {
            Value::Array(items) => {
                if let Some((idx, bad)) = items.iter().enumerate().find(|(_, v)| !v.is_string()) {
                    return Some(format!(
                        "{}[{}]: Expected string, received {}",
                        rule.name,
                        idx,
                        type_name(bad)
                    ));
                }
                true
            }
            _ => false,
        },
    };

    if matches {
        None
    } else {
        Some(format!(
            "{}: Expected {}, received {}",
            rule.name,
            expected_name(rule.kind),
            type_name(value)
        ))
    }
}

fn expected_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::String => "string",
        FieldKind::Bool => "boolean",
        FieldKind::Number => "number",
        FieldKind::Array | FieldKind::StringArray => "array",
        FieldKind::Any => "any",
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

use FieldKind::{Any, Array, Bool, Number, String as Str, StringArray};

const SCENARIO_RULES: &[FieldRule] = &[
    optional("scenario_id", Str),
    optional("scenarioId", Str),
    optional("id", Str),
    required("language", Str),
    optional("target_level", Str),
    optional("targetLevel", Str),
    optional("level_target", Str),
    optional("topic_domain", Str),
    optional("topicDomain", Str),
    optional("duration_tag", Str),
    optional("durationTag", Str),
    optional("context_prompt", Str),
    optional("contextPrompt", Str),
    optional("context", Str),
    optional("examiner_role", Str),
    optional("examinerRole", Str),
    optional("question_sequence", Array),
    optional("questionSequence", Array),
    optional("expected_functions", StringArray),
    optional("expectedFunctions", StringArray),
    optional("expected_vocabulary", StringArray),
    optional("expectedVocabulary", StringArray),
    optional("register_constraints", Any),
    optional("registerConstraints", Any),
    optional("scoring_focus", StringArray),
    optional("scoringFocus", StringArray),
    optional("tags", Any),
    optional("needs_review", Bool),
    optional("needsReview", Bool),
];

const COMMON_ERROR_RULES: &[FieldRule] = &[
    required("id", Str),
    required("language", Str),
    required("category", Str),
    required("pattern", Str),
    required("correction", Str),
    optional("feedback_text", Str),
    optional("feedbackText", Str),
    optional("level_impact", Str),
    optional("levelImpact", Str),
    optional("criterion_affected", Str),
    optional("criterionAffected", Str),
];

const QUESTION_BANK_RULES: &[FieldRule] = &[
    required("id", Str),
    required("language", Str),
    optional("level_target", Str),
    optional("levelTarget", Str),
    optional("topic_domain", Str),
    optional("topicDomain", Str),
    optional("question_text", Str),
    optional("questionText", Str),
    optional("followups", StringArray),
    optional("timing_seconds", Number),
    optional("timingSeconds", Number),
    optional("variants", StringArray),
    optional("phase", Str),
];

pub const SCENARIO: Schema = Schema::new(SCENARIO_RULES);
pub const COMMON_ERROR: Schema = Schema::new(COMMON_ERROR_RULES);
pub const QUESTION_BANK: Schema = Schema::new(QUESTION_BANK_RULES);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_minimal_scenario_with_extra_fields() {
        let value = json!({"language": "FR", "notes": "kept"});
        let record = SCENARIO.check(&value).unwrap();
        assert_eq!(record.get("notes"), Some(&json!("kept")));
    }

    #[test]
    fn test_reports_every_issue() {
        let value = json!({"id": 7, "language": "EN", "pattern": "x"});
        let issues = COMMON_ERROR.check(&value).unwrap_err();
        assert_eq!(
            issues,
            vec![
                "id: Expected string, received number".to_string(),
                "category: Required".to_string(),
                "correction: Required".to_string(),
            ]
        );
    }

    #[test]
    fn test_rejects_null_for_typed_optional_field() {
        let value = json!({"language": "FR", "target_level": null});
        let issues = SCENARIO.check(&value).unwrap_err();
        assert_eq!(issues, vec!["target_level: Expected string, received null"]);
    }

    #[test]
    fn test_any_fields_accept_null() {
        let value = json!({"language": "FR", "tags": null, "register_constraints": null});
        assert!(SCENARIO.check(&value).is_ok());
    }

    #[test]
    fn test_string_array_elements_checked() {
        let value = json!({"id": "Q1", "language": "FR", "followups": ["ok", 3]});
        let issues = QUESTION_BANK.check(&value).unwrap_err();
        assert_eq!(issues, vec!["followups[1]: Expected string, received number"]);
    }

    #[test]
    fn test_non_object_rejected() {
        let issues = QUESTION_BANK.check(&json!(["id"])).unwrap_err();
        assert_eq!(issues, vec!["Expected object, received array"]);
    }
}
