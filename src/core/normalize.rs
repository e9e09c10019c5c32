//! Lookup tables that fold legacy and bilingual spellings onto the canonical
//! vocabulary used by the practice companion.

pub const UNKNOWN_LEVEL: &str = "unknown";

pub const DEFAULT_TOPIC_DOMAIN: &str = "Workplace";

pub const DEFAULT_CRITERION: &str = "grammar";

/// The five scoring criteria, in report order.
pub const CRITERIA: [&str; 5] = [
    "grammar",
    "vocabulary",
    "fluency",
    "pronunciation",
    "comprehension",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Fr,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "FR",
            Language::En => "EN",
        }
    }

    /// Lower-case form written to normalized records.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }
}

/// SLE level letter, or [`UNKNOWN_LEVEL`].
pub fn normalize_level(level: Option<&str>) -> &'static str {
    let upper = match level {
        Some(l) if !l.is_empty() => l.trim().to_uppercase(),
        _ => return UNKNOWN_LEVEL,
    };

    match upper.as_str() {
        "A" => "A",
        "B" => "B",
        "C" => "C",
        "E" => "E",
        "X" => "X",
        "BEGINNER" | "DÉBUTANT" => "A",
        "INTERMEDIATE" | "INTERMÉDIAIRE" => "B",
        "ADVANCED" | "AVANCÉ" => "C",
        _ => UNKNOWN_LEVEL,
    }
}

/// Falls back to French, the primary exam language of the seed data.
pub fn normalize_language(lang: Option<&str>) -> Language {
    let Some(lang) = lang else {
        return Language::Fr;
    };

    match lang.trim().to_uppercase().as_str() {
        "EN" | "ENGLISH" | "ANGLAIS" => Language::En,
        _ => Language::Fr,
    }
}

pub fn normalize_topic_domain(domain: Option<&str>) -> String {
    let domain = match domain {
        Some(d) if !d.is_empty() => d,
        _ => return DEFAULT_TOPIC_DOMAIN.to_string(),
    };

    let canonical = match domain.to_uppercase().as_str() {
        "WRK" | "WORKPLACE" => "Workplace",
        "PRJ" | "PROJECT" => "Project",
        "POL" | "POLICY" => "Policy",
        "HR" | "HUMAN_RESOURCES" => "HR",
        "SVC" | "SERVICE" => "Service",
        "TEC" | "TECHNOLOGY" => "IT",
        "ENV" | "ENVIRONMENT" => "Environment",
        "FIN" | "FINANCE" => "Finance",
        "COM" | "COMMUNICATIONS" => "Communications",
        "DIV" | "DIVERSITY" => "Diversity",
        "LEADERSHIP" => "Leadership",
        "OPERATIONS" => "Operations",
        _ => return domain.to_string(),
    };
    canonical.to_string()
}

/// Maps rubric names from older datasets onto one of [`CRITERIA`].
/// Unmapped names pass through lower-cased.
pub fn normalize_criterion(criterion: Option<&str>) -> String {
    let criterion = match criterion {
        Some(c) if !c.is_empty() => c,
        _ => return DEFAULT_CRITERION.to_string(),
    };

    let lowered = criterion.to_lowercase();
    let key: String = lowered
        .chars()
        .filter(|c| !(*c == '_' || *c == '-' || c.is_whitespace()))
        .collect();

    let canonical = match key.as_str() {
        "grammar" | "grammaire" | "grammaticalaccuracy" | "grammaticalcomplexity"
        | "logicalconnectors" => "grammar",
        "vocabulary" | "vocabulaire" | "vocabularyregister" | "lexicalrichness"
        | "languagefunctions" | "nuanceprecision" => "vocabulary",
        "comprehension" | "compréhension" | "coherenceorganization" | "coherencecohesion"
        | "taskcompletion" => "comprehension",
        "fluency" | "fluidité" | "aisance" | "interaction" => "fluency",
        "pronunciation" | "prononciation" => "pronunciation",
        _ => return lowered,
    };
    canonical.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level_letters_and_words() {
        assert_eq!(normalize_level(Some("b")), "B");
        assert_eq!(normalize_level(Some(" x ")), "X");
        assert_eq!(normalize_level(Some("Beginner")), "A");
        assert_eq!(normalize_level(Some("débutant")), "A");
        assert_eq!(normalize_level(Some("Intermédiaire")), "B");
        assert_eq!(normalize_level(Some("avancé")), "C");
        assert_eq!(normalize_level(Some("expert")), UNKNOWN_LEVEL);
        assert_eq!(normalize_level(Some("")), UNKNOWN_LEVEL);
        assert_eq!(normalize_level(None), UNKNOWN_LEVEL);
    }

    #[test]
    fn test_normalize_language_defaults_to_french() {
        assert_eq!(normalize_language(Some("en")), Language::En);
        assert_eq!(normalize_language(Some("Anglais")), Language::En);
        assert_eq!(normalize_language(Some("français")), Language::Fr);
        assert_eq!(normalize_language(Some("es")), Language::Fr);
        assert_eq!(normalize_language(None), Language::Fr);
        assert_eq!(Language::En.tag(), "en");
    }

    #[test]
    fn test_normalize_topic_domain() {
        assert_eq!(normalize_topic_domain(Some("WRK")), "Workplace");
        assert_eq!(normalize_topic_domain(Some("tec")), "IT");
        assert_eq!(normalize_topic_domain(Some("human_resources")), "HR");
        assert_eq!(normalize_topic_domain(Some("Finance")), "Finance");
        assert_eq!(normalize_topic_domain(Some("Security")), "Security");
        assert_eq!(normalize_topic_domain(Some("")), DEFAULT_TOPIC_DOMAIN);
        assert_eq!(normalize_topic_domain(None), DEFAULT_TOPIC_DOMAIN);
    }

    #[test]
    fn test_normalize_criterion() {
        assert_eq!(normalize_criterion(Some("Grammatical_Accuracy")), "grammar");
        assert_eq!(normalize_criterion(Some("lexical richness")), "vocabulary");
        assert_eq!(normalize_criterion(Some("coherence-cohesion")), "comprehension");
        assert_eq!(normalize_criterion(Some("Fluidité")), "fluency");
        assert_eq!(normalize_criterion(Some("Prononciation")), "pronunciation");
        assert_eq!(normalize_criterion(Some("Register")), "register");
        assert_eq!(normalize_criterion(Some("")), DEFAULT_CRITERION);
        assert_eq!(normalize_criterion(None), DEFAULT_CRITERION);
    }

    #[test]
    fn test_tables_are_idempotent() {
        for level in ["A", "B", "C", "E", "X", UNKNOWN_LEVEL] {
            assert_eq!(normalize_level(Some(normalize_level(Some(level)))), normalize_level(Some(level)));
        }
        for criterion in CRITERIA {
            assert_eq!(normalize_criterion(Some(criterion)), criterion);
        }
        for domain in ["WRK", "SVC", "Leadership", "Security"] {
            let once = normalize_topic_domain(Some(domain));
            assert_eq!(normalize_topic_domain(Some(&once)), once);
        }
    }
}
