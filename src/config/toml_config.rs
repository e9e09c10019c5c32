use crate::domain::model::Collection;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_file_extensions, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Optional `sle-import.toml`:
///
/// ```toml
/// [import]
/// seed_dir = "data/sle/seed"
/// report_path = "${REPORT_DIR}/import_report.json"
///
/// [collections.question_bank]
/// file = "questions_v2.jsonl"
/// enabled = true
///
/// [monitoring]
/// enabled = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub import: ImportSection,
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionSection>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSection {
    pub seed_dir: Option<String>,
    pub output_dir: Option<String>,
    pub report_path: Option<String>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionSection {
    pub file: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        let config: TomlConfig = toml::from_str(&processed)?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay literal.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ImportError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// Collection sections keyed by their parsed collection.
    pub fn collection_sections(&self) -> Result<Vec<(Collection, &CollectionSection)>> {
        self.collections
            .iter()
            .map(|(name, section)| {
                name.parse::<Collection>()
                    .map(|c| (c, section))
                    .map_err(|reason| ImportError::InvalidConfigValueError {
                        field: "collections".to_string(),
                        value: name.clone(),
                        reason,
                    })
            })
            .collect()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let import = &self.import;
        for (field, value) in [
            ("import.seed_dir", &import.seed_dir),
            ("import.output_dir", &import.output_dir),
            ("import.report_path", &import.report_path),
        ] {
            if let Some(path) = value {
                validate_path(field, path)?;
            }
        }

        let files: Vec<String> = self
            .collection_sections()?
            .into_iter()
            .filter_map(|(_, section)| section.file.clone())
            .collect();
        validate_file_extensions("collections.file", &files, &["jsonl"])?;

        Ok(())
    }
}
