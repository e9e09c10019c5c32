use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::domain::model::Collection;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_file_extensions, validate_path, Validate};

pub const DEFAULT_SEED_DIR: &str = "data/sle/seed";

pub const REPORT_FILE: &str = "import_report.json";

/// Resolved import settings. Output dir and report path follow the seed dir
/// unless set explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    seed_dir: String,
    output_dir_override: Option<String>,
    report_path_override: Option<String>,
    output_dir: String,
    report_path: String,
    dry_run: bool,
    collection: Option<Collection>,
    files: BTreeMap<Collection, String>,
    disabled: BTreeSet<Collection>,
    monitor: bool,
    json_logs: bool,
}

impl ImportSettings {
    pub fn new(seed_dir: impl Into<String>) -> Self {
        let mut settings = Self {
            seed_dir: seed_dir.into(),
            output_dir_override: None,
            report_path_override: None,
            output_dir: String::new(),
            report_path: String::new(),
            dry_run: false,
            collection: None,
            files: BTreeMap::new(),
            disabled: BTreeSet::new(),
            monitor: false,
            json_logs: false,
        };
        settings.refresh_paths();
        settings
    }

    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        let import = &config.import;
        let mut settings = Self::new(
            import
                .seed_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_SEED_DIR.to_string()),
        );
        settings.output_dir_override = import.output_dir.clone();
        settings.report_path_override = import.report_path.clone();
        settings.dry_run = import.dry_run.unwrap_or(false);
        settings.monitor = config.monitoring_enabled();
        settings.json_logs = config.json_logs();

        for (collection, section) in config.collection_sections()? {
            if let Some(file) = &section.file {
                settings.files.insert(collection, file.clone());
            }
            if section.enabled == Some(false) {
                settings.disabled.insert(collection);
            }
        }

        settings.refresh_paths();
        Ok(settings)
    }

    /// `<parent of seed dir>/import_report.json`.
    pub fn default_report_path(seed_dir: &str) -> String {
        let parent = Path::new(seed_dir)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        parent.join(REPORT_FILE).to_string_lossy().into_owned()
    }

    fn refresh_paths(&mut self) {
        self.output_dir = self
            .output_dir_override
            .clone()
            .unwrap_or_else(|| self.seed_dir.clone());
        self.report_path = self
            .report_path_override
            .clone()
            .unwrap_or_else(|| Self::default_report_path(&self.seed_dir));
    }

    pub fn with_seed_dir(mut self, seed_dir: impl Into<String>) -> Self {
        self.seed_dir = seed_dir.into();
        self.refresh_paths();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.output_dir_override = Some(output_dir.into());
        self.refresh_paths();
        self
    }

    pub fn with_report_path(mut self, report_path: impl Into<String>) -> Self {
        self.report_path_override = Some(report_path.into());
        self.refresh_paths();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_collection(mut self, collection: Option<Collection>) -> Self {
        self.collection = collection;
        self
    }

    pub fn with_file(mut self, collection: Collection, file: impl Into<String>) -> Self {
        self.files.insert(collection, file.into());
        self
    }

    pub fn with_disabled(mut self, collection: Collection) -> Self {
        self.disabled.insert(collection);
        self
    }

    pub fn with_monitor(mut self, monitor: bool) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn with_json_logs(mut self, json_logs: bool) -> Self {
        self.json_logs = json_logs;
        self
    }

    pub fn monitor(&self) -> bool {
        self.monitor
    }

    pub fn json_logs(&self) -> bool {
        self.json_logs
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_DIR)
    }
}

impl ConfigProvider for ImportSettings {
    fn seed_dir(&self) -> &str {
        &self.seed_dir
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn report_path(&self) -> &str {
        &self.report_path
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn collection_filter(&self) -> Option<Collection> {
        self.collection
    }

    fn file_for(&self, collection: Collection) -> String {
        self.files
            .get(&collection)
            .cloned()
            .unwrap_or_else(|| collection.default_file())
    }

    fn is_enabled(&self, collection: Collection) -> bool {
        !self.disabled.contains(&collection)
    }
}

impl Validate for ImportSettings {
    fn validate(&self) -> Result<()> {
        validate_path("seed_dir", &self.seed_dir)?;
        validate_path("output_dir", &self.output_dir)?;
        validate_path("report_path", &self.report_path)?;
        validate_file_extensions(
            "report_path",
            std::slice::from_ref(&self.report_path),
            &["json"],
        )?;

        let files: Vec<String> = self.files.values().cloned().collect();
        validate_file_extensions("collections.file", &files, &["jsonl"])?;

        if let Some(only) = self.collection {
            if !self.is_enabled(only) {
                return Err(ImportError::InvalidConfigValueError {
                    field: "collection".to_string(),
                    value: only.to_string(),
                    reason: "collection is disabled in the configuration file".to_string(),
                });
            }
        }

        Ok(())
    }
}
