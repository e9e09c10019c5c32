pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::Collection;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "sle-import")]
#[command(about = "Validate and normalize SLE practice seed files (JSONL)")]
pub struct CliConfig {
    /// Directory holding the seed JSONL files [default: data/sle/seed]
    #[arg(long)]
    pub seed_dir: Option<String>,

    /// Where normalized files are written [default: the seed directory]
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Report location [default: <seed dir parent>/import_report.json]
    #[arg(long)]
    pub report_path: Option<String>,

    /// Only import this collection (scenarios, common_errors, question_bank)
    #[arg(long)]
    pub collection: Option<Collection>,

    #[arg(long, help = "Validate only; do not write normalized files")]
    pub dry_run: bool,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage between phases")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merges the optional config file with the flags; flags win.
    pub fn resolve(&self) -> Result<settings::ImportSettings> {
        let mut resolved = match &self.config {
            Some(path) => {
                let file = toml_config::TomlConfig::from_file(path)?;
                settings::ImportSettings::from_toml(&file)?
            }
            None => settings::ImportSettings::default(),
        };

        if let Some(dir) = &self.seed_dir {
            resolved = resolved.with_seed_dir(dir.clone());
        }
        if let Some(dir) = &self.output_dir {
            resolved = resolved.with_output_dir(dir.clone());
        }
        if let Some(path) = &self.report_path {
            resolved = resolved.with_report_path(path.clone());
        }
        if self.collection.is_some() {
            resolved = resolved.with_collection(self.collection);
        }

        let dry_run = self.dry_run || crate::core::ConfigProvider::dry_run(&resolved);
        let monitor = self.monitor || resolved.monitor();
        let json_logs = self.log_json || resolved.json_logs();

        Ok(resolved
            .with_dry_run(dry_run)
            .with_monitor(monitor)
            .with_json_logs(json_logs))
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::parse_from([
            "sle-import",
            "--dry-run",
            "--collection=common_errors",
            "--seed-dir",
            "fixtures/seed",
        ]);
        assert!(cli.dry_run);
        assert_eq!(cli.collection, Some(Collection::CommonErrors));

        let settings = cli.resolve().unwrap();
        assert!(settings.dry_run());
        assert_eq!(settings.seed_dir(), "fixtures/seed");
        assert_eq!(settings.report_path(), "fixtures/import_report.json");
    }

    #[test]
    fn test_collection_flag_with_separate_value() {
        let cli = CliConfig::parse_from(["sle-import", "--collection", "scenarios"]);
        assert_eq!(cli.collection, Some(Collection::Scenarios));
    }

    #[test]
    fn test_unknown_collection_is_usage_error() {
        let result = CliConfig::try_parse_from(["sle-import", "--collection", "lessons"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"[import]\nseed_dir = \"from-file/seed\"\noutput_dir = \"from-file/out\"\ndry_run = true\n",
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "sle-import",
            "--config",
            file.path().to_str().unwrap(),
            "--seed-dir",
            "cli/seed",
        ]);
        let settings = cli.resolve().unwrap();

        assert_eq!(settings.seed_dir(), "cli/seed");
        assert_eq!(settings.output_dir(), "from-file/out");
        assert_eq!(settings.report_path(), "cli/import_report.json");
        assert!(settings.dry_run());
    }
}
