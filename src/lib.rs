pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, settings::ImportSettings, toml_config::TomlConfig};
pub use core::{etl::ImportEngine, pipeline::JsonlImportPipeline};
pub use domain::model::Collection;
pub use utils::error::{ImportError, Result};
