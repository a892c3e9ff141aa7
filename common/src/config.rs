use serde::Deserialize;
use std::{error::Error, path::Path};

use crate::yaml_include::load_yaml_with_includes;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommonConfig {
    pub project_name: String,
    pub database_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IsolationConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// A single product option type, e.g. `file` inside the "File" group.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct OptionTypeConfig {
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct OptionGroupConfig {
    pub label: String,
    #[serde(default)]
    pub types: Vec<OptionTypeConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub option_groups: Vec<OptionGroupConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub common: CommonConfig,
    #[serde(default)]
    pub isolation: IsolationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Loads the config file, resolving `!include` lines relative to it.
    ///
    /// `DATABASE_URL` (also read from a `.env` file when present) takes
    /// precedence over `common.database_url`.
    pub fn load(config_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let merged = load_yaml_with_includes(Path::new(config_path))?;

        let mut out_str = String::new();
        {
            let mut emitter = yaml_rust2::YamlEmitter::new(&mut out_str);
            emitter.dump(&merged)?;
        }

        let mut config: Config = serde_yml::from_str(&out_str)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let mut config: Config = serde_yml::from_str(contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        dotenvy::dotenv().ok();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                self.common.database_url = url;
            }
        }
    }
}
