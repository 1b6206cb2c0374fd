use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::extract::Rules;

pub const DEFAULT_CONFIG_PATH: &str = "prodname.toml";
pub const ENV_PREFIX: &str = "PRODNAME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows handed to the extractor per batch.
    pub chunk_size: usize,
    /// Where `process` writes when no `--output` is given.
    pub output_dir: PathBuf,
    pub rules: Rules,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            chunk_size: 500,
            output_dir: PathBuf::from("processed"),
            rules: Rules::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the settings file if present, then `PRODNAME_*`
    /// variables (`__` separates nested keys, e.g. `PRODNAME_RULES__MIN_WORDS`).
    pub fn load(path: &Path) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read settings from {}", path.display()))?
            .try_deserialize()
            .context("invalid settings")?;

        if settings.chunk_size == 0 {
            bail!("chunk_size must be at least 1");
        }
        Ok(settings)
    }
}
