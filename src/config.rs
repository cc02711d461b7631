use std::fs;
use std::time::Duration;

use camino::Utf8PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::ena::DEFAULT_ENA_BASE_URL;
use crate::error::HarvestError;
use crate::eva::DEFAULT_EVA_BASE_URL;
use crate::harvest::{DEFAULT_PROGRESS_EVERY, DEFAULT_STUDY_TAG};
use crate::http::HttpSettings;

pub const CONFIG_FILE_NAME: &str = "eva-harvest.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub eva_base_url: Option<String>,
    #[serde(default)]
    pub ena_base_url: Option<String>,
    #[serde(default)]
    pub study_tag: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<usize>,
    #[serde(default)]
    pub progress_every: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub eva_base_url: String,
    pub ena_base_url: String,
    pub study_tag: String,
    pub timeout: Duration,
    pub max_retries: usize,
    pub progress_every: usize,
    pub source: Option<Utf8PathBuf>,
}

impl ResolvedConfig {
    /// Replaces the configured tag with a command-line override, if any.
    pub fn with_study_tag(mut self, tag: Option<String>) -> Result<Self, HarvestError> {
        if let Some(tag) = tag {
            self.study_tag = validate_study_tag(tag)?;
        }
        Ok(self)
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: self.timeout,
            max_retries: self.max_retries,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Explicit path, then `eva-harvest.json` in the working directory, then
    /// the user config directory, then built-in defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, HarvestError> {
        if let Some(path) = path {
            let path = Utf8PathBuf::from(path);
            if !path.exists() {
                return Err(HarvestError::MissingConfig(path.into_std_path_buf()));
            }
            return Self::load(path);
        }

        let local = Utf8PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load(local);
        }
        if let Some(user) = user_config_path().filter(|path| path.exists()) {
            return Self::load(user);
        }
        Self::resolve_config(Config::default(), None)
    }

    pub fn load(path: Utf8PathBuf) -> Result<ResolvedConfig, HarvestError> {
        let content = fs::read_to_string(&path)
            .map_err(|_| HarvestError::ConfigRead(path.clone().into_std_path_buf()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| HarvestError::ConfigParse(err.to_string()))?;
        tracing::debug!(%path, "loaded config");
        Self::resolve_config(config, Some(path))
    }

    pub fn resolve_config(
        config: Config,
        source: Option<Utf8PathBuf>,
    ) -> Result<ResolvedConfig, HarvestError> {
        let study_tag = validate_study_tag(
            config
                .study_tag
                .unwrap_or_else(|| DEFAULT_STUDY_TAG.to_string()),
        )?;
        let defaults = HttpSettings::default();

        Ok(ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(1),
            eva_base_url: config
                .eva_base_url
                .unwrap_or_else(|| DEFAULT_EVA_BASE_URL.to_string()),
            ena_base_url: config
                .ena_base_url
                .unwrap_or_else(|| DEFAULT_ENA_BASE_URL.to_string()),
            study_tag,
            timeout: config
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: config.max_retries.unwrap_or(defaults.max_retries),
            progress_every: config.progress_every.unwrap_or(DEFAULT_PROGRESS_EVERY),
            source,
        })
    }
}

/// An empty prefix would select every study in the catalog.
fn validate_study_tag(tag: String) -> Result<String, HarvestError> {
    if tag.is_empty() {
        return Err(HarvestError::InvalidStudyTag(tag));
    }
    Ok(tag)
}

fn user_config_path() -> Option<Utf8PathBuf> {
    ProjectDirs::from("", "", "eva-harvest").and_then(|dirs| {
        Utf8PathBuf::from_path_buf(dirs.config_dir().join(CONFIG_FILE_NAME)).ok()
    })
}
