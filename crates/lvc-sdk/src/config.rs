//! Repository configuration, stored as TOML in `.lvc/config.toml`.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use lvc_chain::DEFAULT_TIP_NAME;

use crate::error::{SdkError, SdkResult};

/// Author recorded on commits when no `[user] name` is configured.
pub const DEFAULT_AUTHOR: &str = "Test user";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub user: UserConfig,
    pub history: HistoryConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Author name written into new commits.
    pub name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_AUTHOR.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Revision name that resolves to the tip of head's line.
    pub tip: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            tip: DEFAULT_TIP_NAME.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub codec: CodecKind,
}

/// Format of the persisted state snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    #[default]
    Json,
    Bincode,
}

impl RepoConfig {
    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> SdkResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }

    fn validate(&self) -> SdkResult<()> {
        let tip = self.history.tip.trim();
        if tip.is_empty() || tip == "HEAD" || tip.starts_with("HEAD~") {
            return Err(SdkError::Config(format!(
                "history.tip cannot be {:?}",
                self.history.tip
            )));
        }
        if self.user.name.trim().is_empty() {
            return Err(SdkError::Config("user.name cannot be empty".into()));
        }
        Ok(())
    }
}
