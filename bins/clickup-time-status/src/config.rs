//! Report configuration file

use anyhow::{bail, Context, Result};
use clickup_api_client::ClientConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Contents of `config.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Personal API token
    #[serde(default)]
    pub api_token: String,
    /// Workspace (team) id; required with custom task ids
    #[serde(default)]
    pub workspace_id: String,
    /// Tasks to report on
    #[serde(default)]
    pub task_ids: Vec<String>,
    /// Whether `task_ids` are custom ids
    #[serde(default = "default_use_custom_task_ids")]
    pub use_custom_task_ids: bool,
    /// Unused by the report
    #[serde(default)]
    pub space_id: Option<String>,
    /// Unused by the report
    #[serde(default)]
    pub folder_ids: HashMap<String, String>,
    /// Unused by the report
    #[serde(default)]
    pub list_ids: HashMap<String, String>,
}

fn default_use_custom_task_ids() -> bool {
    true
}

impl ReportConfig {
    /// Read and parse the config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Replace the file's token with `token` when one is given
    #[must_use]
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api_token = token;
        }
        self
    }

    /// Check the settings the report depends on
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            bail!("no API token: set api_token in the config file or CLICKUP_API_TOKEN");
        }
        if self.task_ids.is_empty() {
            bail!("no task_ids in the config file");
        }
        if self.use_custom_task_ids && self.workspace_id.is_empty() {
            bail!("workspace_id is required when use_custom_task_ids is set");
        }
        Ok(())
    }

    /// Client configuration for the API token in this file
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default().with_api_token(self.api_token.clone())
    }
}
