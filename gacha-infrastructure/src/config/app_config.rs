use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use gacha_domain::{PoolType, RuntimeConfig};

use super::validation::{validate_pool_table, validate_url};

const CONFIG_ENV: &str = "WUGACHA_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub executable_name: String,
    pub install_anchor: String,
    pub log_path_suffix: Vec<String>,
    pub log_file: Option<String>,
    pub record_url_marker: String,
    pub api_url: String,
    pub pools: Vec<PoolType>,
    pub banner_pool_id: u32,
    pub standard_items: Vec<String>,
    pub request_timeout_seconds: u64,
    pub poll_interval_ms: u64,
    pub locate_attempts: u32,
    pub extract_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            executable_name: "Client-Win64-Shipping.exe".to_string(),
            install_anchor: "Client".to_string(),
            log_path_suffix: vec![
                "Saved".to_string(),
                "Logs".to_string(),
                "Client.log".to_string(),
            ],
            log_file: None,
            record_url_marker:
                "https://aki-gm-resources-oversea.aki-game.net/aki/gacha/index.html#/record?"
                    .to_string(),
            api_url: "https://gmserver-api.aki-game2.net/gacha/record/query".to_string(),
            pools: PoolType::default_table(),
            banner_pool_id: 1,
            standard_items: [
                "Encore", "Jianxin", "Verina", "Calcharo", "Lingyang", "安可", "鑒心", "維里奈",
                "卡卡羅", "凌陽",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            request_timeout_seconds: 15,
            poll_interval_ms: 1200,
            locate_attempts: 30,
            extract_attempts: 60,
        }
    }
}

impl AppConfig {
    /// Loads `path`, else `$WUGACHA_CONFIG`, else `./config.toml`. A missing
    /// file yields the defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let file_path = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(
                env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
            ),
        };
        let base_dir = file_path.parent().map(Path::to_path_buf);

        let mut config = if file_path.exists() {
            let content = fs::read_to_string(&file_path)
                .await
                .with_context(|| format!("failed to read {}", file_path.display()))?;
            toml::from_str::<AppConfig>(&content)
                .with_context(|| format!("failed to parse {}", file_path.display()))?
        } else {
            warn!(path = %file_path.display(), "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir.as_deref());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(log_file) = &self.log_file {
            if log_file.trim().is_empty() {
                self.log_file = None;
            }
        }
        self.executable_name = self.executable_name.trim().to_string();
        self.install_anchor = self.install_anchor.trim().to_string();
        self.api_url = self.api_url.trim().to_string();
        self.log_path_suffix = normalize_list(std::mem::take(&mut self.log_path_suffix), false);
        self.standard_items = normalize_list(std::mem::take(&mut self.standard_items), true);
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        if let Some(log_file) = &self.log_file {
            self.log_file = Some(resolve_path(base, log_file));
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_url)?;
        validate_url("record_url_marker", &self.record_url_marker)?;
        if self.executable_name.is_empty() {
            return Err(anyhow!("executable_name must not be empty"));
        }
        if self.install_anchor.is_empty() {
            return Err(anyhow!("install_anchor must not be empty"));
        }
        if self.log_path_suffix.is_empty() {
            return Err(anyhow!("log_path_suffix must not be empty"));
        }
        validate_pool_table(&self.pools)?;
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.poll_interval_ms == 0 {
            return Err(anyhow!("poll_interval_ms must be greater than 0"));
        }
        if self.locate_attempts == 0 || self.extract_attempts == 0 {
            return Err(anyhow!("retry budgets must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            executable_name: self.executable_name.clone(),
            install_anchor: self.install_anchor.clone(),
            log_path_suffix: self.log_path_suffix.clone(),
            log_file: self.log_file.clone(),
            record_url_marker: self.record_url_marker.clone(),
            api_url: self.api_url.clone(),
            pool_types: self.pools.clone(),
            banner_pool_id: self.banner_pool_id,
            standard_items: self.standard_items.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
            poll_interval_ms: self.poll_interval_ms,
            locate_attempts: self.locate_attempts,
            extract_attempts: self.extract_attempts,
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("WUGACHA_API_URL") {
            self.api_url = value;
        }
        if let Some(value) = lookup("WUGACHA_RECORD_URL_MARKER") {
            self.record_url_marker = value;
        }
        if let Some(value) = lookup("WUGACHA_EXECUTABLE_NAME") {
            self.executable_name = value;
        }
        if let Some(value) = lookup("WUGACHA_LOG_FILE") {
            self.log_file = Some(value);
        }
        if let Some(value) = lookup("WUGACHA_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("WUGACHA_POLL_INTERVAL_MS") {
            self.poll_interval_ms = value.parse().unwrap_or(self.poll_interval_ms);
        }
        if let Some(value) = lookup("WUGACHA_LOCATE_ATTEMPTS") {
            self.locate_attempts = value.parse().unwrap_or(self.locate_attempts);
        }
        if let Some(value) = lookup("WUGACHA_EXTRACT_ATTEMPTS") {
            self.extract_attempts = value.parse().unwrap_or(self.extract_attempts);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

fn normalize_list(values: Vec<String>, dedup: bool) -> Vec<String> {
    let mut out: Vec<String> = values
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if dedup {
        let mut seen = std::collections::HashSet::new();
        out.retain(|item| seen.insert(item.clone()));
    }
    out
}
