use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use gacha_application::AppState;
use gacha_domain::ports::ProcessLocator;
use gacha_infrastructure::{
    AppConfig, HttpRecordFetcher, LogFilePayloadExtractor, StaticLogLocator, SystemProcessLocator,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config_path: Option<&Path>, log_file: Option<PathBuf>) -> Result<Self> {
        let mut config = AppConfig::load(config_path).await?;
        if let Some(log_file) = log_file {
            config.log_file = Some(log_file.to_string_lossy().to_string());
        }
        Self::from_config(&config)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();

        let locator: Arc<dyn ProcessLocator> = match &runtime_config.log_file {
            Some(path) => {
                info!(path = %path, "using configured log file");
                Arc::new(StaticLogLocator::new(path))
            }
            None => Arc::new(SystemProcessLocator::new(&runtime_config)),
        };
        let extractor = Arc::new(LogFilePayloadExtractor::new(
            runtime_config.record_url_marker.clone(),
        ));
        let fetcher = Arc::new(HttpRecordFetcher::new(&runtime_config)?);

        let state = AppState {
            config: runtime_config,
            locator,
            extractor,
            fetcher,
        };

        Ok(Self { state })
    }
}
