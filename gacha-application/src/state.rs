use std::sync::Arc;

use gacha_domain::ports::{PayloadExtractor, ProcessLocator, RecordFetcher};
use gacha_domain::RuntimeConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub locator: Arc<dyn ProcessLocator>,
    pub extractor: Arc<dyn PayloadExtractor>,
    pub fetcher: Arc<dyn RecordFetcher>,
}
