// In-memory ports for session tests

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gacha_domain::ports::{PayloadExtractor, ProcessLocator, RecordFetcher};
use gacha_domain::{Credentials, GachaError, PoolType, RawPullRecord, RuntimeConfig};

use crate::AppState;

pub fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        executable_name: "Client-Win64-Shipping.exe".to_string(),
        install_anchor: "Client".to_string(),
        log_path_suffix: vec!["Saved".into(), "Logs".into(), "Client.log".into()],
        log_file: None,
        record_url_marker: "https://aki-gm-resources-oversea.aki-game.net/aki/gacha/index.html#/record?"
            .to_string(),
        api_url: "http://127.0.0.1:9/gacha/record/query".to_string(),
        pool_types: PoolType::default_table(),
        banner_pool_id: 1,
        standard_items: vec![
            "Encore".into(),
            "Jianxin".into(),
            "Verina".into(),
            "Calcharo".into(),
            "Lingyang".into(),
        ],
        request_timeout_seconds: 5,
        poll_interval_ms: 1,
        locate_attempts: 30,
        extract_attempts: 60,
    }
}

pub fn record(name: &str, quality_level: i64) -> RawPullRecord {
    RawPullRecord::new(name, quality_level, "2024-05-30 12:00:00")
}

#[derive(Clone, Default)]
pub struct FakeLocator {
    script: Arc<Mutex<VecDeque<Option<PathBuf>>>>,
    calls: Arc<AtomicU32>,
}

impl FakeLocator {
    pub fn scripted(script: Vec<Option<PathBuf>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessLocator for FakeLocator {
    async fn locate(&self) -> Option<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().expect("locator script").pop_front().flatten()
    }
}

#[derive(Clone, Default)]
pub struct FakeExtractor {
    script: Arc<Mutex<VecDeque<Result<Option<Credentials>, GachaError>>>>,
    calls: Arc<AtomicU32>,
}

impl FakeExtractor {
    pub fn scripted(script: Vec<Result<Option<Credentials>, GachaError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PayloadExtractor for FakeExtractor {
    async fn extract(&self, _log_file: &Path) -> Result<Option<Credentials>, GachaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("extractor script")
            .pop_front()
            .unwrap_or(Ok(None))
    }
}

/// Serves `pools` by id; ids without an entry answer "no data".
#[derive(Clone, Default)]
pub struct FakeFetcher {
    pub pools: HashMap<u32, Vec<RawPullRecord>>,
    pub fail_on: Option<u32>,
    requested: Arc<Mutex<Vec<u32>>>,
}

impl FakeFetcher {
    pub fn with_pool(pool_id: u32, records: Vec<RawPullRecord>) -> Self {
        let mut fetcher = Self::default();
        fetcher.pools.insert(pool_id, records);
        fetcher
    }

    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().expect("requested").clone()
    }
}

#[async_trait]
impl RecordFetcher for FakeFetcher {
    async fn fetch_pool(
        &self,
        _credentials: &Credentials,
        pool: &PoolType,
    ) -> Result<Option<Vec<RawPullRecord>>, GachaError> {
        self.requested.lock().expect("requested").push(pool.id);
        if self.fail_on == Some(pool.id) {
            return Err(GachaError::ServerUnavailable {
                pool_type: pool.id,
                status: "500 Internal Server Error".to_string(),
            });
        }
        Ok(self.pools.get(&pool.id).cloned())
    }
}

pub fn app_state(
    locator: &FakeLocator,
    extractor: &FakeExtractor,
    fetcher: &FakeFetcher,
) -> AppState {
    AppState {
        config: runtime_config(),
        locator: Arc::new(locator.clone()),
        extractor: Arc::new(extractor.clone()),
        fetcher: Arc::new(fetcher.clone()),
    }
}
