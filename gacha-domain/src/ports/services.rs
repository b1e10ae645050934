use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::entities::{Credentials, RawPullRecord};
use crate::error::GachaError;
use crate::value_objects::{ordered_pool_table, PoolType};

/// Finds the running game client and derives its log file path.
#[async_trait]
pub trait ProcessLocator: Send + Sync {
    /// Performs exactly one scan. `None` means not found yet.
    async fn locate(&self) -> Option<PathBuf>;
}

/// Scrapes record-viewer credentials out of the client log.
#[async_trait]
pub trait PayloadExtractor: Send + Sync {
    /// `Ok(None)` means the viewer URL has not been logged yet.
    async fn extract(&self, log_file: &Path) -> Result<Option<Credentials>, GachaError>;
}

/// Raw records of one pool; `records` is `None` when the vendor had no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRecords {
    pub pool: PoolType,
    pub records: Option<Vec<RawPullRecord>>,
}

#[async_trait]
pub trait RecordFetcher: Send + Sync {
    async fn fetch_pool(
        &self,
        credentials: &Credentials,
        pool: &PoolType,
    ) -> Result<Option<Vec<RawPullRecord>>, GachaError>;

    /// Queries every pool in ascending id order, one request at a time. The
    /// first fatal error aborts the whole call.
    async fn fetch_all(
        &self,
        credentials: &Credentials,
        pools: &[PoolType],
    ) -> Result<Vec<PoolRecords>, GachaError> {
        let mut fetched = Vec::with_capacity(pools.len());
        for pool in ordered_pool_table(pools) {
            info!(pool = %pool.name, pool_type = pool.id, "fetching pull records");
            let records = self.fetch_pool(credentials, &pool).await?;
            fetched.push(PoolRecords { pool, records });
        }
        Ok(fetched)
    }
}
