use std::collections::HashSet;

use anyhow::{anyhow, Result};
use gacha_domain::PoolType;

pub fn validate_url(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} must not be empty", field));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(anyhow!("{} must be an http(s) url", field));
    }
    Ok(())
}

pub fn validate_pool_table(pools: &[PoolType]) -> Result<()> {
    if pools.is_empty() {
        return Err(anyhow!("pool table is empty"));
    }
    let mut seen = HashSet::new();
    for pool in pools {
        if pool.name.trim().is_empty() {
            return Err(anyhow!("pool {} has no name", pool.id));
        }
        if !seen.insert(pool.id) {
            return Err(anyhow!("duplicate pool id {}", pool.id));
        }
    }
    Ok(())
}
