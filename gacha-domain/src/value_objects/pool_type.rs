// Pool type value object

use serde::{Deserialize, Serialize};

/// One entry of the fixed pool-type table: the numeric id sent to the vendor
/// API as `cardPoolType` and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolType {
    pub id: u32,
    pub name: String,
}

impl PoolType {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn default_table() -> Vec<PoolType> {
        vec![
            PoolType::new(1, "Character Event"),
            PoolType::new(2, "Weapon Event"),
            PoolType::new(3, "Character Standing"),
            PoolType::new(4, "Weapon Standing"),
        ]
    }
}

/// Returns the table in enumeration order (ascending id).
pub fn ordered_pool_table(pools: &[PoolType]) -> Vec<PoolType> {
    let mut ordered = pools.to_vec();
    ordered.sort_by_key(|pool| pool.id);
    ordered
}
