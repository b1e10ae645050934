// Raw pull record entity
// One element of the vendor `data` array, delivered newest first

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPullRecord {
    pub name: String,
    pub resource_type: String,
    #[serde(default, deserialize_with = "deserialize_pool_type")]
    pub card_pool_type: Option<u32>,
    pub quality_level: i64,
    pub time: String,
}

impl RawPullRecord {
    pub fn new(name: impl Into<String>, quality_level: i64, time: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: String::new(),
            card_pool_type: None,
            quality_level,
            time: time.into(),
        }
    }
}

// The endpoint has shipped both numeric ids and labels in this field.
fn deserialize_pool_type<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PoolTypeField {
        Id(u32),
        Label(String),
    }

    Ok(match Option::<PoolTypeField>::deserialize(deserializer)? {
        Some(PoolTypeField::Id(id)) => Some(id),
        Some(PoolTypeField::Label(label)) => label.trim().parse().ok(),
        None => None,
    })
}
