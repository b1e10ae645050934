// Credentials entity
// Authorization fields scraped from the record viewer URL

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub server_id: Option<String>,
    pub player_id: Option<String>,
    pub language_code: Option<String>,
    pub record_id: Option<String>,
    // The record endpoint names this field `cardPoolId`.
    #[serde(rename = "cardPoolId")]
    pub resources_id: Option<String>,
}

impl Credentials {
    /// Builds credentials from parsed `key=value` pairs of the viewer URL.
    /// Only `svr_id`, `player_id`, `lang`, `record_id` and `resources_id` are
    /// recognized; a repeated key keeps its last value.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut credentials = Credentials::default();
        for (key, value) in pairs {
            let slot = match key {
                "svr_id" => &mut credentials.server_id,
                "player_id" => &mut credentials.player_id,
                "lang" => &mut credentials.language_code,
                "record_id" => &mut credentials.record_id,
                "resources_id" => &mut credentials.resources_id,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        credentials
    }

    pub fn is_empty(&self) -> bool {
        self.server_id.is_none()
            && self.player_id.is_none()
            && self.language_code.is_none()
            && self.record_id.is_none()
            && self.resources_id.is_none()
    }
}
