use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gacha_domain::ports::RecordFetcher;
use gacha_domain::{Credentials, GachaError, PoolType, RawPullRecord, RuntimeConfig};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PoolQuery<'a> {
    #[serde(flatten)]
    credentials: &'a Credentials,
    card_pool_type: u32,
}

#[derive(Deserialize)]
struct RecordPage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<RawPullRecord>>,
}

/// Queries the vendor record endpoint over HTTPS.
pub struct HttpRecordFetcher {
    client: Client,
    api_url: String,
}

impl HttpRecordFetcher {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl RecordFetcher for HttpRecordFetcher {
    async fn fetch_pool(
        &self,
        credentials: &Credentials,
        pool: &PoolType,
    ) -> Result<Option<Vec<RawPullRecord>>, GachaError> {
        if credentials.is_empty() {
            return Err(GachaError::MissingCredentials);
        }
        let query = PoolQuery {
            credentials,
            card_pool_type: pool.id,
        };
        let unavailable = |status: String| GachaError::ServerUnavailable {
            pool_type: pool.id,
            status,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&query)
            .send()
            .await
            .map_err(|err| unavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(unavailable(response.status().to_string()));
        }
        let page: RecordPage = response
            .json()
            .await
            .map_err(|err| GachaError::InvalidResponse {
                pool_type: pool.id,
                reason: err.to_string(),
            })?;
        debug!(pool_type = pool.id, code = ?page.code, message = ?page.message, "record page");

        let Some(mut records) = page.data.filter(|records| !records.is_empty()) else {
            info!(pool = %pool.name, "no records");
            return Ok(None);
        };
        for record in &mut records {
            record.card_pool_type.get_or_insert(pool.id);
        }
        info!(pool = %pool.name, records = records.len(), "records fetched");
        Ok(Some(records))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;

    type Seen = Arc<Mutex<Vec<Value>>>;

    async fn vendor(State(seen): State<Seen>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        seen.lock().expect("seen").push(body.clone());
        let reply = match body["cardPoolType"].as_u64() {
            Some(1) => json!({
                "code": 0,
                "message": "success",
                "data": [
                    {"name": "Verina", "resourceType": "Resonator", "qualityLevel": 5,
                     "time": "2024-05-30 12:00:00", "cardPoolType": "1"},
                    {"name": "Sanhua", "resourceType": "Resonator", "qualityLevel": 4,
                     "time": "2024-05-30 11:59:00"}
                ]
            }),
            Some(2) => json!({"code": 0, "message": "success", "data": []}),
            Some(3) => json!({"code": 0, "message": "success", "data": null}),
            Some(4) => return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))),
            _ => json!({"code": 0, "data": "not a list"}),
        };
        (StatusCode::OK, Json(reply))
    }

    async fn spawn_vendor() -> (String, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route("/gacha/record/query", post(vendor))
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        (format!("http://{}/gacha/record/query", addr), seen)
    }

    fn fetcher(api_url: String) -> HttpRecordFetcher {
        let config = RuntimeConfig {
            executable_name: "Client-Win64-Shipping.exe".to_string(),
            install_anchor: "Client".to_string(),
            log_path_suffix: Vec::new(),
            log_file: None,
            record_url_marker: "https://example.com/record?".to_string(),
            api_url,
            pool_types: PoolType::default_table(),
            banner_pool_id: 1,
            standard_items: Vec::new(),
            request_timeout_seconds: 5,
            poll_interval_ms: 1,
            locate_attempts: 1,
            extract_attempts: 1,
        };
        HttpRecordFetcher::new(&config).expect("client")
    }

    fn credentials() -> Credentials {
        Credentials::from_query_pairs([
            ("svr_id", "7"),
            ("player_id", "42"),
            ("lang", "en"),
            ("record_id", "abc"),
            ("resources_id", "pool-9"),
        ])
    }

    #[tokio::test]
    async fn posts_credentials_and_fills_missing_pool_type() {
        let (url, seen) = spawn_vendor().await;
        let records = fetcher(url)
            .fetch_pool(&credentials(), &PoolType::new(1, "Character Event"))
            .await
            .expect("fetch")
            .expect("records");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].card_pool_type, Some(1));
        assert_eq!(records[1].card_pool_type, Some(1));
        assert_eq!(records[1].quality_level, 4);

        let body = seen.lock().expect("seen")[0].clone();
        assert_eq!(body["serverId"], "7");
        assert_eq!(body["playerId"], "42");
        assert_eq!(body["languageCode"], "en");
        assert_eq!(body["recordId"], "abc");
        assert_eq!(body["cardPoolId"], "pool-9");
        assert_eq!(body["cardPoolType"], 1);
    }

    #[tokio::test]
    async fn empty_or_null_data_is_absent() {
        let (url, _seen) = spawn_vendor().await;
        let fetcher = fetcher(url);
        for pool in [PoolType::new(2, "Weapon Event"), PoolType::new(3, "Character Standing")] {
            let records = fetcher.fetch_pool(&credentials(), &pool).await.expect("fetch");
            assert_eq!(records, None);
        }
    }

    #[tokio::test]
    async fn error_status_is_server_unavailable() {
        let (url, _seen) = spawn_vendor().await;
        let err = fetcher(url)
            .fetch_pool(&credentials(), &PoolType::new(4, "Weapon Standing"))
            .await
            .expect_err("unavailable");
        assert!(matches!(err, GachaError::ServerUnavailable { pool_type: 4, .. }));
    }

    #[tokio::test]
    async fn undecodable_body_is_invalid_response() {
        let (url, _seen) = spawn_vendor().await;
        let err = fetcher(url)
            .fetch_pool(&credentials(), &PoolType::new(9, "Unknown"))
            .await
            .expect_err("invalid");
        assert!(matches!(err, GachaError::InvalidResponse { pool_type: 9, .. }));
    }

    #[tokio::test]
    async fn empty_credentials_never_hit_the_network() {
        let (url, seen) = spawn_vendor().await;
        let err = fetcher(url)
            .fetch_pool(&Credentials::default(), &PoolType::new(1, "Character Event"))
            .await
            .expect_err("precondition");
        assert!(matches!(err, GachaError::MissingCredentials));
        assert!(seen.lock().expect("seen").is_empty());
    }

    #[tokio::test]
    async fn fetch_all_aborts_on_the_failing_pool() {
        let (url, seen) = spawn_vendor().await;
        let err = fetcher(url)
            .fetch_all(&credentials(), &PoolType::default_table())
            .await
            .expect_err("pool 4 fails");
        assert!(matches!(err, GachaError::ServerUnavailable { pool_type: 4, .. }));
        let pools: Vec<u64> = seen
            .lock()
            .expect("seen")
            .iter()
            .filter_map(|body| body["cardPoolType"].as_u64())
            .collect();
        assert_eq!(pools, vec![1, 2, 3, 4]);
    }
}
