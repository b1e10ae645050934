use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use gacha_domain::ports::PayloadExtractor;
use gacha_domain::{Credentials, GachaError};

/// Reads record-viewer credentials from the client log.
pub struct LogFilePayloadExtractor {
    marker: String,
}

impl LogFilePayloadExtractor {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

#[async_trait]
impl PayloadExtractor for LogFilePayloadExtractor {
    async fn extract(&self, log_file: &Path) -> Result<Option<Credentials>, GachaError> {
        let path = log_file.to_path_buf();
        let marker = self.marker.clone();
        let query = tokio::task::spawn_blocking(move || scan_log_file(&path, &marker))
            .await
            .map_err(|err| GachaError::Task(err.to_string()))??;
        let Some(query) = query else {
            debug!(path = %log_file.display(), "record url not logged yet");
            return Ok(None);
        };
        let credentials = parse_credentials(&query)?;
        info!(path = %log_file.display(), "record url found in log");
        Ok(Some(credentials))
    }
}

/// Returns the query string of the first line that carries `marker`.
pub fn scan_log_file(path: &Path, marker: &str) -> Result<Option<String>, GachaError> {
    let unreadable = |source| GachaError::LogUnreadable {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(unreadable)?;
        if read == 0 {
            return Ok(None);
        }
        // The game log is not guaranteed to be valid UTF-8.
        let line = String::from_utf8_lossy(&buf);
        if let Some(query) = query_after_marker(&line, marker) {
            return Ok(Some(query.to_string()));
        }
    }
}

/// Text after `marker`, cut at the first `"` and right-trimmed.
pub fn query_after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let start = line.find(marker)? + marker.len();
    let rest = &line[start..];
    let end = rest.find('"').unwrap_or(rest.len());
    Some(rest[..end].trim_end())
}

/// Splits `key=value` pairs on `&`. Every segment needs an `=`; anything after
/// a second `=` is dropped.
pub fn parse_credentials(query: &str) -> Result<Credentials, GachaError> {
    let mut pairs = Vec::new();
    for segment in query.split('&') {
        let malformed = || GachaError::MalformedQuery(segment.to_string());
        let mut fields = segment.split('=');
        let key = fields.next().unwrap_or_default();
        let value = fields.next().ok_or_else(malformed)?;
        pairs.push((key, value));
    }
    Ok(Credentials::from_query_pairs(pairs))
}
