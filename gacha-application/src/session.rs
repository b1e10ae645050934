use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use gacha_domain::ports::PoolRecords;
use gacha_domain::{Credentials, GachaError, PoolType, PullHistory, RuntimeConfig};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{AppError, AppState};

/// The forward transition a session is currently trying to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    LocateLog,
    ExtractCredentials,
    FetchRecords,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::LocateLog => "locate game log",
            SessionPhase::ExtractCredentials => "extract record credentials",
            SessionPhase::FetchRecords => "fetch pull records",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReason {
    pub phase: SessionPhase,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    LogLocated,
    CredentialsReady,
    Populated,
    Failed(FailureReason),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Populated | SessionState::Failed(_))
    }

    /// Phase that the next `advance` call works on, if any.
    pub fn pending_phase(&self) -> Option<SessionPhase> {
        match self {
            SessionState::Idle => Some(SessionPhase::LocateLog),
            SessionState::LogLocated => Some(SessionPhase::ExtractCredentials),
            SessionState::CredentialsReady => Some(SessionPhase::FetchRecords),
            SessionState::Populated | SessionState::Failed(_) => None,
        }
    }
}

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved(SessionState),
    Waiting { phase: SessionPhase, attempt: u32 },
    Done,
}

#[derive(Debug, Clone)]
pub struct PoolHistory {
    pub pool: PoolType,
    pub history: PullHistory,
}

/// Poll-driven orchestrator: `Idle -> LogLocated -> CredentialsReady ->
/// Populated`, or `Failed` once a phase exhausts its retry budget or hits a
/// fatal error. States never move backwards; retrying from scratch means a
/// new session.
pub struct GachaSession {
    app: AppState,
    state: SessionState,
    log_file_path: Option<PathBuf>,
    credentials: Option<Credentials>,
    histories: Vec<PoolHistory>,
    attempts: u32,
}

impl GachaSession {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            state: SessionState::Idle,
            log_file_path: None,
            credentials: None,
            histories: Vec::new(),
            attempts: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.app.config
    }

    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Populated pools in table order. Pools the vendor had no data for are
    /// absent.
    pub fn histories(&self) -> &[PoolHistory] {
        &self.histories
    }

    pub fn history(&self, pool_name: &str) -> Option<&PullHistory> {
        self.histories
            .iter()
            .find(|entry| entry.pool.name == pool_name)
            .map(|entry| &entry.history)
    }

    /// Makes exactly one attempt at the pending transition.
    pub async fn advance(&mut self) -> Advance {
        match self.state {
            SessionState::Idle => self.locate_log().await,
            SessionState::LogLocated => self.extract_credentials().await,
            SessionState::CredentialsReady => self.populate().await,
            SessionState::Populated | SessionState::Failed(_) => Advance::Done,
        }
    }

    async fn locate_log(&mut self) -> Advance {
        self.attempts += 1;
        match self.app.locator.locate().await {
            Some(path) => {
                info!(path = %path.display(), "game log located");
                self.log_file_path = Some(path);
                self.move_to(SessionState::LogLocated)
            }
            None => self.wait_or_fail(SessionPhase::LocateLog, self.app.config.locate_attempts),
        }
    }

    async fn extract_credentials(&mut self) -> Advance {
        let phase = SessionPhase::ExtractCredentials;
        let Some(log_file) = self.log_file_path.clone() else {
            return self.fail(phase, AppError::Internal(anyhow!("log file path not set")));
        };
        self.attempts += 1;
        match self.app.extractor.extract(&log_file).await {
            Ok(Some(credentials)) => {
                info!(
                    server_id = credentials.server_id.as_deref().unwrap_or("<none>"),
                    language = credentials.language_code.as_deref().unwrap_or("<none>"),
                    "record credentials extracted"
                );
                self.credentials = Some(credentials);
                self.move_to(SessionState::CredentialsReady)
            }
            Ok(None) => self.wait_or_fail(phase, self.app.config.extract_attempts),
            Err(err) => self.fail(phase, err.into()),
        }
    }

    async fn populate(&mut self) -> Advance {
        let phase = SessionPhase::FetchRecords;
        // An empty credential set would only produce rejected requests.
        let Some(credentials) = self.credentials.clone().filter(|c| !c.is_empty()) else {
            return self.fail(phase, GachaError::MissingCredentials.into());
        };
        let fetched = self
            .app
            .fetcher
            .fetch_all(&credentials, &self.app.config.pool_types)
            .await
            .map_err(AppError::from)
            .and_then(build_histories);
        match fetched {
            Ok(histories) => {
                info!(pools = histories.len(), "pull histories populated");
                self.histories = histories;
                self.move_to(SessionState::Populated)
            }
            Err(err) => self.fail(phase, err),
        }
    }

    fn move_to(&mut self, state: SessionState) -> Advance {
        self.attempts = 0;
        self.state = state.clone();
        Advance::Moved(state)
    }

    fn wait_or_fail(&mut self, phase: SessionPhase, budget: u32) -> Advance {
        if self.attempts >= budget {
            warn!(%phase, attempts = self.attempts, "retry budget exhausted");
            let attempts = self.attempts;
            return self.fail(phase, AppError::RetryBudgetExhausted { phase, attempts });
        }
        Advance::Waiting {
            phase,
            attempt: self.attempts,
        }
    }

    fn fail(&mut self, phase: SessionPhase, err: AppError) -> Advance {
        error!(%phase, "session failed: {}", err);
        self.move_to(SessionState::Failed(FailureReason {
            phase,
            message: err.to_string(),
        }))
    }
}

// All pools load or none do, so a reader never sees a partial map.
fn build_histories(fetched: Vec<PoolRecords>) -> Result<Vec<PoolHistory>, AppError> {
    let mut histories = Vec::with_capacity(fetched.len());
    for PoolRecords { pool, records } in fetched {
        let Some(records) = records else {
            continue;
        };
        info!(pool = %pool.name, "loading pull history");
        let history = PullHistory::load(&records)?;
        histories.push(PoolHistory { pool, history });
    }
    Ok(histories)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use gacha_domain::Quality;

    use super::*;
    use crate::test_support::*;

    fn ready_credentials() -> Credentials {
        Credentials::from_query_pairs([("svr_id", "7"), ("player_id", "42"), ("record_id", "r")])
    }

    #[tokio::test]
    async fn walks_every_phase_in_order() {
        let locator = FakeLocator::scripted(vec![None, Some(PathBuf::from("/game/Client/Saved/Logs/Client.log"))]);
        let extractor = FakeExtractor::scripted(vec![Ok(None), Ok(Some(ready_credentials()))]);
        let fetcher = FakeFetcher::with_pool(1, vec![record("Verina", 5), record("filler", 3)]);
        let mut session = GachaSession::new(app_state(&locator, &extractor, &fetcher));

        assert_eq!(
            session.advance().await,
            Advance::Waiting { phase: SessionPhase::LocateLog, attempt: 1 }
        );
        assert_eq!(session.advance().await, Advance::Moved(SessionState::LogLocated));
        assert_eq!(
            session.log_file_path(),
            Some(Path::new("/game/Client/Saved/Logs/Client.log"))
        );
        assert_eq!(
            session.advance().await,
            Advance::Waiting { phase: SessionPhase::ExtractCredentials, attempt: 1 }
        );
        assert_eq!(session.advance().await, Advance::Moved(SessionState::CredentialsReady));
        assert_eq!(session.credentials(), Some(&ready_credentials()));
        assert_eq!(session.advance().await, Advance::Moved(SessionState::Populated));
        assert_eq!(session.advance().await, Advance::Done);

        assert_eq!(fetcher.requested(), vec![1, 2, 3, 4]);
        assert_eq!(session.histories().len(), 1);
        let history = session.history("Character Event").expect("character event history");
        assert_eq!(history.total_attempts(), 2);
        assert_eq!(history.events(Quality::Five)[0].pity, 2);
        assert!(session.history("Weapon Event").is_none());
    }

    #[tokio::test]
    async fn empty_credentials_fail_before_any_request() {
        let locator = FakeLocator::scripted(vec![Some(PathBuf::from("/game/Client/Saved/Logs/Client.log"))]);
        let extractor = FakeExtractor::scripted(vec![Ok(Some(Credentials::default()))]);
        let fetcher = FakeFetcher::with_pool(1, vec![record("Verina", 5)]);
        let mut session = GachaSession::new(app_state(&locator, &extractor, &fetcher));

        assert_eq!(session.advance().await, Advance::Moved(SessionState::LogLocated));
        assert_eq!(session.advance().await, Advance::Moved(SessionState::CredentialsReady));
        let Advance::Moved(SessionState::Failed(reason)) = session.advance().await else {
            panic!("expected empty credentials to fail");
        };
        assert_eq!(reason.phase, SessionPhase::FetchRecords);
        assert!(reason.message.contains("credentials are not set"));
        assert!(fetcher.requested().is_empty());
        assert!(session.histories().is_empty());
    }

    #[tokio::test]
    async fn locate_budget_exhaustion_fails_the_session() {
        let locator = FakeLocator::scripted(Vec::new());
        let extractor = FakeExtractor::scripted(Vec::new());
        let fetcher = FakeFetcher::default();
        let mut app = app_state(&locator, &extractor, &fetcher);
        app.config.locate_attempts = 3;
        let mut session = GachaSession::new(app);

        assert!(matches!(session.advance().await, Advance::Waiting { attempt: 1, .. }));
        assert!(matches!(session.advance().await, Advance::Waiting { attempt: 2, .. }));
        let Advance::Moved(SessionState::Failed(reason)) = session.advance().await else {
            panic!("expected failure after budget");
        };
        assert_eq!(reason.phase, SessionPhase::LocateLog);
        assert!(reason.message.contains("3 attempts"));
        assert_eq!(locator.calls(), 3);

        assert_eq!(session.advance().await, Advance::Done);
        assert_eq!(locator.calls(), 3);
    }

    #[tokio::test]
    async fn unreadable_log_is_fatal_without_retry() {
        let locator = FakeLocator::scripted(vec![Some(PathBuf::from("/missing/Client.log"))]);
        let extractor = FakeExtractor::scripted(vec![Err(GachaError::LogUnreadable {
            path: "/missing/Client.log".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })]);
        let fetcher = FakeFetcher::default();
        let mut session = GachaSession::new(app_state(&locator, &extractor, &fetcher));

        session.advance().await;
        let Advance::Moved(SessionState::Failed(reason)) = session.advance().await else {
            panic!("expected fatal failure");
        };
        assert_eq!(reason.phase, SessionPhase::ExtractCredentials);
        assert!(reason.message.contains("/missing/Client.log"));
        assert_eq!(extractor.calls(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_publishes_no_histories() {
        let locator = FakeLocator::scripted(vec![Some(PathBuf::from("/game/Client.log"))]);
        let extractor = FakeExtractor::scripted(vec![Ok(Some(ready_credentials()))]);
        let mut fetcher = FakeFetcher::with_pool(1, vec![record("Verina", 5)]);
        fetcher.fail_on = Some(3);
        let mut session = GachaSession::new(app_state(&locator, &extractor, &fetcher));

        session.advance().await;
        session.advance().await;
        let Advance::Moved(SessionState::Failed(reason)) = session.advance().await else {
            panic!("expected fetch failure");
        };
        assert_eq!(reason.phase, SessionPhase::FetchRecords);
        assert!(session.histories().is_empty());
        assert_eq!(fetcher.requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn bad_record_time_fails_the_whole_population() {
        let locator = FakeLocator::scripted(vec![Some(PathBuf::from("/game/Client.log"))]);
        let extractor = FakeExtractor::scripted(vec![Ok(Some(ready_credentials()))]);
        let mut broken = record("Verina", 5);
        broken.time = "not a time".to_string();
        let mut fetcher = FakeFetcher::with_pool(1, vec![record("Calcharo", 5)]);
        fetcher.pools.insert(2, vec![broken]);
        let mut session = GachaSession::new(app_state(&locator, &extractor, &fetcher));

        session.advance().await;
        session.advance().await;
        assert!(matches!(
            session.advance().await,
            Advance::Moved(SessionState::Failed(_))
        ));
        assert!(session.histories().is_empty());
    }

    #[test]
    fn pending_phase_follows_state() {
        assert_eq!(SessionState::Idle.pending_phase(), Some(SessionPhase::LocateLog));
        assert_eq!(SessionState::Populated.pending_phase(), None);
        assert!(SessionState::Populated.is_terminal());
        assert!(!SessionState::CredentialsReady.is_terminal());
    }
}
