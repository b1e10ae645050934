use std::time::Duration;

use tracing::debug;

use crate::queries::summarize_pools;
use crate::session::{Advance, GachaSession, SessionState};
use crate::SessionEvent;

/// Polls `session` until it reaches a terminal state, sleeping `interval`
/// between unsuccessful attempts. Every step is reported through `on_event`,
/// ending with `Finished` or `Failed`.
pub async fn drive_session<F>(
    session: &mut GachaSession,
    interval: Duration,
    mut on_event: F,
) -> SessionState
where
    F: FnMut(SessionEvent),
{
    loop {
        match session.advance().await {
            Advance::Moved(state) => {
                debug!(?state, "session moved");
                on_event(SessionEvent::Moved(state));
            }
            Advance::Waiting { phase, attempt } => {
                debug!(%phase, attempt, "session waiting");
                on_event(SessionEvent::Waiting { phase, attempt });
                tokio::time::sleep(interval).await;
            }
            Advance::Done => break,
        }
    }

    let state = session.state().clone();
    match &state {
        SessionState::Populated => on_event(SessionEvent::Finished(summarize_pools(session))),
        SessionState::Failed(reason) => on_event(SessionEvent::Failed(reason.clone())),
        _ => {}
    }
    state
}
