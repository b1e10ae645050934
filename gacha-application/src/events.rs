use crate::dtos::PoolSummary;
use crate::session::{FailureReason, SessionPhase, SessionState};

/// Progress notifications published by the session worker to the console.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Waiting { phase: SessionPhase, attempt: u32 },
    Moved(SessionState),
    Finished(Vec<PoolSummary>),
    Failed(FailureReason),
    Cancelled,
}

impl SessionEvent {
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            SessionEvent::Finished(_) | SessionEvent::Failed(_) | SessionEvent::Cancelled
        )
    }
}
