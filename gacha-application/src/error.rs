use gacha_domain::GachaError;
use thiserror::Error;

use crate::session::SessionPhase;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Gacha(#[from] GachaError),
    #[error("{phase} did not complete after {attempts} attempts")]
    RetryBudgetExhausted { phase: SessionPhase, attempts: u32 },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
