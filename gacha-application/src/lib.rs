// Gacha Application Layer

pub mod dtos;
pub mod error;
pub mod events;
pub mod ops;
pub mod queries;
pub mod session;
pub mod state;

pub use error::AppError;
pub use events::SessionEvent;
pub use session::{Advance, FailureReason, GachaSession, PoolHistory, SessionPhase, SessionState};
pub use state::AppState;

#[cfg(test)]
mod test_support;
