pub mod context;
pub mod lifecycle;
pub mod logging;

pub use lifecycle::{present, start_session, SessionHandle, SessionOptions};
pub use logging::init_logging;
