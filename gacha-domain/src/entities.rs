// Domain entities
pub mod credentials;
pub mod pull_event;
pub mod raw_record;
pub mod runtime_config;

pub use credentials::*;
pub use pull_event::*;
pub use raw_record::*;
pub use runtime_config::*;
