pub mod pull_history;

pub use pull_history::*;
