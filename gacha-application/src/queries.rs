pub mod pool_summary_queries;

pub use pool_summary_queries::*;
