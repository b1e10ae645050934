pub mod payload_extractor;
pub mod process_locator;
pub mod record_fetcher;

pub use payload_extractor::*;
pub use process_locator::*;
pub use record_fetcher::*;
