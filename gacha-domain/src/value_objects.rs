// Domain value objects
pub mod pool_type;
pub mod quality;

pub use pool_type::*;
pub use quality::*;
