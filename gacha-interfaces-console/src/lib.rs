// Console interface: progress spinner and result panels

pub mod console;
pub mod options;
pub mod progress;
pub mod report;

pub use console::*;
pub use options::*;
pub use progress::*;
pub use report::*;
