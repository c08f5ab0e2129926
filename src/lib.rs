pub mod config;
pub mod engine;
pub mod error;
pub mod ignore;
pub mod paths;
pub mod progress;
pub mod report;
pub mod scanner;

pub use config::{GitignoreAnchor, ScanConfiguration};
pub use engine::{ScanEngine, ScanResult};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
