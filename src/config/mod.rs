//! Load reporting config
//!
//! The registered reporter, the options it was registered with, and the
//! reference-counted handle the pipeline passes around.

pub mod handle;
pub mod options;
pub mod reporter;

pub use handle::{LoadReportingConfig, LoadReportingConfigBuilder};
pub use options::{PanicPolicy, ReportingOptions};
pub use reporter::LoadReporter;
