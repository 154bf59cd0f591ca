//! Lifecycle events delivered to load reporters

pub mod ids;
pub mod lifecycle;
pub mod metadata;

pub use ids::{CallId, ChannelId};
pub use lifecycle::{LifecycleEvent, LoadReportingSource};
pub use metadata::{MetadataMap, LOAD_REPORTING_INITIAL_MD_KEY, LOAD_REPORTING_TRAILING_MD_KEY};
