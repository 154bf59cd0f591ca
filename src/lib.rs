//! Load reporting hooks for RPC channels and calls
//!
//! A monitoring subsystem registers one [`LoadReporter`] and the RPC pipeline
//! invokes it at four lifecycle points: channel creation, channel destruction,
//! call creation and call destruction. Only call destruction carries the
//! call's final statistics.
//!
//! # Example
//! ```
//! use load_reporting::{
//!     CallFinalInfo, CallId, ChannelArgs, ChannelId, ChannelReporter, LifecycleEvent,
//!     LoadReportingConfig, MetadataMap,
//! };
//!
//! let config = LoadReportingConfig::builder()
//!     .callback(|event: &LifecycleEvent<'_>| {
//!         println!("{} on {}", event.source(), event.channel_id());
//!     })
//!     .build()
//!     .unwrap();
//!
//! let args = ChannelArgs::new().with(config.to_channel_arg());
//! let channel = ChannelReporter::attach(&args, ChannelId(1)).unwrap();
//! let call = channel.start_call(CallId(10), "/svc/Method", &MetadataMap::new());
//! call.finish(CallFinalInfo::default());
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod event;
pub mod stats;

pub use channel::{CallReporter, ChannelArgs, ChannelReporter};
pub use config::{LoadReporter, LoadReportingConfig, PanicPolicy, ReportingOptions};
pub use error::{Error, Result};
pub use event::{
    CallId, ChannelId, LifecycleEvent, LoadReportingSource, MetadataMap,
    LOAD_REPORTING_INITIAL_MD_KEY, LOAD_REPORTING_TRAILING_MD_KEY,
};
pub use stats::{CallFinalInfo, StatusCode};
