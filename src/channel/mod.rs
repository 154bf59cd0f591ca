//! Channel attachment
//!
//! How a load reporting config reaches a channel and how the channel and its
//! calls report their lifecycles through it.
//!
//! # Architecture
//!
//! ```text
//!                      LoadReportingConfig (refs = n)
//!                                 │ to_channel_arg()
//!                                 ▼
//!                           ChannelArgs ── clone/drop = copy/release
//!                                 │ attach()
//!               ┌─────────────────┴─────────────────┐
//!               ▼                                   ▼
//!        ChannelReporter(1)                  ChannelReporter(2)
//!        ChannelCreation                     ChannelCreation
//!               │ start_call()                      │
//!        ┌──────┴──────┐                            ▼
//!        ▼             ▼                       CallReporter
//!   CallReporter   CallReporter
//!   finish()/drop  finish()/drop ──► CallDestruction
//!        └──────┬──────┘
//!               ▼
//!        ChannelDestruction (after the last call)
//! ```

pub mod args;
pub mod scope;

pub use args::{ArgValue, ChannelArg, ChannelArgs, LOAD_REPORTING_CONFIG_ARG};
pub use scope::{CallReporter, ChannelReporter};
