//! Channel and call reporting scopes
//!
//! Guards that dispatch lifecycle events at the points a pipeline filter
//! attaches and detaches. Ordering between a channel and its calls follows
//! from ownership: every [`CallReporter`] keeps its channel scope alive, so a
//! channel's destruction is reported only after all of its calls have been.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::config::LoadReportingConfig;
use crate::event::metadata::metadata_str;
use crate::event::{CallId, ChannelId, LifecycleEvent, MetadataMap};
use crate::stats::{CallFinalInfo, StatusCode};

use super::args::ChannelArgs;

struct ChannelScope {
    config: LoadReportingConfig,
    channel_id: ChannelId,
}

impl Drop for ChannelScope {
    fn drop(&mut self) {
        self.config.dispatch(&LifecycleEvent::channel_destruction(self.channel_id));
        tracing::debug!(channel_id = %self.channel_id, "Channel load reporting detached");
    }
}

/// Load reporting for one channel
///
/// Clones share the same channel scope. Channel destruction is reported when
/// the last clone and the last call on the channel are gone.
#[derive(Clone)]
pub struct ChannelReporter {
    scope: Arc<ChannelScope>,
}

impl ChannelReporter {
    /// Attach load reporting to a channel and report its creation
    pub fn new(config: LoadReportingConfig, channel_id: ChannelId) -> Self {
        if config.options().notify_on_attach {
            config.notify_registered();
        }

        config.dispatch(&LifecycleEvent::channel_creation(channel_id));
        tracing::debug!(
            channel_id = %channel_id,
            refs = config.ref_count(),
            "Channel load reporting attached"
        );

        Self {
            scope: Arc::new(ChannelScope { config, channel_id }),
        }
    }

    /// Attach using the config carried in `args`
    ///
    /// Returns `None` when no load reporting config is attached, in which case
    /// the channel simply runs without load reporting.
    pub fn attach(args: &ChannelArgs, channel_id: ChannelId) -> Option<Self> {
        let config = args.load_reporting_config()?;
        Some(Self::new(config, channel_id))
    }

    pub fn channel_id(&self) -> ChannelId {
        self.scope.channel_id
    }

    pub fn config(&self) -> &LoadReportingConfig {
        &self.scope.config
    }

    /// Start a call on this channel and report its creation
    ///
    /// The initial load reporting value is taken from `initial_metadata`
    /// under the config's `initial_md_key`.
    pub fn start_call(
        &self,
        call_id: CallId,
        method_name: impl Into<String>,
        initial_metadata: &MetadataMap,
    ) -> CallReporter {
        let options = self.scope.config.options();
        let call = CallReporter {
            channel: Arc::clone(&self.scope),
            call_id,
            method_name: method_name.into(),
            initial_md: initial_metadata.get(&options.initial_md_key).cloned(),
            trailing_md: None,
            started_at: Instant::now(),
            finished: false,
        };

        self.scope.config.dispatch(&LifecycleEvent::call_creation(
            self.scope.channel_id,
            call_id,
            &call.method_name,
            metadata_str(&options.initial_md_key, call.initial_md.as_ref()),
        ));

        call
    }
}

impl std::fmt::Debug for ChannelReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelReporter")
            .field("channel_id", &self.scope.channel_id)
            .finish()
    }
}

/// Load reporting for one call
///
/// Reports call destruction exactly once: through [`CallReporter::finish`], or
/// with a `Cancelled` status if dropped without finishing.
pub struct CallReporter {
    channel: Arc<ChannelScope>,
    call_id: CallId,
    method_name: String,
    initial_md: Option<Bytes>,
    trailing_md: Option<Bytes>,
    started_at: Instant,
    finished: bool,
}

impl CallReporter {
    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    pub fn channel_id(&self) -> ChannelId {
        self.channel.channel_id
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Time since the call was started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Take the trailing load reporting value from the server's trailing
    /// metadata, under the config's `trailing_md_key`
    pub fn set_trailing_metadata(&mut self, trailing_metadata: &MetadataMap) {
        let key = &self.channel.config.options().trailing_md_key;
        self.trailing_md = trailing_metadata.get(key).cloned();
    }

    /// Complete the call and report its destruction with `final_info`
    pub fn finish(mut self, final_info: CallFinalInfo) {
        // Set before dispatch: Drop must not report again if the reporter unwinds
        self.finished = true;
        self.report_destruction(&final_info);
    }

    fn report_destruction(&self, final_info: &CallFinalInfo) {
        let options = self.channel.config.options();
        self.channel.config.dispatch(&LifecycleEvent::call_destruction(
            self.channel.channel_id,
            self.call_id,
            &self.method_name,
            metadata_str(&options.initial_md_key, self.initial_md.as_ref()),
            metadata_str(&options.trailing_md_key, self.trailing_md.as_ref()),
            final_info,
        ));
    }
}

impl Drop for CallReporter {
    fn drop(&mut self) {
        if !self.finished {
            self.finished = true;
            tracing::debug!(
                channel_id = %self.channel.channel_id,
                call_id = %self.call_id,
                "Call dropped without final info, reporting as cancelled"
            );
            let final_info = CallFinalInfo::new(StatusCode::Cancelled, self.elapsed());
            self.report_destruction(&final_info);
        }
    }
}

impl std::fmt::Debug for CallReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallReporter")
            .field("channel_id", &self.channel.channel_id)
            .field("call_id", &self.call_id)
            .field("method_name", &self.method_name)
            .finish()
    }
}
