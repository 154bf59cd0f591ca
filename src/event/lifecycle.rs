//! Lifecycle event records
//!
//! One variant per invocation point, each carrying exactly the fields that are
//! meaningful for it. Events borrow their string and statistics data from the
//! caller, so a reporter cannot hold on to them past the callback.

use crate::stats::CallFinalInfo;

use super::ids::{CallId, ChannelId};

/// Invocation point of a lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadReportingSource {
    /// A channel was created
    ChannelCreation,
    /// A channel was destroyed
    ChannelDestruction,
    /// A call was created
    CallCreation,
    /// A call completed and was destroyed
    CallDestruction,
}

impl LoadReportingSource {
    /// Stable name of the invocation point
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadReportingSource::ChannelCreation => "channel_creation",
            LoadReportingSource::ChannelDestruction => "channel_destruction",
            LoadReportingSource::CallCreation => "call_creation",
            LoadReportingSource::CallDestruction => "call_destruction",
        }
    }
}

impl std::fmt::Display for LoadReportingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data handed to a reporter at one lifecycle point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleEvent<'a> {
    ChannelCreation {
        channel_id: ChannelId,
    },
    ChannelDestruction {
        channel_id: ChannelId,
    },
    CallCreation {
        channel_id: ChannelId,
        call_id: CallId,
        /// Method path, from the `:path` header
        method_name: &'a str,
        /// Value of the reserved key on client initial metadata
        initial_md: Option<&'a str>,
    },
    CallDestruction {
        channel_id: ChannelId,
        call_id: CallId,
        method_name: &'a str,
        initial_md: Option<&'a str>,
        /// Value of the reserved key on server trailing metadata
        trailing_md: Option<&'a str>,
        final_info: &'a CallFinalInfo,
    },
}

impl<'a> LifecycleEvent<'a> {
    pub fn channel_creation(channel_id: ChannelId) -> Self {
        LifecycleEvent::ChannelCreation { channel_id }
    }

    pub fn channel_destruction(channel_id: ChannelId) -> Self {
        LifecycleEvent::ChannelDestruction { channel_id }
    }

    pub fn call_creation(
        channel_id: ChannelId,
        call_id: CallId,
        method_name: &'a str,
        initial_md: Option<&'a str>,
    ) -> Self {
        LifecycleEvent::CallCreation {
            channel_id,
            call_id,
            method_name,
            initial_md,
        }
    }

    pub fn call_destruction(
        channel_id: ChannelId,
        call_id: CallId,
        method_name: &'a str,
        initial_md: Option<&'a str>,
        trailing_md: Option<&'a str>,
        final_info: &'a CallFinalInfo,
    ) -> Self {
        LifecycleEvent::CallDestruction {
            channel_id,
            call_id,
            method_name,
            initial_md,
            trailing_md,
            final_info,
        }
    }

    /// Invocation point this event was built for
    pub fn source(&self) -> LoadReportingSource {
        match self {
            LifecycleEvent::ChannelCreation { .. } => LoadReportingSource::ChannelCreation,
            LifecycleEvent::ChannelDestruction { .. } => LoadReportingSource::ChannelDestruction,
            LifecycleEvent::CallCreation { .. } => LoadReportingSource::CallCreation,
            LifecycleEvent::CallDestruction { .. } => LoadReportingSource::CallDestruction,
        }
    }

    pub fn channel_id(&self) -> ChannelId {
        match *self {
            LifecycleEvent::ChannelCreation { channel_id }
            | LifecycleEvent::ChannelDestruction { channel_id }
            | LifecycleEvent::CallCreation { channel_id, .. }
            | LifecycleEvent::CallDestruction { channel_id, .. } => channel_id,
        }
    }

    /// Call identifier, `None` for channel-scoped events
    pub fn call_id(&self) -> Option<CallId> {
        match *self {
            LifecycleEvent::CallCreation { call_id, .. }
            | LifecycleEvent::CallDestruction { call_id, .. } => Some(call_id),
            _ => None,
        }
    }

    /// Method path, `None` for channel-scoped events
    pub fn method_name(&self) -> Option<&'a str> {
        match *self {
            LifecycleEvent::CallCreation { method_name, .. }
            | LifecycleEvent::CallDestruction { method_name, .. } => Some(method_name),
            _ => None,
        }
    }

    pub fn initial_md(&self) -> Option<&'a str> {
        match *self {
            LifecycleEvent::CallCreation { initial_md, .. }
            | LifecycleEvent::CallDestruction { initial_md, .. } => initial_md,
            _ => None,
        }
    }

    pub fn trailing_md(&self) -> Option<&'a str> {
        match *self {
            LifecycleEvent::CallDestruction { trailing_md, .. } => trailing_md,
            _ => None,
        }
    }

    /// Final call statistics, present only for call destruction
    pub fn final_info(&self) -> Option<&'a CallFinalInfo> {
        match *self {
            LifecycleEvent::CallDestruction { final_info, .. } => Some(final_info),
            _ => None,
        }
    }

    /// Whether the event belongs to a call rather than a channel
    pub fn is_call_scoped(&self) -> bool {
        matches!(
            self,
            LifecycleEvent::CallCreation { .. } | LifecycleEvent::CallDestruction { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::stats::StatusCode;

    #[test]
    fn test_channel_events() {
        let created = LifecycleEvent::channel_creation(ChannelId(1));
        assert_eq!(created.source(), LoadReportingSource::ChannelCreation);
        assert_eq!(created.channel_id(), ChannelId(1));
        assert_eq!(created.call_id(), None);
        assert_eq!(created.method_name(), None);
        assert!(created.final_info().is_none());
        assert!(!created.is_call_scoped());

        let destroyed = LifecycleEvent::channel_destruction(ChannelId(1));
        assert_eq!(destroyed.source(), LoadReportingSource::ChannelDestruction);
        assert!(destroyed.final_info().is_none());
    }

    #[test]
    fn test_call_creation() {
        let event = LifecycleEvent::call_creation(ChannelId(1), CallId(10), "/svc/M", Some("lb=1"));

        assert_eq!(event.source(), LoadReportingSource::CallCreation);
        assert_eq!(event.call_id(), Some(CallId(10)));
        assert_eq!(event.method_name(), Some("/svc/M"));
        assert_eq!(event.initial_md(), Some("lb=1"));
        assert_eq!(event.trailing_md(), None);
        assert!(event.final_info().is_none());
        assert!(event.is_call_scoped());
    }

    #[test]
    fn test_final_info_only_on_call_destruction() {
        let info = CallFinalInfo::new(StatusCode::Ok, Duration::from_millis(5));
        let events = [
            LifecycleEvent::channel_creation(ChannelId(1)),
            LifecycleEvent::call_creation(ChannelId(1), CallId(2), "/svc/M", None),
            LifecycleEvent::call_destruction(
                ChannelId(1),
                CallId(2),
                "/svc/M",
                None,
                Some("cost=3"),
                &info,
            ),
            LifecycleEvent::channel_destruction(ChannelId(1)),
        ];

        for event in &events {
            assert_eq!(
                event.final_info().is_some(),
                event.source() == LoadReportingSource::CallDestruction
            );
        }
        assert_eq!(events[2].trailing_md(), Some("cost=3"));
        assert_eq!(events[2].final_info(), Some(&info));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(LoadReportingSource::CallDestruction.to_string(), "call_destruction");
    }
}
