//! Reporter trait
//!
//! The callback side of a load reporting config. Anything that can observe a
//! [`LifecycleEvent`] from several threads at once can be a reporter; plain
//! closures qualify through a blanket implementation.

use crate::event::LifecycleEvent;

/// Receiver of load reporting events
///
/// Called synchronously on whatever pipeline thread hits the lifecycle point,
/// possibly on many threads at the same time. Implementations that share
/// mutable state must synchronize it themselves.
pub trait LoadReporter: Send + Sync + 'static {
    /// Observe one lifecycle event
    ///
    /// The event only lives for the duration of this call.
    fn report(&self, event: &LifecycleEvent<'_>);

    /// Called once when the config is registered with the pipeline
    fn on_registered(&self) {}
}

impl<F> LoadReporter for F
where
    F: Fn(&LifecycleEvent<'_>) + Send + Sync + 'static,
{
    fn report(&self, event: &LifecycleEvent<'_>) {
        self(event)
    }
}

/// Reporter built from a callback and a separate user context value
pub(crate) struct ContextReporter<F, T> {
    pub(crate) callback: F,
    pub(crate) context: T,
}

impl<F, T> LoadReporter for ContextReporter<F, T>
where
    F: Fn(&LifecycleEvent<'_>, &T) + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn report(&self, event: &LifecycleEvent<'_>) {
        (self.callback)(event, &self.context)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::event::ChannelId;

    #[test]
    fn test_closure_reporter() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let reporter = move |_event: &LifecycleEvent<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        reporter.report(&LifecycleEvent::channel_creation(ChannelId(1)));
        reporter.on_registered();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_context_reporter_passes_context() {
        let reporter = ContextReporter {
            callback: |event: &LifecycleEvent<'_>, ctx: &AtomicUsize| {
                ctx.fetch_add(event.channel_id().0 as usize, Ordering::SeqCst);
            },
            context: AtomicUsize::new(0),
        };

        reporter.report(&LifecycleEvent::channel_creation(ChannelId(4)));
        reporter.report(&LifecycleEvent::channel_destruction(ChannelId(4)));

        assert_eq!(reporter.context.load(Ordering::SeqCst), 8);
    }
}
