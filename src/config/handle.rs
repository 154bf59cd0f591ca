//! Shared load reporting config
//!
//! A [`LoadReportingConfig`] is a cheap, reference-counted handle to one
//! registered reporter. Every channel that reports load holds its own copy;
//! the reporter is torn down when the last copy is released.
//!
//! # Ownership
//!
//! ```text
//!      create()                copy()                   release()
//!   ┌──────────────┐      ┌──────────────┐         ┌──────────────┐
//!   │ refs = 1     │ ───► │ refs = n + 1 │ ──...──►│ refs = 0     │
//!   └──────────────┘      └──────────────┘         │ reporter     │
//!                                                  │ dropped once │
//!                                                  └──────────────┘
//! ```
//!
//! Copy is `Clone` and release is `Drop`, so a released handle cannot be
//! used again and cannot be released twice.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::event::LifecycleEvent;

use super::options::{PanicPolicy, ReportingOptions};
use super::reporter::{ContextReporter, LoadReporter};

struct ConfigInner {
    reporter: Box<dyn LoadReporter>,
    options: ReportingOptions,
    registered: AtomicBool,
}

impl Drop for ConfigInner {
    fn drop(&mut self) {
        tracing::debug!("Load reporting config destroyed");
    }
}

/// Handle to a registered load reporter
pub struct LoadReportingConfig {
    inner: Arc<ConfigInner>,
}

impl LoadReportingConfig {
    /// Create a config around a reporter with default options
    pub fn new<R: LoadReporter>(reporter: R) -> Self {
        Self::from_parts(Box::new(reporter), ReportingOptions::default())
    }

    /// Create a config from a callback and a user context value
    ///
    /// The context is handed unchanged to every invocation of the callback.
    /// Fails with [`Error::InvalidArgument`] if no callback is given.
    pub fn create<F, T>(callback: Option<F>, user_context: T) -> Result<Self>
    where
        F: Fn(&LifecycleEvent<'_>, &T) + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let callback = callback.ok_or(Error::InvalidArgument("callback is required"))?;
        Ok(Self::new(ContextReporter {
            callback,
            context: user_context,
        }))
    }

    /// Start building a config
    pub fn builder() -> LoadReportingConfigBuilder {
        LoadReportingConfigBuilder::default()
    }

    fn from_parts(reporter: Box<dyn LoadReporter>, options: ReportingOptions) -> Self {
        tracing::debug!(
            panic_policy = ?options.panic_policy,
            notify_on_attach = options.notify_on_attach,
            "Load reporting config created"
        );

        Self {
            inner: Arc::new(ConfigInner {
                reporter,
                options,
                registered: AtomicBool::new(false),
            }),
        }
    }

    /// Get another owning handle to the same reporter
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Give up this handle
    ///
    /// The reporter is dropped when this was the last handle.
    pub fn release(self) {
        drop(self);
    }

    /// Invoke the reporter with `event`
    ///
    /// Runs synchronously on the calling thread and returns once the reporter
    /// does. Callers are expected to keep per-scope ordering: a channel's
    /// creation before its calls, each call's creation before its destruction,
    /// and all call destructions before the channel's destruction.
    pub fn dispatch(&self, event: &LifecycleEvent<'_>) {
        tracing::trace!(
            source = %event.source(),
            channel_id = %event.channel_id(),
            call_id = ?event.call_id(),
            "Dispatching load reporting event"
        );

        self.invoke(event.source().as_str(), |reporter| reporter.report(event));
    }

    /// Deliver the one-time registration notification
    ///
    /// Only the first call across all copies of this config reaches the
    /// reporter. Returns whether this call delivered it.
    pub fn notify_registered(&self) -> bool {
        if self.inner.registered.swap(true, Ordering::AcqRel) {
            return false;
        }

        tracing::debug!("Load reporting config registered");
        self.invoke("registered", |reporter| reporter.on_registered());
        true
    }

    /// Whether the registration notification has been delivered
    pub fn is_registered(&self) -> bool {
        self.inner.registered.load(Ordering::Acquire)
    }

    /// Options this config was created with
    pub fn options(&self) -> &ReportingOptions {
        &self.inner.options
    }

    /// Current number of live handles (a snapshot)
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether two handles refer to the same reporter
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Run `f` against the reporter under the configured panic policy
    ///
    /// While the thread is already unwinding (dispatch from a `Drop` during a
    /// panic), reporter panics are always caught: a second panic would abort.
    fn invoke<F>(&self, point: &'static str, f: F)
    where
        F: FnOnce(&dyn LoadReporter),
    {
        let reporter = self.inner.reporter.as_ref();
        let isolate = match self.inner.options.panic_policy {
            PanicPolicy::Isolate => true,
            PanicPolicy::Propagate => std::thread::panicking(),
        };

        if !isolate {
            f(reporter);
            return;
        }

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| f(reporter))) {
            tracing::error!(
                point = point,
                panic = panic_message(payload.as_ref()),
                "Load reporter panicked"
            );
        }
    }
}

impl Clone for LoadReportingConfig {
    fn clone(&self) -> Self {
        let inner = Arc::clone(&self.inner);
        tracing::trace!(refs = Arc::strong_count(&inner), "Load reporting config copied");
        Self { inner }
    }
}

impl Drop for LoadReportingConfig {
    fn drop(&mut self) {
        tracing::trace!(
            refs = Arc::strong_count(&self.inner).saturating_sub(1),
            "Load reporting config released"
        );
    }
}

impl std::fmt::Debug for LoadReportingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadReportingConfig")
            .field("refs", &self.ref_count())
            .field("registered", &self.is_registered())
            .field("options", &self.inner.options)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Builder for [`LoadReportingConfig`]
#[derive(Default)]
pub struct LoadReportingConfigBuilder {
    reporter: Option<Box<dyn LoadReporter>>,
    options: ReportingOptions,
}

impl LoadReportingConfigBuilder {
    /// Use a closure as the reporter
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LifecycleEvent<'_>) + Send + Sync + 'static,
    {
        let reporter: Box<dyn LoadReporter> = Box::new(callback);
        self.reporter = Some(reporter);
        self
    }

    /// Use a [`LoadReporter`] implementation as the reporter
    pub fn reporter<R: LoadReporter>(mut self, reporter: R) -> Self {
        let reporter: Box<dyn LoadReporter> = Box::new(reporter);
        self.reporter = Some(reporter);
        self
    }

    /// Set the reporting options
    pub fn options(mut self, options: ReportingOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the config
    ///
    /// Fails with [`Error::InvalidArgument`] if no reporter was set.
    pub fn build(self) -> Result<LoadReportingConfig> {
        let reporter = self
            .reporter
            .ok_or(Error::InvalidArgument("callback is required"))?;
        Ok(LoadReportingConfig::from_parts(reporter, self.options))
    }
}
