//! Reporting options

use crate::event::{LOAD_REPORTING_INITIAL_MD_KEY, LOAD_REPORTING_TRAILING_MD_KEY};

/// What to do when a reporter panics during dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicPolicy {
    /// Let the panic unwind into the pipeline
    #[default]
    Propagate,
    /// Catch the panic, log it and return normally
    Isolate,
}

/// Options fixed at config creation and shared by every copy of the config
#[derive(Debug, Clone)]
pub struct ReportingOptions {
    /// Metadata key looked up on client initial metadata
    pub initial_md_key: String,

    /// Metadata key looked up on server trailing metadata
    pub trailing_md_key: String,

    /// Handling of reporter panics
    pub panic_policy: PanicPolicy,

    /// Fire the registration notification when the config is first attached to a channel
    pub notify_on_attach: bool,
}

impl Default for ReportingOptions {
    fn default() -> Self {
        Self {
            initial_md_key: LOAD_REPORTING_INITIAL_MD_KEY.to_string(),
            trailing_md_key: LOAD_REPORTING_TRAILING_MD_KEY.to_string(),
            panic_policy: PanicPolicy::Propagate,
            notify_on_attach: true,
        }
    }
}

impl ReportingOptions {
    /// Set the initial metadata key
    pub fn initial_md_key(mut self, key: impl Into<String>) -> Self {
        self.initial_md_key = key.into();
        self
    }

    /// Set the trailing metadata key
    pub fn trailing_md_key(mut self, key: impl Into<String>) -> Self {
        self.trailing_md_key = key.into();
        self
    }

    /// Set the panic policy
    pub fn panic_policy(mut self, policy: PanicPolicy) -> Self {
        self.panic_policy = policy;
        self
    }

    /// Catch reporter panics instead of propagating them
    pub fn isolate_panics(self) -> Self {
        self.panic_policy(PanicPolicy::Isolate)
    }

    /// Leave the registration notification entirely to the caller
    pub fn disable_notify_on_attach(mut self) -> Self {
        self.notify_on_attach = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ReportingOptions::default();

        assert_eq!(options.initial_md_key, "load-reporting-initial");
        assert_eq!(options.trailing_md_key, "load-reporting-trailing");
        assert_eq!(options.panic_policy, PanicPolicy::Propagate);
        assert!(options.notify_on_attach);
    }

    #[test]
    fn test_builder_chaining() {
        let options = ReportingOptions::default()
            .initial_md_key("lb-in")
            .trailing_md_key("lb-out")
            .isolate_panics()
            .disable_notify_on_attach();

        assert_eq!(options.initial_md_key, "lb-in");
        assert_eq!(options.trailing_md_key, "lb-out");
        assert_eq!(options.panic_policy, PanicPolicy::Isolate);
        assert!(!options.notify_on_attach);
    }
}
