//! Channel arguments
//!
//! The generic key/value mechanism a pipeline uses to configure channel
//! filters. A load reporting config travels through it as an owned copy of the
//! handle: cloning the arguments copies the handle, dropping them releases it.

use crate::config::LoadReportingConfig;

/// Channel argument key under which a load reporting config is attached
pub const LOAD_REPORTING_CONFIG_ARG: &str = "grpc.load_reporting_config";

/// Value of a channel argument
#[derive(Debug, Clone)]
pub enum ArgValue {
    Integer(i64),
    String(String),
    LoadReporting(LoadReportingConfig),
}

/// A single named channel argument
#[derive(Debug, Clone)]
pub struct ChannelArg {
    pub key: String,
    pub value: ArgValue,
}

impl ChannelArg {
    pub fn integer(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value: ArgValue::Integer(value),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: ArgValue::String(value.into()),
        }
    }
}

impl LoadReportingConfig {
    /// Package a copy of this config as a channel argument
    pub fn to_channel_arg(&self) -> ChannelArg {
        ChannelArg {
            key: LOAD_REPORTING_CONFIG_ARG.to_string(),
            value: ArgValue::LoadReporting(self.copy()),
        }
    }
}

/// Ordered set of channel arguments, at most one per key
#[derive(Debug, Clone, Default)]
pub struct ChannelArgs {
    args: Vec<ChannelArg>,
}

impl ChannelArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, replacing any previous one with the same key
    pub fn with(mut self, arg: ChannelArg) -> Self {
        self.set(arg);
        self
    }

    /// Add an argument, replacing any previous one with the same key
    pub fn set(&mut self, arg: ChannelArg) {
        match self.args.iter_mut().find(|a| a.key == arg.key) {
            Some(existing) => *existing = arg,
            None => self.args.push(arg),
        }
    }

    /// Remove an argument, returning it if present
    pub fn remove(&mut self, key: &str) -> Option<ChannelArg> {
        let index = self.args.iter().position(|a| a.key == key)?;
        Some(self.args.remove(index))
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.args.iter().find(|a| a.key == key).map(|a| &a.value)
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            ArgValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ArgValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// A copy of the attached load reporting config, if any
    pub fn load_reporting_config(&self) -> Option<LoadReportingConfig> {
        match self.get(LOAD_REPORTING_CONFIG_ARG)? {
            ArgValue::LoadReporting(config) => Some(config.copy()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelArg> {
        self.args.iter()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LifecycleEvent;

    fn noop_config() -> LoadReportingConfig {
        LoadReportingConfig::new(|_event: &LifecycleEvent<'_>| {})
    }

    #[test]
    fn test_to_channel_arg_copies_handle() {
        let config = noop_config();
        let arg = config.to_channel_arg();

        assert_eq!(arg.key, LOAD_REPORTING_CONFIG_ARG);
        assert_eq!(config.ref_count(), 2);

        drop(arg);
        assert_eq!(config.ref_count(), 1);
    }

    #[test]
    fn test_args_clone_and_drop_track_refs() {
        let config = noop_config();
        let args = ChannelArgs::new().with(config.to_channel_arg());
        assert_eq!(config.ref_count(), 2);

        let cloned = args.clone();
        assert_eq!(config.ref_count(), 3);

        drop(args);
        drop(cloned);
        assert_eq!(config.ref_count(), 1);
    }

    #[test]
    fn test_load_reporting_config_lookup() {
        let config = noop_config();
        let args = ChannelArgs::new()
            .with(ChannelArg::integer("grpc.max_message_length", 4096))
            .with(config.to_channel_arg());

        let found = args.load_reporting_config().unwrap();
        assert!(LoadReportingConfig::ptr_eq(&found, &config));
        assert_eq!(config.ref_count(), 3);
    }

    #[test]
    fn test_load_reporting_config_absent() {
        let args = ChannelArgs::new().with(ChannelArg::string("grpc.primary_user_agent", "test"));
        assert!(args.load_reporting_config().is_none());
    }

    #[test]
    fn test_load_reporting_key_with_wrong_type() {
        let args = ChannelArgs::new().with(ChannelArg::integer(LOAD_REPORTING_CONFIG_ARG, 1));
        assert!(args.load_reporting_config().is_none());
    }

    #[test]
    fn test_set_replaces_same_key() {
        let mut args = ChannelArgs::new()
            .with(ChannelArg::integer("a", 1))
            .with(ChannelArg::string("b", "x"));
        args.set(ChannelArg::integer("a", 2));

        assert_eq!(args.len(), 2);
        assert_eq!(args.get_integer("a"), Some(2));
        assert_eq!(args.get_string("b"), Some("x"));
        assert_eq!(args.get_string("a"), None);
    }

    #[test]
    fn test_remove_releases_config() {
        let config = noop_config();
        let mut args = ChannelArgs::new().with(config.to_channel_arg());

        assert!(args.remove(LOAD_REPORTING_CONFIG_ARG).is_some());
        assert!(args.is_empty());
        assert_eq!(config.ref_count(), 1);
        assert!(args.remove(LOAD_REPORTING_CONFIG_ARG).is_none());
    }
}
