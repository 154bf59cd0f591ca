//! Reserved metadata keys
//!
//! Scope guards look these keys (or the keys configured in
//! `ReportingOptions`) up on client initial metadata and server trailing
//! metadata. Values stay raw `Bytes` until an event is built.

use bytes::Bytes;

/// Metadata key for initial metadata coming from clients
pub const LOAD_REPORTING_INITIAL_MD_KEY: &str = "load-reporting-initial";

/// Metadata key for trailing metadata from servers
pub const LOAD_REPORTING_TRAILING_MD_KEY: &str = "load-reporting-trailing";

/// Request or response metadata handed over by the pipeline
///
/// Keys compare ASCII case-insensitively. The first entry for a key wins.
#[derive(Debug, Clone, Default)]
pub struct MetadataMap {
    entries: Vec<(String, Bytes)>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add an entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Bytes>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Bytes> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// View a metadata value as a string
///
/// Values that are not valid UTF-8 are treated as absent.
pub fn metadata_str<'a>(key: &str, value: Option<&'a Bytes>) -> Option<&'a str> {
    let value = value?;
    match std::str::from_utf8(value) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(
                key = key,
                len = value.len(),
                error = %e,
                "Ignoring non-UTF-8 load reporting metadata"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_keys() {
        assert_eq!(LOAD_REPORTING_INITIAL_MD_KEY, "load-reporting-initial");
        assert_eq!(LOAD_REPORTING_TRAILING_MD_KEY, "load-reporting-trailing");
    }

    #[test]
    fn test_metadata_map_lookup() {
        let md = MetadataMap::new()
            .with(":path", "/svc/M")
            .with("Load-Reporting-Initial", Bytes::from_static(b"first"))
            .with(LOAD_REPORTING_INITIAL_MD_KEY, "second");

        assert_eq!(md.len(), 3);
        assert_eq!(md.get(LOAD_REPORTING_INITIAL_MD_KEY), Some(&Bytes::from_static(b"first")));
        assert_eq!(md.get(LOAD_REPORTING_TRAILING_MD_KEY), None);
        assert!(MetadataMap::new().is_empty());
    }

    #[test]
    fn test_metadata_str() {
        let value = Bytes::from_static(b"tenant=blue");
        assert_eq!(metadata_str(LOAD_REPORTING_INITIAL_MD_KEY, Some(&value)), Some("tenant=blue"));
    }

    #[test]
    fn test_metadata_str_absent() {
        assert_eq!(metadata_str(LOAD_REPORTING_INITIAL_MD_KEY, None), None);
    }

    #[test]
    fn test_metadata_str_invalid_utf8() {
        let value = Bytes::from_static(&[0xff, 0xfe, 0x00]);
        assert_eq!(metadata_str(LOAD_REPORTING_TRAILING_MD_KEY, Some(&value)), None);
    }
}
