//! Channel and call identifiers
//!
//! Identifiers are allocated by the RPC pipeline and treated here as opaque,
//! stable values for the lifetime of their scope.

/// Identifier of a channel scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u64);

/// Identifier of a call scope
///
/// Never reused for a live call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(pub u64);

impl From<u64> for ChannelId {
    fn from(id: u64) -> Self {
        ChannelId(id)
    }
}

impl From<u64> for CallId {
    fn from(id: u64) -> Self {
        CallId(id)
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "channel-{}", self.0)
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "call-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u64() {
        assert_eq!(ChannelId::from(7u64), ChannelId(7));
        assert_eq!(CallId::from(42u64), CallId(42));
    }

    #[test]
    fn test_display() {
        assert_eq!(ChannelId(3).to_string(), "channel-3");
        assert_eq!(CallId(7).to_string(), "call-7");
    }
}
