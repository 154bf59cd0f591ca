//! Call completion statistics

use std::time::Duration;

/// Canonical RPC status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum StatusCode {
    #[default]
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl StatusCode {
    /// Map a numeric status to its code. Unrecognized values become `Unknown`.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => StatusCode::Ok,
            1 => StatusCode::Cancelled,
            2 => StatusCode::Unknown,
            3 => StatusCode::InvalidArgument,
            4 => StatusCode::DeadlineExceeded,
            5 => StatusCode::NotFound,
            6 => StatusCode::AlreadyExists,
            7 => StatusCode::PermissionDenied,
            8 => StatusCode::ResourceExhausted,
            9 => StatusCode::FailedPrecondition,
            10 => StatusCode::Aborted,
            11 => StatusCode::OutOfRange,
            12 => StatusCode::Unimplemented,
            13 => StatusCode::Internal,
            14 => StatusCode::Unavailable,
            15 => StatusCode::DataLoss,
            16 => StatusCode::Unauthenticated,
            _ => StatusCode::Unknown,
        }
    }

    /// Numeric value of the code
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self, self.as_i32())
    }
}

/// Statistics available once a call has fully terminated
///
/// Only ever handed to a reporter as part of a call destruction event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallFinalInfo {
    /// Final status of the call
    pub status: StatusCode,
    /// Time from call creation to completion
    pub latency: Duration,
    /// Total bytes received on the call
    pub bytes_received: u64,
    /// Total bytes sent on the call
    pub bytes_sent: u64,
    /// Number of messages received
    pub messages_received: u64,
    /// Number of messages sent
    pub messages_sent: u64,
}

impl CallFinalInfo {
    /// Create final info with the given status and latency
    pub fn new(status: StatusCode, latency: Duration) -> Self {
        Self {
            status,
            latency,
            ..Default::default()
        }
    }

    /// Set byte counters
    pub fn bytes(mut self, received: u64, sent: u64) -> Self {
        self.bytes_received = received;
        self.bytes_sent = sent;
        self
    }

    /// Set message counters
    pub fn messages(mut self, received: u64, sent: u64) -> Self {
        self.messages_received = received;
        self.messages_sent = sent;
        self
    }

    /// Whether the call completed successfully
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::Ok
    }

    /// Combined throughput in bits per second, 0 for sub-millisecond calls
    ///
    /// Saturates at `u64::MAX` instead of overflowing on huge counters.
    pub fn throughput(&self) -> u64 {
        let millis = self.latency.as_millis();
        if millis > 0 {
            let bytes = self.bytes_received as u128 + self.bytes_sent as u128;
            u64::try_from(bytes * 8 * 1000 / millis).unwrap_or(u64::MAX)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_i32() {
        assert_eq!(StatusCode::from_i32(0), StatusCode::Ok);
        assert_eq!(StatusCode::from_i32(4), StatusCode::DeadlineExceeded);
        assert_eq!(StatusCode::from_i32(16), StatusCode::Unauthenticated);
        assert_eq!(StatusCode::from_i32(17), StatusCode::Unknown);
        assert_eq!(StatusCode::from_i32(-1), StatusCode::Unknown);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(StatusCode::Unavailable.to_string(), "Unavailable(14)");
    }

    #[test]
    fn test_final_info_default() {
        let info = CallFinalInfo::default();
        assert!(info.is_ok());
        assert_eq!(info.latency, Duration::ZERO);
        assert_eq!(info.bytes_received, 0);
        assert_eq!(info.messages_sent, 0);
    }

    #[test]
    fn test_final_info_builder() {
        let info = CallFinalInfo::new(StatusCode::Internal, Duration::from_millis(250))
            .bytes(1000, 500)
            .messages(2, 1);

        assert!(!info.is_ok());
        assert_eq!(info.bytes_received, 1000);
        assert_eq!(info.bytes_sent, 500);
        assert_eq!(info.messages_received, 2);
        assert_eq!(info.messages_sent, 1);
    }

    #[test]
    fn test_throughput() {
        // 1,500 bytes * 8 bits over 250ms = 48,000 bps
        let info = CallFinalInfo::new(StatusCode::Ok, Duration::from_millis(250)).bytes(1000, 500);
        assert_eq!(info.throughput(), 48_000);
    }

    #[test]
    fn test_throughput_large_counters() {
        let info =
            CallFinalInfo::new(StatusCode::Ok, Duration::from_millis(1)).bytes(u64::MAX, u64::MAX);
        assert_eq!(info.throughput(), u64::MAX);

        // 2^60 bytes * 8 bits over 1000s = 2^63 / 1000 bps
        let info = CallFinalInfo::new(StatusCode::Ok, Duration::from_secs(1000)).bytes(1 << 60, 0);
        assert_eq!(info.throughput(), (1u64 << 63) / 1000);
    }

    #[test]
    fn test_throughput_zero_latency() {
        let info = CallFinalInfo::default().bytes(1_000_000, 0);
        assert_eq!(info.throughput(), 0);
    }
}
