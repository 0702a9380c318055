//! Status codes returned by generated calls.
//!
//! The numeric values are an external contract shared with every binding built
//! from the same connection layer, so they never change.

use std::fmt;

/// Status of a generated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// Call completed.
    Ok = 0,
    /// No matching response arrived in time.
    Timeout = -1,
    /// The transport could not be opened.
    TransportUnavailable = -2,
    /// Host name could not be resolved.
    InvalidHostname = -3,
    /// Connection attempt failed.
    ConnectionFailed = -4,
    /// The receive thread could not be started.
    ThreadUnavailable = -5,
    /// The device handle is not attached to a connection.
    NotAttached = -6,
}

impl Status {
    /// All statuses in code order.
    pub const ALL: [Status; 7] = [
        Status::Ok,
        Status::Timeout,
        Status::TransportUnavailable,
        Status::InvalidHostname,
        Status::ConnectionFailed,
        Status::ThreadUnavailable,
        Status::NotAttached,
    ];

    /// Numeric code.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Status for a numeric code.
    pub fn from_code(code: i32) -> Option<Status> {
        Status::ALL.iter().copied().find(|s| s.code() == code)
    }

    /// Symbolic constant name used in generated C.
    pub const fn c_name(self) -> &'static str {
        match self {
            Status::Ok => "E_OK",
            Status::Timeout => "E_TIMEOUT",
            Status::TransportUnavailable => "E_TRANSPORT_UNAVAILABLE",
            Status::InvalidHostname => "E_INVALID_HOSTNAME",
            Status::ConnectionFailed => "E_CONNECTION_FAILED",
            Status::ThreadUnavailable => "E_THREAD_UNAVAILABLE",
            Status::NotAttached => "E_NOT_ATTACHED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::Ok => "ok",
            Status::Timeout => "timeout",
            Status::TransportUnavailable => "transport unavailable",
            Status::InvalidHostname => "invalid hostname",
            Status::ConnectionFailed => "connection failed",
            Status::ThreadUnavailable => "thread unavailable",
            Status::NotAttached => "not attached",
        };
        write!(f, "{} ({})", text, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(Status::Ok.code(), 0);
        assert_eq!(Status::Timeout.code(), -1);
        assert_eq!(Status::TransportUnavailable.code(), -2);
        assert_eq!(Status::InvalidHostname.code(), -3);
        assert_eq!(Status::ConnectionFailed.code(), -4);
        assert_eq!(Status::ThreadUnavailable.code(), -5);
        assert_eq!(Status::NotAttached.code(), -6);
    }

    #[test]
    fn test_from_code() {
        for status in Status::ALL {
            assert_eq!(Status::from_code(status.code()), Some(status));
        }
        assert_eq!(Status::from_code(1), None);
        assert_eq!(Status::from_code(-7), None);
    }
}
