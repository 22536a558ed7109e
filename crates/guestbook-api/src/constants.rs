//! API constants

/// Versioned prefix for every API route
pub const API_PREFIX: &str = "/api/v0";

/// Readiness checks give up after this many seconds
pub const READINESS_TIMEOUT_SECS: u64 = 5;
