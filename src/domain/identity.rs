//! Cluster-unique server identity.
//!
//! Every bridge instance tags outbound envelopes with its own identity and
//! discards inbound envelopes carrying that identity (self-suppression).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a bridge instance in a cluster deployment.
///
/// Generated once per process and immutable afterwards. The default
/// generator combines hostname, process id, and start time, which is
/// unique enough across a cluster; deployments that want deterministic
/// identities (or tests) can inject their own via configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerId(String);

impl ServerId {
    /// Create a server ID from an explicit string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identity: `<hostname>-<pid>-<start millis>`.
    ///
    /// Hostname comes from the `HOSTNAME` environment variable, falling
    /// back to `localhost` when unset (e.g. minimal containers).
    pub fn generate() -> Self {
        let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        Self(format!(
            "{}-{}-{}",
            hostname,
            std::process::id(),
            chrono::Utc::now().timestamp_millis()
        ))
    }

    /// Get the server ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ServerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
