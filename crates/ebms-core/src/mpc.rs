//! Message Partition Channel identifiers

use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Key of the ebMS3 default partition channel
pub const DEFAULT_MPC: &str = "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/defaultMPC";

/// Longest accepted channel key
pub const MAX_MPC_KEY_LEN: usize = 2048;

/// Whether `key` is syntactically usable as a channel key
///
/// A key is non-empty, at most [`MAX_MPC_KEY_LEN`] characters and contains no
/// whitespace or control characters.
pub fn is_valid_mpc_key(key: &str) -> bool {
    !key.is_empty()
        && key.chars().count() <= MAX_MPC_KEY_LEN
        && !key.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// Stable key of a Message Partition Channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MpcId(String);

impl MpcId {
    /// Create an identifier, rejecting syntactically invalid keys
    pub fn new(key: impl Into<String>) -> Result<Self, CoreError> {
        let key = key.into();
        if is_valid_mpc_key(&key) {
            Ok(Self(key))
        } else {
            Err(CoreError::invalid_argument(
                "MPC",
                format!("'{}' is not a valid partition channel key", key.escape_debug()),
            ))
        }
    }

    /// The ebMS3 default channel
    pub fn default_mpc() -> Self {
        Self(DEFAULT_MPC.to_string())
    }

    /// Whether this is the ebMS3 default channel
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_MPC
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MpcId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MpcId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MpcId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MpcId> for String {
    fn from(id: MpcId) -> Self {
        id.0
    }
}
