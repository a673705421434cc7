//! Collaborator interfaces (no implementations)
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: supplied by the embedding transport layer
//! - **Usage**: `ebms-pull` hands a fully built, unsigned envelope to these
//!   boundaries and treats their output opaquely
//!
//! - `WireCodec`: logical message model <-> transport payload
//! - `EnvelopeSigner`: WS-Security signing of a serialized envelope

use crate::errors::CoreError;
use crate::messages::UserMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reference to the keying material a signer should use
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyingMaterial {
    /// Alias of the key in the signer's keystore
    pub key_alias: String,
}

impl KeyingMaterial {
    /// Keying material by alias
    pub fn alias(key_alias: impl Into<String>) -> Self {
        Self {
            key_alias: key_alias.into(),
        }
    }
}

/// Converts between the logical message model and the transport payload
pub trait WireCodec: Send + Sync {
    /// Content type of the produced payload
    fn content_type(&self) -> &str;

    /// Serialize a user message
    fn to_wire(&self, message: &UserMessage) -> Result<Vec<u8>, CoreError>;

    /// Deserialize a user message
    fn from_wire(&self, payload: &[u8]) -> Result<UserMessage, CoreError>;
}

/// Signs a serialized, unsigned envelope
#[async_trait]
pub trait EnvelopeSigner: Send + Sync {
    /// Return the signed document
    async fn sign(&self, document: Vec<u8>, keying: &KeyingMaterial)
        -> Result<Vec<u8>, CoreError>;
}
