//! Message Partition Channel registry
//!
//! A channel is an independently addressable logical mailbox that pull
//! requests target. This crate keeps the set of known channels and the keys
//! that may be created lazily on first pull.

#![forbid(unsafe_code)]

/// Channel records
pub mod channel;

/// The registry
pub mod registry;

pub use channel::{ChannelOrigin, Mpc};
pub use registry::{MpcRegistry, Resolution};
