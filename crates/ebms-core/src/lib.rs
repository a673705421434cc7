//! ebMS Core - protocol model of the AS4 processing core
//!
//! Pure types shared by the partition channel registry and the pull
//! arbitration engine. Nothing in this crate performs I/O.
//!
//! # Contents
//!
//! - `TriState`: true / false / undefined configuration flags
//! - `ReliabilityContract`: reliability parameters of a P-Mode leg
//! - `PMode`, `PModeLeg`: the configuration records the core reads
//! - `Mep`, `MepBinding`: exchange patterns and their channel bindings
//! - `MpcId`: Message Partition Channel keys
//! - `EbmsErrorCode`: the ebMS3 error identifiers the core can produce
//! - `effects`: signer and wire codec collaborator interfaces

#![forbid(unsafe_code)]

/// Crate error type
pub mod errors;

/// ebMS3 error codes
pub mod ebms_error;

/// Collaborator interfaces
pub mod effects;

/// Exchange patterns and bindings
pub mod mep;

/// Logical message model
pub mod messages;

/// Partition channel keys
pub mod mpc;

/// P-Mode records
pub mod pmode;

/// Reliability contracts
pub mod reliability;

/// Three-valued flags
pub mod tristate;

pub use ebms_error::{EbmsErrorCode, ErrorCategory, ErrorSeverity};
pub use effects::{EnvelopeSigner, KeyingMaterial, WireCodec};
pub use errors::{CoreError, Result};
pub use mep::{Mep, MepBinding};
pub use messages::{MessageInfo, PullRequest, UserMessage, FINAL_RECIPIENT, ORIGINAL_SENDER};
pub use mpc::{is_valid_mpc_key, MpcId, DEFAULT_MPC};
pub use pmode::{PMode, PModeLeg};
pub use reliability::{ReliabilityContract, ReplyPattern};
pub use tristate::TriState;
