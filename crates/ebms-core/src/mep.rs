//! Message exchange patterns and their transport channel bindings

use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const NS: &str = "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/";

/// Logical message exchange pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mep {
    /// A single user message
    OneWay,
    /// A request followed by a reply
    TwoWay,
}

impl Mep {
    /// ebMS3 URI of the pattern
    pub fn uri(self) -> &'static str {
        match self {
            Mep::OneWay => "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/oneWay",
            Mep::TwoWay => "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/twoWay",
        }
    }

    /// Number of legs in the pattern
    pub fn leg_count(self) -> usize {
        match self {
            Mep::OneWay => 1,
            Mep::TwoWay => 2,
        }
    }
}

/// How the legs of a MEP map onto push and pull channel transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MepBinding {
    /// One-way, the message is pushed
    Push,
    /// One-way, the message is pulled by the receiver
    Pull,
    /// Two-way, reply on the back-channel of the request
    Sync,
    /// Two-way, both legs pushed
    PushAndPush,
    /// Two-way, request pushed then reply pulled
    PushAndPull,
    /// Two-way, request pulled then reply pushed
    PullAndPush,
}

impl MepBinding {
    /// All bindings
    pub const ALL: [MepBinding; 6] = [
        MepBinding::Push,
        MepBinding::Pull,
        MepBinding::Sync,
        MepBinding::PushAndPush,
        MepBinding::PushAndPull,
        MepBinding::PullAndPush,
    ];

    /// ebMS3 URI of the binding
    pub fn uri(self) -> String {
        format!("{NS}{}", self.local_name())
    }

    fn local_name(self) -> &'static str {
        match self {
            MepBinding::Push => "push",
            MepBinding::Pull => "pull",
            MepBinding::Sync => "sync",
            MepBinding::PushAndPush => "pushAndPush",
            MepBinding::PushAndPull => "pushAndPull",
            MepBinding::PullAndPush => "pullAndPush",
        }
    }

    /// Whether the binding may be used with the given MEP
    pub fn is_mep_compatible(self, mep: Mep) -> bool {
        match self {
            MepBinding::Push | MepBinding::Pull => mep == Mep::OneWay,
            _ => mep == Mep::TwoWay,
        }
    }

    /// The MEP this binding belongs to
    pub fn mep(self) -> Mep {
        match self {
            MepBinding::Push | MepBinding::Pull => Mep::OneWay,
            _ => Mep::TwoWay,
        }
    }

    /// Whether any leg of the binding is transferred by pulling
    pub fn has_pull_leg(self) -> bool {
        matches!(
            self,
            MepBinding::Pull | MepBinding::PushAndPull | MepBinding::PullAndPush
        )
    }
}

impl fmt::Display for MepBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

impl FromStr for MepBinding {
    type Err = CoreError;

    /// Accepts either the full ebMS3 URI or its local name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix(NS).unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|binding| binding.local_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                CoreError::invalid_argument("MEPBinding", format!("unknown binding '{s}'"))
            })
    }
}
