//! Three-valued configuration flags
//!
//! ebMS3 P-Mode parameters are optional. A flag that was never configured is
//! not the same as one explicitly set to `false`: the former leaves the
//! behaviour to the implementation, the latter pins it. [`TriState`] carries
//! that distinction until the point of behavioural use, where
//! [`TriState::resolve`] applies a per-field default.

use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A boolean that may also be left undefined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    /// Explicitly enabled
    True,
    /// Explicitly disabled
    False,
    /// Never configured
    #[default]
    Undefined,
}

impl TriState {
    /// Whether an explicit value was configured
    pub fn is_defined(self) -> bool {
        !matches!(self, TriState::Undefined)
    }

    /// Resolve to a boolean, using `default` when undefined
    pub fn resolve(self, default: bool) -> bool {
        match self {
            TriState::True => true,
            TriState::False => false,
            TriState::Undefined => default,
        }
    }

    /// The configured value, if any
    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::True => Some(true),
            TriState::False => Some(false),
            TriState::Undefined => None,
        }
    }

    /// Canonical lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            TriState::True => "true",
            TriState::False => "false",
            TriState::Undefined => "undefined",
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(TriState::Undefined, TriState::from)
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(TriState::True),
            "false" => Ok(TriState::False),
            "undefined" => Ok(TriState::Undefined),
            other => Err(CoreError::invalid_argument(
                "TriState",
                format!("expected true, false or undefined, got '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defined_states() {
        assert!(TriState::True.is_defined());
        assert!(TriState::False.is_defined());
        assert!(!TriState::Undefined.is_defined());
        assert_eq!(TriState::default(), TriState::Undefined);
    }

    #[test]
    fn test_resolve_uses_default_only_when_undefined() {
        assert!(TriState::True.resolve(false));
        assert!(!TriState::False.resolve(true));
        assert!(TriState::Undefined.resolve(true));
        assert!(!TriState::Undefined.resolve(false));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(TriState::from(true), TriState::True);
        assert_eq!(TriState::from(Some(false)), TriState::False);
        assert_eq!(TriState::from(None::<bool>), TriState::Undefined);
        assert_eq!(TriState::False.as_option(), Some(false));
        assert_eq!(TriState::Undefined.as_option(), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("TRUE".parse::<TriState>(), Ok(TriState::True));
        assert_eq!(" false ".parse::<TriState>(), Ok(TriState::False));
        assert_eq!("undefined".parse::<TriState>(), Ok(TriState::Undefined));
        assert!(matches!(
            "maybe".parse::<TriState>(),
            Err(CoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TriState::Undefined).unwrap();
        assert_eq!(json, "\"undefined\"");
        let back: TriState = serde_json::from_str("\"true\"").unwrap();
        assert_eq!(back, TriState::True);
    }
}
