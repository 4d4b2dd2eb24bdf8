//! Cosmos chain identifier parsing.
//!
//! Ethermint-style chains name themselves `<name>_<eip155>-<epoch>`, for
//! example `evmos_9001-2`. The EIP-155 component is the numeric chain id that
//! goes into the EIP-712 signing domain; the epoch only tracks upgrades.
//!
//! - [`parse_chain_id`] - Parses the textual identifier into a [`ChainDomainId`]
//! - [`InvalidChainId`] - Why an identifier was rejected

use alloy_primitives::U256;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Longest accepted chain identifier, in bytes, after trimming.
pub const MAX_CHAIN_ID_LEN: usize = 48;

static CHAIN_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+)_([1-9][0-9]*)-([1-9][0-9]*)$").expect("chain-id pattern is valid")
});

/// The numeric chain id embedded in an EIP-712 domain separator.
///
/// Derived from the EIP-155 component of a textual chain identifier. The full
/// 256-bit value is kept; Ethermint nodes truncate ids above `i64::MAX`, so
/// domains for such chains differ from theirs.
///
/// # Serialization
///
/// Serializes as a decimal string: `"9001"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainDomainId(U256);

impl ChainDomainId {
    /// Wraps an already-derived numeric chain id.
    #[must_use]
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Returns the chain id as a 256-bit integer.
    #[must_use]
    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Returns the chain id as a `u64`, or `None` if it does not fit.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(self.0).ok()
    }
}

impl From<u64> for ChainDomainId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for ChainDomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a textual chain identifier cannot be parsed.
///
/// Each variant keeps the offending text for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidChainId {
    /// The trimmed identifier is longer than [`MAX_CHAIN_ID_LEN`].
    #[error("invalid chain ID: chain-id '{0}' cannot exceed {MAX_CHAIN_ID_LEN} chars")]
    TooLong(String),
    /// The identifier does not follow `<name>_<eip155>-<epoch>`.
    #[error("invalid chain ID: {text}: {captures:?}")]
    Malformed {
        /// The trimmed identifier.
        text: String,
        /// Capture groups of the partial match, if the pattern matched at all.
        captures: Option<Vec<String>>,
    },
    /// The EIP-155 component is not a base-10 integer.
    #[error("invalid chain ID: epoch {0} must be base-10 integer format")]
    NotBase10(String),
}

impl InvalidChainId {
    /// Returns the text that was rejected.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::TooLong(text) | Self::NotBase10(text) | Self::Malformed { text, .. } => text,
        }
    }
}

/// Parses a textual chain identifier into its EIP-712 domain chain id.
///
/// Surrounding whitespace is ignored. The epoch component must be well formed
/// but its value is not returned.
///
/// # Errors
///
/// Returns [`InvalidChainId`] if the identifier is too long, does not match
/// `<name>_<eip155>-<epoch>`, or carries a non-decimal EIP-155 component.
pub fn parse_chain_id(chain_id: &str) -> Result<ChainDomainId, InvalidChainId> {
    let chain_id = chain_id.trim();
    if chain_id.len() > MAX_CHAIN_ID_LEN {
        return Err(InvalidChainId::TooLong(chain_id.to_owned()));
    }

    let captures = CHAIN_ID_PATTERN.captures(chain_id);
    let Some((name, eip155)) = captures
        .as_ref()
        .and_then(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .filter(|(name, _)| !name.is_empty())
    else {
        return Err(InvalidChainId::Malformed {
            text: chain_id.to_owned(),
            captures: captures.map(|c| {
                c.iter()
                    .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
                    .collect()
            }),
        });
    };

    #[cfg(feature = "telemetry")]
    tracing::trace!(chain_name = name, eip155, "parsed chain id");
    #[cfg(not(feature = "telemetry"))]
    let _ = name;

    U256::from_str_radix(eip155, 10)
        .map(ChainDomainId)
        .map_err(|_| InvalidChainId::NotBase10(eip155.to_owned()))
}

impl FromStr for ChainDomainId {
    type Err = InvalidChainId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_chain_id(s)
    }
}

impl Serialize for ChainDomainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChainDomainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        U256::from_str_radix(&s, 10)
            .map(Self)
            .map_err(de::Error::custom)
    }
}
