//! Triage priority codes and the urgency ordering between them.
//!
//! The five Italian triage colours form a total order where a lower rank means a more urgent
//! case. Anything that cannot be read as a colour ranks below every known code, so it never wins
//! a comparison against a real one.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Rank assigned to unknown or empty codes.
pub const UNKNOWN_RANK: u8 = 6;

/// Five-level triage colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityCode {
    /// Immediate threat to life.
    Rosso,
    /// Potential threat to life, very urgent.
    #[serde(alias = "arancione")]
    Arancio,
    /// Urgent, deferrable.
    Giallo,
    /// Minor urgency.
    Verde,
    /// Not urgent.
    Bianco,
}

impl PriorityCode {
    /// All codes from most to least urgent.
    pub const ALL: [PriorityCode; 5] = [
        PriorityCode::Rosso,
        PriorityCode::Arancio,
        PriorityCode::Giallo,
        PriorityCode::Verde,
        PriorityCode::Bianco,
    ];

    /// Ordinal rank, 1 (rosso) to 5 (bianco).
    pub fn rank(self) -> u8 {
        match self {
            PriorityCode::Rosso => 1,
            PriorityCode::Arancio => 2,
            PriorityCode::Giallo => 3,
            PriorityCode::Verde => 4,
            PriorityCode::Bianco => 5,
        }
    }

    /// Canonical lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            PriorityCode::Rosso => "rosso",
            PriorityCode::Arancio => "arancio",
            PriorityCode::Giallo => "giallo",
            PriorityCode::Verde => "verde",
            PriorityCode::Bianco => "bianco",
        }
    }

    /// Returns `true` if `self` is strictly more urgent than `other`.
    pub fn is_more_urgent_than(self, other: PriorityCode) -> bool {
        self.rank() < other.rank()
    }
}

impl fmt::Display for PriorityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known priority code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority code: '{0}'")]
pub struct UnknownPriorityCode(pub String);

impl FromStr for PriorityCode {
    type Err = UnknownPriorityCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rosso" => Ok(PriorityCode::Rosso),
            "arancio" | "arancione" => Ok(PriorityCode::Arancio),
            "giallo" => Ok(PriorityCode::Giallo),
            "verde" => Ok(PriorityCode::Verde),
            "bianco" => Ok(PriorityCode::Bianco),
            _ => Err(UnknownPriorityCode(s.to_string())),
        }
    }
}

/// Rank of a free-form code string; unknown or empty strings rank [`UNKNOWN_RANK`].
pub fn rank_of(code: &str) -> u8 {
    code.parse::<PriorityCode>()
        .map(PriorityCode::rank)
        .unwrap_or(UNKNOWN_RANK)
}

/// Raises `current` to `target` when `target` is more urgent; never lowers urgency.
pub fn elevate(current: PriorityCode, target: PriorityCode) -> PriorityCode {
    if target.is_more_urgent_than(current) {
        target
    } else {
        current
    }
}

/// Picks the more urgent of two optional codes.
///
/// A present code beats an absent one. On equal rank `a` is returned.
pub fn pick_more_urgent(
    a: Option<PriorityCode>,
    b: Option<PriorityCode>,
) -> Option<PriorityCode> {
    match (a, b) {
        (Some(a), Some(b)) if b.is_more_urgent_than(a) => Some(b),
        (Some(a), _) => Some(a),
        (None, b) => b,
    }
}
