//! Priority tier model.
//!
//! Orders carry a delivery-speed code. The codes form a closed set mapped
//! to a strict rank, highest urgency first:
//!
//! | Code | Tier | Rank |
//! |------|------|------|
//! | `X` | Excelsior | 5 |
//! | `F+` | Fast+ | 4 |
//! | `F` | Fast | 3 |
//! | `C` | Classic | 2 |
//! | `E` | Economy | 1 |
//! | anything else, or missing | - | 0 |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority tier of a work item.
///
/// Unknown and missing codes are kept verbatim in [`PriorityCode::Other`]
/// and always rank lowest. Parsing never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriorityCode {
    /// `X`: one-week turnaround.
    Excelsior,
    /// `F+`: two-week turnaround.
    FastPlus,
    /// `F`: four-week turnaround.
    Fast,
    /// `C`: eight-week turnaround.
    Classic,
    /// `E`: slowest tier.
    Economy,
    /// Unrecognized or missing code (empty string when missing).
    Other(String),
}

impl PriorityCode {
    /// Parses a priority code. Never fails.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "X" => PriorityCode::Excelsior,
            "F+" => PriorityCode::FastPlus,
            "F" => PriorityCode::Fast,
            "C" => PriorityCode::Classic,
            "E" => PriorityCode::Economy,
            other => PriorityCode::Other(other.to_string()),
        }
    }

    /// Urgency rank (higher = more urgent).
    pub fn rank(&self) -> u8 {
        match self {
            PriorityCode::Excelsior => 5,
            PriorityCode::FastPlus => 4,
            PriorityCode::Fast => 3,
            PriorityCode::Classic => 2,
            PriorityCode::Economy => 1,
            PriorityCode::Other(_) => 0,
        }
    }

    /// Business code.
    pub fn code(&self) -> &str {
        match self {
            PriorityCode::Excelsior => "X",
            PriorityCode::FastPlus => "F+",
            PriorityCode::Fast => "F",
            PriorityCode::Classic => "C",
            PriorityCode::Economy => "E",
            PriorityCode::Other(code) => code,
        }
    }
}

impl Default for PriorityCode {
    fn default() -> Self {
        PriorityCode::Other(String::new())
    }
}

impl From<String> for PriorityCode {
    fn from(code: String) -> Self {
        PriorityCode::from_code(&code)
    }
}

impl From<&str> for PriorityCode {
    fn from(code: &str) -> Self {
        PriorityCode::from_code(code)
    }
}

impl From<PriorityCode> for String {
    fn from(priority: PriorityCode) -> Self {
        priority.code().to_string()
    }
}

impl fmt::Display for PriorityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
