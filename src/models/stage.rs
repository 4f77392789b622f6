//! Processing stage model.
//!
//! An order moves through several processing stages. Each stage needs a
//! worker holding the matching role, and each stage is planned as an
//! independent bucket.
//!
//! | Stage | Code | Order status | Required role |
//! |-------|------|--------------|---------------|
//! | Grading | `TO_GRADE` | 2 | `ROLE_NOTEUR` |
//! | Certifying | `TO_CERTIFY` | 3 | `ROLE_CERTIFICATEUR` |
//! | Preparing | `TO_PREPARE` | 4 | `ROLE_PREPARATEUR` |

use serde::{Deserialize, Serialize};
use std::fmt;

/// A processing stage a work item is currently in.
///
/// Stages have a natural order (`Grading < Certifying < Preparing`) which
/// is the order buckets are planned in. Codes that are not recognized are
/// preserved as [`Stage::Unknown`] so that input screening can report them
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    /// Cards waiting to be graded.
    Grading,
    /// Graded cards waiting to be certified and encapsulated.
    Certifying,
    /// Certified cards waiting to be prepared for shipping.
    Preparing,
    /// Unrecognized stage code.
    Unknown(String),
}

impl Stage {
    /// All schedulable stages, in planning order.
    pub const ALL: [Stage; 3] = [Stage::Grading, Stage::Certifying, Stage::Preparing];

    /// Parses a stage code (`TO_GRADE`, `TO_CERTIFY`, `TO_PREPARE`).
    ///
    /// Unrecognized codes map to [`Stage::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "TO_GRADE" => Stage::Grading,
            "TO_CERTIFY" => Stage::Certifying,
            "TO_PREPARE" => Stage::Preparing,
            other => Stage::Unknown(other.to_string()),
        }
    }

    /// Maps an upstream order status number to a stage.
    pub fn from_order_status(status: i32) -> Self {
        match status {
            2 => Stage::Grading,
            3 => Stage::Certifying,
            4 => Stage::Preparing,
            other => Stage::Unknown(other.to_string()),
        }
    }

    /// Maps a role name to the stage it qualifies for.
    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            "ROLE_NOTEUR" => Some(Stage::Grading),
            "ROLE_CERTIFICATEUR" => Some(Stage::Certifying),
            "ROLE_PREPARATEUR" => Some(Stage::Preparing),
            _ => None,
        }
    }

    /// Stage code.
    pub fn code(&self) -> &str {
        match self {
            Stage::Grading => "TO_GRADE",
            Stage::Certifying => "TO_CERTIFY",
            Stage::Preparing => "TO_PREPARE",
            Stage::Unknown(code) => code,
        }
    }

    /// Role a worker must hold to process this stage.
    pub fn required_role(&self) -> Option<&'static str> {
        match self {
            Stage::Grading => Some("ROLE_NOTEUR"),
            Stage::Certifying => Some("ROLE_CERTIFICATEUR"),
            Stage::Preparing => Some("ROLE_PREPARATEUR"),
            Stage::Unknown(_) => None,
        }
    }

    /// Whether this is a recognized, schedulable stage.
    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, Stage::Unknown(_))
    }
}

impl From<String> for Stage {
    fn from(code: String) -> Self {
        Stage::from_code(&code)
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.code().to_string()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
