//! Prediction labels and the income bracket they stand for

use serde::{Deserialize, Serialize};
use std::fmt;

/// Income bracket predicted for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeBracket {
    /// Label 0
    #[serde(rename = "≤50K")]
    AtMost50K,
    /// Label 1
    #[serde(rename = ">50K")]
    Above50K,
}

impl IncomeBracket {
    /// Map a pipeline label to its bracket.
    ///
    /// Only label 1 means above the threshold; every other value reads as at-or-below.
    pub fn from_label(label: i64) -> Self {
        if label == 1 {
            IncomeBracket::Above50K
        } else {
            IncomeBracket::AtMost50K
        }
    }

    pub fn label(&self) -> i64 {
        match self {
            IncomeBracket::AtMost50K => 0,
            IncomeBracket::Above50K => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeBracket::AtMost50K => "≤50K",
            IncomeBracket::Above50K => ">50K",
        }
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
