//! Risk classification output of the fusion stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Traffic-light risk level for a fused observation pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Green,
    Amber,
    Red,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Green => write!(f, "green"),
            RiskLevel::Amber => write!(f, "amber"),
            RiskLevel::Red => write!(f, "red"),
        }
    }
}

/// Descriptor prefixes. The planner branches on these alone; the rest of
/// the descriptor is informational.
pub const PREFIX_POSITIVE: &str = "positive";
pub const PREFIX_NEGATIVE: &str = "negative";
pub const PREFIX_MIXED: &str = "mixed";
pub const PREFIX_UNCERTAIN: &str = "uncertain";

/// The triage engine's decision unit: which labels the channels agreed on,
/// plus the risk class. Recomputed from scratch on every evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusedState {
    /// Composite identifier, `<prefix>:<face-label>+<voice-label>`.
    pub descriptor: String,
    pub risk: RiskLevel,
}

impl FusedState {
    pub fn new(prefix: &str, face_label: &str, voice_label: &str, risk: RiskLevel) -> Self {
        Self {
            descriptor: format!("{}:{}+{}", prefix, face_label, voice_label),
            risk,
        }
    }

    /// The coarse bucket prefix (`positive`, `negative`, `mixed`,
    /// `uncertain`).
    pub fn prefix(&self) -> &str {
        self.descriptor
            .split_once(':')
            .map(|(p, _)| p)
            .unwrap_or(PREFIX_UNCERTAIN)
    }
}
