//! Affect observations flowing out of the signal channels.
//!
//! An observation is immutable: created on a sampler tick, consumed once by
//! the fusion stage, never persisted. Consumers drop malformed readings
//! instead of raising.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The label every consumer substitutes for a missing or malformed channel.
/// It belongs to neither the positive nor the negative vocabulary set.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Which sampler produced an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Face,
    Voice,
    Fused,
}

impl Channel {
    /// Arbitration rank: when several sources report within the freshness
    /// window, the highest rank wins (fused > face > voice).
    pub fn priority(&self) -> u8 {
        match self {
            Channel::Fused => 2,
            Channel::Face => 1,
            Channel::Voice => 0,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Face => write!(f, "face"),
            Channel::Voice => write!(f, "voice"),
            Channel::Fused => write!(f, "fused"),
        }
    }
}

/// A single channel's affect reading at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionObservation {
    /// Emotion category. The vocabulary is configuration, not protocol.
    pub label: String,

    /// Confidence in [0.0, 1.0].
    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub score: f32,

    /// Producing sampler.
    pub channel: Channel,

    /// Monotonic capture time in milliseconds.
    pub ts_ms: u64,
}

impl EmotionObservation {
    pub fn new(label: impl Into<String>, score: f32, channel: Channel, ts_ms: u64) -> Self {
        Self {
            label: label.into(),
            score,
            channel,
            ts_ms,
        }
    }

    /// A reading with an empty label or a non-finite/out-of-range score is
    /// malformed and must be dropped by whoever consumes it.
    pub fn is_well_formed(&self) -> bool {
        !self.label.is_empty() && self.score.is_finite() && (0.0..=1.0).contains(&self.score)
    }
}

/// Dominant label + confidence payload carried on emotion bus events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEmotion {
    pub label: String,
    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub score: f32,
}

impl TopEmotion {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Deserialize an f32, mapping NaN/Inf/null to 0.0 so corrupt input can
/// never smuggle a non-finite value into gate arithmetic.
pub fn deserialize_safe_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0))
}
