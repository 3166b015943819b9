//! Emotion label vocabulary.
//!
//! Which labels count as positive or negative is configuration, not
//! protocol: the triage rules only ever ask for a label's polarity.
//! Anything unmapped (including `"unknown"`) is neutral.

use serde::{Deserialize, Serialize};

/// Coarse polarity of a label under the current vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

/// Positive/negative set membership for the emotion categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            positive: ["happiness", "joy", "calm", "focus", "content"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            negative: ["sadness", "anger", "anxiety", "stress", "fear", "fatigue"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Vocabulary {
    pub fn classify(&self, label: &str) -> Polarity {
        if self.positive.iter().any(|l| l == label) {
            Polarity::Positive
        } else if self.negative.iter().any(|l| l == label) {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }

    pub fn is_positive(&self, label: &str) -> bool {
        self.classify(label) == Polarity::Positive
    }

    pub fn is_negative(&self, label: &str) -> bool {
        self.classify(label) == Polarity::Negative
    }

    /// All known categories in declaration order (positive first). The
    /// smoothing engine registers bars in this order, which is what makes
    /// exact-tie dominant selection deterministic.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.positive
            .iter()
            .chain(self.negative.iter())
            .map(|s| s.as_str())
    }
}
