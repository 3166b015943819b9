//! Hysteresis gate: change acceptance for publicly-visible emotion state.
//!
//! Near-tied categories would otherwise flip the announced label every
//! tick. The gate requires a minimum score for a label change and a
//! minimum delta for a same-label refresh; anything below is a timestamp
//! refresh or an outright reject.

use vela_core::CompanionConfig;

/// What the gate did with a candidate update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The update replaced the announced state.
    Accepted,
    /// Same label, insignificant delta: timestamp refreshed, nothing else.
    Refreshed,
    /// Dropped (weak label change or malformed candidate).
    Rejected,
}

pub struct HysteresisGate {
    accept_new_label: f32,
    accept_same_delta: f32,
    current: Option<(String, f32)>,
    updated_at_ms: u64,
}

impl HysteresisGate {
    pub fn new(config: &CompanionConfig) -> Self {
        Self {
            accept_new_label: config.accept_new_label,
            accept_same_delta: config.accept_same_delta,
            current: None,
            updated_at_ms: 0,
        }
    }

    /// The currently announced `(label, score)`.
    pub fn current(&self) -> Option<(&str, f32)> {
        self.current.as_ref().map(|(l, s)| (l.as_str(), *s))
    }

    /// When the announced state last changed or refreshed.
    pub fn updated_at_ms(&self) -> u64 {
        self.updated_at_ms
    }

    /// Offer a candidate update.
    pub fn offer(&mut self, label: &str, score: f32, now_ms: u64) -> GateOutcome {
        // Malformed candidates are dropped silently
        if label.is_empty() || !score.is_finite() || !(0.0..=1.0).contains(&score) {
            tracing::debug!(label, score, "malformed candidate dropped");
            return GateOutcome::Rejected;
        }

        match &self.current {
            Some((cur_label, cur_score)) if cur_label == label => {
                if (score - cur_score).abs() >= self.accept_same_delta {
                    self.current = Some((label.to_string(), score));
                    self.updated_at_ms = now_ms;
                    GateOutcome::Accepted
                } else {
                    self.updated_at_ms = now_ms;
                    GateOutcome::Refreshed
                }
            }
            _ => {
                // Differing label (or first ever update)
                if score >= self.accept_new_label {
                    self.current = Some((label.to_string(), score));
                    self.updated_at_ms = now_ms;
                    GateOutcome::Accepted
                } else {
                    GateOutcome::Rejected
                }
            }
        }
    }
}
