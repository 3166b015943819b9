//! Error taxonomy for the signal boundary.
//!
//! These are recovered where they occur: a failed sampler flips to an
//! inactive placeholder mode and keeps ticking. Nothing in the
//! fusion/triage/planner/dispatcher path propagates them; missing data
//! degrades to the `"unknown"` label instead.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignalError {
    /// Camera/microphone permission denied or hardware missing.
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Inference backend failed to initialize; the channel reads as
    /// `"unknown"` until it becomes ready. Produced by model-backed
    /// sampler implementations; the synthetic generator has no model and
    /// only ever reports `DeviceUnavailable`.
    #[error("inference backend not ready: {0}")]
    ModelUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = SignalError::DeviceUnavailable("camera".to_string());
        assert!(e.to_string().contains("camera"));
        let e = SignalError::ModelUnavailable("face model".to_string());
        assert!(e.to_string().contains("not ready"));
    }
}
