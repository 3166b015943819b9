//! Shared data model for the Vela well-being core.
//!
//! Everything downstream (signals, triage, companion) speaks in these types:
//! channel observations, the emotion vocabulary, risk classifications,
//! process-start configuration, and the in-process event bus.

pub mod bus;
pub mod config;
pub mod error;
pub mod observation;
pub mod risk;
pub mod vocabulary;

pub use bus::{CommandEvent, EmotionEvent, EventBus};
pub use config::{
    CompanionConfig, NotifyConfig, SamplerConfig, SmoothingConfig, TriageConfig, VelaConfig,
};
pub use error::SignalError;
pub use observation::{Channel, EmotionObservation, TopEmotion, UNKNOWN_LABEL};
pub use risk::{FusedState, RiskLevel};
pub use vocabulary::{Polarity, Vocabulary};
