//! Companion surface.
//!
//! One process-wide truth for the avatar/chat UI: the announced dominant
//! emotion behind a watch channel, a deterministic suggestion planner,
//! and a keyword-matched chat responder with an absolute-priority crisis
//! short-circuit.

pub mod chat;
pub mod planner;
pub mod state;

pub use chat::{respond, CRISIS_RESPONSE};
pub use planner::{plan, ESCALATION_LINE};
pub use state::{Companion, CompanionState};
