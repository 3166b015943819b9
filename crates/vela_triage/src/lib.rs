//! Fusion and risk triage.
//!
//! A pure fusion function classifies the latest pair of channel readings
//! into green/amber/red; a hysteresis gate suppresses label flicker; the
//! dispatcher debounces and rate-limits notification emission and watches
//! for sustained negative states.

pub mod arbiter;
pub mod dispatcher;
pub mod fusion;
pub mod hysteresis;
pub mod notify;

pub use arbiter::SourceArbiter;
pub use dispatcher::{DispatchReport, Dispatcher};
pub use fusion::fuse;
pub use hysteresis::{GateOutcome, HysteresisGate};
pub use notify::{NotificationCenter, NotificationEvent, NotificationGate, SustainMonitor};
