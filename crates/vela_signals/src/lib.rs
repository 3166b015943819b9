//! Signal layer: samplers and smoothing.
//!
//! Samplers produce raw `EmotionObservation`s on a fixed tick; the bar
//! engine smooths their targets and tracks the dominant category with a
//! hold timer so the announced label never flickers between near-ties.

pub mod bars;
pub mod runtime;
pub mod sampler;

pub use bars::{Dominant, EmotionBars, SmoothedBar};
pub use runtime::SignalRuntime;
pub use sampler::{IdleJitter, Sampler, SamplerMode, SyntheticSampler};
