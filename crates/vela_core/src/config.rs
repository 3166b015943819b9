//! Process-start configuration.
//!
//! Loaded once from a TOML file with defaults for every missing field,
//! then environment-variable overrides on top. Nothing reloads at runtime.

use crate::vocabulary::Vocabulary;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VelaConfig {
    pub vocabulary: Vocabulary,
    pub triage: TriageConfig,
    pub notify: NotifyConfig,
    pub companion: CompanionConfig,
    pub smoothing: SmoothingConfig,
    pub sampler: SamplerConfig,
}

impl VelaConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields. After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: VelaConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file doesn't exist, return defaults
    /// with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("VELA_MIN_CONF") {
            if let Ok(n) = v.parse() {
                self.notify.min_conf = n;
            }
        }
        if let Ok(v) = std::env::var("VELA_MIN_GAP_MS") {
            if let Ok(n) = v.parse() {
                self.notify.min_gap_ms = n;
            }
        }
        if let Ok(v) = std::env::var("VELA_HOLD_MS") {
            if let Ok(n) = v.parse() {
                self.smoothing.hold_ms = n;
            }
        }
        if let Ok(v) = std::env::var("VELA_TICK_MS") {
            if let Ok(n) = v.parse() {
                self.smoothing.tick_ms = n;
            }
        }
        if let Ok(v) = std::env::var("VELA_SAMPLE_INTERVAL_MS") {
            if let Ok(n) = v.parse() {
                self.sampler.interval_ms = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Both channels must exceed this confidence for a single negative
    /// label to force red on its own.
    pub high_conf: f32,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self { high_conf: 0.7 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Minimum confidence before an observation is notification-worthy.
    pub min_conf: f32,
    /// Minimum confidence delta when the label hasn't changed.
    pub min_delta: f32,
    /// Cooldown between emissions.
    pub min_gap_ms: u64,
    /// Stored notification cap; oldest dropped beyond this.
    pub cap: usize,
    /// Window for the sustained-negative intervention toast.
    pub sustain_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            min_conf: 0.6,
            min_delta: 0.15,
            min_gap_ms: 3000,
            cap: 50,
            sustain_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Hysteresis: minimum score to accept a label change.
    pub accept_new_label: f32,
    /// Hysteresis: minimum score delta to accept a same-label update.
    pub accept_same_delta: f32,
    /// Freshness window for source arbitration (fused > face > voice).
    pub priority_window_ms: u64,
    /// Inactivity window before the avatar dims.
    pub dim_after_ms: u64,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            accept_new_label: 0.22,
            accept_same_delta: 0.06,
            priority_window_ms: 800,
            dim_after_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Fraction of the remaining gap covered per tick.
    pub alpha: f32,
    /// Snap-to-target threshold.
    pub epsilon: f32,
    /// Smoothing tick interval.
    pub tick_ms: u64,
    /// Minimum time between announced dominant-category switches.
    pub hold_ms: u64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.08,
            epsilon: 0.1,
            tick_ms: 50,
            hold_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Inference tick interval for the model-driven channels.
    pub interval_ms: u64,
    /// Pattern strength increment per tick until saturated.
    pub ramp_increment: f32,
    /// Dwell range (in ticks) before the pattern switches.
    pub dwell_min_ticks: u32,
    pub dwell_max_ticks: u32,
    /// Amplitude of the idle jitter applied to bar targets.
    pub idle_jitter: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            ramp_increment: 0.02,
            dwell_min_ticks: 120,
            dwell_max_ticks: 180,
            idle_jitter: 1.5,
        }
    }
}
