//! Smoothing and target-tracking bars.
//!
//! Each known category owns a bar whose `current` value chases a `target`
//! by a bounded fraction per tick. On top of the bars sits the dominant
//! tracker: the publicly announced category only switches after a minimum
//! hold time, which stops rapid relabeling when two categories are
//! near-tied. Exact ties resolve to the earliest-registered category.

use serde::{Deserialize, Serialize};
use vela_core::SmoothingConfig;

/// Per-category tracked intensity. Both values live in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothedBar {
    pub current: f32,
    pub target: f32,
}

impl Default for SmoothedBar {
    fn default() -> Self {
        Self {
            current: 0.0,
            target: 0.0,
        }
    }
}

impl SmoothedBar {
    /// Move `current` toward `target` by `alpha` of the remaining gap,
    /// snapping when the gap is below `epsilon`. Never overshoots.
    fn tick(&mut self, alpha: f32, epsilon: f32) {
        let delta = self.target - self.current;
        if delta.abs() < epsilon {
            self.current = self.target;
        } else {
            self.current += delta * alpha;
        }
        self.current = self.current.clamp(0.0, 100.0);
    }
}

/// The announced dominant category after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Dominant {
    pub label: String,
    /// Announced confidence in [0, 1]. Republished every tick even when
    /// the label is held.
    pub score: f32,
    /// True when this tick switched the announced label.
    pub switched: bool,
}

/// The full bar set plus dominant-category hold logic.
pub struct EmotionBars {
    // Insertion order doubles as the deterministic tie-break order.
    bars: Vec<(String, SmoothedBar)>,
    config: SmoothingConfig,
    announced: Option<String>,
    last_switch_ms: u64,
}

impl EmotionBars {
    pub fn new<I, S>(categories: I, config: SmoothingConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let bars = categories
            .into_iter()
            .map(|c| (c.into(), SmoothedBar::default()))
            .collect();
        Self {
            bars,
            config,
            announced: None,
            last_switch_ms: 0,
        }
    }

    /// Clamp and store a target. Unknown categories are ignored; the bar
    /// set is fixed at start.
    pub fn set_target(&mut self, category: &str, value: f32) {
        match self.bars.iter_mut().find(|(c, _)| c == category) {
            Some((_, bar)) => bar.target = value.clamp(0.0, 100.0),
            None => tracing::trace!(category, "target for unregistered category dropped"),
        }
    }

    /// Additive nudge used by the idle jitter.
    pub fn nudge_target(&mut self, category: &str, delta: f32) {
        if let Some((_, bar)) = self.bars.iter_mut().find(|(c, _)| c == category) {
            bar.target = (bar.target + delta).clamp(0.0, 100.0);
        }
    }

    pub fn get(&self, category: &str) -> Option<SmoothedBar> {
        self.bars
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, b)| *b)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.bars.iter().map(|(c, _)| c.as_str())
    }

    /// One smoothing step followed by dominant re-evaluation, in that
    /// order. Returns the announced dominant, or `None` when no bars are
    /// registered.
    pub fn tick(&mut self, now_ms: u64) -> Option<Dominant> {
        for (_, bar) in &mut self.bars {
            bar.tick(self.config.alpha, self.config.epsilon);
        }

        // Strict `>` keeps the first-encountered category on exact ties.
        let (max_label, _) = self
            .bars
            .iter()
            .fold(None::<(&str, f32)>, |best, (label, bar)| match best {
                Some((_, v)) if bar.current <= v => best,
                _ => Some((label.as_str(), bar.current)),
            })?;
        let max_label = max_label.to_string();

        let switched = match &self.announced {
            None => {
                self.announced = Some(max_label.clone());
                self.last_switch_ms = now_ms;
                true
            }
            Some(current) if *current != max_label => {
                if now_ms.saturating_sub(self.last_switch_ms) >= self.config.hold_ms {
                    self.announced = Some(max_label.clone());
                    self.last_switch_ms = now_ms;
                    true
                } else {
                    false
                }
            }
            Some(_) => false,
        };

        let label = self.announced.clone()?;
        let score = self.get(&label).map(|b| b.current / 100.0).unwrap_or(0.0);
        Some(Dominant {
            label,
            score,
            switched,
        })
    }
}
