//! Process-wide companion state.
//!
//! An explicit context object rather than a module-level global: the
//! `Companion` owns the watch channel, feeds candidate updates through
//! source arbitration and the hysteresis gate, and dims the avatar after
//! an inactivity window. Readers subscribe; only this object mutates.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use vela_core::{Channel, CompanionConfig, EmotionEvent, UNKNOWN_LABEL};
use vela_triage::{GateOutcome, HysteresisGate, SourceArbiter};

/// The UI-facing singleton state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionState {
    pub label: String,
    pub score: f32,
    pub source: Channel,
    /// True after the inactivity window with no accepted updates.
    pub dimmed: bool,
    pub chat_open: bool,
    pub updated_at_ms: u64,
}

impl Default for CompanionState {
    fn default() -> Self {
        Self {
            label: UNKNOWN_LABEL.to_string(),
            score: 0.0,
            source: Channel::Fused,
            dimmed: false,
            chat_open: false,
            updated_at_ms: 0,
        }
    }
}

pub struct Companion {
    config: CompanionConfig,
    gate: HysteresisGate,
    arbiter: SourceArbiter,
    tx: watch::Sender<CompanionState>,
    rx: watch::Receiver<CompanionState>,
}

impl Companion {
    pub fn new(config: CompanionConfig) -> Self {
        let gate = HysteresisGate::new(&config);
        let arbiter = SourceArbiter::new(config.priority_window_ms);
        let (tx, rx) = watch::channel(CompanionState::default());
        Self {
            config,
            gate,
            arbiter,
            tx,
            rx,
        }
    }

    /// Record an emotion event for the next arbitration pass.
    pub fn observe(&mut self, event: EmotionEvent) {
        self.arbiter.observe(event);
    }

    /// Arbitrate the retained events and feed the winner through the
    /// hysteresis gate. Any accepted update clears the dimmed flag.
    pub fn evaluate(&mut self, now_ms: u64) -> Option<GateOutcome> {
        let winner = self.arbiter.arbitrate(now_ms)?.clone();
        let outcome = self
            .gate
            .offer(&winner.top.label, winner.top.score, now_ms);

        match outcome {
            GateOutcome::Accepted => {
                self.tx.send_modify(|state| {
                    state.label = winner.top.label.clone();
                    state.score = winner.top.score;
                    state.source = winner.source;
                    state.dimmed = false;
                    state.updated_at_ms = now_ms;
                });
            }
            GateOutcome::Refreshed => {
                self.tx.send_modify(|state| {
                    state.updated_at_ms = now_ms;
                });
            }
            GateOutcome::Rejected => {}
        }
        Some(outcome)
    }

    /// Inactivity check; call from the periodic tick. Dimming is cleared
    /// only by an accepted update.
    pub fn tick(&mut self, now_ms: u64) {
        let state = self.rx.borrow().clone();
        if !state.dimmed
            && now_ms.saturating_sub(state.updated_at_ms) >= self.config.dim_after_ms
        {
            tracing::debug!("companion dimmed after inactivity");
            self.tx.send_modify(|s| s.dimmed = true);
        }
    }

    pub fn set_chat_open(&mut self, open: bool) {
        self.tx.send_modify(|s| s.chat_open = open);
    }

    pub fn state(&self) -> CompanionState {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CompanionState> {
        self.rx.clone()
    }
}
