//! Source arbitration for companion updates.
//!
//! Several channels can report a dominant emotion within a short window.
//! Only one event is forwarded to the hysteresis gate: among sources fresh
//! within the window, the fixed priority order fused > face > voice wins;
//! if everything is stale, the most recent event of any source is the
//! fallback. Per source it is strictly last-write-wins; stale
//! observations are never queued.

use vela_core::EmotionEvent;

pub struct SourceArbiter {
    window_ms: u64,
    latest: Vec<EmotionEvent>,
}

impl SourceArbiter {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            latest: Vec::with_capacity(3),
        }
    }

    /// Record an event, replacing any previous one from the same source.
    pub fn observe(&mut self, event: EmotionEvent) {
        match self.latest.iter_mut().find(|e| e.source == event.source) {
            Some(slot) => *slot = event,
            None => self.latest.push(event),
        }
    }

    /// Select the single event to forward to the gate.
    pub fn arbitrate(&self, now_ms: u64) -> Option<&EmotionEvent> {
        let fresh = self
            .latest
            .iter()
            .filter(|e| now_ms.saturating_sub(e.ts_ms) <= self.window_ms)
            .max_by_key(|e| e.source.priority());
        if fresh.is_some() {
            return fresh;
        }
        // Everything stale: fall back to the most recent of any source
        self.latest.iter().max_by_key(|e| e.ts_ms)
    }
}
