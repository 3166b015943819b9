//! Notification machinery: the debounce+rate-limit gate, the bounded
//! notification store, and the sustained-negative intervention monitor.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;
use vela_core::NotifyConfig;

/// A debounced, user-facing alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub ts: chrono::DateTime<chrono::Utc>,
    pub read: bool,
}

impl NotificationEvent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            ts: chrono::Utc::now(),
            read: false,
        }
    }
}

/// Combined debounce + rate-limit gate. All three conditions are
/// independent and all must hold:
///
/// - confidence at or above `min_conf`,
/// - label changed since the last emission OR confidence moved by at
///   least `min_delta`,
/// - at least `min_gap_ms` since the last emission.
///
/// State persists for the lifetime of the process and only advances on
/// emission.
pub struct NotificationGate {
    min_conf: f32,
    min_delta: f32,
    min_gap_ms: u64,
    last_label: Option<String>,
    last_score: f32,
    last_emitted_ms: Option<u64>,
}

impl NotificationGate {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            min_conf: config.min_conf,
            min_delta: config.min_delta,
            min_gap_ms: config.min_gap_ms,
            last_label: None,
            last_score: 0.0,
            last_emitted_ms: None,
        }
    }

    pub fn should_emit(&mut self, label: &str, score: f32, now_ms: u64) -> bool {
        if score < self.min_conf {
            return false;
        }

        let significant = match &self.last_label {
            None => true,
            Some(last) => last != label || (score - self.last_score).abs() >= self.min_delta,
        };
        if !significant {
            return false;
        }

        if let Some(last) = self.last_emitted_ms {
            if now_ms.saturating_sub(last) < self.min_gap_ms {
                return false;
            }
        }

        self.last_label = Some(label.to_string());
        self.last_score = score;
        self.last_emitted_ms = Some(now_ms);
        true
    }
}

/// Bounded notification store. Oldest entries are evicted past the cap;
/// the unread count only drops through `mark_all_read`, never by time.
pub struct NotificationCenter {
    cap: usize,
    items: VecDeque<NotificationEvent>,
}

impl NotificationCenter {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: NotificationEvent) {
        if self.items.len() == self.cap {
            self.items.pop_front();
        }
        self.items.push_back(event);
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &NotificationEvent> {
        self.items.iter()
    }
}

/// Watches for one negative label sustained beyond the window and fires a
/// one-shot "intervention recommended" signal, distinct from the
/// notification list. The window resets whenever the label changes, and
/// re-arms after each firing.
pub struct SustainMonitor {
    sustain_ms: u64,
    current_label: Option<String>,
    since_ms: u64,
}

impl SustainMonitor {
    pub fn new(sustain_ms: u64) -> Self {
        Self {
            sustain_ms,
            current_label: None,
            since_ms: 0,
        }
    }

    /// Returns true when the intervention toast should fire.
    pub fn observe(&mut self, label: &str, negative: bool, now_ms: u64) -> bool {
        if self.current_label.as_deref() != Some(label) {
            self.current_label = Some(label.to_string());
            self.since_ms = now_ms;
            return false;
        }
        if !negative {
            return false;
        }
        if now_ms.saturating_sub(self.since_ms) >= self.sustain_ms {
            // Re-arm: the window restarts so it can fire again
            self.since_ms = now_ms;
            return true;
        }
        false
    }
}
