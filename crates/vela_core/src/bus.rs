//! In-process typed event bus.
//!
//! Publish/subscribe with fire-and-forget delivery: publishing never blocks
//! and never fails: if nobody is subscribed the event is simply dropped.
//! Every subscriber active at publish time receives its own copy.

use crate::observation::{Channel, TopEmotion};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A dominant-emotion report from one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionEvent {
    pub source: Channel,
    pub top: TopEmotion,
    pub ts_ms: u64,
}

/// An opaque UI command. The core forwards these without interpreting
/// their semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEvent {
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct EventBus {
    emotion_tx: broadcast::Sender<EmotionEvent>,
    command_tx: broadcast::Sender<CommandEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (emotion_tx, _) = broadcast::channel(capacity);
        let (command_tx, _) = broadcast::channel(capacity);
        Self {
            emotion_tx,
            command_tx,
        }
    }

    pub fn publish_emotion(&self, event: EmotionEvent) {
        tracing::trace!(
            source = %event.source,
            label = %event.top.label,
            score = event.top.score,
            "emotion event"
        );
        let _ = self.emotion_tx.send(event);
    }

    pub fn publish_command(&self, event: CommandEvent) {
        tracing::debug!(kind = %event.kind, "command event");
        let _ = self.command_tx.send(event);
    }

    pub fn subscribe_emotion(&self) -> broadcast::Receiver<EmotionEvent> {
        self.emotion_tx.subscribe()
    }

    pub fn subscribe_command(&self) -> broadcast::Receiver<CommandEvent> {
        self.command_tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
