//! The dispatcher: latest-pair fusion plus notification decisions.
//!
//! Consumes raw channel observations (last-write-wins per channel),
//! recomputes the fused state, publishes it on the bus, and runs the
//! notification gate and sustain monitor. Malformed input is dropped;
//! nothing here panics across the component boundary.

use crate::fusion::fuse;
use crate::notify::{NotificationCenter, NotificationEvent, NotificationGate, SustainMonitor};
use vela_core::{
    Channel, EmotionEvent, EmotionObservation, EventBus, FusedState, TopEmotion, VelaConfig,
};

/// What one ingest decided.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub fused: FusedState,
    /// A notification was emitted into the center.
    pub notified: bool,
    /// The sustained-negative intervention toast fired.
    pub intervention: bool,
}

pub struct Dispatcher {
    config: VelaConfig,
    bus: EventBus,
    gate: NotificationGate,
    center: NotificationCenter,
    sustain: SustainMonitor,
    last_face: Option<EmotionObservation>,
    last_voice: Option<EmotionObservation>,
}

impl Dispatcher {
    pub fn new(config: VelaConfig, bus: EventBus) -> Self {
        let gate = NotificationGate::new(&config.notify);
        let center = NotificationCenter::new(config.notify.cap);
        let sustain = SustainMonitor::new(config.notify.sustain_ms);
        Self {
            config,
            bus,
            gate,
            center,
            sustain,
            last_face: None,
            last_voice: None,
        }
    }

    pub fn center(&self) -> &NotificationCenter {
        &self.center
    }

    pub fn mark_all_read(&mut self) {
        self.center.mark_all_read();
    }

    /// The fused state for the current observation pair.
    pub fn current_fused(&self) -> FusedState {
        fuse(
            self.last_face.as_ref(),
            self.last_voice.as_ref(),
            &self.config.vocabulary,
            self.config.triage.high_conf,
        )
    }

    /// Ingest one channel observation and run the full decision chain.
    pub fn ingest(&mut self, obs: EmotionObservation, now_ms: u64) -> DispatchReport {
        if !obs.is_well_formed() {
            tracing::debug!(?obs, "malformed observation dropped");
            return DispatchReport {
                fused: self.current_fused(),
                notified: false,
                intervention: false,
            };
        }

        // Last-write-wins per channel; a fused-source event is output, not
        // input, and is ignored here
        match obs.channel {
            Channel::Face => self.last_face = Some(obs),
            Channel::Voice => self.last_voice = Some(obs),
            Channel::Fused => {
                tracing::trace!("fused-source observation ignored as input");
            }
        }

        let fused = self.current_fused();

        // The notification-worthiness of the pair rides on the stronger
        // channel's reading
        let top = self.top_reading();
        let (notified, intervention) = match top {
            Some((label, score)) => {
                self.bus.publish_emotion(EmotionEvent {
                    source: Channel::Fused,
                    top: TopEmotion::new(label.clone(), score),
                    ts_ms: now_ms,
                });

                let notified = if self.gate.should_emit(&label, score, now_ms) {
                    let body = format!(
                        "Detected {} at {:.0}% confidence ({} risk)",
                        label,
                        score * 100.0,
                        fused.risk
                    );
                    self.center
                        .push(NotificationEvent::new("Well-being update", body));
                    true
                } else {
                    false
                };

                let negative = self.config.vocabulary.is_negative(&label);
                let intervention = self.sustain.observe(&label, negative, now_ms);
                if intervention {
                    tracing::info!(label, "sustained negative state, intervention recommended");
                }
                (notified, intervention)
            }
            None => (false, false),
        };

        DispatchReport {
            fused,
            notified,
            intervention,
        }
    }

    /// The higher-confidence reading of the two retained channels.
    fn top_reading(&self) -> Option<(String, f32)> {
        let candidates = [self.last_face.as_ref(), self.last_voice.as_ref()];
        candidates
            .into_iter()
            .flatten()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|o| (o.label.clone(), o.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_core::RiskLevel;

    fn obs(label: &str, score: f32, channel: Channel, ts_ms: u64) -> EmotionObservation {
        EmotionObservation::new(label, score, channel, ts_ms)
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(VelaConfig::default(), EventBus::default())
    }

    #[test]
    fn test_ingest_pairs_channels() {
        let mut d = dispatcher();
        d.ingest(obs("sadness", 0.4, Channel::Face, 0), 0);
        let report = d.ingest(obs("anger", 0.4, Channel::Voice, 10), 10);
        assert_eq!(report.fused.risk, RiskLevel::Red);
    }

    #[test]
    fn test_malformed_input_dropped() {
        let mut d = dispatcher();
        d.ingest(obs("sadness", 0.9, Channel::Face, 0), 0);
        let report = d.ingest(obs("", 0.9, Channel::Voice, 10), 10);
        // Voice never landed: one negative channel, unknown other
        assert_eq!(report.fused.risk, RiskLevel::Amber);
        assert!(!report.notified);
    }

    #[test]
    fn test_notification_emitted_once_within_gap() {
        let mut d = dispatcher();
        let first = d.ingest(obs("stress", 0.8, Channel::Face, 0), 0);
        assert!(first.notified);
        assert_eq!(d.center().len(), 1);

        // Second strong reading inside the 3000ms cooldown
        let second = d.ingest(obs("anger", 0.9, Channel::Face, 500), 500);
        assert!(!second.notified);
        assert_eq!(d.center().len(), 1);
    }

    #[test]
    fn test_intervention_fires_on_sustained_negative() {
        let mut d = dispatcher();
        let mut fired = false;
        for t in (0..=6000).step_by(500) {
            let report = d.ingest(obs("sadness", 0.9, Channel::Face, t), t);
            fired |= report.intervention;
        }
        assert!(fired, "sustained sadness must trigger intervention");
    }

    #[test]
    fn test_fused_source_ignored_as_input() {
        let mut d = dispatcher();
        d.ingest(obs("sadness", 0.9, Channel::Fused, 0), 0);
        let fused = d.current_fused();
        // Neither channel was populated
        assert_eq!(fused.descriptor, "uncertain:unknown+unknown");
    }

    #[test]
    fn test_publishes_fused_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe_emotion();
        let mut d = Dispatcher::new(VelaConfig::default(), bus);
        d.ingest(obs("calm", 0.7, Channel::Voice, 0), 0);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.source, Channel::Fused);
        assert_eq!(event.top.label, "calm");
    }

    #[test]
    fn test_mark_all_read() {
        let mut d = dispatcher();
        d.ingest(obs("stress", 0.8, Channel::Face, 0), 0);
        assert_eq!(d.center().unread_count(), 1);
        d.mark_all_read();
        assert_eq!(d.center().unread_count(), 0);
    }
}
