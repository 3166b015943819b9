//! Property-based tests for fusion and the gates.
//!
//! Fusion must be a pure function with the documented rule ordering; the
//! hysteresis gate must be idempotent on repeated submissions; the
//! notification gate must never emit twice inside its cooldown.

use proptest::prelude::*;
use vela_core::{
    Channel, CompanionConfig, EmotionObservation, NotifyConfig, Polarity, RiskLevel, Vocabulary,
};
use vela_triage::{fuse, GateOutcome, HysteresisGate, NotificationGate};

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("happiness".to_string()),
        Just("calm".to_string()),
        Just("focus".to_string()),
        Just("sadness".to_string()),
        Just("anger".to_string()),
        Just("stress".to_string()),
        Just("surprise".to_string()),
        Just("unknown".to_string()),
    ]
}

fn arb_obs(channel: Channel) -> impl Strategy<Value = EmotionObservation> {
    (arb_label(), 0.0f32..=1.0)
        .prop_map(move |(label, score)| EmotionObservation::new(label, score, channel, 0))
}

proptest! {
    /// Same inputs, same output: fusion holds no hidden state.
    #[test]
    fn fusion_is_pure(
        face in proptest::option::of(arb_obs(Channel::Face)),
        voice in proptest::option::of(arb_obs(Channel::Voice)),
    ) {
        let vocab = Vocabulary::default();
        let a = fuse(face.as_ref(), voice.as_ref(), &vocab, 0.7);
        let b = fuse(face.as_ref(), voice.as_ref(), &vocab, 0.7);
        prop_assert_eq!(a, b);
    }

    /// Both channels negative forces red regardless of confidence.
    #[test]
    fn both_negative_is_always_red(face_score in 0.0f32..=1.0, voice_score in 0.0f32..=1.0) {
        let vocab = Vocabulary::default();
        let face = EmotionObservation::new("sadness", face_score, Channel::Face, 0);
        let voice = EmotionObservation::new("anger", voice_score, Channel::Voice, 0);
        let fused = fuse(Some(&face), Some(&voice), &vocab, 0.7);
        prop_assert_eq!(fused.risk, RiskLevel::Red);
    }

    /// A missing channel reads as score 0.0, so single-channel input can
    /// reach neither green nor red: it is always amber.
    #[test]
    fn single_channel_is_always_amber(obs in arb_obs(Channel::Voice)) {
        let vocab = Vocabulary::default();
        let fused = fuse(None, Some(&obs), &vocab, 0.7);
        prop_assert_eq!(fused.risk, RiskLevel::Amber);
    }

    /// Green requires both labels positive.
    #[test]
    fn green_implies_both_positive(
        face in arb_obs(Channel::Face),
        voice in arb_obs(Channel::Voice),
    ) {
        let vocab = Vocabulary::default();
        let fused = fuse(Some(&face), Some(&voice), &vocab, 0.7);
        if fused.risk == RiskLevel::Green {
            prop_assert_eq!(vocab.classify(&face.label), Polarity::Positive);
            prop_assert_eq!(vocab.classify(&voice.label), Polarity::Positive);
        }
    }

    /// Submitting the same candidate twice: the second call is never an
    /// acceptance.
    #[test]
    fn hysteresis_idempotent(label in arb_label(), score in 0.0f32..=1.0) {
        let mut gate = HysteresisGate::new(&CompanionConfig::default());
        let first = gate.offer(&label, score, 0);
        let second = gate.offer(&label, score, 10);
        if first == GateOutcome::Accepted {
            prop_assert_eq!(second, GateOutcome::Refreshed);
        } else {
            prop_assert_ne!(second, GateOutcome::Accepted);
        }
    }

    /// No two emissions closer than the cooldown, whatever the inputs.
    #[test]
    fn notification_gate_respects_cooldown(
        updates in proptest::collection::vec((arb_label(), 0.0f32..=1.0, 0u64..200), 1..50)
    ) {
        let config = NotifyConfig::default();
        let mut gate = NotificationGate::new(&config);
        let mut now = 0u64;
        let mut last_emit: Option<u64> = None;
        for (label, score, dt) in updates {
            now += dt;
            if gate.should_emit(&label, score, now) {
                if let Some(prev) = last_emit {
                    prop_assert!(now - prev >= config.min_gap_ms,
                        "emitted {}ms apart, cooldown {}ms", now - prev, config.min_gap_ms);
                }
                last_emit = Some(now);
            }
        }
    }
}
