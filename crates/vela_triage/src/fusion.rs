//! Channel fusion: two noisy observations in, one risk classification out.
//!
//! A pure function of the two most recent observations: it never reads
//! its own prior output. A missing or malformed channel reads as the
//! `"unknown"` label, which is neutral: it can never trigger red on its
//! own, and it always blocks green (green requires both channels
//! positive).

use vela_core::risk::{PREFIX_MIXED, PREFIX_NEGATIVE, PREFIX_POSITIVE, PREFIX_UNCERTAIN};
use vela_core::{EmotionObservation, FusedState, Polarity, RiskLevel, Vocabulary, UNKNOWN_LABEL};

fn channel_reading(obs: Option<&EmotionObservation>) -> (&str, f32) {
    match obs {
        Some(o) if o.is_well_formed() => (o.label.as_str(), o.score),
        _ => (UNKNOWN_LABEL, 0.0),
    }
}

/// Classify the latest face/voice pair. Rules are evaluated in priority
/// order; first match wins:
///
/// 1. both labels negative → red
/// 2. either label negative AND both confidences above `high_conf` → red
/// 3. exactly one label negative → amber
/// 4. both labels positive → green
/// 5. otherwise → amber ("uncertain")
///
/// Rules 1 and 2 are two independently sufficient paths to red and must
/// both be kept: both-negative fires regardless of confidence, and a
/// single high-confidence negative fires when the other channel is also
/// confident about whatever it sees.
pub fn fuse(
    face: Option<&EmotionObservation>,
    voice: Option<&EmotionObservation>,
    vocab: &Vocabulary,
    high_conf: f32,
) -> FusedState {
    let (face_label, face_score) = channel_reading(face);
    let (voice_label, voice_score) = channel_reading(voice);

    let face_pol = vocab.classify(face_label);
    let voice_pol = vocab.classify(voice_label);
    let negatives =
        (face_pol == Polarity::Negative) as u8 + (voice_pol == Polarity::Negative) as u8;

    if negatives == 2 {
        return FusedState::new(PREFIX_NEGATIVE, face_label, voice_label, RiskLevel::Red);
    }
    if negatives >= 1 && face_score > high_conf && voice_score > high_conf {
        return FusedState::new(PREFIX_NEGATIVE, face_label, voice_label, RiskLevel::Red);
    }
    if negatives == 1 {
        return FusedState::new(PREFIX_MIXED, face_label, voice_label, RiskLevel::Amber);
    }
    if face_pol == Polarity::Positive && voice_pol == Polarity::Positive {
        return FusedState::new(PREFIX_POSITIVE, face_label, voice_label, RiskLevel::Green);
    }
    FusedState::new(PREFIX_UNCERTAIN, face_label, voice_label, RiskLevel::Amber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_core::Channel;

    fn obs(label: &str, score: f32, channel: Channel) -> EmotionObservation {
        EmotionObservation::new(label, score, channel, 0)
    }

    fn vocab() -> Vocabulary {
        Vocabulary::default()
    }

    #[test]
    fn test_both_negative_is_red_regardless_of_confidence() {
        let face = obs("sadness", 0.1, Channel::Face);
        let voice = obs("anger", 0.1, Channel::Voice);
        let fused = fuse(Some(&face), Some(&voice), &vocab(), 0.7);
        assert_eq!(fused.risk, RiskLevel::Red);
        assert_eq!(fused.prefix(), "negative");
    }

    #[test]
    fn test_single_negative_high_confidence_both_channels_is_red() {
        let face = obs("sadness", 0.8, Channel::Face);
        let voice = obs("calm", 0.75, Channel::Voice);
        let fused = fuse(Some(&face), Some(&voice), &vocab(), 0.7);
        assert_eq!(fused.risk, RiskLevel::Red);
    }

    #[test]
    fn test_single_negative_low_confidence_is_amber() {
        let face = obs("sadness", 0.5, Channel::Face);
        let voice = obs("calm", 0.9, Channel::Voice);
        let fused = fuse(Some(&face), Some(&voice), &vocab(), 0.7);
        assert_eq!(fused.risk, RiskLevel::Amber);
        assert_eq!(fused.prefix(), "mixed");
    }

    #[test]
    fn test_both_positive_is_green() {
        let face = obs("happiness", 0.9, Channel::Face);
        let voice = obs("happiness", 0.85, Channel::Voice);
        let fused = fuse(Some(&face), Some(&voice), &vocab(), 0.7);
        assert_eq!(fused.risk, RiskLevel::Green);
        assert_eq!(fused.prefix(), "positive");
    }

    #[test]
    fn test_missing_channel_blocks_green() {
        let voice = obs("calm", 0.9, Channel::Voice);
        let fused = fuse(None, Some(&voice), &vocab(), 0.7);
        assert_eq!(fused.risk, RiskLevel::Amber);
        assert_eq!(fused.prefix(), "uncertain");
        assert_eq!(fused.descriptor, "uncertain:unknown+calm");
    }

    #[test]
    fn test_missing_channel_cannot_trigger_red() {
        // One very confident negative, the other channel absent: the
        // absent channel reads as score 0.0, so the high-confidence path
        // cannot fire.
        let face = obs("anger", 0.99, Channel::Face);
        let fused = fuse(Some(&face), None, &vocab(), 0.7);
        assert_eq!(fused.risk, RiskLevel::Amber);
    }

    #[test]
    fn test_both_missing_is_uncertain_amber() {
        let fused = fuse(None, None, &vocab(), 0.7);
        assert_eq!(fused.risk, RiskLevel::Amber);
        assert_eq!(fused.prefix(), "uncertain");
    }

    #[test]
    fn test_malformed_observation_treated_as_missing() {
        let face = obs("sadness", f32::NAN, Channel::Face);
        let voice = obs("anger", 0.9, Channel::Voice);
        let fused = fuse(Some(&face), Some(&voice), &vocab(), 0.7);
        // Face degrades to unknown: one negative, not both
        assert_eq!(fused.risk, RiskLevel::Amber);
    }

    #[test]
    fn test_fusion_is_pure() {
        let face = obs("stress", 0.6, Channel::Face);
        let voice = obs("calm", 0.7, Channel::Voice);
        let a = fuse(Some(&face), Some(&voice), &vocab(), 0.7);
        let b = fuse(Some(&face), Some(&voice), &vocab(), 0.7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_neutral_labels_are_uncertain() {
        let face = obs("surprise", 0.9, Channel::Face);
        let voice = obs("surprise", 0.9, Channel::Voice);
        let fused = fuse(Some(&face), Some(&voice), &vocab(), 0.7);
        assert_eq!(fused.risk, RiskLevel::Amber);
        assert_eq!(fused.prefix(), "uncertain");
    }
}
