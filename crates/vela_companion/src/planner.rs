//! Suggestion/response planner.
//!
//! Maps a fused state to a short, deterministic list of lines. Suggestion
//! tables are static per coarse bucket (no per-label lookup) so the
//! companion's responses stay predictable and testable.

use vela_core::risk::{PREFIX_MIXED, PREFIX_NEGATIVE, PREFIX_POSITIVE};
use vela_core::{FusedState, RiskLevel};

/// Fixed copy emitted first on every red-risk plan.
pub const ESCALATION_LINE: &str =
    "I'm reading sustained signs of distress across your signals. Let's pause here. \
     I'm recommending a check-in with the flight surgeon.";

const OPENER_POSITIVE: &str = "You're looking steady and positive. Good time to bank that energy.";
const OPENER_MIXED: &str = "Your signals are a bit mixed right now. Worth a short reset.";
const OPENER_UNCERTAIN: &str =
    "I can't get a clear read on how you're doing. Mind checking in with me?";

const NEGATIVE_SUGGESTIONS: &[&str] = &[
    "Try the 4-7-8 breathing exercise for two minutes.",
    "Step away from the console and stretch, shoulders first.",
    "Put on the calm soundscape and dim the cabin lights.",
];

const POSITIVE_SUGGESTIONS: &[&str] = &[
    "Log what's working today in your journal while it's fresh.",
    "A quick message home lands best in moments like this.",
];

const NEUTRAL_SUGGESTIONS: &[&str] = &[
    "A two-minute guided breathing session can sharpen the signal.",
    "Hydrate and take a short movement break.",
];

fn bucket_for(state: &FusedState) -> &'static [&'static str] {
    match state.prefix() {
        p if p == PREFIX_NEGATIVE || p == PREFIX_MIXED => NEGATIVE_SUGGESTIONS,
        p if p == PREFIX_POSITIVE => POSITIVE_SUGGESTIONS,
        _ => NEUTRAL_SUGGESTIONS,
    }
}

/// Build the 2–3 line response for a fused state. Red risk always leads
/// with the escalation line; empty suggestion slots are omitted rather
/// than rendered blank.
pub fn plan(state: &FusedState) -> Vec<String> {
    let suggestions = bucket_for(state);

    if state.risk == RiskLevel::Red {
        let mut turns = vec![ESCALATION_LINE.to_string()];
        if let Some(s) = suggestions.first() {
            turns.push(s.to_string());
        }
        return turns;
    }

    let opener = match state.prefix() {
        p if p == PREFIX_POSITIVE => OPENER_POSITIVE,
        p if p == PREFIX_MIXED => OPENER_MIXED,
        _ => OPENER_UNCERTAIN,
    };

    let mut turns = vec![opener.to_string()];
    turns.extend(
        suggestions
            .iter()
            .take(2)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
    );
    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_core::risk::PREFIX_UNCERTAIN;

    fn fused(prefix: &str, risk: RiskLevel) -> FusedState {
        FusedState::new(prefix, "a", "b", risk)
    }

    #[test]
    fn test_red_leads_with_escalation() {
        let turns = plan(&fused(PREFIX_NEGATIVE, RiskLevel::Red));
        assert_eq!(turns[0], ESCALATION_LINE);
        assert_eq!(turns.len(), 2);
    }

    #[test]
    fn test_red_escalation_independent_of_label() {
        let a = plan(&FusedState::new(PREFIX_NEGATIVE, "sadness", "anger", RiskLevel::Red));
        let b = plan(&FusedState::new(PREFIX_NEGATIVE, "fear", "stress", RiskLevel::Red));
        assert_eq!(a[0], b[0]);
    }

    #[test]
    fn test_green_uses_positive_opener() {
        let turns = plan(&fused(PREFIX_POSITIVE, RiskLevel::Green));
        assert_eq!(turns[0], OPENER_POSITIVE);
        assert!(turns.len() >= 2 && turns.len() <= 3);
    }

    #[test]
    fn test_mixed_amber_opener() {
        let turns = plan(&fused(PREFIX_MIXED, RiskLevel::Amber));
        assert_eq!(turns[0], OPENER_MIXED);
    }

    #[test]
    fn test_uncertain_amber_opener() {
        let turns = plan(&fused(PREFIX_UNCERTAIN, RiskLevel::Amber));
        assert_eq!(turns[0], OPENER_UNCERTAIN);
    }

    #[test]
    fn test_no_blank_lines() {
        for state in [
            fused(PREFIX_POSITIVE, RiskLevel::Green),
            fused(PREFIX_MIXED, RiskLevel::Amber),
            fused(PREFIX_NEGATIVE, RiskLevel::Red),
            fused(PREFIX_UNCERTAIN, RiskLevel::Amber),
        ] {
            for line in plan(&state) {
                assert!(!line.trim().is_empty());
            }
        }
    }

    #[test]
    fn test_plan_is_deterministic() {
        let state = fused(PREFIX_MIXED, RiskLevel::Amber);
        assert_eq!(plan(&state), plan(&state));
    }
}
