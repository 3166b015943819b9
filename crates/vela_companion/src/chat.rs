//! Free-text chat responder.
//!
//! Pure pattern matching against lowercase input: a crisis-keyword
//! short-circuit that takes absolute priority over every other branch,
//! then a set of small topic tables, then a fallback keyed off the
//! current dominant emotion's polarity.

use vela_core::Polarity;

/// Fixed safety-escalation copy. Returned unconditionally whenever any
/// crisis term is present, no matter what else the message contains.
pub const CRISIS_RESPONSE: &str =
    "What you're describing sounds serious, and I want you to talk to a person about it \
     right now. I'm opening a priority channel to the flight surgeon and your ground \
     support contact. You are not alone up here.";

const CRISIS_KEYWORDS: &[&str] = &[
    "want to die",
    "kill myself",
    "end my life",
    "suicide",
    "suicidal",
    "hurt myself",
    "self harm",
    "no reason to live",
];

struct Topic {
    keywords: &'static [&'static str],
    reply: &'static str,
}

const TOPICS: &[Topic] = &[
    Topic {
        keywords: &["sleep", "insomnia", "tired", "can't rest"],
        reply: "Sleep up here is hard. Try dimming the cabin lights an hour before your \
                sleep window and running the wind-down audio. Want me to schedule it?",
    },
    Topic {
        keywords: &["water", "hydration", "thirsty", "dehydrated"],
        reply: "Fluid shift makes thirst unreliable in microgravity. Aim for your full \
                water ration today. I can ping you a reminder every two hours.",
    },
    Topic {
        keywords: &["stress", "overwhelmed", "pressure", "too much"],
        reply: "That workload sounds heavy. A two-minute breathing exercise now will pay \
                for itself, and I can flag your schedule for review.",
    },
    Topic {
        keywords: &["lonely", "alone", "miss home", "homesick", "family"],
        reply: "Distance from home is the hardest part of the mission. The next comms \
                window opens soon. Want me to queue a private call slot?",
    },
    Topic {
        keywords: &["exercise", "workout", "treadmill", "resistance"],
        reply: "Daily resistance work protects bone density. Your next session fits best \
                right after the current task block.",
    },
    Topic {
        keywords: &["breathe", "breathing", "panic"],
        reply: "Let's do it together: in for four, hold for seven, out for eight. \
                Four rounds.",
    },
];

const FALLBACK_POSITIVE: &str =
    "Glad to hear it. I'm here whenever you want to talk or run a check-in.";
const FALLBACK_NEGATIVE: &str =
    "I hear you. Tell me more, or I can suggest something small that usually helps.";
const FALLBACK_NEUTRAL: &str =
    "I'm listening. You can ask me about sleep, stress, exercise, or just talk.";

/// Respond to one chat message. `dominant` is the polarity of the current
/// announced emotion, used only for the fallback line.
pub fn respond(input: &str, dominant: Polarity) -> Vec<String> {
    let text = input.to_lowercase();

    // Crisis detection bypasses all topic matching, unconditionally
    if CRISIS_KEYWORDS.iter().any(|k| text.contains(k)) {
        tracing::warn!("crisis keyword detected in chat input");
        return vec![CRISIS_RESPONSE.to_string()];
    }

    for topic in TOPICS {
        if topic.keywords.iter().any(|k| text.contains(k)) {
            return vec![topic.reply.to_string()];
        }
    }

    let fallback = match dominant {
        Polarity::Positive => FALLBACK_POSITIVE,
        Polarity::Negative => FALLBACK_NEGATIVE,
        Polarity::Neutral => FALLBACK_NEUTRAL,
    };
    vec![fallback.to_string()]
}
