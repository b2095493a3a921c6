//! Canned healthcare replies and keyword classification.

use care_types::Intent;

/// Keyword intents in match order. The first keyword found in the text wins.
const CATALOG: &[(Intent, &str)] = &[
    (
        Intent::Symptom,
        "I understand you're experiencing symptoms. Could you please describe them in more detail? \
This will help me provide better guidance. Remember, for accurate diagnosis, consulting a \
healthcare professional is essential.",
    ),
    (
        Intent::Appointment,
        "I can help you with scheduling an appointment. What type of specialist would you like to \
see, and what's your preferred time? I'll guide you through the booking process.",
    ),
    (
        Intent::Medication,
        "Medication adherence is crucial for effective treatment. Are you having any specific \
concerns about your medication? Remember to always consult your doctor before making any \
changes to your prescription.",
    ),
    (
        Intent::Pain,
        "I'm sorry to hear you're in pain. Could you tell me more about where it hurts and how long \
you've been experiencing this? This information is important for proper medical guidance.",
    ),
    (
        Intent::Fever,
        "I understand you have a fever. Is it accompanied by any other symptoms? Make sure to rest, \
stay hydrated, and monitor your temperature. If it's high or persistent, please seek medical \
attention.",
    ),
    (
        Intent::Emergency,
        "This sounds like a medical emergency. Please call emergency services (911) immediately. \
While waiting for help, try to stay calm and follow any first aid procedures you're aware of.",
    ),
];

/// Phrases that escalate straight to the emergency reply, checked before the catalog.
pub const EMERGENCY_PHRASES: &[&str] = &[
    "heart attack",
    "stroke",
    "severe bleeding",
    "unconscious",
    "suicide",
    "overdose",
];

pub const CONTEXT_DISCLAIMER: &str = "\n\nPlease note that I'm a healthcare assistant. \
For specific medical advice, always consult a healthcare professional.";

pub const GENERATOR_UNAVAILABLE_REPLY: &str =
    "I apologize, but I'm having trouble. Please try again later.";

pub const GENERATOR_FAILED_REPLY: &str =
    "I apologize, but I'm having trouble understanding. Could you please rephrase your question?";

const QUICK_TIPS: &[&str] = &[
    "Type 'emergency' for urgent medical help.",
    "Ask about symptoms, medications, or appointments.",
    "Use clear and specific questions.",
];

/// Classify normalized (lowercased) text. Matching is by substring.
pub fn classify(normalized: &str) -> Intent {
    if EMERGENCY_PHRASES.iter().any(|p| normalized.contains(p)) {
        return Intent::Emergency;
    }
    CATALOG
        .iter()
        .map(|(intent, _)| *intent)
        .find(|intent| intent.keyword().is_some_and(|k| normalized.contains(k)))
        .unwrap_or(Intent::Contextual)
}

/// Canned reply for a keyword intent; `None` for `Contextual`.
pub fn canned_response(intent: Intent) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|(i, _)| *i == intent)
        .map(|(_, text)| *text)
}

pub fn quick_tips() -> &'static [&'static str] {
    QUICK_TIPS
}
