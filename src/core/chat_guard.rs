//! Topic restriction for the maternal health assistant.
//!
//! Messages are screened with a keyword allow-list before anything is sent
//! to the generative model. Off-topic messages get a fixed refusal.

use crate::models::{ChatMessage, ChatRole};

/// System instruction for every chat request
pub const CHAT_SYSTEM_PROMPT: &str = "You are a caring maternal health assistant. Only answer \
questions about pregnancy, prenatal and postnatal care, maternal nutrition, common pregnancy \
symptoms, newborn care and breastfeeding. Politely decline anything else. Keep answers short \
and practical. You are not a doctor: for severe pain, bleeding, reduced fetal movement, \
seizures, high fever or breathing difficulty tell the user to go to the nearest hospital \
immediately.";

/// Reply used when a message is outside the allowed topics
pub const OFF_TOPIC_REPLY: &str = "I can only help with pregnancy, maternal health, nutrition \
and newborn care. Please ask me something related to your pregnancy journey.";

/// Terms that put a message on topic by themselves. Single words match the
/// start of a word; phrases match anywhere.
const MATERNAL_TERMS: &[&str] = &[
    "pregnan", "prenatal", "antenatal", "postnatal", "postpartum", "trimester", "baby",
    "babies", "newborn", "infant", "fetus", "fetal", "foetal", "womb", "uterus", "placenta",
    "c-section", "caesarean", "cesarean", "contraction", "breastfeed", "breast milk",
    "lactation", "maternal", "maternity", "midwife", "gynec", "gynaec", "obstetric",
    "ultrasound", "due date", "miscarriage", "morning sickness", "nausea", "heartburn",
    "spotting", "folic", "hemoglobin", "haemoglobin", "anemia", "anaemia", "ferritin",
    "gestational", "preeclampsia", "pre-eclampsia", "health score",
];

/// Short words that only count as whole words ("mum" but not "mumbai")
const MATERNAL_WORDS: &[&str] = &[
    "mum", "mums", "mom", "moms", "mommy", "mummy", "mama", "mother", "mothers",
];

/// Everyday words that are on topic only within a maternal conversation
const CONTEXT_TERMS: &[&str] = &[
    "eat", "food", "meal", "diet", "nutrition", "recipe", "water", "hydration", "drink",
    "walk", "exercise", "yoga", "sleep", "tired", "fatigue", "weight", "scan", "doctor",
    "hospital", "checkup", "check-up", "vaccine", "supplement", "vitamin", "iron", "calcium",
    "protein", "bmi", "blood pressure", "blood sugar", "diabetes", "back pain", "swelling",
    "bleeding", "cramp", "kick", "labor", "labour", "delivery", "nursing", "symptom",
    "vomit", "constipation",
];

/// How a message relates to the assistant's allowed topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// Mentions pregnancy, maternal or newborn care directly
    Maternal,
    /// Only generic health or lifestyle words; on topic as a follow-up
    Context,
    OffTopic,
}

struct Tokens {
    lowered: String,
    words: Vec<String>,
}

impl Tokens {
    fn new(message: &str) -> Self {
        let lowered = message.to_lowercase();
        let words = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '-')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { lowered, words }
    }

    fn matches_any(&self, terms: &[&str]) -> bool {
        terms.iter().any(|term| {
            if term.contains(' ') {
                self.lowered.contains(term)
            } else {
                self.words.iter().any(|w| w.starts_with(term))
            }
        })
    }

    fn has_word(&self, words: &[&str]) -> bool {
        self.words.iter().any(|w| words.contains(&w.as_str()))
    }
}

/// Classify a message against the topic lists
pub fn topic_of(message: &str) -> Topic {
    let tokens = Tokens::new(message);

    if tokens.matches_any(MATERNAL_TERMS) || tokens.has_word(MATERNAL_WORDS) {
        Topic::Maternal
    } else if tokens.matches_any(CONTEXT_TERMS) {
        Topic::Context
    } else {
        Topic::OffTopic
    }
}

/// Whether a message is on topic without any conversation context.
///
/// Generic words such as "water" or "walk" are not enough on their own:
/// "How do I water my cactus?" is refused.
pub fn is_on_topic(message: &str) -> bool {
    topic_of(message) == Topic::Maternal
}

/// Whether a conversation already established a maternal topic, so that a
/// follow-up built from generic words can be answered
pub fn continues_maternal_topic(history: &[ChatMessage]) -> bool {
    history
        .iter()
        .any(|m| m.role == ChatRole::User && is_on_topic(&m.content))
}

/// Why a message was rejected before reaching the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRejection {
    Empty,
    TooLong { max: usize },
}

impl std::fmt::Display for MessageRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRejection::Empty => write!(f, "message must not be empty"),
            MessageRejection::TooLong { max } => {
                write!(f, "message must be at most {} characters", max)
            }
        }
    }
}

/// Trim a message and enforce the length limit
pub fn normalize_message(message: &str, max_chars: usize) -> Result<&str, MessageRejection> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(MessageRejection::Empty);
    }
    if trimmed.chars().count() > max_chars {
        return Err(MessageRejection::TooLong { max: max_chars });
    }
    Ok(trimmed)
}
