//! Voice assistant replies
//!
//! Placeholder for a speech pipeline: the reply depends only on the
//! requested language.

use serde::{Deserialize, Serialize};

/// Language used when the requested one is not supported
pub const DEFAULT_LANGUAGE: &str = "english";

/// Reply to a voice command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceResponse {
    /// Text to speak back
    pub text: String,
    /// Action the app should open
    pub action: String,
    /// Recognition confidence
    pub confidence: f64,
}

/// Languages with a reply
pub const SUPPORTED_LANGUAGES: [&str; 3] = ["swahili", "english", "kikuyu"];

/// Interpret a voice command in `language`
///
/// Unknown languages get the English reply.
pub fn process_voice_command(language: &str) -> VoiceResponse {
    let (text, confidence) = match language.trim().to_lowercase().as_str() {
        "swahili" => (
            "Umechagua ukaguzi wa magonjwa ya mazao. Tafadhali piga picha ya mmea.",
            0.92,
        ),
        "kikuyu" => (
            "Wahitire kugeria magonjwa ma mbembe. Thikira picha ya mbeu.",
            0.88,
        ),
        _ => (
            "You selected disease detection. Please take a photo of the plant.",
            0.95,
        ),
    };

    VoiceResponse {
        text: text.to_string(),
        action: "disease_detection".to_string(),
        confidence,
    }
}
