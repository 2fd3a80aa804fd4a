use serde::{Deserialize, Serialize};

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_LIVE_MODEL: &str = "gemini-2.5-flash-native-audio-preview-09-2025";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub gemini_api_key: String,
    /// Model used for itinerary generation and chat.
    pub text_model: String,
    pub tts_model: String,
    pub live_model: String,
    /// Prebuilt voice for the spoken trip summary.
    pub narration_voice: String,
    /// Prebuilt voice for the live assistant.
    pub live_voice: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            live_model: DEFAULT_LIVE_MODEL.to_string(),
            narration_voice: "Fenrir".to_string(),
            live_voice: "Zephyr".to_string(),
            request_timeout_secs: 60,
        }
    }
}
