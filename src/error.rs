//! Error types shared by every page of the planner.
//!
//! All failures travel as an [`AppError`] and reach the user through one
//! reporting path (`ui::banner`), whatever operation produced them.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("no Gemini API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("itinerary generation failed: {0}")]
    Generation(String),

    #[error("narration failed: {0}")]
    Narration(String),

    #[error("chat failed: {0}")]
    Chat(String),

    #[error("microphone unavailable: {0}")]
    Microphone(String),

    #[error("audio device error: {0}")]
    AudioDevice(String),

    #[error("live stream error: {0}")]
    Stream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Message shown in the banner. Causes stay in the session log.
    pub fn notice(&self) -> &'static str {
        match self {
            AppError::MissingApiKey => {
                "No Gemini API key found. Set GEMINI_API_KEY or pass --api-key."
            }
            AppError::Generation(_) | AppError::Request(_) | AppError::MalformedResponse(_) => {
                "We encountered an issue while consulting the spirits of travel. Please try again."
            }
            AppError::Narration(_) => "Failed to load audio summary.",
            AppError::Chat(_) => {
                "I'm having trouble connecting to the spirits of the desert. Please try again."
            }
            AppError::Microphone(_) => "Could not access microphone or connect to AI service.",
            AppError::AudioDevice(_) => "No usable audio output device was found.",
            AppError::Stream(_) => "The voice session was interrupted.",
            AppError::Config(_) | AppError::Io(_) => "Could not read or write the configuration.",
        }
    }

    /// Collapses any failure into the generic generation error.
    pub fn into_generation(self) -> AppError {
        match self {
            AppError::Generation(_) | AppError::MissingApiKey => self,
            other => AppError::Generation(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<ureq::Error> for AppError {
    fn from(err: ureq::Error) -> Self {
        AppError::Request(err.to_string())
    }
}

impl From<tungstenite::Error> for AppError {
    fn from(err: tungstenite::Error) -> Self {
        AppError::Stream(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for AppError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        AppError::AudioDevice(err.to_string())
    }
}

impl From<cpal::BuildStreamError> for AppError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AppError::AudioDevice(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for AppError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AppError::AudioDevice(err.to_string())
    }
}

impl From<hound::Error> for AppError {
    fn from(err: hound::Error) -> Self {
        AppError::Io(std::io::Error::other(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_parse_failures_share_one_generation_notice() {
        let net = AppError::Request("timeout".into()).into_generation();
        let parse = AppError::MalformedResponse("eof".into()).into_generation();
        assert!(matches!(net, AppError::Generation(_)));
        assert!(matches!(parse, AppError::Generation(_)));
        assert_eq!(net.notice(), parse.notice());
    }

    #[test]
    fn missing_key_is_not_hidden_behind_generation() {
        let err = AppError::MissingApiKey.into_generation();
        assert!(matches!(err, AppError::MissingApiKey));
    }
}
