//! Text-to-Speech for the itinerary summary.
//!
//! A single `generateContent` call on the TTS model; the audio comes back as
//! one base64 payload of 24 kHz mono 16-bit PCM.

use serde_json::{Value, json};

use super::{ModelBackend, response_inline_data};
use crate::audio::pcm::decode_base64_pcm16;
use crate::audio::{PLAYBACK_SAMPLE_RATE, PcmBuffer};
use crate::config::Config;
use crate::error::{AppError, AppResult};

pub fn build_tts_request(summary: &str, voice: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": format!("Here is your travel summary: {}", summary) }] }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": voice }
                }
            }
        }
    })
}

pub fn generate_spoken_summary(
    backend: &dyn ModelBackend,
    config: &Config,
    summary: &str,
) -> AppResult<PcmBuffer> {
    crate::log_info!("[Narration] Requesting speech ({} chars)", summary.len());
    let resp = backend
        .generate_content(&config.tts_model, &build_tts_request(summary, &config.narration_voice))
        .map_err(|e| AppError::Narration(e.to_string()))?;

    let data = response_inline_data(&resp)
        .ok_or_else(|| AppError::Narration("No audio data returned".to_string()))?;
    let buffer = decode_base64_pcm16(data, PLAYBACK_SAMPLE_RATE)
        .map_err(|e| AppError::Narration(e.to_string()))?;

    crate::log_info!("[Narration] Got {:.1}s of audio", buffer.duration_secs());
    Ok(buffer)
}
