//! Calls to the hosted Gemini model.
//!
//! Every REST request goes through [`ModelBackend::generate_content`], so the
//! itinerary, chat and narration code can run against a canned backend.

use serde_json::Value;

use crate::error::AppResult;

pub mod chat;
pub mod client;
pub mod itinerary;
pub mod live;
pub mod tts;

pub use chat::ChatSession;
pub use client::GeminiClient;
pub use itinerary::generate_travel_plan;
pub use tts::generate_spoken_summary;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A `generateContent` endpoint.
pub trait ModelBackend {
    /// Sends `body` to `models/{model}:generateContent` and returns the raw response.
    fn generate_content(&self, model: &str, body: &Value) -> AppResult<Value>;
}

impl<B: ModelBackend + ?Sized> ModelBackend for &B {
    fn generate_content(&self, model: &str, body: &Value) -> AppResult<Value> {
        (**self).generate_content(model, body)
    }
}

fn first_candidate_parts(resp: &Value) -> Option<&Vec<Value>> {
    resp.get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|first| first.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
}

/// Concatenated text of the first candidate, skipping thought parts.
/// `None` when the response carries no text at all.
pub fn response_text(resp: &Value) -> Option<String> {
    let parts = first_candidate_parts(resp)?;
    let text: String = parts
        .iter()
        .filter(|p| !p.get("thought").and_then(|t| t.as_bool()).unwrap_or(false))
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    (!text.is_empty()).then_some(text)
}

/// Base64 payload of the first inline-data part of the first candidate.
pub fn response_inline_data(resp: &Value) -> Option<&str> {
    first_candidate_parts(resp)?
        .iter()
        .find_map(|p| p.get("inlineData"))
        .and_then(|d| d.get("data"))
        .and_then(|d| d.as_str())
}
