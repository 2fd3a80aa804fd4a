// --- ITINERARY GENERATION ---
// One structured-output generateContent call per submitted form.

use serde_json::{Value, json};

use super::{ModelBackend, response_text};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::model::{TravelItinerary, TravelPreferences};

pub fn build_prompt(prefs: &TravelPreferences) -> String {
    let destinations = if prefs.destinations.is_empty() {
        "Best of Morocco".to_string()
    } else {
        prefs.destinations.join(", ")
    };
    format!(
        "Act as an expert Moroccan travel guide. Create a detailed {}-day travel itinerary for {} people.\n\n\
         Preferences:\n\
         - Cities/Regions: {}\n\
         - Style: {}\n\
         - Interests: {}\n\
         - Special Requests: {}\n\n\
         Provide a day-by-day breakdown including specific places, activities, and culinary suggestions.",
        prefs.duration,
        prefs.travelers,
        destinations,
        prefs.budget,
        prefs.interests.join(", "),
        prefs.notes.as_deref().unwrap_or("None"),
    )
}

pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "tripTitle": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "days": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "dayNumber": { "type": "NUMBER" },
                        "title": { "type": "STRING" },
                        "theme": { "type": "STRING" },
                        "activities": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "time": { "type": "STRING" },
                                    "description": { "type": "STRING" },
                                    "location": { "type": "STRING" }
                                }
                            }
                        },
                        "accommodation": { "type": "STRING" },
                        "meals": {
                            "type": "OBJECT",
                            "properties": {
                                "lunch": { "type": "STRING" },
                                "dinner": { "type": "STRING" }
                            }
                        }
                    }
                }
            }
        }
    })
}

pub fn build_request(prefs: &TravelPreferences) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": build_prompt(prefs) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

/// Requests an itinerary for `prefs`. Any failure (transport, refusal, empty
/// text, unparsable JSON) comes back as the same [`AppError::Generation`].
pub fn generate_travel_plan(
    backend: &dyn ModelBackend,
    config: &Config,
    prefs: &TravelPreferences,
) -> AppResult<TravelItinerary> {
    crate::log_info!(
        "[Itinerary] Requesting {}-day plan for {} traveler(s)",
        prefs.duration,
        prefs.travelers
    );

    let resp = backend
        .generate_content(&config.text_model, &build_request(prefs))
        .map_err(AppError::into_generation)?;

    let text = response_text(&resp)
        .ok_or_else(|| AppError::Generation("Failed to generate itinerary".to_string()))?;

    let itinerary = TravelItinerary::parse(&text)
        .map_err(|e| AppError::Generation(format!("invalid itinerary JSON: {}", e)))?;

    crate::log_info!(
        "[Itinerary] Received '{}' with {} day(s)",
        itinerary.trip_title,
        itinerary.days.len()
    );
    Ok(itinerary)
}
