use std::time::Duration;

use serde_json::Value;

use super::{GEMINI_BASE_URL, ModelBackend};
use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Blocking REST client for `generateContent`.
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
}

fn build_agent(timeout_secs: u64) -> ureq::Agent {
    let tls = ureq::tls::TlsConfig::builder()
        .provider(ureq::tls::TlsProvider::NativeTls)
        .build();
    ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .tls_config(tls)
        .build()
        .into()
}

impl GeminiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.gemini_api_key.trim().is_empty() {
            return Err(AppError::MissingApiKey);
        }
        Ok(Self {
            agent: build_agent(config.request_timeout_secs),
            api_key: config.gemini_api_key.clone(),
        })
    }

    pub fn endpoint(model: &str) -> String {
        format!("{}/models/{}:generateContent", GEMINI_BASE_URL, model)
    }
}

impl ModelBackend for GeminiClient {
    fn generate_content(&self, model: &str, body: &Value) -> AppResult<Value> {
        crate::log_trace!("[Gemini] POST {}", Self::endpoint(model));
        let resp = self
            .agent
            .post(&Self::endpoint(model))
            .header("x-goog-api-key", self.api_key.as_str())
            .send_json(body)
            .map_err(|e| AppError::Request(format!("Gemini Error: {}", e)))?;
        let json: Value = resp
            .into_body()
            .read_json()
            .map_err(|e| AppError::MalformedResponse(e.to_string()))?;
        if let Some(err) = json.get("error") {
            return Err(AppError::Request(err.to_string()));
        }
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected_before_any_request() {
        let config = Config {
            gemini_api_key: "  ".into(),
            ..Config::default()
        };
        assert!(matches!(GeminiClient::new(&config), Err(AppError::MissingApiKey)));
    }

    #[test]
    fn endpoint_targets_generate_content() {
        assert_eq!(
            GeminiClient::endpoint("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
