//! Multi-turn text conversation with the Atlas persona.
//!
//! A `ChatSession` is owned by whoever shows the conversation and dropped
//! with it; the model sees every successful prior exchange as context.

use serde_json::{Value, json};

use super::{ModelBackend, response_text};
use crate::error::{AppError, AppResult};
use crate::model::Role;

pub const SYSTEM_INSTRUCTION: &str = "You are a knowledgeable and friendly Moroccan travel guide named Atlas. You help tourists with information about Morocco's culture, history, food, and logistics. Keep answers concise and helpful.";

pub const EMPTY_REPLY: &str = "I apologize, I didn't catch that.";

pub struct ChatSession {
    model: String,
    system_instruction: String,
    history: Vec<(Role, String)>,
}

impl ChatSession {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            history: Vec::new(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: &str) -> Self {
        self.system_instruction = instruction.to_string();
        self
    }

    /// Number of turns the model will see as context.
    pub fn context_len(&self) -> usize {
        self.history.len()
    }

    fn build_request(&self, message: &str) -> Value {
        let mut contents: Vec<Value> = self
            .history
            .iter()
            .map(|(role, text)| {
                let role = match role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                json!({ "role": role, "parts": [{ "text": text }] })
            })
            .collect();
        contents.push(json!({ "role": "user", "parts": [{ "text": message }] }));

        json!({
            "systemInstruction": { "parts": [{ "text": self.system_instruction }] },
            "contents": contents
        })
    }

    /// Sends one user message. The exchange joins the context only if the
    /// call succeeds.
    pub fn send_message(&mut self, backend: &dyn ModelBackend, message: &str) -> AppResult<String> {
        let resp = backend
            .generate_content(&self.model, &self.build_request(message))
            .map_err(|e| AppError::Chat(e.to_string()))?;
        let reply = response_text(&resp).unwrap_or_else(|| EMPTY_REPLY.to_string());

        self.history.push((Role::User, message.to_string()));
        self.history.push((Role::Assistant, reply.clone()));
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        bodies: RefCell<Vec<Value>>,
        fail: bool,
    }

    impl ModelBackend for Recorder {
        fn generate_content(&self, _model: &str, body: &Value) -> AppResult<Value> {
            self.bodies.borrow_mut().push(body.clone());
            if self.fail {
                return Err(AppError::Request("offline".into()));
            }
            Ok(json!({ "candidates": [{ "content": { "parts": [{ "text": "Try the tanjia." }] } }] }))
        }
    }

    #[test]
    fn later_turns_carry_earlier_context() {
        let backend = Recorder { bodies: RefCell::new(Vec::new()), fail: false };
        let mut session = ChatSession::new("gemini-2.5-flash");
        session.send_message(&backend, "Food in Marrakech?").unwrap();
        session.send_message(&backend, "And dessert?").unwrap();

        let bodies = backend.bodies.borrow();
        let second = bodies[1]["contents"].as_array().unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(second[0]["parts"][0]["text"], "Food in Marrakech?");
        assert_eq!(second[1]["role"], "model");
        assert_eq!(second[2]["parts"][0]["text"], "And dessert?");
        assert!(bodies[0]["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("named Atlas"));
    }

    #[test]
    fn failed_exchange_is_not_context() {
        let backend = Recorder { bodies: RefCell::new(Vec::new()), fail: true };
        let mut session = ChatSession::new("gemini-2.5-flash");
        let err = session.send_message(&backend, "Hello").unwrap_err();
        assert!(matches!(err, AppError::Chat(_)));
        assert_eq!(session.context_len(), 0);
    }
}
