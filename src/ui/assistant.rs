//! Assistant page: typed chat plus the live voice mode.

use std::io::Write;
use std::time::Duration;

use super::banner::Reporter;
use super::input::{Line, LineInput};
use crate::api::live::{LiveEvent, LiveSession, LiveState};
use crate::api::{ChatSession, ModelBackend};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::model::{ChatMessage, Role, Transcript};

pub struct AssistantPage {
    model: String,
    transcript: Transcript,
    /// Created on the first message, dropped with the page.
    session: Option<ChatSession>,
    voice: LiveSession,
}

impl AssistantPage {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            transcript: Transcript::new(),
            session: None,
            voice: LiveSession::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Sends one typed message. Blank input does nothing and returns
    /// `Ok(false)`. On failure the apology turn is appended and the error is
    /// returned for reporting.
    pub fn send(&mut self, backend: &dyn ModelBackend, text: &str) -> AppResult<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        self.transcript.push(ChatMessage::user(text));

        let session = self
            .session
            .get_or_insert_with(|| ChatSession::new(&self.model));
        match session.send_message(backend, text) {
            Ok(reply) => {
                self.transcript.push(ChatMessage::assistant(reply));
                Ok(true)
            }
            Err(e) => {
                crate::log_error!("[Assistant] {}", e);
                self.transcript.push(ChatMessage::apology(e.notice()));
                Err(e)
            }
        }
    }

    pub fn voice_state(&self) -> LiveState {
        self.voice.state()
    }

    pub fn voice_active(&self) -> bool {
        matches!(self.voice.state(), LiveState::Connecting | LiveState::Open)
    }

    pub fn start_voice(&mut self, config: &Config) -> AppResult<()> {
        self.voice.connect(config)
    }

    pub fn stop_voice(&mut self) {
        self.voice.disconnect();
    }

    /// Handles pending live events. A stream that ends on its own is
    /// reported and its devices are released.
    pub fn pump_voice(&mut self, reporter: &mut dyn Reporter) -> Vec<LiveEvent> {
        let events = self.voice.poll_events();
        for event in &events {
            match event {
                LiveEvent::Closed(reason) => {
                    let reason = reason.clone().unwrap_or_else(|| "connection closed".to_string());
                    reporter.report(&AppError::Stream(reason));
                    self.voice.disconnect();
                }
                LiveEvent::Error(err) => {
                    reporter.report(&AppError::Stream(err.clone()));
                    self.voice.disconnect();
                }
                LiveEvent::Opened | LiveEvent::TurnComplete => {}
            }
        }
        events
    }

    /// Leaving the page ends the conversation and any voice session.
    pub fn leave(&mut self) {
        self.session = None;
        self.voice.disconnect();
    }
}

fn print_message(out: &mut impl Write, message: &ChatMessage) -> std::io::Result<()> {
    let who = match message.role {
        Role::User => "You",
        Role::Assistant => "Atlas",
    };
    let options = textwrap::Options::new(76).subsequent_indent("       ");
    let text = format!("{:>5}: {}", who, message.text);
    for line in textwrap::wrap(&text, options) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn run_voice(
    page: &mut AssistantPage,
    config: &Config,
    input: &mut dyn LineInput,
    out: &mut impl Write,
    reporter: &mut dyn Reporter,
) -> std::io::Result<()> {
    writeln!(out, "Connecting to voice mode...")?;
    if let Err(e) = page.start_voice(config) {
        reporter.report(&e);
        return Ok(());
    }

    loop {
        for event in page.pump_voice(reporter) {
            if event == LiveEvent::Opened {
                writeln!(out, "Listening. Speak now, press Enter to end voice mode.")?;
            }
        }
        if !page.voice_active() {
            break;
        }
        match input.next_line(Duration::from_millis(100)) {
            Line::Text(_) | Line::Eof => {
                page.stop_voice();
                writeln!(out, "Voice mode ended.")?;
                break;
            }
            Line::Pending => {}
        }
    }
    Ok(())
}

/// Interactive chat loop. `/voice` switches to spoken conversation and
/// `/back` leaves the page.
pub fn run_assistant(
    page: &mut AssistantPage,
    backend: &dyn ModelBackend,
    config: &Config,
    input: &mut dyn LineInput,
    out: &mut impl Write,
    reporter: &mut dyn Reporter,
) -> std::io::Result<()> {
    for message in page.transcript().messages() {
        print_message(out, message)?;
    }
    writeln!(out, "(type /voice for voice mode, /back to leave)")?;

    loop {
        write!(out, "you> ")?;
        out.flush()?;
        let Some(line) = input.read_line() else { break };
        match line.trim() {
            "/back" | "/quit" => break,
            "/voice" => run_voice(page, config, input, out, reporter)?,
            text => match page.send(backend, text) {
                Ok(true) => {
                    if let Some(reply) = page.transcript().last() {
                        print_message(out, reply)?;
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    if let Some(apology) = page.transcript().last() {
                        print_message(out, apology)?;
                    }
                    reporter.report(&e);
                }
            },
        }
    }
    page.leave();
    Ok(())
}
