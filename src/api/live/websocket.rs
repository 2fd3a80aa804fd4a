//! Gemini Live WebSocket: connection, wire messages, and the transport seam.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde_json::{Value, json};
use tungstenite::Message;

use crate::audio::CAPTURE_SAMPLE_RATE;
use crate::audio::pcm::encode_base64_pcm16;
use crate::config::Config;
use crate::error::{AppError, AppResult};

pub const LIVE_WS_URL: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

pub const LIVE_SYSTEM_INSTRUCTION: &str =
    "You are a helpful Moroccan travel assistant named Atlas. Speak warmly and briefly about Morocco.";

pub type LiveSocket = tungstenite::WebSocket<native_tls::TlsStream<TcpStream>>;

/// What one read from the transport produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Incoming {
    Text(String),
    /// Nothing arrived before the read timeout.
    Idle,
    /// The server closed the stream.
    Closed(Option<String>),
}

/// Bidirectional message stream to the live model.
pub trait LiveTransport {
    fn send_text(&mut self, text: String) -> AppResult<()>;
    fn receive(&mut self) -> AppResult<Incoming>;
    fn close(&mut self);
}

/// Create TLS WebSocket connection to Gemini Live API
pub fn connect_live_websocket(api_key: &str) -> AppResult<LiveSocket> {
    if api_key.trim().is_empty() {
        return Err(AppError::MissingApiKey);
    }
    let ws_url = format!("{}?key={}", LIVE_WS_URL, api_key);

    let url = url::Url::parse(&ws_url).map_err(|e| AppError::Stream(e.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| AppError::Stream("No host in URL".to_string()))?;
    let port = url.port_or_known_default().unwrap_or(443);

    crate::log_info!("[LiveSession] Resolving {}...", host);
    let addr = format!("{}:{}", host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| AppError::Stream(format!("Failed to resolve hostname: {}", host)))?;

    let tcp_stream = TcpStream::connect_timeout(&addr, Duration::from_secs(10))?;
    tcp_stream.set_read_timeout(Some(Duration::from_secs(30)))?;
    tcp_stream.set_write_timeout(Some(Duration::from_secs(30)))?;
    tcp_stream.set_nodelay(true)?;

    let connector = native_tls::TlsConnector::new().map_err(|e| AppError::Stream(e.to_string()))?;
    let tls_stream = connector
        .connect(host, tcp_stream)
        .map_err(|e| AppError::Stream(format!("TLS handshake failed: {}", e)))?;

    let (socket, _response) = tungstenite::client::client(ws_url.as_str(), tls_stream)
        .map_err(|e| AppError::Stream(format!("WebSocket handshake failed: {}", e)))?;
    crate::log_info!("[LiveSession] WebSocket connected");

    Ok(socket)
}

/// Shortens the read timeout so the worker can interleave sends and reads.
pub fn set_socket_short_timeout(socket: &mut LiveSocket) -> AppResult<()> {
    socket
        .get_mut()
        .get_mut()
        .set_read_timeout(Some(Duration::from_millis(20)))?;
    Ok(())
}

pub fn build_setup_message(config: &Config) -> Value {
    json!({
        "setup": {
            "model": format!("models/{}", config.live_model),
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": config.live_voice }
                    }
                }
            },
            "systemInstruction": {
                "parts": [{ "text": LIVE_SYSTEM_INSTRUCTION }]
            }
        }
    })
}

/// One outbound frame: the block as base64 16-bit PCM tagged with its rate.
pub fn build_audio_message(block: &[f32]) -> Value {
    json!({
        "realtimeInput": {
            "mediaChunks": [{
                "mimeType": format!("audio/pcm;rate={}", CAPTURE_SAMPLE_RATE),
                "data": encode_base64_pcm16(block)
            }]
        }
    })
}

/// The parts of a server message the session acts on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServerMessage {
    pub setup_complete: bool,
    /// Base64 audio payloads in part order.
    pub audio: Vec<String>,
    pub turn_complete: bool,
    pub interrupted: bool,
    pub error: Option<String>,
}

pub fn parse_server_message(msg: &str) -> ServerMessage {
    let mut parsed = ServerMessage::default();
    let Ok(json) = serde_json::from_str::<Value>(msg) else {
        return parsed;
    };

    parsed.setup_complete = json.get("setupComplete").is_some();
    parsed.error = json.get("error").map(|e| e.to_string());

    if let Some(server_content) = json.get("serverContent") {
        let flag = |name: &str| {
            server_content
                .get(name)
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        };
        parsed.turn_complete = flag("turnComplete") || flag("generationComplete");
        parsed.interrupted = flag("interrupted");

        if let Some(parts) = server_content
            .get("modelTurn")
            .and_then(|t| t.get("parts"))
            .and_then(|p| p.as_array())
        {
            parsed.audio = parts
                .iter()
                .filter_map(|part| part.get("inlineData"))
                .filter_map(|d| d.get("data").and_then(|d| d.as_str()))
                .map(str::to_string)
                .collect();
        }
    }
    parsed
}

impl LiveTransport for LiveSocket {
    fn send_text(&mut self, text: String) -> AppResult<()> {
        self.send(Message::text(text))?;
        Ok(())
    }

    fn receive(&mut self) -> AppResult<Incoming> {
        match self.read() {
            Ok(Message::Text(msg)) => Ok(Incoming::Text(msg.as_str().to_string())),
            Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                Ok(text) => Ok(Incoming::Text(text)),
                Err(_) => Ok(Incoming::Idle),
            },
            Ok(Message::Close(frame)) => Ok(Incoming::Closed(
                frame.map(|f| format!("code={}, reason={}", f.code, f.reason)),
            )),
            Ok(_) => Ok(Incoming::Idle),
            Err(tungstenite::Error::Io(ref e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                Ok(Incoming::Idle)
            }
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                Ok(Incoming::Closed(None))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn close(&mut self) {
        let _ = tungstenite::WebSocket::close(self, None);
        let _ = self.flush();
    }
}
