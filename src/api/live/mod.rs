//! Real-time spoken conversation over the Gemini Live WebSocket.

pub mod session;
pub mod websocket;

pub use session::{FrameFeeder, LiveEvent, LiveSession, LiveState};
pub use websocket::{
    Incoming, LiveTransport, ServerMessage, build_audio_message, build_setup_message,
    connect_live_websocket, parse_server_message,
};
