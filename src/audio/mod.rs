//! Audio plumbing for narration and the live voice session.
//!
//! Capture runs at 16 kHz mono and playback at 24 kHz mono; device-native
//! streams are converted in `utils`.

pub mod block;
pub mod capture;
pub mod pcm;
pub mod player;
pub mod scheduler;
pub mod utils;

pub use block::BlockProcessor;
pub use capture::MicrophoneCapture;
pub use pcm::PcmBuffer;
pub use player::{AudioPlayer, PlaybackSink, PlayerHandle};
pub use scheduler::PlaybackScheduler;

/// Outbound (microphone) sample rate expected by the live model.
pub const CAPTURE_SAMPLE_RATE: u32 = 16000;

/// Inbound (model speech) sample rate.
pub const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Samples per outbound frame.
pub const CAPTURE_BLOCK_SIZE: usize = 4096;

pub const CHANNELS: u16 = 1;
