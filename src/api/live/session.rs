//! Live voice session state machine.
//!
//! `Idle -> Connecting -> Open -> Closed`, with `Disconnected` reachable from
//! any state through [`LiveSession::disconnect`]. One worker thread owns the
//! transport; the microphone callback hands it 4096-sample blocks over a
//! channel, and decoded replies go to the playback sink through the
//! scheduling cursor.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;

use super::websocket::{
    Incoming, LiveSocket, LiveTransport, build_audio_message, build_setup_message, connect_live_websocket,
    parse_server_message, set_socket_short_timeout,
};
use crate::audio::pcm::decode_base64_pcm16;
use crate::audio::{
    AudioPlayer, BlockProcessor, CAPTURE_BLOCK_SIZE, MicrophoneCapture, PLAYBACK_SAMPLE_RATE,
    PlaybackScheduler, PlaybackSink,
};
use crate::config::Config;
use crate::error::AppResult;

const SETUP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiveState {
    Idle,
    Connecting,
    Open,
    Closed,
    Disconnected,
}

/// Lifecycle notifications for the page showing the session.
#[derive(Clone, Debug, PartialEq)]
pub enum LiveEvent {
    Opened,
    /// The model finished speaking a turn.
    TurnComplete,
    Closed(Option<String>),
    Error(String),
}

struct LiveShared {
    state: Mutex<LiveState>,
    /// Microphone blocks are forwarded only while set.
    capturing: AtomicBool,
    stop: AtomicBool,
}

impl LiveShared {
    fn new(state: LiveState) -> Self {
        Self {
            state: Mutex::new(state),
            capturing: AtomicBool::new(false),
            stop: AtomicBool::new(false),
        }
    }

    fn set_state(&self, state: LiveState) {
        *self.state.lock() = state;
    }

    fn state(&self) -> LiveState {
        *self.state.lock()
    }
}

/// Capture-side entry point: regroups microphone chunks into fixed blocks
/// and queues them for the worker once the session is open.
pub struct FrameFeeder {
    shared: Arc<LiveShared>,
    processor: BlockProcessor,
    tx: Sender<Vec<f32>>,
}

impl FrameFeeder {
    fn new(shared: Arc<LiveShared>, tx: Sender<Vec<f32>>) -> Self {
        Self {
            shared,
            processor: BlockProcessor::new(CAPTURE_BLOCK_SIZE),
            tx,
        }
    }

    pub fn feed(&mut self, samples: &[f32]) {
        if !self.shared.capturing.load(Ordering::Relaxed) {
            self.processor.clear();
            return;
        }
        let tx = &self.tx;
        self.processor.push(samples, |block| {
            let _ = tx.send(block);
        });
    }
}

pub struct LiveSession {
    shared: Arc<LiveShared>,
    capture: Option<MicrophoneCapture>,
    player: Option<AudioPlayer>,
    worker: Option<JoinHandle<()>>,
    events: Option<Receiver<LiveEvent>>,
}

impl Default for LiveSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveSession {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(LiveShared::new(LiveState::Idle)),
            capture: None,
            player: None,
            worker: None,
            events: None,
        }
    }

    pub fn state(&self) -> LiveState {
        self.shared.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == LiveState::Open
    }

    /// Opens microphone, speaker and socket, then starts the worker. On any
    /// failure everything acquired so far is released and the state returns
    /// to `Idle`.
    pub fn connect(&mut self, config: &Config) -> AppResult<()> {
        if matches!(self.state(), LiveState::Connecting | LiveState::Open) {
            return Ok(());
        }
        self.disconnect();

        let shared = Arc::new(LiveShared::new(LiveState::Connecting));
        self.shared = shared.clone();
        crate::log_info!("[LiveSession] Connecting...");

        let (tx, rx) = mpsc::channel();
        let feeder = FrameFeeder::new(shared.clone(), tx);

        let (capture, player, socket) = match open_endpoints(config, feeder) {
            Ok(parts) => parts,
            Err(e) => {
                crate::log_error!("[LiveSession] Failed to connect: {}", e);
                shared.set_state(LiveState::Idle);
                return Err(e);
            }
        };

        let sink = player.handle();
        self.capture = Some(capture);
        self.player = Some(player);
        self.spawn_worker(socket, sink, build_setup_message(config), rx);
        Ok(())
    }

    /// Starts a session over an already-connected transport and sink, with
    /// the caller supplying microphone samples through the returned feeder.
    pub fn start_with<T, S>(&mut self, transport: T, sink: S, setup: Value) -> FrameFeeder
    where
        T: LiveTransport + Send + 'static,
        S: PlaybackSink + Send + 'static,
    {
        self.disconnect();
        let shared = Arc::new(LiveShared::new(LiveState::Connecting));
        self.shared = shared.clone();
        let (tx, rx) = mpsc::channel();
        self.spawn_worker(transport, sink, setup, rx);
        FrameFeeder::new(shared, tx)
    }

    fn spawn_worker<T, S>(&mut self, transport: T, sink: S, setup: Value, frames: Receiver<Vec<f32>>)
    where
        T: LiveTransport + Send + 'static,
        S: PlaybackSink + Send + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel();
        let shared = self.shared.clone();
        self.events = Some(event_rx);
        self.worker = Some(std::thread::spawn(move || {
            run_live_worker(transport, sink, setup, frames, shared, event_tx);
        }));
    }

    /// Drains pending lifecycle events without blocking.
    pub fn poll_events(&mut self) -> Vec<LiveEvent> {
        match &self.events {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Waits up to `timeout` for the next event.
    pub fn wait_event(&mut self, timeout: Duration) -> Option<LiveEvent> {
        self.events.as_ref()?.recv_timeout(timeout).ok()
    }

    /// Stops capture, the worker, the socket and playback. Safe to call in
    /// any state, any number of times.
    pub fn disconnect(&mut self) {
        self.shared.capturing.store(false, Ordering::SeqCst);
        self.shared.stop.store(true, Ordering::SeqCst);

        if let Some(mut capture) = self.capture.take() {
            capture.stop();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        if let Some(mut player) = self.player.take() {
            player.close();
        }
        self.events = None;

        let previous = self.state();
        if previous != LiveState::Disconnected {
            self.shared.set_state(LiveState::Disconnected);
            if previous != LiveState::Idle {
                crate::log_info!("[LiveSession] Disconnected (was {:?})", previous);
            }
        }
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Opens the microphone, then the speaker, then the socket.
fn open_endpoints(
    config: &Config,
    mut feeder: FrameFeeder,
) -> AppResult<(MicrophoneCapture, AudioPlayer, LiveSocket)> {
    let capture = MicrophoneCapture::open(move |samples| feeder.feed(samples))?;
    let player = AudioPlayer::open()?;
    let mut socket = connect_live_websocket(&config.gemini_api_key)?;
    set_socket_short_timeout(&mut socket)?;
    Ok((capture, player, socket))
}

enum WorkerExit {
    Stopped,
    Closed(Option<String>),
    Failed(String),
}

fn await_setup<T: LiveTransport>(
    transport: &mut T,
    shared: &LiveShared,
    timeout: Duration,
) -> Result<(), WorkerExit> {
    let setup_start = Instant::now();
    loop {
        if shared.stop.load(Ordering::SeqCst) {
            return Err(WorkerExit::Stopped);
        }
        if setup_start.elapsed() > timeout {
            return Err(WorkerExit::Failed("Setup timeout - no response from server".into()));
        }
        match transport.receive() {
            Ok(Incoming::Text(text)) => {
                let msg = parse_server_message(&text);
                if let Some(err) = msg.error {
                    return Err(WorkerExit::Failed(format!("Setup error: {}", err)));
                }
                if msg.setup_complete {
                    return Ok(());
                }
            }
            Ok(Incoming::Idle) => std::thread::sleep(Duration::from_millis(10)),
            Ok(Incoming::Closed(reason)) => return Err(WorkerExit::Closed(reason)),
            Err(e) => return Err(WorkerExit::Failed(e.to_string())),
        }
    }
}

fn stream_loop<T: LiveTransport, S: PlaybackSink>(
    transport: &mut T,
    sink: &mut S,
    frames: &Receiver<Vec<f32>>,
    shared: &LiveShared,
    events: &Sender<LiveEvent>,
) -> WorkerExit {
    let mut scheduler = PlaybackScheduler::new();
    scheduler.reset(sink.now());
    let mut frames_sent = 0u64;

    loop {
        if shared.stop.load(Ordering::SeqCst) {
            return WorkerExit::Stopped;
        }
        let mut busy = false;

        while let Ok(block) = frames.try_recv() {
            busy = true;
            if let Err(e) = transport.send_text(build_audio_message(&block).to_string()) {
                return WorkerExit::Failed(e.to_string());
            }
            frames_sent += 1;
            if frames_sent % 50 == 0 {
                crate::log_trace!("[LiveSession] {} frames sent", frames_sent);
            }
        }

        match transport.receive() {
            Ok(Incoming::Text(text)) => {
                busy = true;
                let msg = parse_server_message(&text);
                if msg.interrupted {
                    sink.stop();
                    scheduler.reset(sink.now());
                }
                for data in &msg.audio {
                    match decode_base64_pcm16(data, PLAYBACK_SAMPLE_RATE) {
                        Ok(buffer) => {
                            let start = scheduler.schedule(sink.now(), buffer.duration_secs());
                            sink.play_at(start, &buffer);
                        }
                        Err(e) => crate::log_error!("[LiveSession] Bad audio payload: {}", e),
                    }
                }
                if msg.turn_complete {
                    let _ = events.send(LiveEvent::TurnComplete);
                }
                if let Some(err) = msg.error {
                    return WorkerExit::Failed(err);
                }
            }
            Ok(Incoming::Idle) => {}
            Ok(Incoming::Closed(reason)) => return WorkerExit::Closed(reason),
            Err(e) => return WorkerExit::Failed(e.to_string()),
        }

        if !busy {
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

fn run_live_worker<T: LiveTransport, S: PlaybackSink>(
    mut transport: T,
    mut sink: S,
    setup: Value,
    frames: Receiver<Vec<f32>>,
    shared: Arc<LiveShared>,
    events: Sender<LiveEvent>,
) {
    let exit = match transport.send_text(setup.to_string()) {
        Err(e) => WorkerExit::Failed(format!("Setup failed: {}", e)),
        Ok(()) => match await_setup(&mut transport, &shared, SETUP_TIMEOUT) {
            Err(exit) => exit,
            Ok(()) => {
                shared.set_state(LiveState::Open);
                shared.capturing.store(true, Ordering::SeqCst);
                crate::log_info!("[LiveSession] Setup complete, streaming audio");
                let _ = events.send(LiveEvent::Opened);
                stream_loop(&mut transport, &mut sink, &frames, &shared, &events)
            }
        },
    };

    shared.capturing.store(false, Ordering::SeqCst);
    transport.close();

    match exit {
        WorkerExit::Stopped => {}
        WorkerExit::Closed(reason) => {
            crate::log_info!("[LiveSession] Closed by server: {}", reason.as_deref().unwrap_or("no frame"));
            shared.set_state(LiveState::Closed);
            let _ = events.send(LiveEvent::Closed(reason));
        }
        WorkerExit::Failed(err) => {
            crate::log_error!("[LiveSession] Stream error: {}", err);
            shared.set_state(LiveState::Closed);
            let _ = events.send(LiveEvent::Error(err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnect_without_connect_is_harmless() {
        let mut session = LiveSession::new();
        assert_eq!(session.state(), LiveState::Idle);
        session.disconnect();
        session.disconnect();
        assert_eq!(session.state(), LiveState::Disconnected);
        assert!(session.poll_events().is_empty());
    }

    #[test]
    fn feeder_drops_audio_until_open() {
        let shared = Arc::new(LiveShared::new(LiveState::Connecting));
        let (tx, rx) = mpsc::channel();
        let mut feeder = FrameFeeder::new(shared.clone(), tx);

        feeder.feed(&[0.1; 5000]);
        assert!(rx.try_recv().is_err());

        shared.capturing.store(true, Ordering::SeqCst);
        feeder.feed(&[0.1; 5000]);
        let block = rx.try_recv().unwrap();
        assert_eq!(block.len(), CAPTURE_BLOCK_SIZE);
        assert!(rx.try_recv().is_err());
    }

    struct Chatter;

    impl LiveTransport for Chatter {
        fn send_text(&mut self, _text: String) -> AppResult<()> {
            Ok(())
        }
        fn receive(&mut self) -> AppResult<Incoming> {
            Ok(Incoming::Text(r#"{"serverContent":{}}"#.to_string()))
        }
        fn close(&mut self) {}
    }

    #[test]
    fn setup_times_out_even_while_server_keeps_talking() {
        let shared = LiveShared::new(LiveState::Connecting);
        let started = Instant::now();
        let exit = await_setup(&mut Chatter, &shared, Duration::from_millis(50));
        assert!(matches!(exit, Err(WorkerExit::Failed(ref msg)) if msg.contains("Setup timeout")));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn setup_stops_when_asked() {
        let shared = LiveShared::new(LiveState::Connecting);
        shared.stop.store(true, Ordering::SeqCst);
        let exit = await_setup(&mut Chatter, &shared, SETUP_TIMEOUT);
        assert!(matches!(exit, Err(WorkerExit::Stopped)));
    }
}
