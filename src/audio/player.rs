//! Output stream for decoded model audio.
//!
//! The cpal stream pulls from a shared sample queue. Its clock counts every
//! frame handed to the device, silence included, so it advances in real time
//! like a browser audio context.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;

use crate::audio::PcmBuffer;
use crate::audio::utils::resample;
use crate::error::{AppError, AppResult};

/// Somewhere decoded buffers can be scheduled.
pub trait PlaybackSink {
    /// Playback clock in seconds.
    fn now(&self) -> f64;

    /// Queues `buffer` to begin at `start` on the playback clock.
    fn play_at(&mut self, start: f64, buffer: &PcmBuffer);

    /// True while queued audio remains.
    fn is_active(&self) -> bool;

    /// Drops everything queued.
    fn stop(&mut self);
}

/// Thread-safe side of an [`AudioPlayer`]: the queue and the clock.
#[derive(Clone)]
pub struct PlayerHandle {
    queue: Arc<Mutex<VecDeque<f32>>>,
    frames_played: Arc<AtomicU64>,
    device_rate: u32,
}

impl PlayerHandle {
    pub fn new(device_rate: u32) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            frames_played: Arc::new(AtomicU64::new(0)),
            device_rate,
        }
    }

    pub fn device_rate(&self) -> u32 {
        self.device_rate
    }

    pub fn queued_samples(&self) -> usize {
        self.queue.lock().len()
    }

    /// Fills `out` from the queue, padding with silence, and advances the clock.
    fn pull(&self, out: &mut [f32], channels: usize) {
        let mut queue = self.queue.lock();
        let mut frames = 0u64;
        for frame in out.chunks_mut(channels.max(1)) {
            let sample = queue.pop_front().unwrap_or(0.0);
            frame.fill(sample);
            frames += 1;
        }
        self.frames_played.fetch_add(frames, Ordering::Relaxed);
    }

    /// Blocks until the queue is empty.
    pub fn drain(&self) {
        while self.queued_samples() > 0 {
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

impl PlaybackSink for PlayerHandle {
    fn now(&self) -> f64 {
        self.frames_played.load(Ordering::Relaxed) as f64 / self.device_rate as f64
    }

    fn play_at(&mut self, start: f64, buffer: &PcmBuffer) {
        let samples = resample(&buffer.samples, buffer.sample_rate, self.device_rate);
        let now = self.now();
        let mut queue = self.queue.lock();
        let queue_end = now + queue.len() as f64 / self.device_rate as f64;
        let lead = start - queue_end;
        if lead > 0.0 {
            let pad = (lead * self.device_rate as f64).round() as usize;
            queue.extend(std::iter::repeat_n(0.0, pad));
        }
        queue.extend(samples);
    }

    fn is_active(&self) -> bool {
        self.queued_samples() > 0
    }

    fn stop(&mut self) {
        self.queue.lock().clear();
    }
}

/// Default output device plus its queue.
pub struct AudioPlayer {
    stream: Option<cpal::Stream>,
    handle: PlayerHandle,
}

impl AudioPlayer {
    pub fn open() -> AppResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AppError::AudioDevice("no output device".to_string()))?;
        let config = device.default_output_config()?;
        let device_rate = u32::from(config.sample_rate());
        let channels = config.channels() as usize;
        let handle = PlayerHandle::new(device_rate);

        crate::log_info!(
            "[Player] Output at {}Hz, {} channel(s), {:?}",
            device_rate,
            channels,
            config.sample_format()
        );

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                let h = handle.clone();
                device.build_output_stream(
                    &config.config(),
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        h.pull(data, channels);
                    },
                    |err| crate::log_error!("[Player] Stream error: {}", err),
                    None,
                )?
            }
            cpal::SampleFormat::I16 => {
                let h = handle.clone();
                let mut scratch: Vec<f32> = Vec::new();
                device.build_output_stream(
                    &config.config(),
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                        scratch.resize(data.len(), 0.0);
                        h.pull(&mut scratch, channels);
                        for (out, s) in data.iter_mut().zip(&scratch) {
                            *out = (s * crate::audio::pcm::PCM_SCALE) as i16;
                        }
                    },
                    |err| crate::log_error!("[Player] Stream error: {}", err),
                    None,
                )?
            }
            other => {
                return Err(AppError::AudioDevice(format!(
                    "unsupported output sample format {:?}",
                    other
                )));
            }
        };
        stream.play()?;

        Ok(Self {
            stream: Some(stream),
            handle,
        })
    }

    pub fn handle(&self) -> PlayerHandle {
        self.handle.clone()
    }

    /// Stops output and releases the device. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.handle.stop();
        if let Some(stream) = self.stream.take() {
            let _ = stream.pause();
        }
    }
}

impl PlaybackSink for AudioPlayer {
    fn now(&self) -> f64 {
        self.handle.now()
    }

    fn play_at(&mut self, start: f64, buffer: &PcmBuffer) {
        self.handle.play_at(start, buffer);
    }

    fn is_active(&self) -> bool {
        self.stream.is_some() && self.handle.is_active()
    }

    fn stop(&mut self) {
        self.handle.stop();
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.close();
    }
}
