//! Microphone capture converted to 16 kHz mono.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio::CAPTURE_SAMPLE_RATE;
use crate::audio::pcm::PCM_SCALE;
use crate::audio::utils::{downmix_to_mono, resample};
use crate::error::{AppError, AppResult};

/// Exclusive handle on the default input device.
pub struct MicrophoneCapture {
    stream: Option<cpal::Stream>,
    device_rate: u32,
}

fn setup_input_device() -> AppResult<(cpal::Device, cpal::SupportedStreamConfig)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| AppError::Microphone("no input device available".to_string()))?;
    let config = device
        .default_input_config()
        .map_err(|e| AppError::Microphone(e.to_string()))?;
    Ok((device, config))
}

impl MicrophoneCapture {
    /// Opens the microphone and starts delivering 16 kHz mono chunks to
    /// `on_samples` from the audio thread. Any device or permission failure
    /// is reported as [`AppError::Microphone`].
    pub fn open<F>(mut on_samples: F) -> AppResult<Self>
    where
        F: FnMut(&[f32]) + Send + 'static,
    {
        let (device, config) = setup_input_device()?;
        let device_rate = u32::from(config.sample_rate());
        let channels = config.channels() as usize;

        crate::log_info!(
            "[Capture] Input at {}Hz, {} channel(s), {:?}",
            device_rate,
            channels,
            config.sample_format()
        );

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config.config(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mono = downmix_to_mono(data, channels);
                    on_samples(&resample(&mono, device_rate, CAPTURE_SAMPLE_RATE));
                },
                |err| crate::log_error!("[Capture] Stream error: {}", err),
                None,
            ),
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config.config(),
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let floats: Vec<f32> = data.iter().map(|&s| s as f32 / PCM_SCALE).collect();
                    let mono = downmix_to_mono(&floats, channels);
                    on_samples(&resample(&mono, device_rate, CAPTURE_SAMPLE_RATE));
                },
                |err| crate::log_error!("[Capture] Stream error: {}", err),
                None,
            ),
            other => {
                return Err(AppError::Microphone(format!(
                    "unsupported input sample format {:?}",
                    other
                )));
            }
        }
        .map_err(|e| AppError::Microphone(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AppError::Microphone(e.to_string()))?;

        Ok(Self {
            stream: Some(stream),
            device_rate,
        })
    }

    pub fn device_rate(&self) -> u32 {
        self.device_rate
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Stops the input stream and releases the device. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.pause();
            crate::log_info!("[Capture] Microphone released");
        }
    }
}

impl Drop for MicrophoneCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
