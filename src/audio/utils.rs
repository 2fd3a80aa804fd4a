//! Audio utility functions for WAV encoding, channel mixing, and resampling.

use std::io::Cursor;
use std::path::Path;

use crate::audio::PcmBuffer;
use crate::error::AppResult;

/// Encode PCM samples to WAV format
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> AppResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut wav_cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut wav_cursor, spec)?;
        for sample in samples {
            writer.write_sample(*sample)?;
        }
        writer.finalize()?;
    }
    Ok(wav_cursor.into_inner())
}

/// Writes a decoded buffer as a mono 16-bit WAV file.
pub fn save_wav(buffer: &PcmBuffer, path: &Path) -> AppResult<()> {
    let wav = encode_wav(&buffer.to_i16(), buffer.sample_rate, 1)?;
    std::fs::write(path, wav)?;
    Ok(())
}

/// Average interleaved frames down to one channel.
pub fn downmix_to_mono(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Simple nearest-neighbor resampling
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || source_rate == 0 {
        return samples.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let new_len = (samples.len() as f64 * ratio) as usize;
    let mut resampled = Vec::with_capacity(new_len);
    for i in 0..new_len {
        let src_idx = (i as f64 / ratio) as usize;
        if src_idx < samples.len() {
            resampled.push(samples[src_idx]);
        }
    }
    resampled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_carries_rate_and_channels() {
        let wav = encode_wav(&[0, 1000, -1000], 24000, 1).unwrap();
        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 24000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 3);
    }

    #[test]
    fn downmix_averages_frames() {
        assert_eq!(downmix_to_mono(&[1.0, 0.0, 0.5, 0.5], 2), vec![0.5, 0.5]);
        assert_eq!(downmix_to_mono(&[0.3], 1), vec![0.3]);
    }

    #[test]
    fn resample_scales_length() {
        let input = vec![0.0; 4800];
        assert_eq!(resample(&input, 48000, 16000).len(), 1600);
        assert_eq!(resample(&input, 24000, 48000).len(), 9600);
        assert_eq!(resample(&[0.25, 0.5], 24000, 48000), vec![0.25, 0.25, 0.5, 0.5]);
    }
}
