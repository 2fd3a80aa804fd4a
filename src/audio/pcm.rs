//! 16-bit PCM conversion for the wire format.
//!
//! The scale factor is 32768 in both directions, so an encode/decode round
//! trip is deterministic but not bit-exact.

use base64::{Engine as _, engine::general_purpose};
use byteorder::{ByteOrder, LittleEndian};

use crate::error::AppResult;

pub const PCM_SCALE: f32 = 32768.0;

/// Decoded mono audio ready for playback.
#[derive(Clone, Debug, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples as i16, the inverse of [`decode_pcm16`].
    pub fn to_i16(&self) -> Vec<i16> {
        self.samples.iter().map(|&s| float_to_i16(s)).collect()
    }
}

// `as` truncates toward zero and saturates, so 1.0 lands on i16::MAX.
fn float_to_i16(sample: f32) -> i16 {
    (sample * PCM_SCALE) as i16
}

/// f32 samples in roughly [-1, 1] to little-endian i16 bytes.
pub fn encode_pcm16(samples: &[f32]) -> Vec<u8> {
    let ints: Vec<i16> = samples.iter().map(|&s| float_to_i16(s)).collect();
    let mut bytes = vec![0u8; ints.len() * 2];
    LittleEndian::write_i16_into(&ints, &mut bytes);
    bytes
}

/// Little-endian i16 bytes to f32. A trailing odd byte is ignored.
pub fn decode_pcm16(bytes: &[u8]) -> Vec<f32> {
    let even = bytes.len() - bytes.len() % 2;
    let mut ints = vec![0i16; even / 2];
    LittleEndian::read_i16_into(&bytes[..even], &mut ints);
    ints.into_iter().map(|s| s as f32 / PCM_SCALE).collect()
}

pub fn encode_base64_pcm16(samples: &[f32]) -> String {
    general_purpose::STANDARD.encode(encode_pcm16(samples))
}

pub fn decode_base64_pcm16(data: &str, sample_rate: u32) -> AppResult<PcmBuffer> {
    let bytes = general_purpose::STANDARD.decode(data)?;
    Ok(PcmBuffer::new(decode_pcm16(&bytes), sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_stays_within_one_step() {
        let step = 1.0 / PCM_SCALE;
        let block: Vec<f32> = (0..=2000).map(|i| -1.0 + i as f32 / 1000.0).collect();
        let decoded = decode_pcm16(&encode_pcm16(&block));
        assert_eq!(decoded.len(), block.len());
        for (orig, back) in block.iter().zip(&decoded) {
            assert!((orig - back).abs() <= step, "{} -> {}", orig, back);
        }
    }

    #[test]
    fn scale_is_32768_and_truncates() {
        let bytes = encode_pcm16(&[0.5, -0.5, -1.0, 1.0, 0.00004]);
        let mut ints = [0i16; 5];
        LittleEndian::read_i16_into(&bytes, &mut ints);
        assert_eq!(ints, [16384, -16384, -32768, 32767, 1]);
    }

    #[test]
    fn decode_divides_by_32768() {
        let decoded = decode_pcm16(&[0x00, 0x40, 0x00, 0x80, 0xff]);
        assert_eq!(decoded, vec![0.5, -1.0]);
    }

    #[test]
    fn base64_frame_decodes_to_duration() {
        let frame = encode_base64_pcm16(&[0.0; 2400]);
        let buffer = decode_base64_pcm16(&frame, 24000).unwrap();
        assert!((buffer.duration_secs() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn invalid_base64_is_a_malformed_response() {
        let err = decode_base64_pcm16("***", 24000).unwrap_err();
        assert!(matches!(err, crate::error::AppError::MalformedResponse(_)));
    }
}
