//! Audio device interface: decode and upload of sound buffers.

use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{DecodeError, UploadError};

/// Decoded, interleaved 16 bit PCM.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoundData {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl SoundData {
    pub fn silence(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
            samples: Vec::new(),
        }
    }

    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceSound(pub u64);

pub trait AudioDevice: Send + Sync {
    fn decode_sound(&self, name: &str, bytes: &[u8]) -> Result<SoundData, DecodeError>;
    fn upload_sound(&self, data: &SoundData) -> Result<DeviceSound, UploadError>;
}

impl<A: AudioDevice + ?Sized> AudioDevice for Arc<A> {
    fn decode_sound(&self, name: &str, bytes: &[u8]) -> Result<SoundData, DecodeError> {
        (**self).decode_sound(name, bytes)
    }

    fn upload_sound(&self, data: &SoundData) -> Result<DeviceSound, UploadError> {
        (**self).upload_sound(data)
    }
}

/// Decodes WAV files and hands out ids instead of talking to a sound card.
#[derive(Debug, Default)]
pub struct HeadlessAudio {
    next_id: AtomicU64,
}

impl HeadlessAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

fn decode_wav(bytes: &[u8]) -> Result<SoundData, DecodeError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Int if spec.bits_per_sample <= 16 => {
            reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?
        }
        hound::SampleFormat::Int => {
            let shift = spec.bits_per_sample - 16;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| (s >> shift) as i16))
                .collect::<Result<Vec<_>, _>>()?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(SoundData {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        samples,
    })
}

impl AudioDevice for HeadlessAudio {
    fn decode_sound(&self, name: &str, bytes: &[u8]) -> Result<SoundData, DecodeError> {
        let data = decode_wav(bytes)?;
        log::trace!(
            "Decoded {}: {} Hz, {} channel(s), {} frames",
            name,
            data.sample_rate,
            data.channels,
            data.frames()
        );
        Ok(data)
    }

    fn upload_sound(&self, _data: &SoundData) -> Result<DeviceSound, UploadError> {
        Ok(DeviceSound(self.next_id.fetch_add(1, Ordering::Relaxed) + 1))
    }
}
