use std::time::Duration;

use crate::audio::{DeviceSound, SoundData};
use crate::Handle;

/// Sound buffer resident on the audio device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoundBuffer {
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: u64,
    pub device: DeviceSound,
}

impl SoundBuffer {
    pub fn new(data: &SoundData, device: DeviceSound) -> Self {
        Self {
            sample_rate: data.sample_rate,
            channels: data.channels,
            frames: data.frames() as u64,
            device,
        }
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let nanos = self.frames as u128 * 1_000_000_000 / self.sample_rate as u128;
        Duration::from_nanos(nanos as u64)
    }
}

/// Playable sound, shares its buffer with every other effect loaded from the same file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoundEffect {
    pub buffer: Handle<SoundBuffer>,
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration() {
        let data = SoundData {
            sample_rate: 100,
            channels: 2,
            samples: vec![0; 300],
        };
        let b = SoundBuffer::new(&data, DeviceSound(1));
        assert_eq!(b.frames, 150);
        assert_eq!(b.duration(), Duration::from_millis(1500));
    }
}
