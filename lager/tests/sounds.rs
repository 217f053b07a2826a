mod common;

use std::time::Duration;

use common::Fixture;
use lager::{
    AssetKind, AudioDevice, DecodeError, DeviceSound, HeadlessAudio, ResourceError, SoundData,
    UploadError,
};

#[test]
fn sounds_share_buffers() {
    let loaded = Fixture::new().sound("HIT.WAV", 4410, 44100).build();
    let m = &loaded.manager;

    let effect = m.load_sound("hit.wav").unwrap();
    assert_eq!(m.load_sound("HIT.WAV").unwrap(), effect);

    let buffer = m.load_sound_buffer("HIT.WAV").unwrap();
    let e = m.get(effect).unwrap();
    assert_eq!(e.buffer, buffer);
    assert_eq!(e.duration, Duration::from_millis(100));
    drop(e);

    let b = m.get(buffer).unwrap();
    assert_eq!((b.sample_rate, b.channels, b.frames), (44100, 1, 4410));
}

#[test]
fn missing_and_broken_sounds_fall_back() {
    let loaded = Fixture::new()
        .file("BROKEN.WAV", b"RIFF but not really".to_vec())
        .build();
    let m = &loaded.manager;

    let missing = m.load_sound("MISSING.WAV").unwrap();
    let broken = m.load_sound("BROKEN.WAV").unwrap();
    assert_eq!(missing, broken);

    let e = m.get(missing).unwrap();
    assert_eq!(e.duration, Duration::ZERO);
    drop(e);

    let stats = m.stats();
    assert_eq!(stats.sounds.fallbacks, 2);
    assert_eq!(stats.sound_buffers.fallbacks, 2);
}

/// Uploads nothing but silence.
struct MuteAudio(HeadlessAudio);

impl AudioDevice for MuteAudio {
    fn decode_sound(&self, name: &str, bytes: &[u8]) -> Result<SoundData, DecodeError> {
        self.0.decode_sound(name, bytes)
    }

    fn upload_sound(&self, data: &SoundData) -> Result<DeviceSound, UploadError> {
        if data.samples.is_empty() {
            self.0.upload_sound(data)
        } else {
            Err(UploadError::DeviceLost)
        }
    }
}

#[test]
fn sound_upload_errors_are_returned() {
    let (builder, _) = Fixture::new().sound("HIT.WAV", 100, 22050).builder();
    let m = builder
        .device(lager::HeadlessDevice::new())
        .audio(MuteAudio(HeadlessAudio::new()))
        .build()
        .unwrap();

    for _ in 0..2 {
        assert!(matches!(
            m.load_sound("HIT.WAV"),
            Err(ResourceError::Upload {
                kind: AssetKind::Sound,
                source: UploadError::DeviceLost,
                ..
            })
        ));
    }
    let stats = m.stats();
    assert_eq!(stats.sounds.keys, 0);
    assert_eq!(stats.sound_buffers.keys, 0);
}
