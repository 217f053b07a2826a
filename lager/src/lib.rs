//! Asset loading and caching.
//!
//! A [`ResourceManager`] reads assets from an [`Archive`], decodes them with a [`Decoder`],
//! uploads them to a [`Device`] or [`AudioDevice`] and hands out [`Handle`]s. Every asset is
//! loaded at most once per key for the lifetime of the manager.

pub mod archive;
pub mod asset;
pub mod audio;
pub mod decode;
pub mod device;
pub mod error;
pub mod key;
mod manager;
mod names;
mod settings;

pub use resurs::Handle;

pub use archive::{Archive, ArchiveStack, DirArchive, MemoryArchive};
pub use audio::{AudioDevice, DeviceSound, HeadlessAudio, SoundData};
pub use decode::{AssetKind, Decoder, ImageDecoder};
pub use device::{Device, DeviceMesh, DeviceTexture, HeadlessDevice, Vertex};
pub use error::{ArchiveError, DecodeError, ResourceError, UploadError};
pub use manager::{
    Asset, CacheStats, Caches, Fetch, ManagerStats, ResourceManager, ResourceManagerBuilder,
};
pub use settings::Settings;
