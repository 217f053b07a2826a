//! Asset decoder interface.
//!
//! The binary formats themselves live outside of this crate. A [`Decoder`] implements the kinds
//! it knows about and leaves the rest at their default, which reports
//! [`DecodeError::Unsupported`].

use std::sync::Arc;

use crate::asset::{Animation, FontMetrics, MeshData, Pixmap, Skeleton};
use crate::error::DecodeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    Texture,
    Mesh,
    EmitterMesh,
    Decal,
    Skeleton,
    Animation,
    Binder,
    Sound,
    Font,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Texture => "texture",
            Self::Mesh => "mesh",
            Self::EmitterMesh => "emitter mesh",
            Self::Decal => "decal",
            Self::Skeleton => "skeleton",
            Self::Animation => "animation",
            Self::Binder => "binder",
            Self::Sound => "sound",
            Self::Font => "font",
        };
        f.write_str(s)
    }
}

pub trait Decoder: Send + Sync {
    fn texture(&self, name: &str, bytes: &[u8]) -> Result<Pixmap, DecodeError> {
        let _ = (name, bytes);
        Err(DecodeError::Unsupported(AssetKind::Texture))
    }

    fn mesh(&self, name: &str, bytes: &[u8]) -> Result<MeshData, DecodeError> {
        let _ = (name, bytes);
        Err(DecodeError::Unsupported(AssetKind::Mesh))
    }

    fn skeleton(&self, name: &str, bytes: &[u8]) -> Result<Skeleton, DecodeError> {
        let _ = (name, bytes);
        Err(DecodeError::Unsupported(AssetKind::Skeleton))
    }

    fn animation(&self, name: &str, bytes: &[u8]) -> Result<Animation, DecodeError> {
        let _ = (name, bytes);
        Err(DecodeError::Unsupported(AssetKind::Animation))
    }

    fn font(&self, name: &str, bytes: &[u8]) -> Result<FontMetrics, DecodeError> {
        let _ = (name, bytes);
        Err(DecodeError::Unsupported(AssetKind::Font))
    }
}

impl<D: Decoder + ?Sized> Decoder for Arc<D> {
    fn texture(&self, name: &str, bytes: &[u8]) -> Result<Pixmap, DecodeError> {
        (**self).texture(name, bytes)
    }

    fn mesh(&self, name: &str, bytes: &[u8]) -> Result<MeshData, DecodeError> {
        (**self).mesh(name, bytes)
    }

    fn skeleton(&self, name: &str, bytes: &[u8]) -> Result<Skeleton, DecodeError> {
        (**self).skeleton(name, bytes)
    }

    fn animation(&self, name: &str, bytes: &[u8]) -> Result<Animation, DecodeError> {
        (**self).animation(name, bytes)
    }

    fn font(&self, name: &str, bytes: &[u8]) -> Result<FontMetrics, DecodeError> {
        (**self).font(name, bytes)
    }
}

/// Decodes textures in any format the `image` crate understands. TGA has no magic number so
/// the format is taken from the file extension when there is one.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoder;

impl Decoder for ImageDecoder {
    fn texture(&self, name: &str, bytes: &[u8]) -> Result<Pixmap, DecodeError> {
        log::trace!("Trying to decode image {}", name);
        let image = match image::ImageFormat::from_path(name) {
            Ok(format) => image::load_from_memory_with_format(bytes, format)?,
            Err(_) => image::load_from_memory(bytes)?,
        }
        .to_rgba8();

        let (width, height) = image.dimensions();
        log::trace!("Decoded RGBA image with dimensions: {}x{}", width, height);

        Pixmap::new(width, height, image.into_raw())
    }
}
