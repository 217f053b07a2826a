//! Decoded and device-resident asset types.

mod animation;
mod decal;
mod font;
mod material;
mod mesh;
mod skeleton;
mod sound;
mod texture;

pub use animation::Animation;
pub use decal::{decal_geometry, DecalDesc};
pub use font::{Font, FontMetrics, FontStyle, Glyph};
pub use material::{AlphaFunc, Material, MaterialDesc};
pub(crate) use material::frame_period_ms;
pub use mesh::{EmitterMesh, MeshData, ProtoMesh, SubMesh, SubMeshData};
pub use skeleton::{AttachBinder, Skeleton, SkeletonNode};
pub use sound::{SoundBuffer, SoundEffect};
pub use texture::{Pixmap, Texture};
