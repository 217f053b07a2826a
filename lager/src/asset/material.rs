use crate::asset::Texture;
use crate::Handle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlphaFunc {
    #[default]
    Solid,
    AlphaTest,
    Transparent,
    Additive,
    Multiply,
}

/// Material as it is described by mesh or world data, before any texture is loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialDesc {
    pub texture: String,
    pub alpha: AlphaFunc,
    /// Frame rate of `_A0` animated textures, 0 for static ones.
    pub anim_fps: f32,
}

impl MaterialDesc {
    pub fn new(texture: &str) -> Self {
        Self {
            texture: texture.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Material {
    pub texture: Handle<Texture>,
    /// Animation frames, empty unless the texture is animated.
    pub frames: Vec<Handle<Texture>>,
    pub alpha: AlphaFunc,
    pub frame_period_ms: u32,
}

impl Material {
    /// Texture to show at `time_ms`.
    pub fn frame(&self, time_ms: u64) -> Handle<Texture> {
        if self.frames.is_empty() || self.frame_period_ms == 0 {
            return self.texture;
        }
        let i = (time_ms / self.frame_period_ms as u64) % self.frames.len() as u64;
        self.frames[i as usize]
    }
}

pub(crate) fn frame_period_ms(fps: f32) -> u32 {
    if fps > 0.0 && fps.is_finite() {
        (1000.0 / fps) as u32
    } else {
        0
    }
}
