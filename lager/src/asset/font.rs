use crate::asset::Texture;
use crate::Handle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontStyle {
    #[default]
    Normal,
    Highlighted,
    Disabled,
    Yellow,
    Red,
}

impl FontStyle {
    /// RGBA tint applied to the glyph texture.
    pub fn color(&self) -> [u8; 4] {
        match self {
            Self::Normal | Self::Highlighted => [255, 255, 255, 255],
            Self::Disabled => [128, 128, 128, 255],
            Self::Yellow => [255, 255, 0, 255],
            Self::Red => [255, 0, 0, 255],
        }
    }
}

/// Position of one glyph in the font texture, in normalized coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Glyph {
    pub width: u8,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FontMetrics {
    pub height: u32,
    /// Indexed by byte value.
    pub glyphs: Vec<Glyph>,
}

impl FontMetrics {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub metrics: FontMetrics,
    pub texture: Handle<Texture>,
    pub color: [u8; 4],
    pub style: FontStyle,
}

impl Font {
    pub fn text_width(&self, text: &str) -> u32 {
        text.bytes()
            .map(|b| {
                self.metrics
                    .glyphs
                    .get(b as usize)
                    .map_or(0, |g| g.width as u32)
            })
            .sum()
    }

    pub fn height(&self) -> u32 {
        self.metrics.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::device::DeviceTexture;
    use resurs::Storage;

    #[test]
    fn text_width() {
        let mut glyphs = vec![Glyph::default(); 256];
        glyphs[b'a' as usize].width = 5;
        glyphs[b'b' as usize].width = 7;

        let mut textures = Storage::new();
        let font = Font {
            metrics: FontMetrics { height: 10, glyphs },
            texture: textures.add(Texture::new(8, 8, DeviceTexture(1))),
            color: FontStyle::Normal.color(),
            style: FontStyle::Normal,
        };
        assert_eq!(font.text_width("abba"), 24);
        assert_eq!(font.text_width(""), 0);
        assert_eq!(font.height(), 10);
    }

    #[test]
    fn colors() {
        assert_eq!(FontStyle::Disabled.color(), [128, 128, 128, 255]);
        assert_ne!(FontStyle::Yellow.color(), FontStyle::Red.color());
    }
}
