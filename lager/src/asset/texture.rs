use crate::device::DeviceTexture;
use crate::error::DecodeError;
use crate::AssetKind;

/// Decoded RGBA8 image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Pixmap {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(DecodeError::malformed(
                AssetKind::Texture,
                format!(
                    "{}x{} RGBA image needs {} bytes, got {}",
                    width,
                    height,
                    expected,
                    data.len()
                ),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.iter().copied().cycle().take(n * 4).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    device: DeviceTexture,
}

impl Texture {
    pub fn new(width: u32, height: u32, device: DeviceTexture) -> Self {
        Self {
            width,
            height,
            device,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn device(&self) -> DeviceTexture {
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled() {
        let p = Pixmap::filled(2, 1, [1, 2, 3, 4]);
        assert_eq!(p.data, vec![1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn size_mismatch() {
        assert!(Pixmap::new(2, 2, vec![0; 15]).is_err());
        assert!(Pixmap::new(2, 2, vec![0; 16]).is_ok());
    }
}
