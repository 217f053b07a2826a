//! Cache keys, one shape per asset cache.

use std::hash::{Hash, Hasher};

use crate::asset::{FontStyle, Material, ProtoMesh, Skeleton};
use crate::Handle;

/// Archive names are case-insensitive, everything is compared in upper case.
pub(crate) fn normalize(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// A file name in the archive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(name: &str) -> Self {
        Self(normalize(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NameKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Texture name with its `_V` (variant) and `_C` (colour) parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NameVariantKey {
    pub name: NameKey,
    pub v: i32,
    pub c: i32,
}

impl NameVariantKey {
    pub fn new(name: &str, v: i32, c: i32) -> Self {
        Self {
            name: NameKey::new(name),
            v,
            c,
        }
    }
}

// -0.0 and 0.0 compare equal as floats, make them equal bit patterns too so that Eq and Hash
// agree.
fn float_bits(f: f32) -> u32 {
    if f == 0.0 {
        0
    } else {
        f.to_bits()
    }
}

/// All four fields take part in both equality and hashing.
#[derive(Clone, Debug)]
pub struct DecalKey {
    material: Material,
    scale_x: f32,
    scale_y: f32,
    two_sided: bool,
}

impl DecalKey {
    pub fn new(material: Material, scale_x: f32, scale_y: f32, two_sided: bool) -> Self {
        Self {
            material,
            scale_x,
            scale_y,
            two_sided,
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    pub fn two_sided(&self) -> bool {
        self.two_sided
    }
}

impl PartialEq for DecalKey {
    fn eq(&self, other: &Self) -> bool {
        self.material == other.material
            && float_bits(self.scale_x) == float_bits(other.scale_x)
            && float_bits(self.scale_y) == float_bits(other.scale_y)
            && self.two_sided == other.two_sided
    }
}

impl Eq for DecalKey {}

impl Hash for DecalKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.material.hash(state);
        float_bits(self.scale_x).hash(state);
        float_bits(self.scale_y).hash(state);
        self.two_sided.hash(state);
    }
}

/// Identity of a cached skeleton and a cached mesh, not their contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub skeleton: Handle<Skeleton>,
    pub mesh: Handle<ProtoMesh>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub name: NameKey,
    pub style: FontStyle,
}

impl FontKey {
    pub fn new(name: &str, style: FontStyle) -> Self {
        Self {
            name: NameKey::new(name),
            style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::hash_map::DefaultHasher;

    use crate::asset::{AlphaFunc, Texture};
    use crate::device::DeviceTexture;
    use resurs::Storage;

    fn hash_of<T: Hash>(t: &T) -> u64 {
        let mut h = DefaultHasher::new();
        t.hash(&mut h);
        h.finish()
    }

    fn material() -> Material {
        let mut textures = Storage::new();
        Material {
            texture: textures.add(Texture::new(4, 4, DeviceTexture(1))),
            frames: Vec::new(),
            alpha: AlphaFunc::Solid,
            frame_period_ms: 0,
        }
    }

    #[test]
    fn names_ignore_case() {
        assert_eq!(NameKey::new("t1.tga"), NameKey::new("T1.TGA"));
        assert_eq!(NameKey::new("Humans.mds").as_str(), "HUMANS.MDS");
        assert_ne!(NameKey::new("T1.TGA"), NameKey::new("T2.TGA"));
    }

    #[test]
    fn variant_keys() {
        assert_eq!(
            NameVariantKey::new("arm_v0_c0.tga", 1, 2),
            NameVariantKey::new("ARM_V0_C0.TGA", 1, 2)
        );
        assert_ne!(
            NameVariantKey::new("ARM_V0_C0.TGA", 1, 2),
            NameVariantKey::new("ARM_V0_C0.TGA", 2, 1)
        );
    }

    #[test]
    fn decal_keys_compare_all_fields() {
        let m = material();
        let a = DecalKey::new(m.clone(), 1.0, 1.0, false);
        let same = DecalKey::new(m.clone(), 1.0, 1.0, false);
        assert_eq!(a, same);
        assert_eq!(hash_of(&a), hash_of(&same));

        assert_ne!(a, DecalKey::new(m.clone(), 2.0, 1.0, false));
        assert_ne!(a, DecalKey::new(m.clone(), 1.0, 2.0, false));
        assert_ne!(a, DecalKey::new(m.clone(), 1.0, 1.0, true));

        let mut other = m;
        other.alpha = AlphaFunc::Transparent;
        assert_ne!(a, DecalKey::new(other, 1.0, 1.0, false));
    }

    #[test]
    fn decal_keys_signed_zero() {
        let m = material();
        let a = DecalKey::new(m.clone(), 0.0, 1.0, false);
        let b = DecalKey::new(m, -0.0, 1.0, false);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn font_keys() {
        let normal = FontKey::new("font_old_10_white.tga", FontStyle::Normal);
        let hi = FontKey::new("font_old_10_white.tga", FontStyle::Highlighted);
        assert_ne!(normal, hi);
        assert_eq!(
            normal,
            FontKey::new("FONT_OLD_10_WHITE.TGA", FontStyle::Normal)
        );
    }
}
