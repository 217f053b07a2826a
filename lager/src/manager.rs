//! The resource manager: every asset cache behind one lock.
//!
//! All loading goes through a [`Fetch`], which is handed out by [`ResourceManager::fetch`] while
//! the write lock is held. Composite assets (meshes need materials, materials need textures,
//! fonts need textures, ...) load their parts through the same `Fetch`, so the lock is taken
//! exactly once per top level call.

use std::cell::RefCell;
use std::convert::Infallible;
use std::time::Duration;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use resurs::{Cache, Load, ResourceCache, Stats, Storage};

use crate::archive::Archive;
use crate::asset::{
    decal_geometry, AlphaFunc, Animation, AttachBinder, DecalDesc, EmitterMesh, Font,
    FontMetrics, FontStyle, Material, MaterialDesc, Pixmap, ProtoMesh, Skeleton, SoundBuffer,
    SoundEffect, SubMesh, Texture,
};
use crate::audio::{AudioDevice, HeadlessAudio, SoundData};
use crate::decode::{AssetKind, Decoder, ImageDecoder};
use crate::device::Device;
use crate::error::{DecodeError, ResourceError};
use crate::key::{normalize, BindingKey, DecalKey, FontKey, NameKey, NameVariantKey};
use crate::names;
use crate::settings::Settings;
use crate::Handle;

const SILENCE_SAMPLE_RATE: u32 = 22050;

thread_local! {
    // Managers that have a live Fetch on this thread.
    static ACTIVE_FETCH: RefCell<Vec<usize>> = RefCell::new(Vec::new());
}

struct FetchScope {
    manager: usize,
}

impl FetchScope {
    fn check(manager: usize) {
        let active = ACTIVE_FETCH.with(|a| a.borrow().contains(&manager));
        if active {
            panic!(
                "ResourceManager locked again on a thread that is already inside fetch(), \
                 use the Fetch passed to the closure instead"
            );
        }
    }

    fn enter(manager: usize) -> Self {
        Self::check(manager);
        ACTIVE_FETCH.with(|a| a.borrow_mut().push(manager));
        Self { manager }
    }
}

impl Drop for FetchScope {
    fn drop(&mut self) {
        ACTIVE_FETCH.with(|a| {
            let mut a = a.borrow_mut();
            if let Some(i) = a.iter().rposition(|&m| m == self.manager) {
                a.remove(i);
            }
        });
    }
}

fn infallible<T>(r: Result<T, Infallible>) -> T {
    match r {
        Ok(t) => t,
        Err(e) => match e {},
    }
}

struct Backends {
    archive: Box<dyn Archive>,
    decoder: Box<dyn Decoder>,
    device: Box<dyn Device>,
    audio: Box<dyn AudioDevice>,
}

impl Backends {
    /// Reads the first of `candidates` that exists and decodes it. Missing files and decode
    /// errors are logged and end up as `None`.
    fn read_decoded<T>(
        &self,
        kind: AssetKind,
        candidates: &[String],
        decode: impl FnOnce(&str, &[u8]) -> Result<T, DecodeError>,
    ) -> Option<T> {
        let found = candidates
            .iter()
            .find_map(|name| self.archive.read_file(name).map(|bytes| (name, bytes)));

        let (name, bytes) = match found {
            Some(found) => found,
            None => {
                log::warn!(
                    "{} {} not found, using fallback",
                    kind,
                    candidates.first().map_or("", String::as_str)
                );
                return None;
            }
        };

        match decode(name, &bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("Failed to decode {} {}, using fallback: {}", kind, name, e);
                None
            }
        }
    }

    fn has_any(&self, candidates: &[String]) -> bool {
        candidates.iter().any(|n| self.archive.has_file(n))
    }

    fn upload_texture(&self, name: &str, pixmap: &Pixmap) -> Result<Texture, ResourceError> {
        let device = self
            .device
            .upload_texture(pixmap)
            .map_err(|e| ResourceError::upload(AssetKind::Texture, name, e))?;
        Ok(Texture::new(pixmap.width, pixmap.height, device))
    }
}

/// The asset caches. Only reachable through a [`Fetch`] or [`ResourceManager::get`].
pub struct Caches {
    textures: ResourceCache<NameKey, Texture>,
    // Placeholders that have no name in the archive.
    builtin_textures: Storage<Texture>,
    black: Handle<Texture>,
    // Resolved to plain texture handles, so several variant keys may alias one texture.
    texture_variants: Cache<NameVariantKey, Texture>,
    variant_stats: Stats,
    meshes: ResourceCache<NameKey, ProtoMesh>,
    decals: ResourceCache<DecalKey, ProtoMesh>,
    emitter_meshes: ResourceCache<NameKey, EmitterMesh>,
    skeletons: ResourceCache<NameKey, Skeleton>,
    animations: ResourceCache<NameKey, Animation>,
    binders: ResourceCache<BindingKey, AttachBinder>,
    sound_buffers: ResourceCache<NameKey, SoundBuffer>,
    sounds: ResourceCache<NameKey, SoundEffect>,
    fonts: ResourceCache<FontKey, Font>,
}

impl Caches {
    fn new(backends: &Backends, settings: &Settings) -> Result<Self, ResourceError> {
        let placeholder = |what: &str, e: &dyn std::fmt::Display| {
            ResourceError::Configuration(format!("failed to upload {}: {}", what, e))
        };

        let pixmap = Pixmap::filled(2, 2, settings.fallback_color);
        let fallback = backends
            .device
            .upload_texture(&pixmap)
            .map_err(|e| placeholder("fallback texture", &e))?;
        let textures = ResourceCache::new(Texture::new(2, 2, fallback));

        let black = backends
            .device
            .upload_texture(&Pixmap::filled(1, 1, [0, 0, 0, 255]))
            .map_err(|e| placeholder("black texture", &e))?;
        let mut builtin_textures = Storage::with_capacity(1);
        let black = builtin_textures.add(Texture::new(1, 1, black));

        let empty_mesh = backends
            .device
            .upload_mesh(&[], &[])
            .map_err(|e| placeholder("empty mesh", &e))?;

        let silence = SoundData::silence(SILENCE_SAMPLE_RATE);
        let silent = backends
            .audio
            .upload_sound(&silence)
            .map_err(|e| placeholder("silent sound", &e))?;
        let sound_buffers = ResourceCache::new(SoundBuffer::new(&silence, silent));
        let sounds = ResourceCache::new(SoundEffect {
            buffer: sound_buffers.fallback(),
            duration: Duration::ZERO,
        });

        let fonts = ResourceCache::new(Font {
            metrics: FontMetrics::empty(),
            texture: textures.fallback(),
            color: FontStyle::Normal.color(),
            style: FontStyle::Normal,
        });

        Ok(Self {
            textures,
            builtin_textures,
            black,
            texture_variants: Cache::new(),
            variant_stats: Stats::default(),
            meshes: ResourceCache::new(ProtoMesh::empty("", empty_mesh)),
            decals: ResourceCache::new(ProtoMesh::empty("", empty_mesh)),
            emitter_meshes: ResourceCache::new(EmitterMesh::empty()),
            skeletons: ResourceCache::new(Skeleton::empty("")),
            animations: ResourceCache::new(Animation::empty("")),
            binders: ResourceCache::new(AttachBinder::default()),
            sound_buffers,
            sounds,
            fonts,
        })
    }
}

/// Anything that can be read back from the caches with a handle.
pub trait Asset: Sized {
    const KIND: AssetKind;

    fn resolve(caches: &Caches, h: Handle<Self>) -> Option<&Self>;
}

macro_rules! impl_asset {
    ($ty:ty, $kind:ident, $($cache:ident),+) => {
        impl Asset for $ty {
            const KIND: AssetKind = AssetKind::$kind;

            fn resolve(caches: &Caches, h: Handle<Self>) -> Option<&Self> {
                None $(.or_else(|| caches.$cache.get(&h)))+
            }
        }
    };
}

impl_asset!(Texture, Texture, textures, builtin_textures);
impl_asset!(ProtoMesh, Mesh, meshes, decals);
impl_asset!(EmitterMesh, EmitterMesh, emitter_meshes);
impl_asset!(Skeleton, Skeleton, skeletons);
impl_asset!(Animation, Animation, animations);
impl_asset!(AttachBinder, Binder, binders);
impl_asset!(SoundBuffer, Sound, sound_buffers);
impl_asset!(SoundEffect, Sound, sounds);
impl_asset!(Font, Font, fonts);

/// Exclusive access to the caches for the duration of one [`ResourceManager::fetch`].
///
/// Every load operation lives here. The [`ResourceManager`] methods of the same name are
/// shorthands that lock, call the `Fetch` method and unlock.
pub struct Fetch<'m> {
    backends: &'m Backends,
    settings: &'m Settings,
    caches: &'m mut Caches,
}

impl<'m> Fetch<'m> {
    pub fn get<T: Asset>(&self, h: Handle<T>) -> Option<&T> {
        T::resolve(self.caches, h)
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.backends.archive.has_file(name)
    }

    pub fn fallback_texture(&self) -> Handle<Texture> {
        self.caches.textures.fallback()
    }

    pub fn fallback_black(&self) -> Handle<Texture> {
        self.caches.black
    }

    #[profiling::function]
    pub fn texture(&mut self, name: &str) -> Result<Handle<Texture>, ResourceError> {
        let backends = self.backends;
        self.caches
            .textures
            .get_or_create(NameKey::new(name), |key| {
                log::debug!("Loading texture {}", key);
                let candidates = names::texture_candidates(key.as_str());
                let pixmap = backends.read_decoded(AssetKind::Texture, &candidates, |n, b| {
                    backends.decoder.texture(n, b)
                });
                match pixmap {
                    Some(pixmap) => backends
                        .upload_texture(key.as_str(), &pixmap)
                        .map(Load::Created),
                    None => Ok(Load::Fallback),
                }
            })
    }

    /// Texture named by replacing the `_V0` and `_C0` tags of `name` with `v` and `c`.
    pub fn texture_variant(
        &mut self,
        name: &str,
        v: i32,
        c: i32,
    ) -> Result<Handle<Texture>, ResourceError> {
        let key = NameVariantKey::new(name, v, c);
        if let Some(h) = self.caches.texture_variants.get(&key) {
            self.caches.variant_stats.hits += 1;
            return Ok(h);
        }

        let resolved = names::emplace_tag(key.name.as_str(), 'V', v);
        let resolved = names::emplace_tag(&resolved, 'C', c);
        let h = self.texture(&resolved)?;
        self.caches.variant_stats.misses += 1;
        if h == self.caches.textures.fallback() {
            self.caches.variant_stats.fallbacks += 1;
        }
        self.caches.texture_variants.insert(key, h);
        Ok(h)
    }

    /// All frames of an `_A0` texture, in order. Empty if `name` is not animated.
    pub fn texture_anim(&mut self, name: &str) -> Result<Vec<Handle<Texture>>, ResourceError> {
        let name = normalize(name);
        let mut frames = Vec::new();
        for frame in 0.. {
            let frame_name = match names::anim_frame_name(&name, frame) {
                Some(n) => n,
                None => break,
            };
            if !self
                .backends
                .has_any(&names::texture_candidates(&frame_name))
            {
                break;
            }
            frames.push(self.texture(&frame_name)?);
        }
        Ok(frames)
    }

    /// `alpha_test` turns solid materials into alpha tested ones, used for meshes and decals.
    pub fn material(
        &mut self,
        desc: &MaterialDesc,
        alpha_test: bool,
    ) -> Result<Material, ResourceError> {
        let texture = self.texture(&desc.texture)?;
        let frames = self.texture_anim(&desc.texture)?;
        let alpha = match desc.alpha {
            AlphaFunc::Solid if alpha_test => AlphaFunc::AlphaTest,
            alpha => alpha,
        };
        let frame_period_ms = if frames.is_empty() {
            0
        } else {
            crate::asset::frame_period_ms(desc.anim_fps)
        };

        Ok(Material {
            texture,
            frames,
            alpha,
            frame_period_ms,
        })
    }

    #[profiling::function]
    pub fn mesh(&mut self, name: &str) -> Result<Handle<ProtoMesh>, ResourceError> {
        let key = NameKey::new(name);
        if let Some(h) = self.caches.meshes.lookup(&key) {
            return Ok(h);
        }

        log::debug!("Loading mesh {}", key);
        let backends = self.backends;
        let data = backends.read_decoded(
            AssetKind::Mesh,
            &names::mesh_candidates(key.as_str()),
            |n, b| {
                let data = backends.decoder.mesh(n, b)?;
                data.validate()?;
                Ok(data)
            },
        );
        let data = match data {
            Some(data) if !data.indices.is_empty() => data,
            Some(_) => {
                log::warn!("Mesh {} has no geometry, using fallback", key);
                return Ok(self.caches.meshes.insert(key, Load::Fallback));
            }
            None => return Ok(self.caches.meshes.insert(key, Load::Fallback)),
        };

        let mut submeshes = Vec::with_capacity(data.submeshes.len());
        for sm in &data.submeshes {
            submeshes.push(SubMesh {
                material: self.material(&sm.material, true)?,
                first_index: sm.first_index,
                index_count: sm.index_count,
            });
        }

        let device = backends
            .device
            .upload_mesh(&data.vertices, &data.indices)
            .map_err(|e| ResourceError::upload(AssetKind::Mesh, key.as_str(), e))?;

        let mesh = ProtoMesh {
            name: key.as_str().to_string(),
            submeshes,
            nodes: data.nodes,
            index_count: data.indices.len() as u32,
            device,
        };
        Ok(self.caches.meshes.insert(key, Load::Created(mesh)))
    }

    /// CPU side geometry for particle emitters. Nothing is uploaded.
    pub fn emitter_mesh(&mut self, name: &str) -> Handle<EmitterMesh> {
        let backends = self.backends;
        infallible(
            self.caches
                .emitter_meshes
                .get_or_create(NameKey::new(name), |key| {
                    let data = backends.read_decoded(
                        AssetKind::EmitterMesh,
                        &names::mesh_candidates(key.as_str()),
                        |n, b| {
                            let data = backends.decoder.mesh(n, b)?;
                            data.validate()?;
                            Ok(data)
                        },
                    );
                    Ok(match data {
                        Some(data) => Load::Created(EmitterMesh::new(&data)),
                        None => Load::Fallback,
                    })
                }),
        )
    }

    #[profiling::function]
    pub fn decal_mesh(&mut self, desc: &DecalDesc) -> Result<Handle<ProtoMesh>, ResourceError> {
        let material = self.material(&desc.material, true)?;
        let key = DecalKey::new(material, desc.scale_x, desc.scale_y, desc.two_sided);
        if let Some(h) = self.caches.decals.lookup(&key) {
            return Ok(h);
        }

        let valid = |s: f32| s.is_finite() && s != 0.0;
        if !valid(desc.scale_x) || !valid(desc.scale_y) {
            log::warn!(
                "Decal {} has scale {}x{}, using fallback",
                desc.material.texture,
                desc.scale_x,
                desc.scale_y
            );
            return Ok(self.caches.decals.insert(key, Load::Fallback));
        }

        let (vertices, indices) = decal_geometry(desc.scale_x, desc.scale_y, desc.two_sided);
        let name = normalize(&desc.material.texture);
        let device = self
            .backends
            .device
            .upload_mesh(&vertices, &indices)
            .map_err(|e| ResourceError::upload(AssetKind::Decal, &name, e))?;

        let index_count = indices.len() as u32;
        let mesh = ProtoMesh {
            name,
            submeshes: vec![SubMesh {
                material: key.material().clone(),
                first_index: 0,
                index_count,
            }],
            nodes: Vec::new(),
            index_count,
            device,
        };
        Ok(self.caches.decals.insert(key, Load::Created(mesh)))
    }

    pub fn skeleton(&mut self, name: &str) -> Handle<Skeleton> {
        let backends = self.backends;
        infallible(
            self.caches
                .skeletons
                .get_or_create(NameKey::new(name), |key| {
                    log::debug!("Loading skeleton {}", key);
                    let skeleton = backends.read_decoded(
                        AssetKind::Skeleton,
                        &names::skeleton_candidates(key.as_str()),
                        |n, b| {
                            let skeleton = backends.decoder.skeleton(n, b)?;
                            skeleton.validate()?;
                            Ok(skeleton)
                        },
                    );
                    Ok(skeleton.map_or(Load::Fallback, Load::Created))
                }),
        )
    }

    pub fn animation(&mut self, name: &str) -> Handle<Animation> {
        let backends = self.backends;
        infallible(
            self.caches
                .animations
                .get_or_create(NameKey::new(name), |key| {
                    log::debug!("Loading animation {}", key);
                    let animation = backends.read_decoded(
                        AssetKind::Animation,
                        &[key.as_str().to_string()],
                        |n, b| backends.decoder.animation(n, b),
                    );
                    Ok(animation.map_or(Load::Fallback, Load::Created))
                }),
        )
    }

    /// Binder between two cached assets. Handles that do not belong to this manager get the
    /// fallback binder, which is not cached under their key.
    pub fn bind_mesh(
        &mut self,
        mesh: Handle<ProtoMesh>,
        skeleton: Handle<Skeleton>,
    ) -> Handle<AttachBinder> {
        let Caches {
            binders,
            meshes,
            decals,
            skeletons,
            ..
        } = &mut *self.caches;

        let key = BindingKey { skeleton, mesh };
        if let Some(h) = binders.lookup(&key) {
            return h;
        }

        let mesh = meshes.get(&mesh).or_else(|| decals.get(&mesh));
        let skeleton = skeletons.get(&skeleton);
        match (mesh, skeleton) {
            (Some(mesh), Some(skeleton)) => {
                let binder = AttachBinder::new(skeleton, mesh);
                binders.insert(key, Load::Created(binder))
            }
            _ => {
                log::warn!("bind_mesh called with a stale or foreign handle");
                binders.fallback()
            }
        }
    }

    pub fn sound_buffer(&mut self, name: &str) -> Result<Handle<SoundBuffer>, ResourceError> {
        let backends = self.backends;
        self.caches
            .sound_buffers
            .get_or_create(NameKey::new(name), |key| {
                log::debug!("Loading sound {}", key);
                let data = backends.read_decoded(
                    AssetKind::Sound,
                    &[key.as_str().to_string()],
                    |n, b| backends.audio.decode_sound(n, b),
                );
                let data = match data {
                    Some(data) => data,
                    None => return Ok(Load::Fallback),
                };
                let device = backends
                    .audio
                    .upload_sound(&data)
                    .map_err(|e| ResourceError::upload(AssetKind::Sound, key.as_str(), e))?;
                Ok(Load::Created(SoundBuffer::new(&data, device)))
            })
    }

    pub fn sound(&mut self, name: &str) -> Result<Handle<SoundEffect>, ResourceError> {
        let key = NameKey::new(name);
        if let Some(h) = self.caches.sounds.lookup(&key) {
            return Ok(h);
        }

        let buffer = self.sound_buffer(key.as_str())?;
        if buffer == self.caches.sound_buffers.fallback() {
            return Ok(self.caches.sounds.insert(key, Load::Fallback));
        }

        let duration = self
            .caches
            .sound_buffers
            .get(&buffer)
            .map_or(Duration::ZERO, SoundBuffer::duration);
        let effect = SoundEffect { buffer, duration };
        Ok(self.caches.sounds.insert(key, Load::Created(effect)))
    }

    /// Font with glyph metrics from the `.FNT` next to `name`. The highlighted style uses the
    /// `_HI` texture when the archive has one.
    #[profiling::function]
    pub fn font(&mut self, name: &str, style: FontStyle) -> Result<Handle<Font>, ResourceError> {
        let key = FontKey::new(name, style);
        if let Some(h) = self.caches.fonts.lookup(&key) {
            return Ok(h);
        }

        log::debug!("Loading font {} ({:?})", key.name, style);
        let backends = self.backends;
        let metrics_name = names::font_metrics_name(key.name.as_str());
        let metrics = backends.read_decoded(AssetKind::Font, &[metrics_name], |n, b| {
            backends.decoder.font(n, b)
        });
        let metrics = match metrics {
            Some(metrics) => metrics,
            None => return Ok(self.caches.fonts.insert(key, Load::Fallback)),
        };

        let mut texture_name = key.name.as_str().to_string();
        if style == FontStyle::Highlighted {
            let hi = names::with_suffix(&texture_name, &normalize(&self.settings.highlight_suffix));
            if backends.has_any(&names::texture_candidates(&hi)) {
                texture_name = hi;
            }
        }
        let texture = self.texture(&texture_name)?;

        let font = Font {
            metrics,
            texture,
            color: style.color(),
            style,
        };
        Ok(self.caches.fonts.insert(key, Load::Created(font)))
    }

    pub fn default_font(&mut self, style: FontStyle) -> Result<Handle<Font>, ResourceError> {
        let settings = self.settings;
        self.font(&settings.default_font, style)
    }

    pub fn menu_font(&mut self) -> Result<Handle<Font>, ResourceError> {
        let settings = self.settings;
        self.font(&settings.menu_font, FontStyle::Normal)
    }

    pub fn dialog_font(&mut self) -> Result<Handle<Font>, ResourceError> {
        let settings = self.settings;
        self.font(&settings.dialog_font, FontStyle::Normal)
    }

    pub fn warning_font(&mut self) -> Result<Handle<Font>, ResourceError> {
        let settings = self.settings;
        self.font(&settings.warning_font, FontStyle::Normal)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub keys: usize,
    pub values: usize,
    pub hits: usize,
    pub misses: usize,
    pub fallbacks: usize,
}

impl CacheStats {
    fn of<K: std::hash::Hash + Eq, V>(cache: &ResourceCache<K, V>) -> Self {
        let Stats {
            hits,
            misses,
            fallbacks,
        } = cache.stats();
        Self {
            keys: cache.len(),
            values: cache.n_values(),
            hits,
            misses,
            fallbacks,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManagerStats {
    pub textures: CacheStats,
    pub texture_variants: CacheStats,
    pub meshes: CacheStats,
    pub decals: CacheStats,
    pub emitter_meshes: CacheStats,
    pub skeletons: CacheStats,
    pub animations: CacheStats,
    pub binders: CacheStats,
    pub sound_buffers: CacheStats,
    pub sounds: CacheStats,
    pub fonts: CacheStats,
}

impl ManagerStats {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, CacheStats)> {
        [
            ("textures", self.textures),
            ("texture variants", self.texture_variants),
            ("meshes", self.meshes),
            ("decals", self.decals),
            ("emitter meshes", self.emitter_meshes),
            ("skeletons", self.skeletons),
            ("animations", self.animations),
            ("binders", self.binders),
            ("sound buffers", self.sound_buffers),
            ("sounds", self.sounds),
            ("fonts", self.fonts),
        ]
        .into_iter()
    }
}

/// Loads, deduplicates and owns every asset of a game session.
///
/// Equal keys always give the same handle, and a handle stays valid until the manager is
/// dropped. Missing or undecodable assets resolve to a per-kind fallback. Upload failures are
/// returned as errors and are retried on the next request.
///
/// All fetches are serialized by one lock. Guards from [`Self::get`] are recursive reads, a
/// thread holding one can take more even while a writer is queued. Calling back into the
/// manager from inside [`Self::fetch`], or fetching while a guard from [`Self::get`] is held on
/// the same thread, is a bug. The former panics.
pub struct ResourceManager {
    backends: Backends,
    settings: Settings,
    locked: RwLock<Caches>,
    fallback_texture: Handle<Texture>,
    black: Handle<Texture>,
}

impl ResourceManager {
    pub fn builder() -> ResourceManagerBuilder {
        ResourceManagerBuilder::default()
    }

    fn id(&self) -> usize {
        self as *const Self as usize
    }

    /// Runs `f` with exclusive access to the caches.
    pub fn fetch<R>(&self, f: impl FnOnce(&mut Fetch<'_>) -> R) -> R {
        let _scope = FetchScope::enter(self.id());
        let mut caches = {
            profiling::scope!("lock");
            self.locked.write()
        };
        let mut fetch = Fetch {
            backends: &self.backends,
            settings: &self.settings,
            caches: &mut *caches,
        };
        f(&mut fetch)
    }

    /// Read access to a cached asset. `None` for handles this manager did not hand out.
    pub fn get<T: Asset>(&self, h: Handle<T>) -> Option<MappedRwLockReadGuard<'_, T>> {
        FetchScope::check(self.id());
        let r = RwLockReadGuard::try_map(self.locked.read_recursive(), |caches| {
            T::resolve(caches, h)
        })
        .ok();
        if r.is_none() {
            log::debug!("{} {} does not belong to this manager", T::KIND, h);
        }
        r
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.backends.archive.has_file(name)
    }

    /// Raw archive contents, not cached.
    pub fn file_data(&self, name: &str) -> Option<Vec<u8>> {
        self.backends.archive.read_file(name)
    }

    pub fn fallback_texture(&self) -> Handle<Texture> {
        self.fallback_texture
    }

    pub fn fallback_black(&self) -> Handle<Texture> {
        self.black
    }

    pub fn load_texture(&self, name: &str) -> Result<Handle<Texture>, ResourceError> {
        self.fetch(|f| f.texture(name))
    }

    pub fn load_texture_variant(
        &self,
        name: &str,
        v: i32,
        c: i32,
    ) -> Result<Handle<Texture>, ResourceError> {
        self.fetch(|f| f.texture_variant(name, v, c))
    }

    pub fn load_texture_anim(&self, name: &str) -> Result<Vec<Handle<Texture>>, ResourceError> {
        self.fetch(|f| f.texture_anim(name))
    }

    pub fn load_material(
        &self,
        desc: &MaterialDesc,
        alpha_test: bool,
    ) -> Result<Material, ResourceError> {
        self.fetch(|f| f.material(desc, alpha_test))
    }

    pub fn load_mesh(&self, name: &str) -> Result<Handle<ProtoMesh>, ResourceError> {
        self.fetch(|f| f.mesh(name))
    }

    pub fn load_emitter_mesh(&self, name: &str) -> Handle<EmitterMesh> {
        self.fetch(|f| f.emitter_mesh(name))
    }

    pub fn decal_mesh(&self, desc: &DecalDesc) -> Result<Handle<ProtoMesh>, ResourceError> {
        self.fetch(|f| f.decal_mesh(desc))
    }

    pub fn load_skeleton(&self, name: &str) -> Handle<Skeleton> {
        self.fetch(|f| f.skeleton(name))
    }

    pub fn load_animation(&self, name: &str) -> Handle<Animation> {
        self.fetch(|f| f.animation(name))
    }

    pub fn bind_mesh(
        &self,
        mesh: Handle<ProtoMesh>,
        skeleton: Handle<Skeleton>,
    ) -> Handle<AttachBinder> {
        self.fetch(|f| f.bind_mesh(mesh, skeleton))
    }

    pub fn load_sound_buffer(&self, name: &str) -> Result<Handle<SoundBuffer>, ResourceError> {
        self.fetch(|f| f.sound_buffer(name))
    }

    pub fn load_sound(&self, name: &str) -> Result<Handle<SoundEffect>, ResourceError> {
        self.fetch(|f| f.sound(name))
    }

    pub fn font(&self, name: &str, style: FontStyle) -> Result<Handle<Font>, ResourceError> {
        self.fetch(|f| f.font(name, style))
    }

    pub fn default_font(&self, style: FontStyle) -> Result<Handle<Font>, ResourceError> {
        self.fetch(|f| f.default_font(style))
    }

    pub fn menu_font(&self) -> Result<Handle<Font>, ResourceError> {
        self.fetch(|f| f.menu_font())
    }

    pub fn dialog_font(&self) -> Result<Handle<Font>, ResourceError> {
        self.fetch(|f| f.dialog_font())
    }

    pub fn warning_font(&self) -> Result<Handle<Font>, ResourceError> {
        self.fetch(|f| f.warning_font())
    }

    pub fn stats(&self) -> ManagerStats {
        FetchScope::check(self.id());
        let caches = self.locked.read_recursive();
        ManagerStats {
            textures: CacheStats::of(&caches.textures),
            texture_variants: CacheStats {
                keys: caches.texture_variants.len(),
                values: 0,
                hits: caches.variant_stats.hits,
                misses: caches.variant_stats.misses,
                fallbacks: caches.variant_stats.fallbacks,
            },
            meshes: CacheStats::of(&caches.meshes),
            decals: CacheStats::of(&caches.decals),
            emitter_meshes: CacheStats::of(&caches.emitter_meshes),
            skeletons: CacheStats::of(&caches.skeletons),
            animations: CacheStats::of(&caches.animations),
            binders: CacheStats::of(&caches.binders),
            sound_buffers: CacheStats::of(&caches.sound_buffers),
            sounds: CacheStats::of(&caches.sounds),
            fonts: CacheStats::of(&caches.fonts),
        }
    }
}

/// Collects the collaborators of a [`ResourceManager`].
///
/// An archive and a graphics device are required. The decoder defaults to [`ImageDecoder`] and
/// the audio device to [`HeadlessAudio`].
#[derive(Default)]
pub struct ResourceManagerBuilder {
    archive: Option<Box<dyn Archive>>,
    decoder: Option<Box<dyn Decoder>>,
    device: Option<Box<dyn Device>>,
    audio: Option<Box<dyn AudioDevice>>,
    settings: Settings,
}

impl ResourceManagerBuilder {
    pub fn archive(mut self, archive: impl Archive + 'static) -> Self {
        self.archive = Some(Box::new(archive));
        self
    }

    pub fn decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoder = Some(Box::new(decoder));
        self
    }

    pub fn device(mut self, device: impl Device + 'static) -> Self {
        self.device = Some(Box::new(device));
        self
    }

    pub fn audio(mut self, audio: impl AudioDevice + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Uploads the fallback assets, so this fails if the device does.
    pub fn build(self) -> Result<ResourceManager, ResourceError> {
        let archive = self
            .archive
            .ok_or_else(|| ResourceError::Configuration("no archive".to_string()))?;
        let device = self
            .device
            .ok_or_else(|| ResourceError::Configuration("no graphics device".to_string()))?;
        let backends = Backends {
            archive,
            decoder: self.decoder.unwrap_or_else(|| Box::new(ImageDecoder)),
            device,
            audio: self.audio.unwrap_or_else(|| Box::new(HeadlessAudio::new())),
        };

        let caches = Caches::new(&backends, &self.settings)?;
        log::info!("Resource manager ready");
        Ok(ResourceManager {
            fallback_texture: caches.textures.fallback(),
            black: caches.black,
            backends,
            settings: self.settings,
            locked: RwLock::new(caches),
        })
    }
}
