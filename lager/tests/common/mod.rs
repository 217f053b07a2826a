#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lager::asset::{Animation, FontMetrics, Glyph, MeshData, Pixmap, Skeleton};
use lager::{
    AssetKind, DecodeError, Decoder, HeadlessDevice, MemoryArchive, ResourceManager,
    ResourceManagerBuilder,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("Failed to encode png");
    bytes.into_inner()
}

pub fn wav_bytes(n_samples: usize, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for i in 0..n_samples {
            writer.write_sample((i % 100) as i16).expect("wav sample");
        }
        writer.finalize().expect("wav finalize");
    }
    cursor.into_inner()
}

/// Decodes textures from any image format and everything else from tables filled in by the
/// test. Counts every call.
#[derive(Default)]
pub struct TestDecoder {
    calls: AtomicUsize,
    meshes: HashMap<String, MeshData>,
    skeletons: HashMap<String, Skeleton>,
    animations: HashMap<String, Animation>,
    fonts: HashMap<String, FontMetrics>,
}

impl TestDecoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn lookup<T: Clone>(table: &HashMap<String, T>, kind: AssetKind, name: &str) -> Result<T, DecodeError> {
    table
        .get(name)
        .cloned()
        .ok_or_else(|| DecodeError::malformed(kind, format!("no test data for {}", name)))
}

impl Decoder for TestDecoder {
    fn texture(&self, _name: &str, bytes: &[u8]) -> Result<Pixmap, DecodeError> {
        self.count();
        // Widen the window in which concurrent loads could race.
        std::thread::sleep(std::time::Duration::from_millis(5));
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Pixmap::new(width, height, image.into_raw())
    }

    fn mesh(&self, name: &str, _bytes: &[u8]) -> Result<MeshData, DecodeError> {
        self.count();
        lookup(&self.meshes, AssetKind::Mesh, name)
    }

    fn skeleton(&self, name: &str, _bytes: &[u8]) -> Result<Skeleton, DecodeError> {
        self.count();
        lookup(&self.skeletons, AssetKind::Skeleton, name)
    }

    fn animation(&self, name: &str, _bytes: &[u8]) -> Result<Animation, DecodeError> {
        self.count();
        lookup(&self.animations, AssetKind::Animation, name)
    }

    fn font(&self, name: &str, _bytes: &[u8]) -> Result<FontMetrics, DecodeError> {
        self.count();
        lookup(&self.fonts, AssetKind::Font, name)
    }
}

pub fn font_metrics(height: u32) -> FontMetrics {
    let mut glyphs = vec![Glyph::default(); 256];
    for g in glyphs.iter_mut().skip(32) {
        g.width = 6;
    }
    FontMetrics { height, glyphs }
}

/// Archive contents and decoder tables for one test.
#[derive(Default)]
pub struct Fixture {
    archive: MemoryArchive,
    decoder: TestDecoder,
}

pub struct Loaded {
    pub manager: ResourceManager,
    pub decoder: Arc<TestDecoder>,
    pub device: Arc<HeadlessDevice>,
}

impl Fixture {
    pub fn new() -> Self {
        init_logging();
        Self::default()
    }

    pub fn file(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.archive.insert(name, bytes);
        self
    }

    pub fn texture(self, name: &str, width: u32, height: u32) -> Self {
        self.file(name, png_bytes(width, height))
    }

    pub fn sound(self, name: &str, n_samples: usize, sample_rate: u32) -> Self {
        self.file(name, wav_bytes(n_samples, sample_rate))
    }

    pub fn mesh(mut self, name: &str, data: MeshData) -> Self {
        self.decoder.meshes.insert(name.to_ascii_uppercase(), data);
        self.file(name, b"mesh".to_vec())
    }

    pub fn skeleton(mut self, name: &str, skeleton: Skeleton) -> Self {
        self.decoder
            .skeletons
            .insert(name.to_ascii_uppercase(), skeleton);
        self.file(name, b"skeleton".to_vec())
    }

    pub fn animation(mut self, name: &str, animation: Animation) -> Self {
        self.decoder
            .animations
            .insert(name.to_ascii_uppercase(), animation);
        self.file(name, b"animation".to_vec())
    }

    pub fn font_metrics(mut self, name: &str, metrics: FontMetrics) -> Self {
        self.decoder
            .fonts
            .insert(name.to_ascii_uppercase(), metrics);
        self.file(name, b"fnt".to_vec())
    }

    pub fn builder(self) -> (ResourceManagerBuilder, Arc<TestDecoder>) {
        let decoder = Arc::new(self.decoder);
        let builder = ResourceManager::builder()
            .archive(self.archive)
            .decoder(decoder.clone());
        (builder, decoder)
    }

    pub fn build_with(self, device: HeadlessDevice) -> Loaded {
        let device = Arc::new(device);
        let (builder, decoder) = self.builder();
        let manager = builder
            .device(device.clone())
            .build()
            .expect("Failed to build resource manager");
        Loaded {
            manager,
            decoder,
            device,
        }
    }

    pub fn build(self) -> Loaded {
        self.build_with(HeadlessDevice::new())
    }
}
