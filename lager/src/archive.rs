//! Virtual archive: resolves asset names to bytes.
//!
//! Names are case-insensitive and identify a file by its base name only, directories inside
//! an archive carry no meaning.

use std::collections::HashMap;
use std::fs::DirEntry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ArchiveError;
use crate::key::normalize;

pub trait Archive: Send + Sync {
    fn has_file(&self, name: &str) -> bool;
    fn read_file(&self, name: &str) -> Option<Vec<u8>>;
}

impl<A: Archive + ?Sized> Archive for Box<A> {
    fn has_file(&self, name: &str) -> bool {
        (**self).has_file(name)
    }

    fn read_file(&self, name: &str) -> Option<Vec<u8>> {
        (**self).read_file(name)
    }
}

impl<A: Archive + ?Sized> Archive for Arc<A> {
    fn has_file(&self, name: &str) -> bool {
        (**self).has_file(name)
    }

    fn read_file(&self, name: &str) -> Option<Vec<u8>> {
        (**self).read_file(name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryArchive {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(normalize(name), bytes.into());
    }

    pub fn with_file(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Archive for MemoryArchive {
    fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(&normalize(name))
    }

    fn read_file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.get(&normalize(name)).cloned()
    }
}

/// A directory tree on disk. The tree is indexed once on open, files are read on demand.
#[derive(Debug)]
pub struct DirArchive {
    root: PathBuf,
    index: HashMap<String, PathBuf>,
}

impl DirArchive {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ArchiveError::NotADirectory(root));
        }

        let mut queue: Vec<DirEntry> = Vec::new();
        let mut files: Vec<PathBuf> = Vec::new();
        let queue_dir = |q: &mut Vec<DirEntry>, path: &Path| -> Result<(), ArchiveError> {
            for entry in std::fs::read_dir(path)? {
                q.push(entry?);
            }
            Ok(())
        };

        queue_dir(&mut queue, &root)?;
        while let Some(entry) = queue.pop() {
            let path = entry.path();
            if path.is_dir() {
                queue_dir(&mut queue, &path)?;
            } else if path.is_file() {
                files.push(path);
            }
        }

        // Sorted so that the winner among duplicate names does not depend on read_dir order.
        files.sort();
        let mut index: HashMap<String, PathBuf> = HashMap::with_capacity(files.len());
        for path in files {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                log::warn!("Skipping non UTF-8 file name {}", path.display());
                continue;
            };
            let name = normalize(name);
            if let Some(prev) = index.get(&name) {
                log::debug!("{} is shadowed by {}", path.display(), prev.display());
                continue;
            }
            index.insert(name, path);
        }

        log::info!("Indexed {} files under {}", index.len(), root.display());
        Ok(Self { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<&PathBuf> {
        self.index.get(&normalize(name))
    }
}

impl Archive for DirArchive {
    fn has_file(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn read_file(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.lookup(name)?;
        log::trace!("Loading {} from {}", name, path.display());
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Archives in priority order, the first one that has a file wins.
#[derive(Default)]
pub struct ArchiveStack {
    archives: Vec<Box<dyn Archive>>,
}

impl ArchiveStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `archive` below all archives added so far.
    pub fn push(&mut self, archive: impl Archive + 'static) {
        self.archives.push(Box::new(archive));
    }

    pub fn with(mut self, archive: impl Archive + 'static) -> Self {
        self.push(archive);
        self
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }
}

impl Archive for ArchiveStack {
    fn has_file(&self, name: &str) -> bool {
        self.archives.iter().any(|a| a.has_file(name))
    }

    fn read_file(&self, name: &str) -> Option<Vec<u8>> {
        self.archives
            .iter()
            .find(|a| a.has_file(name))
            .and_then(|a| a.read_file(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_archive_ignores_case() {
        let archive = MemoryArchive::new().with_file("Menu_Back.tga", vec![1, 2, 3]);
        assert!(archive.has_file("MENU_BACK.TGA"));
        assert_eq!(archive.read_file("menu_back.TGA"), Some(vec![1, 2, 3]));
        assert!(!archive.has_file("MENU_BACK.TEX"));
        assert_eq!(archive.read_file("missing"), None);
    }

    #[test]
    fn stack_prefers_first() {
        let stack = ArchiveStack::new()
            .with(MemoryArchive::new().with_file("A.TGA", vec![1]))
            .with(
                MemoryArchive::new()
                    .with_file("A.TGA", vec![2])
                    .with_file("B.TGA", vec![3]),
            );
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.read_file("a.tga"), Some(vec![1]));
        assert_eq!(stack.read_file("b.tga"), Some(vec![3]));
        assert!(!stack.has_file("c.tga"));
        assert_eq!(stack.read_file("c.tga"), None);
    }

    #[test]
    fn dir_archive_indexes_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("textures/menu")).unwrap();
        std::fs::write(dir.path().join("textures/menu/Back.tga"), b"tga").unwrap();
        std::fs::write(dir.path().join("Humans.mdh"), b"mdh").unwrap();

        let archive = DirArchive::open(dir.path()).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.has_file("BACK.TGA"));
        assert_eq!(archive.read_file("back.tga"), Some(b"tga".to_vec()));
        assert_eq!(archive.read_file("HUMANS.MDH"), Some(b"mdh".to_vec()));
        assert!(!archive.has_file("TEXTURES"));
    }

    #[test]
    fn dir_archive_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"").unwrap();
        assert!(matches!(
            DirArchive::open(&file),
            Err(ArchiveError::NotADirectory(_))
        ));
    }
}
