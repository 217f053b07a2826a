use std::sync::atomic::{AtomicU32, Ordering};

use super::Handle;

// Zero is never handed out so that a default ID never resolves.
static NEXT_STORAGE: AtomicU32 = AtomicU32::new(1);

/// Identifies an item by its slot and the storage instance that owns the slot.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct ID {
    index: u32,
    storage: u32,
}

impl ID {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn storage(&self) -> u32 {
        self.storage
    }
}

impl std::fmt::Display for ID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID {{ i: {}, s: {} }}", self.index, self.storage)
    }
}

/// Append-only arena.
///
/// Items are never moved out or dropped before the storage itself, so a handle that was valid
/// once stays valid. Every storage gets a process-wide unique stamp that is baked into its
/// handles, a handle from another (possibly already dropped) storage never resolves here.
pub struct Storage<T> {
    items: Vec<T>,
    stamp: u32,
}

impl<T> Storage<T> {
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    #[inline]
    pub fn with_capacity(cap: u32) -> Self {
        let stamp = NEXT_STORAGE.fetch_add(1, Ordering::Relaxed);
        assert!(stamp != 0, "Storage stamps exhausted");
        Self {
            items: Vec::with_capacity(cap as usize),
            stamp,
        }
    }

    #[inline]
    pub fn add(&mut self, data: T) -> Handle<T> {
        assert!(
            self.items.len() < u32::MAX as usize,
            "Storage is full ({} items)",
            self.items.len()
        );
        let index = self.items.len() as u32;
        self.items.push(data);

        Handle::<T>::new(ID {
            index,
            storage: self.stamp,
        })
    }

    /// True if `h` was issued by this storage.
    #[inline]
    pub fn owns(&self, h: &Handle<T>) -> bool {
        h.id().storage == self.stamp
    }

    #[inline]
    pub fn has(&self, h: &Handle<T>) -> bool {
        self.owns(h) && (h.id().index as usize) < self.items.len()
    }

    #[inline]
    pub fn get(&self, h: &Handle<T>) -> Option<&T> {
        if !self.owns(h) {
            return None;
        }
        self.items.get(h.id().index as usize)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        let stamp = self.stamp;
        self.items.iter().enumerate().map(move |(i, item)| {
            (
                Handle::<T>::new(ID {
                    index: i as u32,
                    storage: stamp,
                }),
                item,
            )
        })
    }
}

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}
