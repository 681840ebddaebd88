//! Process-wide asset cache
//!
//! Icons and rendered labels shared by several screens are loaded once, on
//! first use, and are read-only afterwards. Loading happens inside a
//! critical section, so concurrent first accesses from the input loop and a
//! background refresher still run the loader only once.
//!
//! ```ignore
//! static ICONS: AssetCache<KeyImage, 4> = AssetCache::new();
//! const HOME: AssetId = AssetId::new(0);
//!
//! let icon = ICONS.get_or_load(HOME, || text_icon("Home"))?;
//! ```

use embassy_sync::once_lock::OnceLock;

/// Key into an [`AssetCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AssetId(u16);

impl AssetId {
    /// Asset stored at `index`
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Position in the cache
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Asset cache errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssetError {
    /// Id is past the cache capacity
    UnknownAsset(AssetId),
}

impl core::fmt::Display for AssetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AssetError::UnknownAsset(id) => write!(f, "no asset slot {}", id.0),
        }
    }
}

impl core::error::Error for AssetError {}

/// Fixed set of lazily loaded assets
pub struct AssetCache<T, const K: usize> {
    slots: [OnceLock<T>; K],
}

impl<T, const K: usize> Default for AssetCache<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const K: usize> AssetCache<T, K> {
    /// Create a cache with nothing loaded
    pub const fn new() -> Self {
        Self {
            slots: [const { OnceLock::new() }; K],
        }
    }

    /// Number of asset slots
    pub const fn capacity(&self) -> usize {
        K
    }

    /// Get an asset, running `load` if this is the first access
    pub fn get_or_load<F>(&self, id: AssetId, load: F) -> Result<&T, AssetError>
    where
        F: FnOnce() -> T,
    {
        let slot = self
            .slots
            .get(id.index())
            .ok_or(AssetError::UnknownAsset(id))?;
        Ok(slot.get_or_init(load))
    }

    /// Get an asset if it was loaded already
    pub fn get(&self, id: AssetId) -> Option<&T> {
        self.slots.get(id.index())?.try_get()
    }

    /// Check if an asset was loaded
    pub fn is_loaded(&self, id: AssetId) -> bool {
        self.get(id).is_some()
    }
}
