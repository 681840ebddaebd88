//! Screen registry
//!
//! Screens navigate to each other, and the navigation graph is usually
//! cyclic (home → player → home). Instead of holding references to each
//! other, screens hold [`ScreenId`] handles into a registry that is filled
//! once at wiring time and read-only afterwards.
//!
//! Wiring a cycle:
//! 1. `reserve()` an id for every screen that others need to link to
//! 2. construct the screens, passing them the ids they link to
//! 3. `install()` each screen under its reserved id
//! 4. `build()` checks that every reserved id was filled

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::screen::Screen;

/// Handle to a screen in a [`ScreenRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenId(u16);

impl ScreenId {
    /// Position in the registry
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Registry wiring errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Id was not reserved by this builder
    UnknownId(ScreenId),
    /// A screen was already installed under this id
    AlreadyInstalled(ScreenId),
    /// Id was reserved but no screen was installed
    Unfilled(ScreenId),
    /// Screen name is already used by an earlier screen
    DuplicateName(ScreenId),
    /// More screens than ids
    Full,
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistryError::UnknownId(id) => write!(f, "screen id {} was never reserved", id.0),
            RegistryError::AlreadyInstalled(id) => {
                write!(f, "screen id {} already has a screen", id.0)
            }
            RegistryError::Unfilled(id) => write!(f, "screen id {} has no screen", id.0),
            RegistryError::DuplicateName(id) => {
                write!(f, "screen id {} reuses an existing name", id.0)
            }
            RegistryError::Full => f.write_str("screen registry is full"),
        }
    }
}

impl core::error::Error for RegistryError {}

type BoxedScreen<'a, I, const N: usize> = Box<dyn Screen<I, N> + 'a>;

/// Collects screens at wiring time
pub struct RegistryBuilder<'a, I, const N: usize> {
    screens: Vec<Option<BoxedScreen<'a, I, N>>>,
}

impl<I, const N: usize> Default for RegistryBuilder<'_, I, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, I, const N: usize> RegistryBuilder<'a, I, N> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            screens: Vec::new(),
        }
    }

    /// Reserve an id for a screen that is not constructed yet
    pub fn reserve(&mut self) -> Result<ScreenId, RegistryError> {
        let index = u16::try_from(self.screens.len()).map_err(|_| RegistryError::Full)?;
        self.screens.push(None);
        Ok(ScreenId(index))
    }

    /// Install a screen under a previously reserved id
    pub fn install<S>(&mut self, id: ScreenId, screen: S) -> Result<(), RegistryError>
    where
        S: Screen<I, N> + 'a,
    {
        let slot = self
            .screens
            .get_mut(id.index())
            .ok_or(RegistryError::UnknownId(id))?;
        if slot.is_some() {
            return Err(RegistryError::AlreadyInstalled(id));
        }
        *slot = Some(Box::new(screen));
        Ok(())
    }

    /// Reserve and install in one step, for screens nothing links to yet
    pub fn register<S>(&mut self, screen: S) -> Result<ScreenId, RegistryError>
    where
        S: Screen<I, N> + 'a,
    {
        let id = self.reserve()?;
        self.install(id, screen)?;
        Ok(id)
    }

    /// Finish wiring
    pub fn build(self) -> Result<ScreenRegistry<'a, I, N>, RegistryError> {
        let mut screens = Vec::with_capacity(self.screens.len());
        for (index, slot) in self.screens.into_iter().enumerate() {
            let id = ScreenId(index as u16);
            let screen = slot.ok_or(RegistryError::Unfilled(id))?;
            if screens
                .iter()
                .any(|s: &BoxedScreen<'a, I, N>| s.name() == screen.name())
            {
                return Err(RegistryError::DuplicateName(id));
            }
            screens.push(screen);
        }
        Ok(ScreenRegistry { screens })
    }
}

/// Read-only set of wired screens
pub struct ScreenRegistry<'a, I, const N: usize> {
    screens: Vec<BoxedScreen<'a, I, N>>,
}

impl<'a, I, const N: usize> ScreenRegistry<'a, I, N> {
    /// Look up a screen by id
    pub fn get(&self, id: ScreenId) -> Option<&(dyn Screen<I, N> + 'a)> {
        self.screens.get(id.index()).map(|s| s.as_ref())
    }

    /// Check if `id` belongs to this registry
    pub fn contains(&self, id: ScreenId) -> bool {
        id.index() < self.screens.len()
    }

    /// Find a screen id by name
    pub fn find(&self, name: &str) -> Option<ScreenId> {
        self.screens
            .iter()
            .position(|s| s.name() == name)
            .map(|index| ScreenId(index as u16))
    }

    /// Name of a screen
    pub fn name(&self, id: ScreenId) -> Option<&str> {
        self.get(id).map(|s| s.name())
    }

    /// Icon of a screen, for keys linking to it
    pub fn icon(&self, id: ScreenId) -> Option<I> {
        self.get(id).map(|s| s.icon())
    }

    /// Number of screens
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    /// Check if no screens were registered
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// All screen ids, in registration order
    pub fn ids(&self) -> impl Iterator<Item = ScreenId> + '_ {
        (0..self.screens.len()).map(|index| ScreenId(index as u16))
    }
}
