//! Screen contract
//!
//! A screen is one navigational context: it decides what every key shows
//! and what a press on each key does. Screens are implemented outside this
//! crate (home, media player, playlist browser, settings, ...).

use crate::action::KeyPressAction;
use crate::context::KeyContext;
use crate::press::KeyPress;

/// One image (or nothing) per physical key, index-aligned to key position
pub type SlotGrid<I, const N: usize> = [Option<I>; N];

/// Errors a screen may return from its press handler
///
/// The deck logs these and keeps the current screen; it never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenError {
    /// The call context's deadline passed
    DeadlineExceeded,
    /// The call context was cancelled
    Cancelled,
    /// No behavior is bound to this key
    UnboundKey(u8),
    /// A collaborator (media player, audio, bluetooth, ...) is unreachable
    Unavailable,
    /// A collaborator rejected the request
    Collaborator(&'static str),
}

impl core::fmt::Display for ScreenError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScreenError::DeadlineExceeded => f.write_str("deadline exceeded"),
            ScreenError::Cancelled => f.write_str("cancelled"),
            ScreenError::UnboundKey(slot) => write!(f, "no action bound to key {}", slot),
            ScreenError::Unavailable => f.write_str("collaborator unavailable"),
            ScreenError::Collaborator(reason) => write!(f, "collaborator error: {}", reason),
        }
    }
}

impl core::error::Error for ScreenError {}

/// A logically grouped set of keys which are handled together
///
/// `I` is the image type of the key surface, `N` its key count. Every
/// method takes `&self`: the deck guarantees at most one `key_pressed` call
/// at a time, but `show` may run while background tasks update whatever
/// state the screen reads, so any mutable state lives behind the screen's
/// own interior mutability.
///
/// Screens are `Send + Sync` so a deck can be shared with tasks or threads
/// that only read its status.
pub trait Screen<I, const N: usize>: Send + Sync {
    /// Stable, unique name
    fn name(&self) -> &str;

    /// Icon other screens show on keys that navigate here
    fn icon(&self) -> I;

    /// Current image for every key
    fn show(&self) -> SlotGrid<I, N>;

    /// Handle a completed press on `slot`
    ///
    /// `ctx` carries the advisory deadline for this call.
    fn key_pressed(
        &self,
        ctx: &KeyContext<'_>,
        slot: u8,
        press: KeyPress,
    ) -> Result<KeyPressAction<I>, ScreenError>;
}
