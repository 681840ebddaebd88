//! Key surface driver traits

use core::fmt::Debug;
use core::future::Future;

use deskpad_protocol::RawKeyEvent;

/// Stream of key events from a subscribed device
pub trait KeyEventSource {
    /// Wait for the next key event
    ///
    /// Returns `None` once the stream is closed (device unplugged or driver
    /// shut down). No further events are expected after that.
    fn next_event(&mut self) -> impl Future<Output = Option<RawKeyEvent>>;
}

/// Trait for key surface output and subscription
///
/// The driver owns the byte-level image protocol. The deck only ever asks
/// for whole keys to be cleared or filled.
pub trait KeyDevice {
    /// Image type the driver can upload to a key
    type Image;

    /// Driver error, logged by the deck and otherwise ignored
    type Error: Debug;

    /// Event stream returned by [`KeyDevice::subscribe`]
    type Events: KeyEventSource;

    /// Device serial number
    fn serial(&self) -> &str;

    /// Number of physical keys
    fn key_count(&self) -> usize;

    /// Blank every key
    fn clear_all_keys(&mut self) -> Result<(), Self::Error>;

    /// Blank a single key
    ///
    /// - `slot`: key index (0-based, row-major from the top-left)
    fn clear_key(&mut self, slot: u8) -> Result<(), Self::Error>;

    /// Upload an image to a single key
    ///
    /// - `slot`: key index (0-based, row-major from the top-left)
    /// - `image`: image to show, scaled by the driver if needed
    fn fill_image(&mut self, slot: u8, image: &Self::Image) -> Result<(), Self::Error>;

    /// Start receiving key events
    fn subscribe(&mut self) -> Self::Events;
}
