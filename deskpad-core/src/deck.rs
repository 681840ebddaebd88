//! Deck controller
//!
//! Owns the active screen, drains the driver's event stream, classifies
//! presses and applies the screens' answers to the keys.
//!
//! Locking:
//! - `dispatch` (async mutex) spans "read active screen" through the screen's
//!   press handler, so at most one handler runs at a time and a screen swap
//!   never races a handler on the previous screen
//! - `device` (async mutex) covers one driver call sequence; repaints run
//!   outside `dispatch`. Driver I/O never runs inside a critical section.
//! - `active` (blocking mutex) only guards a copy of the screen handle

use core::cell::Cell;

use deskpad_protocol::{KeyTransition, RawKeyEvent};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Instant;

use crate::action::KeyPressAction;
use crate::config::{ConfigError, DeckConfig};
use crate::context::CancelToken;
use crate::fmt::Dbg;
use crate::press::{KeyPress, PressTracker};
use crate::registry::{ScreenId, ScreenRegistry};
use crate::screen::Screen;
use crate::traits::{KeyDevice, KeyEventSource};

/// Longest device serial kept for status reports
pub const MAX_SERIAL_LEN: usize = 64;

/// Deck construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeckError {
    /// Initial screen is not in the registry
    UnknownScreen(ScreenId),
    /// Screens were built for a different key count than the device has
    KeyCountMismatch { device: usize, grid: usize },
    /// Configuration failed validation
    InvalidConfig(ConfigError),
}

impl core::fmt::Display for DeckError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeckError::UnknownScreen(id) => {
                write!(f, "initial screen {} is not registered", id.index())
            }
            DeckError::KeyCountMismatch { device, grid } => write!(
                f,
                "device has {} keys but screens have {} slots",
                device, grid
            ),
            DeckError::InvalidConfig(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl core::error::Error for DeckError {}

impl From<ConfigError> for DeckError {
    fn from(e: ConfigError) -> Self {
        DeckError::InvalidConfig(e)
    }
}

/// Snapshot for external status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeckStatus<'a> {
    /// Device serial number
    pub serial: &'a str,
    /// Active screen handle
    pub screen: ScreenId,
    /// Active screen name
    pub screen_name: &'a str,
}

/// The controller for one key surface
///
/// - `M`: raw mutex flavor, e.g. `CriticalSectionRawMutex`
/// - `D`: key surface driver
/// - `N`: number of keys, shared by every screen's grid
///
/// With a `Sync` raw mutex and a `Send` driver the deck is `Sync`, so a
/// status reporter on another thread can read [`Deck::status`] while
/// [`Deck::run`] is active.
pub struct Deck<'a, M: RawMutex, D: KeyDevice, const N: usize> {
    /// Driver, borrowed for one call sequence at a time
    device: Mutex<M, D>,
    /// Every screen the deck can navigate to
    screens: ScreenRegistry<'a, D::Image, N>,
    /// Active screen, written only by `change_screen` while holding `dispatch`
    active: BlockingMutex<M, Cell<ScreenId>>,
    /// Serializes screen handler calls against screen swaps
    dispatch: Mutex<M, ()>,
    config: DeckConfig,
    serial: heapless::String<MAX_SERIAL_LEN>,
}

impl<'a, M: RawMutex, D: KeyDevice, const N: usize> Deck<'a, M, D, N> {
    /// Create a deck showing `initial` once [`Deck::run`] starts
    pub fn new(
        device: D,
        screens: ScreenRegistry<'a, D::Image, N>,
        initial: ScreenId,
        config: DeckConfig,
    ) -> Result<Self, DeckError> {
        config.validate()?;
        if !screens.contains(initial) {
            return Err(DeckError::UnknownScreen(initial));
        }
        if device.key_count() != N {
            return Err(DeckError::KeyCountMismatch {
                device: device.key_count(),
                grid: N,
            });
        }

        // Longer serials are truncated; they are only used for reporting
        let mut serial = heapless::String::new();
        for c in device.serial().chars() {
            if serial.push(c).is_err() {
                break;
            }
        }

        Ok(Self {
            device: Mutex::new(device),
            screens,
            active: BlockingMutex::new(Cell::new(initial)),
            dispatch: Mutex::new(()),
            config,
            serial,
        })
    }

    /// Device serial number
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Active configuration
    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Registered screens
    pub fn screens(&self) -> &ScreenRegistry<'a, D::Image, N> {
        &self.screens
    }

    /// Handle of the active screen
    pub fn active_screen(&self) -> ScreenId {
        self.active.lock(|active| active.get())
    }

    /// Name of the active screen
    pub fn active_screen_name(&self) -> &str {
        self.screen(self.active_screen()).name()
    }

    /// Status snapshot
    pub fn status(&self) -> DeckStatus<'_> {
        let screen = self.active_screen();
        DeckStatus {
            serial: &self.serial,
            screen,
            screen_name: self.screen(screen).name(),
        }
    }

    /// Run the input loop until `cancel` fires or the event stream closes
    ///
    /// Paints the active screen first. On exit every key is cleared. Faults
    /// are logged, never returned.
    pub async fn run(&self, cancel: &CancelToken<M>) {
        info!("deck {} starting on screen {}", self.serial(), self.active_screen_name());
        self.refresh_screen().await;

        let mut events = self.device.lock().await.subscribe();
        let mut tracker = PressTracker::new(self.config.long_press());

        loop {
            match select(cancel.cancelled(), events.next_event()).await {
                Either::First(()) => {
                    info!("deck {} cancelled", self.serial());
                    break;
                }
                Either::Second(None) => {
                    warn!("deck {} event stream closed", self.serial());
                    break;
                }
                Either::Second(Some(event)) => {
                    self.handle_event(&mut tracker, event, cancel).await;
                }
            }
        }

        self.clear_all_keys().await;
    }

    /// Feed one raw event through the press state machine
    async fn handle_event(
        &self,
        tracker: &mut PressTracker,
        event: RawKeyEvent,
        cancel: &CancelToken<M>,
    ) {
        if usize::from(event.slot) >= N {
            warn!("key event for slot {} outside the {} key grid, ignored", event.slot, N);
            return;
        }

        match event.transition() {
            Some(KeyTransition::Down) => {
                trace!("key {} down", event.slot);
                tracker.key_down(event.slot, Instant::now());
            }
            Some(KeyTransition::Up) => match tracker.key_up(Instant::now()) {
                Some(press) => {
                    trace!("key {} up, {}", event.slot, press);
                    self.dispatch(event.slot, press, cancel).await;
                }
                None => debug!("key {} up without a down, ignored", event.slot),
            },
            None => warn!(
                "unrecognized transition {} on key {}, ignored",
                event.transition, event.slot
            ),
        }
    }

    /// Hand a classified press to the active screen and apply its answer
    ///
    /// The handler gets a context bounded by the configured handler timeout
    /// and tied to `cancel`. A handler error leaves the deck untouched.
    pub async fn dispatch(&self, slot: u8, press: KeyPress, cancel: &CancelToken<M>) {
        let ctx = cancel.context(self.config.handler_timeout());

        let (name, result) = {
            let _guard = self.dispatch.lock().await;
            let screen = self.screen(self.active_screen());
            (screen.name(), screen.key_pressed(&ctx, slot, press))
        };

        match result {
            Ok(action) => self.apply(slot, action).await,
            Err(e) => warn!("screen {} failed to handle key {}: {}", name, slot, e),
        }
    }

    async fn apply(&self, slot: u8, action: KeyPressAction<D::Image>) {
        debug!("key {}: {}", slot, action.name());
        match action {
            KeyPressAction::ChangeScreen(id) => self.change_screen(id).await,
            KeyPressAction::UpdateIcon(image) => {
                let result = self.device.lock().await.fill_image(slot, &image);
                if let Err(e) = result {
                    warn!("failed to update key {}: {}", slot, Dbg(&e));
                }
            }
            KeyPressAction::RefreshScreen => self.refresh_screen().await,
            KeyPressAction::Noop => {}
        }
    }

    /// Make `id` the active screen and repaint it
    ///
    /// # Panics
    ///
    /// If `id` is not in this deck's registry. Screens only hold handles
    /// from the registry they were wired into, so this is a wiring defect.
    pub async fn change_screen(&self, id: ScreenId) {
        let screen = self.screen(id);
        {
            let _guard = self.dispatch.lock().await;
            self.active.lock(|active| active.set(id));
        }
        info!("screen changed to {}", screen.name());
        self.paint(id).await;
    }

    /// Repaint every key of the active screen
    pub async fn refresh_screen(&self) {
        self.paint(self.active_screen()).await;
    }

    /// Clear every key, then fill or clear each slot from the screen's grid
    async fn paint(&self, id: ScreenId) {
        let grid = self.screen(id).show();
        trace!("painting screen {}", self.screen(id).name());

        let mut device = self.device.lock().await;
        if let Err(e) = device.clear_all_keys() {
            warn!("failed to clear keys: {}", Dbg(&e));
        }
        for (slot, entry) in (0..=u8::MAX).zip(grid.iter()) {
            let result = match entry {
                Some(image) => device.fill_image(slot, image),
                None => device.clear_key(slot),
            };
            if let Err(e) = result {
                warn!("failed to paint key {}: {}", slot, Dbg(&e));
            }
        }
    }

    async fn clear_all_keys(&self) {
        let result = self.device.lock().await.clear_all_keys();
        if let Err(e) = result {
            warn!("failed to clear keys on shutdown: {}", Dbg(&e));
        }
    }

    fn screen(&self, id: ScreenId) -> &(dyn Screen<D::Image, N> + 'a) {
        self.screens
            .get(id)
            .unwrap_or_else(|| panic!("screen {} is not registered with this deck", id.index()))
    }
}
