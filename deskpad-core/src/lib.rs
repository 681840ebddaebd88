//! Board-agnostic core logic for Deskpad control surfaces
//!
//! This crate contains everything between the key surface driver and the
//! individual screens:
//!
//! - Device driver traits (key output, event stream)
//! - The `Screen` contract and the screen registry used to wire screens
//!   into a navigation graph
//! - Press classification (short/long)
//! - The `Deck` controller: event loop, serialized dispatch, repaints
//! - Configuration type definitions
//!
//! # Architecture
//!
//! ```text
//! driver ──RawKeyEvent──▶ Deck::run ──KeyPress──▶ active Screen
//!   ▲                                                   │
//!   └────── clear / fill ◀── Deck ◀──KeyPressAction─────┘
//! ```
//!
//! Exactly one screen is active at a time. Screens never talk to the driver
//! directly; they describe what the keys should show and the deck repaints.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod action;
pub mod config;
pub mod context;
pub mod deck;
pub mod press;
pub mod registry;
pub mod screen;
pub mod traits;

pub use action::KeyPressAction;
pub use config::{ConfigError, DeckConfig};
pub use context::{CancelToken, KeyContext};
pub use deck::{Deck, DeckError, DeckStatus};
pub use press::{KeyPress, PressState, PressTracker};
pub use registry::{RegistryBuilder, RegistryError, ScreenId, ScreenRegistry};
pub use screen::{Screen, ScreenError, SlotGrid};
pub use traits::{KeyDevice, KeyEventSource};

/// Key count of the reference hardware (5x3 grid)
pub const DEFAULT_KEY_COUNT: usize = 15;
