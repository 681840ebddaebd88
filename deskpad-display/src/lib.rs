//! Key face rendering helpers for Deskpad screens
//!
//! Screens produce one image per key. This crate provides:
//! - `KeyCanvas`, an `embedded-graphics` draw target sized for one key, and
//!   the immutable `KeyImage` it produces
//! - `text_icon` for labelling keys with plain text
//! - `AssetCache`, a process-wide lazily loaded store for icons and other
//!   assets shared between screens and background refreshers
//! - `SlotLayout` for screens that page through content while keeping one
//!   column of navigation keys

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod assets;
pub mod image;
pub mod layout;
pub mod text;

pub use assets::{AssetCache, AssetError, AssetId};
pub use image::{KeyCanvas, KeyImage, DEFAULT_KEY_PX};
pub use layout::SlotLayout;
pub use text::{text_icon, text_icon_on, MAX_ROWS, ROW_CHARS};

pub use embedded_graphics::pixelcolor::Rgb888;
