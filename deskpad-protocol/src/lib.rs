//! Deskpad key surface protocol
//!
//! This crate defines what a key surface reports to the host: which key moved
//! and in which direction. It sits below the deck controller and above the
//! USB/HID transport.
//!
//! Only the decoded form of a key event lives here. Reading the hardware's
//! key-state reports and uploading key images is the driver's job.

#![no_std]
#![deny(unsafe_code)]

pub mod events;
pub mod model;

pub use events::{KeyTransition, RawKeyEvent};
pub use model::DeviceModel;
