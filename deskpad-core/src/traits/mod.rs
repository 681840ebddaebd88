//! Hardware abstraction traits
//!
//! These traits define the interface between the deck controller and a
//! concrete key surface driver (USB HID, simulator, test double).

pub mod device;

pub use device::{KeyDevice, KeyEventSource};
