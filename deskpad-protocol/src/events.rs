//! Key events reported by the surface

/// Direction of a key state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyTransition {
    /// Key released
    Up,
    /// Key pressed
    Down,
}

// Wire format values
const TRANSITION_UP: u8 = 0x00;
const TRANSITION_DOWN: u8 = 0x01;

impl KeyTransition {
    /// Parse a transition from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            TRANSITION_UP => Some(KeyTransition::Up),
            TRANSITION_DOWN => Some(KeyTransition::Down),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            KeyTransition::Up => TRANSITION_UP,
            KeyTransition::Down => TRANSITION_DOWN,
        }
    }
}

/// A key event as delivered by a driver, before the transition is validated
///
/// Drivers forward whatever the hardware reported; the deck decides what to
/// do with transitions it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawKeyEvent {
    /// Physical key position, row-major from the top-left key
    pub slot: u8,
    /// Transition wire byte
    pub transition: u8,
}

impl RawKeyEvent {
    /// Build an event from a known transition
    pub const fn new(slot: u8, transition: KeyTransition) -> Self {
        Self {
            slot,
            transition: match transition {
                KeyTransition::Up => TRANSITION_UP,
                KeyTransition::Down => TRANSITION_DOWN,
            },
        }
    }

    /// Key pressed at `slot`
    pub const fn down(slot: u8) -> Self {
        Self::new(slot, KeyTransition::Down)
    }

    /// Key released at `slot`
    pub const fn up(slot: u8) -> Self {
        Self::new(slot, KeyTransition::Up)
    }

    /// Decode the transition, `None` if the byte is not a known transition
    pub fn transition(&self) -> Option<KeyTransition> {
        KeyTransition::from_byte(self.transition)
    }
}
