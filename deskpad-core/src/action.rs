//! Results of a handled key press

use crate::registry::ScreenId;

/// What the deck should do after a screen handled a press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPressAction<I> {
    /// Make another screen active and repaint every key
    ChangeScreen(ScreenId),
    /// Replace the image of the pressed key only
    UpdateIcon(I),
    /// Repaint every key of the current screen
    RefreshScreen,
    /// Nothing visible changes
    Noop,
}

impl<I> KeyPressAction<I> {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            KeyPressAction::ChangeScreen(_) => "change screen",
            KeyPressAction::UpdateIcon(_) => "update icon",
            KeyPressAction::RefreshScreen => "refresh screen",
            KeyPressAction::Noop => "noop",
        }
    }

    /// Check if applying this action touches the device
    pub fn is_visible(&self) -> bool {
        !matches!(self, KeyPressAction::Noop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(KeyPressAction::<u8>::RefreshScreen.is_visible());
        assert!(KeyPressAction::UpdateIcon(7u8).is_visible());
        assert!(!KeyPressAction::<u8>::Noop.is_visible());
    }

    #[test]
    fn test_names() {
        assert_eq!(KeyPressAction::<u8>::Noop.name(), "noop");
        assert_eq!(KeyPressAction::UpdateIcon(1u8).name(), "update icon");
    }
}
