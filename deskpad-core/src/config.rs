//! Deck configuration
//!
//! Timing knobs for press classification and handler calls. Loading from a
//! file is up to the caller; with the `toml` feature a `[deck]` table can be
//! parsed directly.

use embassy_time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default long press threshold (ms)
pub const DEFAULT_LONG_PRESS_MS: u32 = 500;

/// Default advisory deadline for a screen's press handler (ms)
pub const DEFAULT_HANDLER_TIMEOUT_MS: u32 = 2000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Long press threshold must be non-zero
    ZeroLongPress,
    /// Handler timeout must be non-zero
    ZeroHandlerTimeout,
    /// Document is not valid TOML or has wrongly typed values
    Parse,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroLongPress => f.write_str("long_press_ms must be greater than zero"),
            ConfigError::ZeroHandlerTimeout => {
                f.write_str("handler_timeout_ms must be greater than zero")
            }
            ConfigError::Parse => f.write_str("invalid deck configuration document"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Deck timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeckConfig {
    /// Presses held at least this long are long presses
    pub long_press_ms: u32,
    /// Advisory deadline handed to press handlers
    pub handler_timeout_ms: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            handler_timeout_ms: DEFAULT_HANDLER_TIMEOUT_MS,
        }
    }
}

impl DeckConfig {
    /// Check the values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.long_press_ms == 0 {
            return Err(ConfigError::ZeroLongPress);
        }
        if self.handler_timeout_ms == 0 {
            return Err(ConfigError::ZeroHandlerTimeout);
        }
        Ok(())
    }

    /// Long press threshold
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms as u64)
    }

    /// Handler deadline
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.handler_timeout_ms as u64)
    }

    /// Parse and validate the `[deck]` table of a TOML document
    ///
    /// Missing keys (or a missing table) fall back to the defaults.
    #[cfg(feature = "toml")]
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Document {
            deck: DeckConfig,
        }

        let document: Document = toml::from_str(input).map_err(|_| ConfigError::Parse)?;
        document.deck.validate()?;
        Ok(document.deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeckConfig::default();
        assert_eq!(config.long_press(), Duration::from_millis(500));
        assert_eq!(config.handler_timeout(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = DeckConfig {
            long_press_ms: 0,
            ..DeckConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroLongPress));

        let config = DeckConfig {
            handler_timeout_ms: 0,
            ..DeckConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroHandlerTimeout));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml() {
        let config = DeckConfig::from_toml(
            r#"
            # Slower fingers
            [deck]
            long_press_ms = 800
            "#,
        )
        .unwrap();
        assert_eq!(config.long_press_ms, 800);
        assert_eq!(config.handler_timeout_ms, DEFAULT_HANDLER_TIMEOUT_MS);

        assert_eq!(DeckConfig::from_toml("").unwrap(), DeckConfig::default());
        assert_eq!(
            DeckConfig::from_toml("[deck]\nlong_press_ms = \"soon\""),
            Err(ConfigError::Parse)
        );
        assert_eq!(
            DeckConfig::from_toml("[deck]\nhandler_timeout_ms = 0"),
            Err(ConfigError::ZeroHandlerTimeout)
        );
    }
}
