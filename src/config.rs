//! Configuration management for the LCD tool.
//!
//! Handles loading, saving, and validating configuration from JSON files.

use crate::display::{GammaCurve, Orientation, PixelFormat, Wiring};
use crate::transport::BusAddress;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/st7735s-lcd/config.json";

/// Highest BCM GPIO number on the 40-pin header
const MAX_HEADER_GPIO: u8 = 27;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// SPI bus number (spidev<bus>.x)
    #[serde(default)]
    pub spi_bus: u8,

    /// SPI chip select line (spidevx.<chip_select>)
    #[serde(default)]
    pub chip_select: u8,

    /// SPI clock in Hz
    #[serde(default = "default_spi_speed_hz")]
    pub spi_speed_hz: u32,

    /// Data/Command pin (BCM numbering)
    #[serde(default = "default_dc_pin")]
    pub dc_pin: u8,

    /// Reset pin (BCM numbering), null if not connected
    #[serde(default = "default_reset_pin")]
    pub reset_pin: Option<u8>,

    /// "full" (18-bit) or "reduced" (12-bit) pixels
    #[serde(default)]
    pub pixel_format: PixelFormat,

    /// Orientation 0-3 applied after initialization
    #[serde(default)]
    pub orientation: u8,

    /// Gamma level 0-3 applied after initialization
    #[serde(default = "default_gamma")]
    pub gamma: u8,

    /// Display inversion
    #[serde(default)]
    pub inverted: bool,
}

fn default_spi_speed_hz() -> u32 {
    15_000_000
}

fn default_dc_pin() -> u8 {
    24
}

fn default_reset_pin() -> Option<u8> {
    Some(25)
}

fn default_gamma() -> u8 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spi_bus: 0,
            chip_select: 0,
            spi_speed_hz: default_spi_speed_hz(),
            dc_pin: default_dc_pin(),
            reset_pin: default_reset_pin(),
            pixel_format: PixelFormat::default(),
            orientation: 0,
            gamma: default_gamma(),
            inverted: false,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or return the default config
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config from {}: {}", path.display(), e);
            tracing::info!("Using default configuration");
            Self::default()
        })
    }

    /// Save configuration to a JSON file atomically
    ///
    /// Writes to a temporary file first, then renames it over the target.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &content)?;

        std::fs::rename(&tmp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            ConfigError::ReadError(e)
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spi_bus > 6 {
            return Err(ConfigError::ValidationError(format!(
                "spi_bus {} must be between 0 and 6",
                self.spi_bus
            )));
        }

        if self.chip_select > 2 {
            return Err(ConfigError::ValidationError(format!(
                "chip_select {} must be between 0 and 2",
                self.chip_select
            )));
        }

        if !(100_000..=65_000_000).contains(&self.spi_speed_hz) {
            return Err(ConfigError::ValidationError(format!(
                "spi_speed_hz {} must be between 100000 and 65000000",
                self.spi_speed_hz
            )));
        }

        if self.dc_pin > MAX_HEADER_GPIO {
            return Err(ConfigError::ValidationError(format!(
                "dc_pin {} is not a header GPIO (0-{})",
                self.dc_pin, MAX_HEADER_GPIO
            )));
        }

        if let Some(rs) = self.reset_pin {
            if rs > MAX_HEADER_GPIO {
                return Err(ConfigError::ValidationError(format!(
                    "reset_pin {} is not a header GPIO (0-{})",
                    rs, MAX_HEADER_GPIO
                )));
            }
            if rs == self.dc_pin {
                return Err(ConfigError::ValidationError(
                    "reset_pin and dc_pin must be different".to_string(),
                ));
            }
        }

        if self.orientation > 3 {
            return Err(ConfigError::ValidationError(
                "orientation must be 0, 1, 2, or 3".to_string(),
            ));
        }

        if self.gamma > 3 {
            return Err(ConfigError::ValidationError(
                "gamma must be 0, 1, 2, or 3".to_string(),
            ));
        }

        Ok(())
    }

    /// Bus and pin assignment for the driver
    pub fn wiring(&self) -> Wiring {
        Wiring {
            address: BusAddress::new(self.spi_bus, self.chip_select),
            spi_speed_hz: self.spi_speed_hz,
            dc_pin: self.dc_pin,
            reset_pin: self.reset_pin,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_index(self.orientation)
    }

    pub fn gamma(&self) -> GammaCurve {
        GammaCurve::from_level(self.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.wiring().address, BusAddress::new(0, 0));
        assert_eq!(config.gamma(), GammaCurve::Gc2);
        assert_eq!(config.orientation(), Orientation::Portrait);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "pixel_format": "reduced", "reset_pin": null }"#).unwrap();
        assert_eq!(config.pixel_format, PixelFormat::Reduced);
        assert_eq!(config.reset_pin, None);
        assert_eq!(config.dc_pin, 24);
        assert_eq!(config.spi_speed_hz, 15_000_000);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            chip_select: 1,
            orientation: 3,
            inverted: true,
            ..Config::default()
        };
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            Config {
                chip_select: 3,
                ..Config::default()
            },
            Config {
                spi_bus: 7,
                ..Config::default()
            },
            Config {
                spi_speed_hz: 0,
                ..Config::default()
            },
            Config {
                dc_pin: 40,
                ..Config::default()
            },
            Config {
                reset_pin: Some(24),
                ..Config::default()
            },
            Config {
                orientation: 4,
                ..Config::default()
            },
            Config {
                gamma: 4,
                ..Config::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::ValidationError(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn load_or_default_falls_back() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.json"));
        assert_eq!(config, Config::default());
    }
}
