//! Configuration for the favicon animator.
//!
//! YAML file with every key optional; precedence is CLI > file > defaults.

use crate::animator::{Palette, MAX_ICON_SIZE};
use crate::color::Rgba;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;
use std::time::Duration;

/// Animator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Icon edge length in pixels.
    #[serde(default = "default_size")]
    pub size: u32,

    /// Background color (hex).
    #[serde(default = "default_background")]
    pub background: String,

    /// Outline and pupil color (hex).
    #[serde(default = "default_accent")]
    pub accent: String,

    /// Outline width in design units.
    #[serde(default = "default_line_width")]
    pub line_width: f32,

    /// Frame period in milliseconds.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,

    /// Delay before the startup blink, in milliseconds.
    #[serde(default = "default_first_blink_ms")]
    pub first_blink_ms: u64,

    /// Shortest pause between blinks, in milliseconds (inclusive).
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Longest pause between blinks, in milliseconds (exclusive).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Eyelid step per frame.
    #[serde(default = "default_blink_speed")]
    pub blink_speed: f32,

    /// Seed for reproducible blink timing.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_size() -> u32 {
    32
}
fn default_background() -> String {
    "#0a0b10".to_string()
}
fn default_accent() -> String {
    "#00f3ff".to_string()
}
fn default_line_width() -> f32 {
    2.0
}
fn default_frame_ms() -> u64 {
    16
}
fn default_first_blink_ms() -> u64 {
    2000
}
fn default_min_delay_ms() -> u64 {
    2000
}
fn default_max_delay_ms() -> u64 {
    6000
}
fn default_blink_speed() -> f32 {
    2.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: default_size(),
            background: default_background(),
            accent: default_accent(),
            line_width: default_line_width(),
            frame_ms: default_frame_ms(),
            first_blink_ms: default_first_blink_ms(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            blink_speed: default_blink_speed(),
            seed: None,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Check every value, returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] or [`Error::InvalidColor`].
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_ICON_SIZE {
            return Err(invalid(
                "size",
                format!("must be between 1 and {MAX_ICON_SIZE}"),
            ));
        }
        if self.frame_ms == 0 {
            return Err(invalid("frame_ms", "must be at least 1"));
        }
        if self.min_delay_ms >= self.max_delay_ms {
            return Err(invalid(
                "min_delay_ms",
                format!(
                    "must be below max_delay_ms ({} >= {})",
                    self.min_delay_ms, self.max_delay_ms
                ),
            ));
        }
        if self.max_delay_ms.checked_mul(1000).is_none() {
            return Err(invalid(
                "max_delay_ms",
                format!("must be at most {} ms", u64::MAX / 1000),
            ));
        }
        if !(self.blink_speed.is_finite() && self.blink_speed > 0.0) {
            return Err(invalid("blink_speed", "must be a positive number"));
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(invalid("line_width", "must be a positive number"));
        }
        self.palette()?;
        Ok(())
    }

    /// Parsed colors.
    ///
    /// # Errors
    ///
    /// Returns an error if either color is not valid hex.
    pub fn palette(&self) -> Result<Palette> {
        Ok(Palette {
            background: Rgba::from_hex(&self.background)?,
            accent: Rgba::from_hex(&self.accent)?,
        })
    }

    /// Pause between blinks as a millisecond range.
    #[must_use]
    pub fn delay_range_ms(&self) -> Range<u64> {
        self.min_delay_ms..self.max_delay_ms
    }

    /// Returns the frame period as a Duration.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

fn invalid(key: &str, message: impl Into<String>) -> Error {
    Error::ConfigInvalid {
        key: key.to_string(),
        message: message.into(),
    }
}
