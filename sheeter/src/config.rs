//! Tunable sheet parameters and their TOML representation.
//!
//! ## Usage
//!
//! Start from [`SheetConfig::default`] and adjust with the generated setters,
//! or load a TOML file where every key is optional:
//!
//! ```
//! use sheeter::config::SheetConfig;
//!
//! let config = SheetConfig::from_toml_str("expanded_ratio = 0.9\nfade_secs = 0.3").unwrap();
//! assert_eq!(config.expanded_ratio, 0.9);
//! assert_eq!(config.collapsed_ratio, 0.3);
//!
//! let tuned = SheetConfig::default().damping_ratio(0.8);
//! assert!(tuned.validate().is_ok());
//! ```

use std::{fs, path::Path};

use derive_setters::Setters;
use serde::Deserialize;

use crate::error::SheetError;

/// Default values for [`SheetConfig`].
pub struct SheetDefaults;

impl SheetDefaults {
    /// Collapsed height as a share of the container height.
    pub const COLLAPSED_RATIO: f32 = 0.3;
    /// Expanded height (and embedded content cap) as a share of the container
    /// height.
    pub const EXPANDED_RATIO: f32 = 0.8;
    /// Share of the screen height that a drag must cover to move the
    /// transition from one end to the other.
    pub const DRAG_SCALE_RATIO: f32 = 0.5;
    /// Base duration of a full transition.
    pub const DURATION_SECS: f32 = 1.0;
    /// Spring damping ratio of the transition curve.
    pub const DAMPING_RATIO: f32 = 0.5;
    /// Scrim opacity once the sheet has appeared.
    pub const SCRIM_ALPHA: f32 = 0.3;
    /// Duration of the scrim fade in and out.
    pub const FADE_SECS: f32 = 0.2;
    /// Movement a press must exceed before it becomes a drag, in pixels.
    pub const TOUCH_SLOP: f32 = 8.0;
}

/// Tunable parameters of a bottom sheet.
#[derive(Clone, Debug, PartialEq, Deserialize, Setters)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Collapsed height as a share of the container height.
    pub collapsed_ratio: f32,
    /// Expanded height as a share of the container height.
    pub expanded_ratio: f32,
    /// Share of the screen height that maps to a full transition when
    /// dragging.
    pub drag_scale_ratio: f32,
    /// Base duration of a full transition, in seconds.
    pub duration_secs: f32,
    /// Damping ratio of the spring curve. Values below 1.0 bounce.
    pub damping_ratio: f32,
    /// Scrim opacity once the sheet has appeared.
    pub scrim_alpha: f32,
    /// Duration of the scrim fade in and out, in seconds.
    pub fade_secs: f32,
    /// Movement a press must exceed before it becomes a drag, in pixels.
    pub touch_slop: f32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            collapsed_ratio: SheetDefaults::COLLAPSED_RATIO,
            expanded_ratio: SheetDefaults::EXPANDED_RATIO,
            drag_scale_ratio: SheetDefaults::DRAG_SCALE_RATIO,
            duration_secs: SheetDefaults::DURATION_SECS,
            damping_ratio: SheetDefaults::DAMPING_RATIO,
            scrim_alpha: SheetDefaults::SCRIM_ALPHA,
            fade_secs: SheetDefaults::FADE_SECS,
            touch_slop: SheetDefaults::TOUCH_SLOP,
        }
    }
}

impl SheetConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, SheetError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|error| SheetError::Io {
            context: "failed to read sheet config",
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), SheetError> {
        check_ratio("collapsed_ratio", self.collapsed_ratio)?;
        check_ratio("expanded_ratio", self.expanded_ratio)?;
        check_ratio("drag_scale_ratio", self.drag_scale_ratio)?;
        if self.collapsed_ratio >= self.expanded_ratio {
            return Err(SheetError::InvertedHeights {
                collapsed: self.collapsed_ratio,
                expanded: self.expanded_ratio,
            });
        }
        check_duration("duration_secs", self.duration_secs)?;
        check_duration("fade_secs", self.fade_secs)?;
        check_non_negative("damping_ratio", self.damping_ratio)?;
        check_non_negative("touch_slop", self.touch_slop)?;
        if !(0.0..=1.0).contains(&self.scrim_alpha) {
            return Err(SheetError::InvalidRatio {
                name: "scrim_alpha",
                value: self.scrim_alpha,
            });
        }
        Ok(())
    }
}

fn check_ratio(name: &'static str, value: f32) -> Result<(), SheetError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SheetError::InvalidRatio { name, value })
    }
}

fn check_duration(name: &'static str, value: f32) -> Result<(), SheetError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SheetError::InvalidDuration { name, value })
    }
}

fn check_non_negative(name: &'static str, value: f32) -> Result<(), SheetError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SheetError::InvalidValue { name, value })
    }
}
