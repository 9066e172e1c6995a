//! Errors raised while building a sheet's configuration or geometry.
//!
//! Runtime interaction never fails: out-of-range fractions are clamped and
//! out-of-order gestures are dropped. Only construction is fallible.

use std::path::PathBuf;

use thiserror::Error;

use crate::px::Px;

/// Errors produced by [`SheetConfig`](crate::config::SheetConfig) and
/// [`SheetGeometry`](crate::geometry::SheetGeometry).
#[derive(Debug, Error)]
pub enum SheetError {
    /// The config source is not valid TOML or has mistyped keys.
    #[error("failed to parse sheet config: {0}")]
    Config(#[from] toml::de::Error),
    /// The config file could not be read.
    #[error("{context} {}: {error}", path.display())]
    Io {
        /// What was being attempted.
        context: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying failure.
        error: std::io::Error,
    },
    /// A height or drag ratio is outside (0, 1].
    #[error("`{name}` must be within (0, 1], got {value}")]
    InvalidRatio {
        /// Config key.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The collapsed height would not be below the expanded height.
    #[error("collapsed ratio {collapsed} must be below expanded ratio {expanded}")]
    InvertedHeights {
        /// Configured collapsed ratio.
        collapsed: f32,
        /// Configured expanded ratio.
        expanded: f32,
    },
    /// A duration is zero, negative or not finite.
    #[error("`{name}` must be a positive, finite number of seconds, got {value}")]
    InvalidDuration {
        /// Config key.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A scalar that must be finite and non-negative is not.
    #[error("`{name}` must be finite and not negative, got {value}")]
    InvalidValue {
        /// Config key.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The container or screen has no height to lay a sheet out in.
    #[error("container height {container} and screen height {screen} must both be positive")]
    EmptyContainer {
        /// Container height at construction.
        container: Px,
        /// Screen height at construction.
        screen: Px,
    },
}
