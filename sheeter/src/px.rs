//! Physical pixel units used by sheet geometry and pointer input.
//!
//! Heights handed to a [`SheetContainer`](crate::controller::SheetContainer)
//! are whole physical pixels. Pointer positions use the same unit so drag
//! translations can be measured without a density conversion.
//!
//! # Coordinate System
//!
//! - Origin (0, 0) at the top-left corner of the container
//! - Y-axis increases downward, so dragging the sheet up yields a negative
//!   vertical translation
//!
//! # Example
//!
//! ```
//! use sheeter::px::{Px, PxPosition};
//!
//! let container = Px::new(800);
//! assert_eq!(container.mul_f32(0.3), Px::new(240));
//!
//! let press = PxPosition::new(Px::new(10), Px::new(600));
//! let now = PxPosition::new(Px::new(12), Px::new(400));
//! assert_eq!(now.delta_from(press).y, -200.0);
//! ```

use glam::Vec2;

/// A physical pixel coordinate value.
///
/// Supports negative values and lossy conversion from floating point with
/// overflow protection.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Px(pub i32);

impl Px {
    /// A constant representing zero pixels.
    pub const ZERO: Self = Self(0);

    /// Returns the raw i32 value.
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Creates a new `Px` instance from an i32 value.
    ///
    /// ```
    /// use sheeter::px::Px;
    ///
    /// assert_eq!(Px::new(-50).raw(), -50);
    /// ```
    pub const fn new(value: i32) -> Self {
        Px(value)
    }

    /// Converts the pixel value to f32.
    pub fn to_f32(self) -> f32 {
        self.0 as f32
    }

    /// Creates a `Px` from an f32 value, saturating at the numeric bounds
    /// instead of overflowing. `NaN` maps to zero.
    ///
    /// ```
    /// use sheeter::px::Px;
    ///
    /// assert_eq!(Px::saturating_from_f32(42.7).raw(), 42);
    /// assert_eq!(Px::saturating_from_f32(f32::MAX).raw(), i32::MAX);
    /// assert_eq!(Px::saturating_from_f32(f32::MIN).raw(), i32::MIN);
    /// ```
    pub fn saturating_from_f32(value: f32) -> Self {
        let clamped_value = value.clamp(i32::MIN as f32, i32::MAX as f32);
        Px(clamped_value as i32)
    }

    /// Multiplies the pixel value by a scalar, truncating toward zero.
    ///
    /// Used to derive the collapsed and expanded heights from the container
    /// height.
    pub fn mul_f32(self, rhs: f32) -> Self {
        Px::saturating_from_f32(self.to_f32() * rhs)
    }

    /// Linearly interpolates between `self` and `to`.
    ///
    /// `t` is not clamped: spring curves overshoot past 1.0 and the sheet is
    /// expected to follow them.
    ///
    /// ```
    /// use sheeter::px::Px;
    ///
    /// assert_eq!(Px::new(100).lerp(Px::new(200), 0.5), Px::new(150));
    /// assert_eq!(Px::new(100).lerp(Px::new(200), 1.1), Px::new(210));
    /// ```
    pub fn lerp(self, to: Self, t: f32) -> Self {
        let from = self.to_f32();
        Px::saturating_from_f32((from + (to.to_f32() - from) * t).round())
    }
}

/// A 2D position in physical pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PxPosition {
    /// The x-coordinate in physical pixels
    pub x: Px,
    /// The y-coordinate in physical pixels
    pub y: Px,
}

impl PxPosition {
    /// A constant representing the zero position (0, 0).
    pub const ZERO: Self = Self { x: Px(0), y: Px(0) };

    /// Creates a new position from x and y coordinates.
    pub const fn new(x: Px, y: Px) -> Self {
        Self { x, y }
    }

    /// Returns the vector pointing from `origin` to `self` in float pixels.
    pub fn delta_from(self, origin: Self) -> Vec2 {
        Vec2::new(
            (self.x.0 as f32) - (origin.x.0 as f32),
            (self.y.0 as f32) - (origin.y.0 as f32),
        )
    }
}

impl std::fmt::Display for Px {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl From<[i32; 2]> for PxPosition {
    fn from(pos: [i32; 2]) -> Self {
        PxPosition {
            x: Px(pos[0]),
            y: Px(pos[1]),
        }
    }
}
