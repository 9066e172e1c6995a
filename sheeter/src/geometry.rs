//! Heights and drag scale derived from the hosting container.

use crate::{config::SheetConfig, error::SheetError, px::Px, state::SheetState};

/// Read-only layout configuration for one sheet.
///
/// Built from the container and screen heights supplied by the host instead
/// of reading the display directly, so the numbers are deterministic under
/// test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetGeometry {
    container_height: Px,
    screen_height: Px,
    collapsed_height: Px,
    expanded_height: Px,
    drag_scale: f32,
}

impl SheetGeometry {
    /// Derives the geometry for a container using the ratios in `config`.
    ///
    /// ```
    /// use sheeter::{config::SheetConfig, geometry::SheetGeometry, px::Px};
    ///
    /// let geometry = SheetGeometry::new(Px(1000), Px(1200), &SheetConfig::default()).unwrap();
    /// assert_eq!(geometry.collapsed_height(), Px(300));
    /// assert_eq!(geometry.expanded_height(), Px(800));
    /// assert_eq!(geometry.drag_scale(), 600.0);
    /// ```
    pub fn new(
        container_height: Px,
        screen_height: Px,
        config: &SheetConfig,
    ) -> Result<Self, SheetError> {
        if container_height <= Px::ZERO || screen_height <= Px::ZERO {
            return Err(SheetError::EmptyContainer {
                container: container_height,
                screen: screen_height,
            });
        }
        config.validate()?;
        Ok(Self {
            container_height,
            screen_height,
            collapsed_height: container_height.mul_f32(config.collapsed_ratio),
            expanded_height: container_height.mul_f32(config.expanded_ratio),
            drag_scale: (screen_height.to_f32() * config.drag_scale_ratio).max(1.0),
        })
    }

    /// Height of the hosting container.
    pub fn container_height(&self) -> Px {
        self.container_height
    }

    /// Height of the screen the container lives on.
    pub fn screen_height(&self) -> Px {
        self.screen_height
    }

    /// Height of the sheet while collapsed.
    pub fn collapsed_height(&self) -> Px {
        self.collapsed_height
    }

    /// Height of the sheet while expanded. Also caps embedded content.
    pub fn expanded_height(&self) -> Px {
        self.expanded_height
    }

    /// Vertical drag distance, in pixels, that spans a whole transition.
    pub fn drag_scale(&self) -> f32 {
        self.drag_scale
    }

    /// Resting height for `state`.
    pub fn height_for(&self, state: SheetState) -> Px {
        match state {
            SheetState::Collapsed => self.collapsed_height,
            SheetState::Expanded => self.expanded_height,
        }
    }

    /// Height used for embedded content of the given natural height.
    pub fn content_height(&self, natural: Px) -> Px {
        natural.min(self.expanded_height).max(Px::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> SheetGeometry {
        SheetGeometry::new(Px(1000), Px(1000), &SheetConfig::default()).unwrap()
    }

    #[test]
    fn heights_follow_ratios() {
        let geometry = geometry();
        assert_eq!(geometry.height_for(SheetState::Collapsed), Px(300));
        assert_eq!(geometry.height_for(SheetState::Expanded), Px(800));
        assert_eq!(geometry.drag_scale(), 500.0);
    }

    #[test]
    fn content_is_capped_at_expanded_height() {
        let geometry = geometry();
        assert_eq!(geometry.content_height(Px(200)), Px(200));
        assert_eq!(geometry.content_height(Px(950)), Px(800));
        assert_eq!(geometry.content_height(Px(-5)), Px(0));
    }

    #[test]
    fn empty_container_is_rejected() {
        let err = SheetGeometry::new(Px(0), Px(1000), &SheetConfig::default()).unwrap_err();
        assert!(matches!(err, SheetError::EmptyContainer { .. }));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SheetConfig::default().drag_scale_ratio(0.0);
        assert!(SheetGeometry::new(Px(1000), Px(1000), &config).is_err());
    }
}
