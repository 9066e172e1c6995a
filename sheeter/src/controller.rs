//! Presentation glue between a hosting container and the gesture machine.
//!
//! ## Usage
//!
//! Implement [`SheetContainer`] for the view that hosts the sheet, build a
//! [`BottomSheetController`], forward pointer input and background taps to
//! it, and call [`BottomSheetController::tick`] once per frame while it asks
//! for more frames.
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use sheeter::{
//!     BottomSheetController, SheetState,
//!     config::SheetConfig,
//!     controller::{SheetContainer, SheetFrame},
//!     px::{Px, PxPosition},
//! };
//!
//! #[derive(Default)]
//! struct Host {
//!     constraint: Option<Px>,
//!     frames: Vec<SheetFrame>,
//! }
//!
//! impl SheetContainer for Host {
//!     fn bounds_height(&self) -> Px {
//!         Px(1000)
//!     }
//!     fn set_height_constraint(&mut self, height: Px) {
//!         self.constraint = Some(height);
//!     }
//!     fn clear_height_constraint(&mut self) {
//!         self.constraint = None;
//!     }
//!     fn request_layout(&mut self, frame: SheetFrame) {
//!         self.frames.push(frame);
//!     }
//! }
//!
//! let mut sheet =
//!     BottomSheetController::new(Host::default(), Px(1000), SheetConfig::default()).unwrap();
//! let start = Instant::now();
//! let at = |ms| start + Duration::from_millis(ms);
//!
//! sheet.pointer_pressed(at(0), PxPosition::from([200, 900]));
//! for step in 1..=10 {
//!     sheet.pointer_moved(at(step * 16), PxPosition::from([200, 900 - step as i32 * 50]));
//! }
//! sheet.pointer_released(at(176));
//!
//! let mut now = at(176);
//! while sheet.tick(now) {
//!     now += Duration::from_millis(16);
//! }
//! assert_eq!(sheet.state(), SheetState::Expanded);
//! assert_eq!(sheet.container().constraint, Some(Px(800)));
//! ```

use std::time::Instant;

use tracing::{debug, info};

use crate::{
    config::SheetConfig,
    error::SheetError,
    geometry::SheetGeometry,
    gesture::{PanRecognizer, PanSample},
    machine::{GestureStateMachine, PanResponse},
    prop::{Callback, CallbackWith},
    px::{Px, PxPosition},
    state::{Completion, SheetState},
};

/// Frame delta assumed for the first tick after a pause in frames.
const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

/// The view hosting the sheet.
///
/// The controller installs the resting height as a constraint before each
/// transition and asks for a layout pass with the presented values every
/// frame.
pub trait SheetContainer {
    /// Current height of the container.
    fn bounds_height(&self) -> Px;
    /// Replaces the sheet's height constraint.
    fn set_height_constraint(&mut self, height: Px);
    /// Removes the sheet's height constraint.
    fn clear_height_constraint(&mut self);
    /// Lays the sheet and scrim out with the given presented values.
    fn request_layout(&mut self, frame: SheetFrame);
}

/// Presented values for one layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetFrame {
    /// Height the sheet is drawn at. Overshoots while the spring settles.
    pub sheet_height: Px,
    /// Opacity of the background scrim.
    pub scrim_alpha: f32,
    /// The committed state.
    pub state: SheetState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Presented,
    Dismissing,
    Dismissed,
}

/// Linear opacity ramp for the scrim.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ScrimFade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl ScrimFade {
    fn hidden(duration: f32) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            elapsed: duration,
            duration,
        }
    }

    fn retarget(&mut self, to: f32) {
        self.from = self.alpha();
        self.to = to;
        self.elapsed = 0.0;
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    fn alpha(&self) -> f32 {
        self.from + (self.to - self.from) * self.progress()
    }

    fn is_animating(&self) -> bool {
        self.elapsed < self.duration
    }
}

/// Drives one presented bottom sheet.
///
/// Owns the hosting container, the gesture machine and the scrim fade.
/// Background taps collapse the sheet, fade the scrim out, and then fire the
/// dismissal callback exactly once.
pub struct BottomSheetController<C: SheetContainer> {
    container: C,
    config: SheetConfig,
    geometry: SheetGeometry,
    machine: GestureStateMachine,
    recognizer: PanRecognizer,
    scrim: ScrimFade,
    resting_height: Px,
    last_frame_time: Option<Instant>,
    lifecycle: Lifecycle,
    on_dismiss: Option<Callback>,
}

impl<C: SheetContainer> BottomSheetController<C> {
    /// Creates a collapsed sheet inside `container`.
    pub fn new(container: C, screen_height: Px, config: SheetConfig) -> Result<Self, SheetError> {
        let geometry = SheetGeometry::new(container.bounds_height(), screen_height, &config)?;
        let resting_height = geometry.collapsed_height();
        let mut controller = Self {
            container,
            machine: GestureStateMachine::new(geometry, &config),
            recognizer: PanRecognizer::new(config.touch_slop),
            scrim: ScrimFade::hidden(config.fade_secs),
            config,
            geometry,
            resting_height,
            last_frame_time: None,
            lifecycle: Lifecycle::Presented,
            on_dismiss: None,
        };
        controller.container.set_height_constraint(resting_height);
        Ok(controller)
    }

    /// Sizes the sheet to embedded content, capped at the expanded height.
    pub fn embed_content(&mut self, natural_height: Px) {
        if self.lifecycle != Lifecycle::Presented {
            return;
        }
        let height = self.geometry.content_height(natural_height);
        debug!("Embedding content of height {natural_height} as {height}");
        self.resting_height = height;
        self.container.set_height_constraint(height);
        self.layout();
    }

    /// Fades the scrim in. Call once the sheet is on screen.
    pub fn appear(&mut self) {
        if self.lifecycle != Lifecycle::Presented {
            return;
        }
        self.scrim.retarget(self.config.scrim_alpha);
        self.layout();
    }

    /// Registers the callback fired once the sheet has been dismissed.
    pub fn on_dismiss(&mut self, callback: impl Into<Callback>) {
        self.on_dismiss = Some(callback.into());
    }

    /// Registers a single-shot listener for the next transition completion.
    pub fn add_completion(&mut self, completion: impl Into<CallbackWith<Completion>>) {
        self.machine.add_completion(completion);
    }

    /// Handles a pointer press inside the sheet.
    pub fn pointer_pressed(&mut self, at: Instant, position: PxPosition) {
        if self.lifecycle == Lifecycle::Presented {
            self.recognizer.press(at, position);
        }
    }

    /// Handles a pointer move.
    pub fn pointer_moved(&mut self, at: Instant, position: PxPosition) -> PanResponse {
        match self.recognizer.moved(at, position) {
            Some(sample) => self.handle_pan(&sample),
            None => PanResponse::Ignored,
        }
    }

    /// Handles a pointer release.
    pub fn pointer_released(&mut self, at: Instant) -> PanResponse {
        match self.recognizer.release(at) {
            Some(sample) => self.handle_pan(&sample),
            None => PanResponse::Ignored,
        }
    }

    /// Handles a pan sample from a host-side recognizer.
    pub fn handle_pan(&mut self, sample: &PanSample) -> PanResponse {
        if self.lifecycle != Lifecycle::Presented {
            return PanResponse::Ignored;
        }
        let response = self.machine.handle_pan(sample);
        match response {
            PanResponse::Started { target } => {
                self.container
                    .set_height_constraint(self.geometry.height_for(target));
            }
            PanResponse::Released {
                completion: Some(_),
                ..
            } => self.settle(),
            _ => {}
        }
        self.layout();
        response
    }

    /// Collapses the sheet and starts dismissing it.
    ///
    /// Any in-flight transition is cancelled first, so its completion can
    /// never undo the collapse.
    pub fn background_tap(&mut self) {
        if self.lifecycle != Lifecycle::Presented {
            return;
        }
        info!("Background tapped; dismissing sheet");
        self.recognizer.cancel();
        self.machine.background_tap();
        self.lifecycle = Lifecycle::Dismissing;
        self.scrim.retarget(0.0);
        self.settle();
        self.layout();
    }

    /// Advances animations to `now` and lays the sheet out.
    ///
    /// Returns whether another frame is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.lifecycle == Lifecycle::Dismissed {
            return false;
        }
        let dt = match self.last_frame_time {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => FIRST_FRAME_DT,
        };
        self.last_frame_time = Some(now);

        if self.machine.tick(dt).is_some() {
            self.settle();
        }
        self.scrim.advance(dt);

        if self.lifecycle == Lifecycle::Dismissing && !self.scrim.is_animating() {
            self.finish_dismissal();
            return false;
        }

        self.layout();
        let needs_frame = self.machine.driver().is_running() || self.scrim.is_animating();
        if !needs_frame {
            self.last_frame_time = None;
        }
        needs_frame
    }

    /// Recomputes the geometry after the container changed height.
    ///
    /// Does nothing once the sheet is dismissing or dismissed.
    pub fn resize(&mut self, screen_height: Px) -> Result<(), SheetError> {
        if self.lifecycle != Lifecycle::Presented {
            return Ok(());
        }
        let geometry = SheetGeometry::new(self.container.bounds_height(), screen_height, &self.config)?;
        debug!(
            "Resized sheet geometry: collapsed {}, expanded {}",
            geometry.collapsed_height(),
            geometry.expanded_height()
        );
        self.geometry = geometry;
        self.machine.set_geometry(geometry);
        if !self.machine.driver().is_active() {
            self.settle();
        }
        self.layout();
        Ok(())
    }

    /// The committed state.
    pub fn state(&self) -> SheetState {
        self.machine.state()
    }

    /// Whether a recognized pan is in progress.
    pub fn is_dragging(&self) -> bool {
        self.machine.is_interacting()
    }

    /// Whether the dismissal has completed.
    pub fn is_dismissed(&self) -> bool {
        self.lifecycle == Lifecycle::Dismissed
    }

    /// Height the sheet is currently presented at.
    pub fn sheet_height(&self) -> Px {
        self.machine
            .driver()
            .presented_height()
            .unwrap_or(self.resting_height)
    }

    /// Current scrim opacity.
    pub fn scrim_alpha(&self) -> f32 {
        self.scrim.alpha()
    }

    /// The geometry in use.
    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    /// The gesture machine.
    pub fn machine(&self) -> &GestureStateMachine {
        &self.machine
    }

    /// The hosting container.
    pub fn container(&self) -> &C {
        &self.container
    }

    /// Mutable access to the hosting container.
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    /// Installs the resting height of the committed state.
    fn settle(&mut self) {
        self.resting_height = self.geometry.height_for(self.machine.state());
        self.container.set_height_constraint(self.resting_height);
    }

    fn finish_dismissal(&mut self) {
        self.lifecycle = Lifecycle::Dismissed;
        self.last_frame_time = None;
        self.container.clear_height_constraint();
        info!("Sheet dismissed");
        if let Some(on_dismiss) = &self.on_dismiss {
            on_dismiss.call();
        }
    }

    fn layout(&mut self) {
        let frame = SheetFrame {
            sheet_height: self.sheet_height(),
            scrim_alpha: self.scrim.alpha(),
            state: self.machine.state(),
        };
        self.container.request_layout(frame);
    }
}
