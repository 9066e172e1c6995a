//! Maps a continuous pan gesture onto the sheet's transition driver.
//!
//! The machine owns the committed [`SheetState`] and the one
//! [`AnimationDriver`]. A pan that begins while the sheet is at rest starts a
//! transition toward the opposite state and immediately pauses it; the drag
//! then scrubs the transition's fraction, and the release velocity decides
//! which terminal the transition runs to. The committed state only changes
//! when the driver reports a completion (or on a background tap).
//!
//! ```
//! use sheeter::{
//!     GestureStateMachine, PanSample, SheetState, config::SheetConfig,
//!     geometry::SheetGeometry, px::Px,
//! };
//!
//! let config = SheetConfig::default();
//! let geometry = SheetGeometry::new(Px(1000), Px(1000), &config).unwrap();
//! let mut machine = GestureStateMachine::new(geometry, &config);
//!
//! machine.handle_pan(&PanSample::began());
//! machine.handle_pan(&PanSample::changed(-geometry.drag_scale()));
//! machine.handle_pan(&PanSample::ended(-geometry.drag_scale(), -800.0));
//! while machine.tick(1.0 / 60.0).is_none() {}
//! assert_eq!(machine.state(), SheetState::Expanded);
//! ```

use tracing::{debug, warn};

use crate::{
    config::SheetConfig,
    driver::AnimationDriver,
    geometry::SheetGeometry,
    gesture::{PanPhase, PanSample},
    prop::CallbackWith,
    state::{Completion, SheetState},
};

/// Whether the transition must head back toward its starting state when a
/// pan is released.
///
/// `committed` is the state the sheet rested in before the pan began, which
/// means the transition always targets `committed.toggle()`. A downward
/// release (`should_close`) from the expanded state carries on toward
/// collapsed; any other release heads toward the state the fling points at.
///
/// | committed | should_close | reversed |
/// |-----------|--------------|----------|
/// | Expanded  | false        | true     |
/// | Expanded  | true         | false    |
/// | Collapsed | true         | true     |
/// | Collapsed | false        | false    |
pub const fn next_direction(committed: SheetState, should_close: bool) -> bool {
    match committed {
        SheetState::Expanded => !should_close,
        SheetState::Collapsed => should_close,
    }
}

/// How the machine reacted to a [`PanSample`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanResponse {
    /// The sample was dropped: a transition was still running, or the
    /// sample arrived out of order.
    Ignored,
    /// A transition toward `target` was started and paused for scrubbing.
    Started {
        /// State the new transition heads toward.
        target: SheetState,
    },
    /// The paused transition was scrubbed to `fraction`.
    Adjusted {
        /// Fraction complete after clamping.
        fraction: f32,
    },
    /// The transition was let go.
    Released {
        /// Whether it now heads back toward its starting state.
        reversed: bool,
        /// Set when a zero-velocity release snapped it to a terminal.
        completion: Option<Completion>,
    },
}

/// Interaction bookkeeping for the pan currently being handled.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Interaction {
    base_fraction: f32,
}

/// Translates pan samples into driver commands and owns the committed sheet
/// state.
#[derive(Debug)]
pub struct GestureStateMachine {
    state: SheetState,
    driver: AnimationDriver,
    drag_scale: f32,
    interaction: Option<Interaction>,
    ignoring_pan: bool,
}

impl GestureStateMachine {
    /// Creates a collapsed machine with an idle driver.
    pub fn new(geometry: SheetGeometry, config: &SheetConfig) -> Self {
        Self {
            state: SheetState::Collapsed,
            driver: AnimationDriver::new(geometry, config),
            drag_scale: geometry.drag_scale(),
            interaction: None,
            ignoring_pan: false,
        }
    }

    /// The committed state.
    pub fn state(&self) -> SheetState {
        self.state
    }

    /// Read access to the owned driver.
    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// Registers a single-shot listener for the next transition completion.
    pub fn add_completion(&mut self, completion: impl Into<CallbackWith<Completion>>) {
        self.driver.add_completion(completion);
    }

    /// Whether a pan is currently scrubbing the transition.
    pub fn is_interacting(&self) -> bool {
        self.interaction.is_some()
    }

    /// Replaces the geometry after the container was resized.
    pub fn set_geometry(&mut self, geometry: SheetGeometry) {
        self.drag_scale = geometry.drag_scale();
        self.driver.set_geometry(geometry);
    }

    /// Handles one pan sample.
    pub fn handle_pan(&mut self, sample: &PanSample) -> PanResponse {
        match sample.phase {
            PanPhase::Began => self.began(),
            PanPhase::Changed => self.changed(sample),
            PanPhase::Ended => self.ended(sample),
        }
    }

    /// Advances the driver by `dt` seconds and commits any completion.
    pub fn tick(&mut self, dt: f32) -> Option<Completion> {
        let completion = self.driver.tick(dt)?;
        self.commit(completion);
        Some(completion)
    }

    /// Forces the sheet to collapsed, cancelling any in-flight transition.
    ///
    /// The cancelled transition reports no completion, so nothing can
    /// overwrite the forced state afterwards.
    pub fn background_tap(&mut self) {
        if self.driver.is_active() {
            debug!("Background tap cancels the in-flight transition");
        }
        self.driver.cancel();
        self.interaction = None;
        self.ignoring_pan = false;
        self.state = SheetState::Collapsed;
    }

    fn began(&mut self) -> PanResponse {
        if self.interaction.is_some() {
            warn!("Pan began twice without ending; ignoring the second start");
            return PanResponse::Ignored;
        }
        if self.driver.is_running() {
            debug!("Pan began while a transition is running; ignoring the whole pan");
            self.ignoring_pan = true;
            return PanResponse::Ignored;
        }
        self.ignoring_pan = false;

        let target = self.state.toggle();
        self.driver.start(target);
        let base_fraction = self.driver.pause();
        self.interaction = Some(Interaction { base_fraction });
        PanResponse::Started { target }
    }

    fn changed(&mut self, sample: &PanSample) -> PanResponse {
        let Some(interaction) = self.interaction else {
            if !self.ignoring_pan {
                warn!("Pan changed without an accepted start; ignoring");
            }
            return PanResponse::Ignored;
        };

        let mut fraction = -sample.translation.y / self.drag_scale;
        if self.state == SheetState::Expanded {
            fraction = -fraction;
        }
        if self.driver.is_reversed() {
            fraction = -fraction;
        }
        self.driver.set_fraction(fraction + interaction.base_fraction);
        PanResponse::Adjusted {
            fraction: self.driver.fraction(),
        }
    }

    fn ended(&mut self, sample: &PanSample) -> PanResponse {
        if self.interaction.take().is_none() {
            if !self.ignoring_pan {
                warn!("Pan ended without an accepted start; ignoring");
            }
            self.ignoring_pan = false;
            return PanResponse::Ignored;
        }

        let velocity = sample.velocity.y;
        if velocity == 0.0 {
            let completion = self.driver.resume(0.0);
            if let Some(completion) = completion {
                self.commit(completion);
            }
            return PanResponse::Released {
                reversed: self.driver.is_reversed(),
                completion,
            };
        }

        let should_close = velocity > 0.0;
        let reversed = next_direction(self.state, should_close);
        self.driver.set_reversed(reversed);
        let completion = self.driver.resume(1.0);
        if let Some(completion) = completion {
            self.commit(completion);
        }
        PanResponse::Released {
            reversed,
            completion,
        }
    }

    fn commit(&mut self, completion: Completion) {
        let state = completion.resting_state();
        if state != self.state {
            debug!("Sheet state {:?} -> {state:?}", self.state);
        }
        self.state = state;
    }
}
