//! Interruptible spring transition between the two sheet heights.
//!
//! The driver owns at most one transition. A transition is started toward a
//! target [`SheetState`], can be paused to let the owner scrub its fraction,
//! reversed, and resumed to run (or snap) to one of its two terminal
//! positions. Time only advances through [`AnimationDriver::tick`], which the
//! host calls from its frame loop.
//!
//! ```
//! use sheeter::{
//!     AnimationDriver, SheetState, TerminalPosition, config::SheetConfig,
//!     geometry::SheetGeometry, px::Px,
//! };
//!
//! let config = SheetConfig::default();
//! let geometry = SheetGeometry::new(Px(1000), Px(1000), &config).unwrap();
//! let mut driver = AnimationDriver::new(geometry, &config);
//!
//! driver.start(SheetState::Expanded);
//! driver.pause();
//! driver.set_fraction(0.7);
//! let done = driver.resume(0.0).unwrap();
//! assert_eq!(done.position, TerminalPosition::End);
//! ```

use tracing::{debug, trace};

use crate::{
    animation,
    config::SheetConfig,
    geometry::SheetGeometry,
    prop::CallbackWith,
    px::Px,
    state::{Completion, SheetState, TerminalPosition},
};

/// Largest frame delta applied in one tick, in seconds.
const MAX_FRAME_DT: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Paused,
}

/// Where the current run of the spring began, so the curve starts from the
/// position the sheet was released at instead of jumping.
#[derive(Clone, Copy, Debug, PartialEq)]
struct RunOrigin {
    fraction: f32,
    ratio: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Transition {
    target: SheetState,
    fraction: f32,
    reversed: bool,
    phase: Phase,
    duration_factor: f32,
    origin: Option<RunOrigin>,
}

impl Transition {
    fn terminal_fraction(&self) -> f32 {
        if self.reversed { 0.0 } else { 1.0 }
    }

    /// Progress of the presented height between the start height (0.0) and
    /// the target height (1.0). May overshoot while the spring settles.
    fn presented_ratio(&self, damping_ratio: f32) -> f32 {
        let Some(origin) = self.origin else {
            return self.fraction;
        };
        if self.phase == Phase::Paused {
            return self.fraction;
        }
        let terminal = self.terminal_fraction();
        let span = terminal - origin.fraction;
        let local = if span.abs() <= f32::EPSILON {
            1.0
        } else {
            ((self.fraction - origin.fraction) / span).clamp(0.0, 1.0)
        };
        origin.ratio + (terminal - origin.ratio) * animation::spring(local, damping_ratio)
    }

    fn restart_curve(&mut self, damping_ratio: f32) {
        let ratio = self.presented_ratio(damping_ratio);
        self.origin = Some(RunOrigin {
            fraction: self.fraction,
            ratio,
        });
    }
}

/// Runs a single interruptible transition between the collapsed and
/// expanded heights.
///
/// Only one transition exists at a time: [`start`](Self::start) is a no-op
/// while one is active. Every resumed transition eventually reports
/// [`TerminalPosition::Start`] or [`TerminalPosition::End`] to the registered
/// completion callbacks and through the return value of
/// [`tick`](Self::tick) or [`resume`](Self::resume).
#[derive(Debug)]
pub struct AnimationDriver {
    geometry: SheetGeometry,
    duration_secs: f32,
    damping_ratio: f32,
    transition: Option<Transition>,
    completions: Vec<CallbackWith<Completion>>,
}

impl AnimationDriver {
    /// Creates an idle driver.
    pub fn new(geometry: SheetGeometry, config: &SheetConfig) -> Self {
        Self {
            geometry,
            duration_secs: config.duration_secs,
            damping_ratio: config.damping_ratio,
            transition: None,
            completions: Vec::new(),
        }
    }

    /// Replaces the geometry used to compute presented heights.
    pub fn set_geometry(&mut self, geometry: SheetGeometry) {
        self.geometry = geometry;
    }

    /// Begins a transition toward `target`'s height, running from fraction
    /// 0.0. Ignored while another transition is active.
    pub fn start(&mut self, target: SheetState) {
        if let Some(active) = &self.transition {
            debug!(
                "Ignoring start toward {target:?}; transition toward {:?} is still active",
                active.target
            );
            return;
        }
        debug!("Starting transition toward {target:?}");
        self.transition = Some(Transition {
            target,
            fraction: 0.0,
            reversed: false,
            phase: Phase::Running,
            duration_factor: 1.0,
            origin: Some(RunOrigin {
                fraction: 0.0,
                ratio: 0.0,
            }),
        });
    }

    /// Freezes the active transition and returns its fraction complete.
    ///
    /// Returns 0.0 when idle.
    pub fn pause(&mut self) -> f32 {
        let Some(transition) = self.transition.as_mut() else {
            return 0.0;
        };
        transition.phase = Phase::Paused;
        transition.origin = None;
        transition.fraction
    }

    /// Sets the fraction of a paused transition, clamped to [0, 1].
    ///
    /// Never completes the transition, even at 0.0 or 1.0. Ignored when no
    /// transition is paused or `fraction` is `NaN`.
    pub fn set_fraction(&mut self, fraction: f32) {
        match self.transition.as_mut() {
            Some(transition) if transition.phase == Phase::Paused && !fraction.is_nan() => {
                transition.fraction = fraction.clamp(0.0, 1.0);
            }
            _ => trace!("Ignoring fraction {fraction} outside a paused transition"),
        }
    }

    /// Flips the direction of the active transition without touching its
    /// fraction.
    pub fn reverse(&mut self) {
        if let Some(reversed) = self.transition.as_ref().map(|t| !t.reversed) {
            self.set_reversed(reversed);
        }
    }

    /// Sets the direction of the active transition. `true` heads back toward
    /// the starting state.
    pub fn set_reversed(&mut self, reversed: bool) {
        let damping_ratio = self.damping_ratio;
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        if transition.reversed == reversed {
            return;
        }
        if transition.phase == Phase::Running {
            transition.restart_curve(damping_ratio);
        }
        transition.reversed = reversed;
    }

    /// Lets a paused transition run again.
    ///
    /// A `duration_factor` of zero (or any non-positive or non-finite value)
    /// completes immediately at the terminal nearest the current fraction
    /// and returns that completion. Otherwise the transition covers its
    /// remaining distance at `duration_factor` times the base duration per
    /// full transition, and completes from a later [`tick`](Self::tick).
    pub fn resume(&mut self, duration_factor: f32) -> Option<Completion> {
        let damping_ratio = self.damping_ratio;
        let transition = self.transition.as_mut()?;
        if transition.phase != Phase::Paused {
            return None;
        }

        if !(duration_factor.is_finite() && duration_factor > 0.0) {
            let position = if transition.fraction >= 0.5 {
                TerminalPosition::End
            } else {
                TerminalPosition::Start
            };
            debug!(
                "Snapping transition at fraction {} to {position:?}",
                transition.fraction
            );
            return Some(self.finish(position));
        }

        transition.phase = Phase::Running;
        transition.duration_factor = duration_factor;
        transition.restart_curve(damping_ratio);
        None
    }

    /// Advances a running transition by `dt` seconds.
    ///
    /// Returns the completion when the transition reaches a terminal
    /// position. Idle and paused drivers do not move.
    pub fn tick(&mut self, dt: f32) -> Option<Completion> {
        let base_duration = self.duration_secs;
        let transition = self.transition.as_mut()?;
        if transition.phase != Phase::Running {
            return None;
        }

        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let step = dt / (base_duration * transition.duration_factor).max(f32::EPSILON);
        if transition.reversed {
            transition.fraction = (transition.fraction - step).max(0.0);
        } else {
            transition.fraction = (transition.fraction + step).min(1.0);
        }
        trace!(
            "Transition toward {:?} at fraction {}",
            transition.target, transition.fraction
        );

        match (transition.reversed, transition.fraction) {
            (false, f) if f >= 1.0 => Some(self.finish(TerminalPosition::End)),
            (true, f) if f <= 0.0 => Some(self.finish(TerminalPosition::Start)),
            _ => None,
        }
    }

    /// Registers a single-shot listener for the next completion.
    ///
    /// Listeners are dropped once they have been called, or when the
    /// transition is cancelled.
    pub fn add_completion(&mut self, completion: impl Into<CallbackWith<Completion>>) {
        self.completions.push(completion.into());
    }

    /// Drops the active transition and its listeners without reporting a
    /// completion.
    pub fn cancel(&mut self) {
        if let Some(transition) = self.transition.take() {
            debug!(
                "Cancelled transition toward {:?} at fraction {}",
                transition.target, transition.fraction
            );
        }
        self.completions.clear();
    }

    /// Fraction complete of the active transition, or 0.0 when idle.
    pub fn fraction(&self) -> f32 {
        self.transition.map_or(0.0, |t| t.fraction)
    }

    /// Whether a transition is advancing with time.
    pub fn is_running(&self) -> bool {
        self.transition.is_some_and(|t| t.phase == Phase::Running)
    }

    /// Whether a transition is frozen awaiting owner input.
    pub fn is_paused(&self) -> bool {
        self.transition.is_some_and(|t| t.phase == Phase::Paused)
    }

    /// Whether a transition exists, running or paused.
    pub fn is_active(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether the active transition heads back toward its starting state.
    pub fn is_reversed(&self) -> bool {
        self.transition.is_some_and(|t| t.reversed)
    }

    /// Target of the active transition.
    pub fn target(&self) -> Option<SheetState> {
        self.transition.map(|t| t.target)
    }

    /// Height the sheet should be drawn at for the active transition.
    pub fn presented_height(&self) -> Option<Px> {
        let transition = self.transition?;
        let from = self.geometry.height_for(transition.target.toggle());
        let to = self.geometry.height_for(transition.target);
        Some(from.lerp(to, transition.presented_ratio(self.damping_ratio)))
    }

    fn finish(&mut self, position: TerminalPosition) -> Completion {
        let target = self.transition.take().map_or_else(
            || {
                debug!("Finishing without an active transition");
                SheetState::default()
            },
            |t| t.target,
        );
        let completion = Completion { target, position };
        debug!("Transition toward {target:?} finished at {position:?}");
        for callback in self.completions.drain(..) {
            callback.call(completion);
        }
        completion
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn driver() -> AnimationDriver {
        let config = SheetConfig::default();
        let geometry = SheetGeometry::new(Px(1000), Px(1000), &config).unwrap();
        AnimationDriver::new(geometry, &config)
    }

    fn run_to_completion(driver: &mut AnimationDriver) -> Completion {
        for _ in 0..10_000 {
            if let Some(done) = driver.tick(FRAME) {
                return done;
            }
        }
        panic!("transition never completed");
    }

    #[test]
    fn start_runs_to_end() {
        let mut driver = driver();
        driver.start(SheetState::Expanded);
        assert!(driver.is_running());
        let done = run_to_completion(&mut driver);
        assert_eq!(
            done,
            Completion {
                target: SheetState::Expanded,
                position: TerminalPosition::End,
            }
        );
        assert!(!driver.is_active());
    }

    #[test]
    fn start_while_active_keeps_the_first_target() {
        let mut driver = driver();
        driver.start(SheetState::Expanded);
        driver.tick(FRAME);
        let fraction = driver.fraction();
        driver.start(SheetState::Collapsed);
        assert_eq!(driver.target(), Some(SheetState::Expanded));
        assert_eq!(driver.fraction(), fraction);
        assert!(driver.is_running());
    }

    #[test]
    fn paused_driver_does_not_advance() {
        let mut driver = driver();
        driver.start(SheetState::Expanded);
        driver.tick(FRAME);
        let fraction = driver.pause();
        assert!(driver.is_paused());
        assert!(!driver.is_running());
        for _ in 0..120 {
            assert_eq!(driver.tick(FRAME), None);
        }
        assert_eq!(driver.fraction(), fraction);
    }

    #[test]
    fn set_fraction_clamps_and_never_completes() {
        let mut driver = driver();
        driver.start(SheetState::Expanded);
        driver.pause();
        for (input, expected) in [(1.7, 1.0), (-0.4, 0.0), (0.25, 0.25), (f32::NAN, 0.25)] {
            driver.set_fraction(input);
            assert_eq!(driver.fraction(), expected);
            assert!(driver.is_paused());
        }
    }

    #[test]
    fn set_fraction_is_ignored_while_running() {
        let mut driver = driver();
        driver.start(SheetState::Expanded);
        driver.set_fraction(0.9);
        assert_eq!(driver.fraction(), 0.0);
    }

    #[test]
    fn reverse_keeps_fraction_and_returns_to_start() {
        let mut driver = driver();
        driver.start(SheetState::Expanded);
        driver.pause();
        driver.set_fraction(0.6);
        driver.reverse();
        assert!(driver.is_reversed());
        assert_eq!(driver.fraction(), 0.6);
        assert_eq!(driver.resume(1.0), None);
        let done = run_to_completion(&mut driver);
        assert_eq!(done.position, TerminalPosition::Start);
        assert_eq!(done.resting_state(), SheetState::Collapsed);
    }

    #[test]
    fn zero_duration_factor_snaps_to_nearest_terminal() {
        let mut driver = driver();
        driver.start(SheetState::Expanded);
        driver.pause();
        driver.set_fraction(0.2);
        let done = driver.resume(0.0).unwrap();
        assert_eq!(done.position, TerminalPosition::Start);

        driver.start(SheetState::Collapsed);
        driver.pause();
        driver.set_fraction(0.5);
        let done = driver.resume(0.0).unwrap();
        assert_eq!(done.position, TerminalPosition::End);
        assert_eq!(done.resting_state(), SheetState::Collapsed);
    }

    #[test]
    fn completion_callbacks_fire_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut driver = driver();
        let seen_for_cb = Arc::clone(&seen);
        driver.add_completion(move |done: Completion| seen_for_cb.lock().push(done.position));
        driver.start(SheetState::Expanded);
        run_to_completion(&mut driver);
        driver.start(SheetState::Collapsed);
        run_to_completion(&mut driver);
        assert_eq!(*seen.lock(), vec![TerminalPosition::End]);
    }

    #[test]
    fn cancel_drops_transition_and_listeners() {
        let seen = Arc::new(Mutex::new(0));
        let mut driver = driver();
        let seen_for_cb = Arc::clone(&seen);
        driver.add_completion(move |_: Completion| *seen_for_cb.lock() += 1);
        driver.start(SheetState::Expanded);
        driver.tick(FRAME);
        driver.cancel();
        assert!(!driver.is_active());
        assert_eq!(driver.tick(FRAME), None);
        driver.start(SheetState::Expanded);
        run_to_completion(&mut driver);
        assert_eq!(*seen.lock(), 0);
    }

    #[test]
    fn presented_height_tracks_fraction_while_paused() {
        let mut driver = driver();
        assert_eq!(driver.presented_height(), None);
        driver.start(SheetState::Expanded);
        assert_eq!(driver.presented_height(), Some(Px(300)));
        driver.pause();
        driver.set_fraction(0.5);
        assert_eq!(driver.presented_height(), Some(Px(550)));
    }

    #[test]
    fn resumed_curve_starts_where_the_drag_left_off() {
        let mut driver = driver();
        driver.start(SheetState::Collapsed);
        driver.pause();
        driver.set_fraction(0.4);
        let before = driver.presented_height().unwrap();
        driver.resume(1.0);
        assert_eq!(driver.presented_height(), Some(before));
        driver.tick(0.001);
        let after = driver.presented_height().unwrap();
        assert!((after.raw() - before.raw()).abs() <= 2);
    }

    #[test]
    fn spring_overshoots_the_target_height() {
        let mut driver = driver();
        driver.start(SheetState::Expanded);
        let mut peak = Px::ZERO;
        while driver.tick(FRAME).is_none() {
            peak = peak.max(driver.presented_height().unwrap());
        }
        assert!(peak > Px(800), "peak was {peak}");
    }
}
