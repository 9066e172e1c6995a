//! Pan gesture samples and a recognizer that produces them from raw pointer
//! input.
//!
//! Hosts that already run a platform pan recognizer can build [`PanSample`]s
//! directly. Hosts that only see pointer presses and moves feed them to a
//! [`PanRecognizer`], which tracks velocity over a short rolling window,
//! waits for the touch slop, and only claims drags that are more vertical
//! than horizontal.

use std::{collections::VecDeque, time::Instant};

use glam::Vec2;
use tracing::{debug, trace};

use crate::px::PxPosition;

/// Age after which a velocity sample no longer contributes to the average.
const VELOCITY_WINDOW_MS: u128 = 100;

/// Lifecycle phase of a pan gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanPhase {
    /// The drag was recognized and claimed.
    Began,
    /// The pointer moved while the drag is active.
    Changed,
    /// The pointer was lifted.
    Ended,
}

/// One pan gesture event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanSample {
    /// Lifecycle phase.
    pub phase: PanPhase,
    /// Movement since the pointer was pressed, in pixels. Negative `y` is
    /// upward.
    pub translation: Vec2,
    /// Recent pointer velocity in pixels per second. Positive `y` is
    /// downward.
    pub velocity: Vec2,
}

impl PanSample {
    /// A `Began` sample at rest.
    pub fn began() -> Self {
        Self {
            phase: PanPhase::Began,
            translation: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    /// A `Changed` sample with a vertical translation.
    pub fn changed(translation_y: f32) -> Self {
        Self {
            phase: PanPhase::Changed,
            translation: Vec2::new(0.0, translation_y),
            velocity: Vec2::ZERO,
        }
    }

    /// An `Ended` sample with a vertical release velocity.
    pub fn ended(translation_y: f32, velocity_y: f32) -> Self {
        Self {
            phase: PanPhase::Ended,
            translation: Vec2::new(0.0, translation_y),
            velocity: Vec2::new(0.0, velocity_y),
        }
    }
}

/// Whether a drag moving at `velocity` belongs to the sheet.
///
/// Drags are claimed only when they are more vertical than horizontal, so a
/// horizontally scrolling child keeps its own gestures.
///
/// ```
/// use glam::Vec2;
/// use sheeter::gesture::should_claim;
///
/// assert!(should_claim(Vec2::new(10.0, -300.0)));
/// assert!(!should_claim(Vec2::new(300.0, 10.0)));
/// assert!(!should_claim(Vec2::new(50.0, 50.0)));
/// ```
pub fn should_claim(velocity: Vec2) -> bool {
    velocity.y.abs() > velocity.x.abs()
}

/// Rolling average of pointer velocity over the last 100ms of movement.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    last: Option<(Instant, PxPosition)>,
    history: VecDeque<(Instant, Vec2)>,
}

impl VelocityTracker {
    /// Forgets all samples and starts tracking from `position`.
    pub fn reset(&mut self, at: Instant, position: PxPosition) {
        self.last = Some((at, position));
        self.history.clear();
    }

    /// Records the pointer at `position`.
    pub fn record(&mut self, at: Instant, position: PxPosition) {
        if let Some((last_time, last_position)) = self.last {
            let dt = at.saturating_duration_since(last_time).as_secs_f32();
            if dt > 0.0 {
                let velocity = position.delta_from(last_position) / dt;
                self.history.push_back((at, velocity));
            }
        }
        self.last = Some((at, position));
        self.prune(at);
    }

    /// Average velocity of the samples still inside the window at `now`.
    pub fn velocity(&self, now: Instant) -> Vec2 {
        let recent: Vec<Vec2> = self
            .history
            .iter()
            .filter(|(sample_time, _)| {
                now.saturating_duration_since(*sample_time).as_millis() <= VELOCITY_WINDOW_MS
            })
            .map(|&(_, velocity)| velocity)
            .collect();
        if recent.is_empty() {
            return Vec2::ZERO;
        }
        recent.iter().copied().sum::<Vec2>() / recent.len() as f32
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&(sample_time, _)) = self.history.front() {
            if now.saturating_duration_since(sample_time).as_millis() > VELOCITY_WINDOW_MS {
                self.history.pop_front();
            } else {
                break;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Recognition {
    Idle,
    Possible,
    Active,
    Rejected,
}

/// Turns pointer press, move and release events into [`PanSample`]s.
///
/// A press becomes a pan once it has moved further than the touch slop and
/// [`should_claim`] accepts its velocity. A rejected press produces nothing
/// until the pointer is pressed again.
#[derive(Clone, Debug)]
pub struct PanRecognizer {
    touch_slop: f32,
    state: Recognition,
    origin: PxPosition,
    last_position: PxPosition,
    tracker: VelocityTracker,
}

impl PanRecognizer {
    /// Creates a recognizer with the given touch slop in pixels.
    pub fn new(touch_slop: f32) -> Self {
        Self {
            touch_slop,
            state: Recognition::Idle,
            origin: PxPosition::ZERO,
            last_position: PxPosition::ZERO,
            tracker: VelocityTracker::default(),
        }
    }

    /// Whether a recognized pan is in progress.
    pub fn is_active(&self) -> bool {
        self.state == Recognition::Active
    }

    /// Handles a pointer press.
    pub fn press(&mut self, at: Instant, position: PxPosition) {
        self.state = Recognition::Possible;
        self.origin = position;
        self.last_position = position;
        self.tracker.reset(at, position);
    }

    /// Handles a pointer move. Returns `Began` when the move recognizes the
    /// pan, `Changed` for moves of an active pan.
    pub fn moved(&mut self, at: Instant, position: PxPosition) -> Option<PanSample> {
        if matches!(self.state, Recognition::Idle | Recognition::Rejected) {
            return None;
        }
        self.tracker.record(at, position);
        self.last_position = position;
        let translation = position.delta_from(self.origin);
        let velocity = self.tracker.velocity(at);

        match self.state {
            Recognition::Possible => {
                if translation.length() <= self.touch_slop {
                    return None;
                }
                // Moves sharing a timestamp leave no velocity sample yet.
                let direction = if velocity == Vec2::ZERO {
                    translation
                } else {
                    velocity
                };
                if !should_claim(direction) {
                    debug!("Pan rejected: direction {direction} is not vertical");
                    self.state = Recognition::Rejected;
                    return None;
                }
                self.state = Recognition::Active;
                Some(PanSample {
                    phase: PanPhase::Began,
                    translation,
                    velocity,
                })
            }
            Recognition::Active => {
                trace!("Pan moved by {translation}");
                Some(PanSample {
                    phase: PanPhase::Changed,
                    translation,
                    velocity,
                })
            }
            Recognition::Idle | Recognition::Rejected => None,
        }
    }

    /// Handles a pointer release. Returns `Ended` when a pan was active.
    pub fn release(&mut self, at: Instant) -> Option<PanSample> {
        let was_active = self.state == Recognition::Active;
        self.state = Recognition::Idle;
        if !was_active {
            return None;
        }
        Some(PanSample {
            phase: PanPhase::Ended,
            translation: self.last_position.delta_from(self.origin),
            velocity: self.tracker.velocity(at),
        })
    }

    /// Abandons the current touch sequence without emitting anything.
    pub fn cancel(&mut self) {
        self.state = Recognition::Idle;
    }
}
