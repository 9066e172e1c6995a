//! A draggable two-state bottom sheet for tessera-style UIs.
//!
//! The sheet rests either collapsed or expanded. A vertical pan scrubs an
//! interruptible spring transition between the two heights, and the release
//! velocity decides where it settles. A tap on the background collapses the
//! sheet and dismisses it.
//!
//! # Usage
//!
//! Hosts implement [`controller::SheetContainer`] and drive a
//! [`BottomSheetController`]: forward pointer events, forward background
//! taps, and tick it from the frame loop.
//!
//! The lower layers are usable on their own. [`GestureStateMachine`] accepts
//! [`PanSample`]s from any pan recognizer, and [`AnimationDriver`] is a plain
//! pausable, reversible transition.
//!
//! # Example
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
//! // A touch that never moves snaps straight back.
//! machine.handle_pan(&PanSample::began());
//! machine.handle_pan(&PanSample::ended(0.0, 0.0));
//! assert_eq!(machine.state(), SheetState::Collapsed);
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

mod animation;

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod machine;
pub mod prop;
pub mod px;
pub mod state;

pub use crate::{
    controller::BottomSheetController,
    driver::AnimationDriver,
    error::SheetError,
    gesture::{PanPhase, PanSample},
    machine::{GestureStateMachine, PanResponse, next_direction},
    state::{Completion, SheetState, TerminalPosition},
};
