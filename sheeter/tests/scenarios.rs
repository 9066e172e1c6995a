use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use sheeter::{
    BottomSheetController, Completion, PanResponse, PanSample, SheetState, TerminalPosition,
    config::SheetConfig,
    controller::{SheetContainer, SheetFrame},
    px::{Px, PxPosition},
};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Default)]
struct RecordingContainer {
    constraints: Vec<Option<Px>>,
    frames: Vec<SheetFrame>,
}

impl SheetContainer for RecordingContainer {
    fn bounds_height(&self) -> Px {
        Px(1000)
    }

    fn set_height_constraint(&mut self, height: Px) {
        self.constraints.push(Some(height));
    }

    fn clear_height_constraint(&mut self) {
        self.constraints.push(None);
    }

    fn request_layout(&mut self, frame: SheetFrame) {
        self.frames.push(frame);
    }
}

struct Harness {
    sheet: BottomSheetController<RecordingContainer>,
    now: Instant,
    completions: Arc<Mutex<Vec<Completion>>>,
}

impl Harness {
    fn new() -> Self {
        let sheet = BottomSheetController::new(
            RecordingContainer::default(),
            Px(1000),
            SheetConfig::default(),
        )
        .unwrap();
        Self {
            sheet,
            now: Instant::now(),
            completions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn watch_completion(&mut self) {
        let completions = Arc::clone(&self.completions);
        self.sheet
            .add_completion(move |done: Completion| completions.lock().push(done));
    }

    fn drag_scale(&self) -> f32 {
        self.sheet.geometry().drag_scale()
    }

    fn run(&mut self) {
        for _ in 0..1_000 {
            if !self.sheet.tick(self.now) {
                return;
            }
            self.now += FRAME;
        }
        panic!("sheet never settled");
    }

    fn expand(&mut self) {
        let scale = self.drag_scale();
        self.sheet.handle_pan(&PanSample::began());
        self.sheet.handle_pan(&PanSample::changed(-scale));
        self.sheet.handle_pan(&PanSample::ended(-scale, -1200.0));
        self.run();
        assert_eq!(self.sheet.state(), SheetState::Expanded);
    }
}

#[test]
fn untouched_drag_stays_collapsed() {
    let mut h = Harness::new();
    h.watch_completion();
    h.sheet.handle_pan(&PanSample::began());
    let response = h.sheet.handle_pan(&PanSample::ended(0.0, 0.0));
    assert!(matches!(
        response,
        PanResponse::Released {
            completion: Some(Completion {
                position: TerminalPosition::Start,
                ..
            }),
            ..
        }
    ));
    h.run();
    assert_eq!(h.sheet.state(), SheetState::Collapsed);
    assert_eq!(h.sheet.sheet_height(), Px(300));
    assert_eq!(
        *h.completions.lock(),
        vec![Completion {
            target: SheetState::Expanded,
            position: TerminalPosition::Start,
        }]
    );
}

#[test]
fn full_upward_drag_expands() {
    let mut h = Harness::new();
    h.watch_completion();
    let scale = h.drag_scale();
    h.sheet.handle_pan(&PanSample::began());
    let response = h.sheet.handle_pan(&PanSample::changed(-scale));
    assert_eq!(response, PanResponse::Adjusted { fraction: 1.0 });
    h.sheet.handle_pan(&PanSample::ended(-scale, -600.0));
    h.run();

    assert_eq!(h.sheet.state(), SheetState::Expanded);
    assert_eq!(h.sheet.sheet_height(), Px(800));
    assert_eq!(
        h.completions.lock().first().map(|c| c.position),
        Some(TerminalPosition::End)
    );
    assert_eq!(
        h.sheet.container().constraints.last().copied(),
        Some(Some(Px(800)))
    );
}

#[test]
fn downward_fling_from_expanded_collapses() {
    let mut h = Harness::new();
    h.expand();
    h.watch_completion();
    h.sheet.handle_pan(&PanSample::began());
    let response = h.sheet.handle_pan(&PanSample::ended(0.0, 700.0));
    assert_eq!(
        response,
        PanResponse::Released {
            reversed: false,
            completion: None,
        }
    );
    h.run();

    assert_eq!(h.sheet.state(), SheetState::Collapsed);
    assert_eq!(
        *h.completions.lock(),
        vec![Completion {
            target: SheetState::Collapsed,
            position: TerminalPosition::End,
        }]
    );
}

#[test]
fn background_tap_mid_flight_forces_collapsed() {
    let mut h = Harness::new();
    h.watch_completion();
    let scale = h.drag_scale();
    h.sheet.appear();
    h.sheet.handle_pan(&PanSample::began());
    h.sheet.handle_pan(&PanSample::changed(-scale * 0.6));
    h.sheet.handle_pan(&PanSample::ended(-scale * 0.6, -900.0));
    h.sheet.tick(h.now);
    h.now += FRAME;
    assert!(h.sheet.machine().driver().is_running());

    h.sheet.background_tap();
    assert_eq!(h.sheet.state(), SheetState::Collapsed);
    h.run();

    assert_eq!(h.sheet.state(), SheetState::Collapsed);
    assert!(h.sheet.is_dismissed());
    assert!(h.completions.lock().is_empty());
}

#[test]
fn pointer_drag_through_recognizer_expands_and_collapses() {
    let mut h = Harness::new();
    let start = h.now;
    let at = |ms: u64| start + Duration::from_millis(ms);

    h.sheet.pointer_pressed(at(0), PxPosition::from([300, 900]));
    for step in 1..=12u64 {
        let y = 900 - (step as i32) * 45;
        h.sheet.pointer_moved(at(step * 16), PxPosition::from([302, y]));
    }
    h.sheet.pointer_released(at(12 * 16));
    h.now = at(12 * 16);
    h.run();
    assert_eq!(h.sheet.state(), SheetState::Expanded);

    let start = h.now;
    let at = |ms: u64| start + Duration::from_millis(ms);
    h.sheet.pointer_pressed(at(0), PxPosition::from([300, 300]));
    for step in 1..=4u64 {
        let y = 300 + (step as i32) * 40;
        h.sheet.pointer_moved(at(step * 16), PxPosition::from([300, y]));
    }
    h.sheet.pointer_released(at(64));
    h.now = at(64);
    h.run();
    assert_eq!(h.sheet.state(), SheetState::Collapsed);
}

#[test]
fn horizontal_swipe_is_left_to_nested_content() {
    let mut h = Harness::new();
    let start = h.now;
    let at = |ms: u64| start + Duration::from_millis(ms);

    h.sheet.pointer_pressed(at(0), PxPosition::from([100, 800]));
    for step in 1..=6u64 {
        let x = 100 + (step as i32) * 40;
        let response = h.sheet.pointer_moved(at(step * 16), PxPosition::from([x, 795]));
        assert_eq!(response, PanResponse::Ignored);
    }
    assert_eq!(h.sheet.pointer_released(at(112)), PanResponse::Ignored);
    assert!(!h.sheet.machine().driver().is_active());
    assert_eq!(h.sheet.state(), SheetState::Collapsed);
}

#[test]
fn spring_overshoot_is_presented_then_settles() {
    let mut h = Harness::new();
    h.sheet.handle_pan(&PanSample::began());
    h.sheet.handle_pan(&PanSample::ended(0.0, -400.0));
    h.run();

    let frames = &h.sheet.container().frames;
    let peak = frames
        .iter()
        .map(|frame| frame.sheet_height)
        .max()
        .unwrap();
    assert!(peak > Px(800), "peak {peak}");
    assert_eq!(frames.last().map(|f| f.sheet_height), Some(Px(800)));
    assert_eq!(h.sheet.state(), SheetState::Expanded);
}

#[test]
fn drag_whose_first_moves_share_a_timestamp_still_expands() {
    let mut h = Harness::new();
    let start = h.now;
    let at = |ms: u64| start + Duration::from_millis(ms);

    h.sheet.pointer_pressed(at(0), PxPosition::from([200, 900]));
    let first = h.sheet.pointer_moved(at(0), PxPosition::from([200, 870]));
    assert_eq!(
        first,
        PanResponse::Started {
            target: SheetState::Expanded
        }
    );
    for step in 1..=9u64 {
        let y = 870 - (step as i32) * 40;
        h.sheet.pointer_moved(at(step * 16), PxPosition::from([200, y]));
    }
    assert!(h.sheet.is_dragging());
    h.sheet.pointer_released(at(9 * 16));
    h.now = at(9 * 16);
    h.run();
    assert_eq!(h.sheet.state(), SheetState::Expanded);
}
