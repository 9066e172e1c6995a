use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use parking_lot::Mutex;
use sheeter::{
    BottomSheetController, Completion, SheetState,
    config::SheetConfig,
    px::{Px, PxPosition},
};
use tracing::info;

use crate::container::{ConsoleContainer, FrameLog};

/// Scripted interactions the demo can replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Press and release without moving.
    Tap,
    /// Drag the collapsed sheet all the way up.
    Expand,
    /// Expand, then fling the sheet back down.
    Collapse,
    /// Start expanding, then tap the background mid-flight.
    Dismiss,
    /// Swipe sideways; the sheet must not react.
    Sideways,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Tap,
        Scenario::Expand,
        Scenario::Collapse,
        Scenario::Dismiss,
        Scenario::Sideways,
    ];

    fn expected(self) -> SheetState {
        match self {
            Scenario::Expand => SheetState::Expanded,
            Scenario::Tap | Scenario::Collapse | Scenario::Dismiss | Scenario::Sideways => {
                SheetState::Collapsed
            }
        }
    }
}

/// Surface the scenarios run on.
pub struct Stage {
    pub container_height: Px,
    pub screen_height: Px,
    pub frame: Duration,
    pub config: SheetConfig,
}

struct Run {
    sheet: BottomSheetController<ConsoleContainer>,
    now: Instant,
    frame: Duration,
}

impl Run {
    fn advance(&mut self) {
        self.now += self.frame;
        self.sheet.tick(self.now);
    }

    fn settle(&mut self) -> Result<()> {
        for _ in 0..10_000 {
            if !self.sheet.tick(self.now) {
                return Ok(());
            }
            self.now += self.frame;
        }
        bail!("sheet did not settle within 10000 frames")
    }

    /// Drags from `from` by `(dx, dy)` over `steps` frames, then lets go.
    fn drag(&mut self, from: [i32; 2], dx: i32, dy: i32, steps: i32) {
        self.sheet.pointer_pressed(self.now, PxPosition::from(from));
        for step in 1..=steps {
            self.now += self.frame;
            let position = [from[0] + dx * step / steps, from[1] + dy * step / steps];
            self.sheet.pointer_moved(self.now, PxPosition::from(position));
        }
        self.sheet.pointer_released(self.now);
    }
}

pub struct Outcome {
    pub state: SheetState,
    pub dismissed: bool,
    pub completions: Vec<Completion>,
    pub frames: usize,
    pub peak_height: Option<Px>,
    pub final_height: Option<Px>,
}

impl Stage {
    pub fn run(&self, scenario: Scenario) -> Result<Outcome> {
        let log = Arc::new(Mutex::new(FrameLog::default()));
        let container = ConsoleContainer::new(self.container_height, Arc::clone(&log));
        let mut sheet =
            BottomSheetController::new(container, self.screen_height, self.config.clone())
                .context("failed to present sheet")?;

        let dismissed = Arc::new(AtomicBool::new(false));
        let dismissed_for_hook = Arc::clone(&dismissed);
        sheet.on_dismiss(move || dismissed_for_hook.store(true, Ordering::SeqCst));

        let content = sheet.geometry().collapsed_height();
        sheet.embed_content(content);
        sheet.appear();

        let completions = Arc::new(Mutex::new(Vec::new()));
        let mut run = Run {
            sheet,
            now: Instant::now(),
            frame: self.frame,
        };
        run.settle()?;

        let watch = |run: &mut Run| {
            let completions = Arc::clone(&completions);
            run.sheet
                .add_completion(move |done: Completion| completions.lock().push(done));
        };

        let drag = run.sheet.geometry().drag_scale() as i32;
        let bottom = self.container_height.raw() - 40;
        let top = bottom - drag;
        match scenario {
            Scenario::Tap => {
                watch(&mut run);
                run.drag([200, bottom], 0, 0, 1);
                run.settle()?;
            }
            Scenario::Expand => {
                watch(&mut run);
                run.drag([200, bottom], 0, -drag, 12);
                run.settle()?;
            }
            Scenario::Collapse => {
                run.drag([200, bottom], 0, -drag, 12);
                run.settle()?;
                watch(&mut run);
                run.drag([200, top], 0, drag / 3, 4);
                run.settle()?;
            }
            Scenario::Dismiss => {
                watch(&mut run);
                run.drag([200, bottom], 0, -drag / 2, 6);
                for _ in 0..5 {
                    run.advance();
                }
                run.sheet.background_tap();
                run.settle()?;
            }
            Scenario::Sideways => {
                watch(&mut run);
                run.drag([40, bottom], drag, 0, 8);
                run.settle()?;
            }
        }

        let state = run.sheet.state();
        if state != scenario.expected() {
            bail!(
                "{scenario:?} ended {state:?}, expected {:?}",
                scenario.expected()
            );
        }
        info!("{scenario:?} settled {state:?}");

        let log = log.lock();
        let completions = completions.lock().clone();
        Ok(Outcome {
            state,
            dismissed: dismissed.load(Ordering::SeqCst),
            completions,
            frames: log.frames.len(),
            peak_height: log.peak_height(),
            final_height: log.last().map(|f| f.sheet_height),
        })
    }
}
