use std::sync::Arc;

use parking_lot::Mutex;
use sheeter::{
    SheetState,
    controller::{SheetContainer, SheetFrame},
    px::Px,
};
use tracing::{debug, trace};

/// Layout passes recorded by a [`ConsoleContainer`].
#[derive(Debug, Default)]
pub struct FrameLog {
    pub frames: Vec<SheetFrame>,
    pub constraint_changes: usize,
}

impl FrameLog {
    pub fn peak_height(&self) -> Option<Px> {
        self.frames.iter().map(|f| f.sheet_height).max()
    }

    pub fn last(&self) -> Option<SheetFrame> {
        self.frames.last().copied()
    }
}

/// Headless stand-in for a view hosting the sheet. Logs every constraint
/// change and layout pass.
pub struct ConsoleContainer {
    height: Px,
    constraint: Option<Px>,
    log: Arc<Mutex<FrameLog>>,
}

impl ConsoleContainer {
    pub fn new(height: Px, log: Arc<Mutex<FrameLog>>) -> Self {
        Self {
            height,
            constraint: None,
            log,
        }
    }
}

impl SheetContainer for ConsoleContainer {
    fn bounds_height(&self) -> Px {
        self.height
    }

    fn set_height_constraint(&mut self, height: Px) {
        if self.constraint != Some(height) {
            debug!("height constraint -> {height}");
            self.constraint = Some(height);
            self.log.lock().constraint_changes += 1;
        }
    }

    fn clear_height_constraint(&mut self) {
        debug!("height constraint cleared");
        self.constraint = None;
    }

    fn request_layout(&mut self, frame: SheetFrame) {
        trace!(
            "layout: sheet {} scrim {:.2} {}",
            frame.sheet_height,
            frame.scrim_alpha,
            match frame.state {
                SheetState::Collapsed => "collapsed",
                SheetState::Expanded => "expanded",
            }
        );
        self.log.lock().frames.push(frame);
    }
}
