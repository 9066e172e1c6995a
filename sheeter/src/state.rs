//! Logical sheet states and transition outcomes.

/// The committed resting state of a bottom sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SheetState {
    /// The sheet rests at its collapsed height.
    #[default]
    Collapsed,
    /// The sheet rests at its expanded height.
    Expanded,
}

impl SheetState {
    /// Returns the opposite state.
    ///
    /// ```
    /// use sheeter::SheetState;
    ///
    /// assert_eq!(SheetState::Collapsed.toggle(), SheetState::Expanded);
    /// assert_eq!(SheetState::Expanded.toggle().toggle(), SheetState::Expanded);
    /// ```
    pub const fn toggle(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }
}

/// Where a finished transition came to rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalPosition {
    /// Returned to the state the transition started from.
    Start,
    /// Reached the transition's target state.
    End,
}

/// Single-shot notification emitted when a transition finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Completion {
    /// The state the transition was started toward.
    pub target: SheetState,
    /// Which end of the transition it settled on.
    pub position: TerminalPosition,
}

impl Completion {
    /// The state the sheet rests in after this completion.
    pub const fn resting_state(self) -> SheetState {
        match self.position {
            TerminalPosition::End => self.target,
            TerminalPosition::Start => self.target.toggle(),
        }
    }
}
