//! Time-free typewriter state machine.
//!
//! [`Animator`] never touches a clock. Every transition returns the timer
//! [`Effect`]s the driver must apply, so the same table is exercised by unit
//! tests and by the tokio driver in [`crate::actor`].
//!
//! | phase                    | event   | condition          | next phase               | effects                  |
//! |--------------------------|---------|--------------------|--------------------------|--------------------------|
//! | Typing                   | tick    | char left on line  | Typing (char + 1)        |                          |
//! | Typing                   | tick    | line left          | Typing (next line)       |                          |
//! | Typing                   | tick    | last line done     | WaitingToReset           | CancelTick, ArmReset     |
//! | WaitingToReset           | reset   |                    | Typing at (0, 0)         | ArmTick                  |
//! | Typing                   | toggle  |                    | Paused(Typing)           | CancelTick               |
//! | WaitingToReset           | toggle  |                    | Paused(WaitingToReset)   | CancelReset              |
//! | Paused(Typing)           | toggle  |                    | Typing                   | ArmTick                  |
//! | Paused(WaitingToReset)   | toggle  |                    | WaitingToReset           | ArmReset                 |
//!
//! Any other (phase, event) pair is ignored and emits nothing.
use crate::script::Script;

/// Reveal progress: `line` is always a valid index into the script and
/// `ch` never exceeds that line's length in chars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub ch: usize,
}

impl Cursor {
    pub const START: Cursor = Cursor { line: 0, ch: 0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

/// Phase a paused animator returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Typing,
    WaitingToReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    WaitingToReset,
    Paused(Resume),
}

/// Timer command emitted by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ArmTick,
    CancelTick,
    ArmReset,
    CancelReset,
}

/// Typewriter over a fixed [`Script`].
///
/// ```
/// use folio_terminal::{Animator, Cursor, Effect, Script};
///
/// let mut anim = Animator::new(Script::new(["hi"]).unwrap());
/// assert_eq!(anim.start(), &[Effect::ArmTick]);
/// anim.tick();
/// assert_eq!(anim.visible_text(), "h");
/// assert_eq!(anim.cursor(), Cursor { line: 0, ch: 1 });
/// ```
#[derive(Debug, Clone)]
pub struct Animator {
    script: Script,
    cursor: Cursor,
    phase: Phase,
    loops: u64,
}

impl Animator {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            cursor: Cursor::START,
            phase: Phase::Typing,
            loops: 0,
        }
    }

    /// Effects needed to begin playback from a freshly mounted animator.
    pub fn start(&self) -> &'static [Effect] {
        match self.phase {
            Phase::Typing => &[Effect::ArmTick],
            Phase::WaitingToReset => &[Effect::ArmReset],
            Phase::Paused(_) => &[],
        }
    }

    /// Advance one character, one line, or finish the script.
    pub fn tick(&mut self) -> &'static [Effect] {
        if self.phase != Phase::Typing {
            return &[];
        }
        let Cursor { line, ch } = self.cursor;
        if ch < self.script.char_len(line) {
            self.cursor.ch += 1;
            &[]
        } else if line < self.script.last_index() {
            self.cursor = Cursor { line: line + 1, ch: 0 };
            &[]
        } else {
            self.phase = Phase::WaitingToReset;
            &[Effect::CancelTick, Effect::ArmReset]
        }
    }

    /// The delayed reset fired: rewind to the first line and keep typing.
    pub fn reset_elapsed(&mut self) -> &'static [Effect] {
        if self.phase != Phase::WaitingToReset {
            return &[];
        }
        self.cursor = Cursor::START;
        self.phase = Phase::Typing;
        self.loops += 1;
        &[Effect::ArmTick]
    }

    /// Flip between playing and paused. The cursor is never touched.
    pub fn toggle_playback(&mut self) -> &'static [Effect] {
        let (next, effects): (Phase, &'static [Effect]) = match self.phase {
            Phase::Typing => (Phase::Paused(Resume::Typing), &[Effect::CancelTick]),
            Phase::WaitingToReset => (
                Phase::Paused(Resume::WaitingToReset),
                &[Effect::CancelReset],
            ),
            Phase::Paused(Resume::Typing) => (Phase::Typing, &[Effect::ArmTick]),
            Phase::Paused(Resume::WaitingToReset) => {
                (Phase::WaitingToReset, &[Effect::ArmReset])
            }
        };
        self.phase = next;
        effects
    }

    /// Cancellations for whichever timer the current phase implies is armed.
    pub fn teardown(&self) -> &'static [Effect] {
        match self.phase {
            Phase::Typing => &[Effect::CancelTick],
            Phase::WaitingToReset => &[Effect::CancelReset],
            Phase::Paused(_) => &[],
        }
    }

    pub fn playback(&self) -> PlaybackState {
        match self.phase {
            Phase::Paused(_) => PlaybackState::Paused,
            _ => PlaybackState::Playing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Number of completed loops (reset timer firings).
    pub fn loops_completed(&self) -> u64 {
        self.loops
    }

    /// True once the last line is fully revealed and the reset is pending.
    pub fn is_complete(&self) -> bool {
        matches!(
            self.phase,
            Phase::WaitingToReset | Phase::Paused(Resume::WaitingToReset)
        )
    }

    /// Lines produced so far: earlier lines in full, the current one as a prefix.
    pub fn visible_lines(&self) -> impl Iterator<Item = &str> + '_ {
        let Cursor { line, ch } = self.cursor;
        (0..=line).map(move |i| {
            if i < line {
                self.script.line(i).unwrap_or_default()
            } else {
                self.script.prefix(i, ch)
            }
        })
    }

    pub fn visible_text(&self) -> String {
        self.visible_lines().collect::<Vec<_>>().join("\n")
    }
}
