//! Typewriter animation for the hero terminal.
//!
//! - [`Script`]: the fixed lines to type
//! - [`Animator`]: time-free state machine over a script
//! - [`TypewriterActor`]: tokio driver that owns the tick and reset timers and
//!   publishes [`TerminalFrame`]s on a watch channel
pub mod actor;
pub mod animator;
pub mod script;

pub use actor::{TerminalFrame, TerminalTiming, TypewriterActor, TypewriterHandle, TypewriterMsg};
pub use animator::{Animator, Cursor, Effect, Phase, PlaybackState, Resume};
pub use script::{Script, ScriptError, DEFAULT_SESSION};
