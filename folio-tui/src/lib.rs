//! Terminal front end for the Folio portfolio.
//!
//! [`TuiActor`] owns the crossterm terminal and an [`App`](app::App) state
//! value; it reads typewriter frames from a watch channel and forwards
//! playback toggles to the [`TypewriterActor`](folio_terminal::TypewriterActor).
pub mod app;
mod command;
pub mod content;
pub mod document;
mod feeders;
pub mod hero;
pub mod nav;
pub mod particles;
pub mod reveal;
pub mod styles;
pub mod toast;
mod tui;
mod view;

pub use app::{App, AppSettings};
pub use command::Command;
pub use content::Profile;
pub use feeders::spawn_tui_feeders;
pub use tui::{TuiActor, TuiMsg, restore_terminal};
