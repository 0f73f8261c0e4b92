//! Small tokio actor runtime used by the Folio binary.
//!
//! - [`actor`]: the [`Actor`](actor::Actor) trait, bounded-mailbox
//!   [`Addr`](actor::Addr) and reserved spawning
//! - [`system`]: shutdown broadcast and task tracking
//! - [`builder`]: name-based wiring and the run loop
pub mod actor;
pub mod builder;
pub mod system;

pub use actor::{Actor, ActorHandle, Addr, Context, Reserved};
pub use system::ShutdownHandle;
