//! Achievement tracking for a directory of Privateer saves: persisted
//! per-identity state plus a session object that folds one save file at a
//! time into it. The binary wires this to a filesystem watcher.

pub mod session;
pub mod state;

pub use session::{Session, Unlocked};
pub use state::AchState;
