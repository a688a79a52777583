#![forbid(unsafe_code)]

pub mod error;
pub mod roster;

pub use error::RosterError;
pub use roster::{RosterService, SyncState};
