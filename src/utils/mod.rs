pub mod errors;
pub mod launch_tracker;

pub use errors::{GameError, GameResult};
pub use launch_tracker::{LaunchTracker, UserRecord};
