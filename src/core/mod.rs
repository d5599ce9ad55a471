pub mod engine;
pub mod entities;
pub mod events;
pub mod game_state;
pub mod input;
pub mod player;

pub use engine::{GameEngine, GameOverCallback};
pub use entities::{Sleigh, Snowflake};
pub use events::{GameEvent, GameEventType, GameEventHandler, EventLogger};
pub use game_state::{GamePhase, GameState, RunStatistics};
pub use input::{Direction, InputEvent, InputState};
pub use player::UserProfile;
