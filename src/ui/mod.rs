pub mod interface;
pub mod theme;
pub mod components;
pub mod driver;

pub use interface::GameInterface;
pub use theme::{Theme, ThemeManager};
pub use components::*;
pub use driver::{drain_until_closed, spawn_key_reader, FrameDriver, HostInput, ListenerHandle, SessionOutcome};
