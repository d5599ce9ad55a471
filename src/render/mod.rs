pub mod canvas;
pub mod scene;
pub mod terminal;

pub use canvas::{Canvas, Color, DrawCommand, RecordingCanvas};
pub use terminal::TerminalCanvas;
