use serde::{Deserialize, Serialize};

/// 24-bit color used by all draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const SKY: Color = Color::rgb(0x87, 0xCE, 0xEB);
    pub const SNOW: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const SLEIGH: Color = Color::rgb(0x8B, 0x45, 0x13);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Immediate-mode 2D drawing surface in logical pixels.
pub trait Canvas {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    /// Wipes the whole surface.
    fn clear(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear,
    Rect { x: f64, y: f64, width: f64, height: f64, color: Color },
    Circle { cx: f64, cy: f64, radius: f64, color: Color },
}

/// Canvas that keeps the draw calls of the current frame.
/// `clear` starts a new frame.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            frames: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the surface was cleared.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|cmd| matches!(cmd, DrawCommand::Circle { .. }))
    }

    pub fn rects_with(&self, color: Color) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Rect { color: c, .. } if *c == color))
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.frames += 1;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCommand::Rect { x, y, width, height, color });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle { cx, cy, radius, color });
    }
}
