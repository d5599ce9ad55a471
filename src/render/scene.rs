use crate::core::entities::{Sleigh, Snowflake};
use crate::render::canvas::{Canvas, Color};

/// Spacing of the decorative snow dot grid.
pub const PATTERN_SPACING: f64 = 50.0;
pub const PATTERN_DOT_RADIUS: f64 = 2.0;

/// Sky fill plus a dot grid scrolled upward by `offset`.
pub fn draw_background<C: Canvas + ?Sized>(canvas: &mut C, offset: f64) {
    let (width, height) = (canvas.width(), canvas.height());
    canvas.fill_rect(0.0, 0.0, width, height, Color::SKY);

    let mut y = -offset;
    while y < height {
        let mut x = 0.0;
        while x < width {
            canvas.fill_circle(x, y, PATTERN_DOT_RADIUS, Color::SNOW);
            x += PATTERN_SPACING;
        }
        y += PATTERN_SPACING;
    }
}

pub fn draw_sleigh<C: Canvas + ?Sized>(canvas: &mut C, sleigh: &Sleigh) {
    canvas.fill_rect(sleigh.left(), sleigh.top(), sleigh.width, sleigh.height, Color::SLEIGH);
}

pub fn draw_snowflakes<C: Canvas + ?Sized>(canvas: &mut C, snowflakes: &[Snowflake]) {
    for snowflake in snowflakes {
        canvas.fill_circle(snowflake.x, snowflake.y, snowflake.radius(), Color::SNOW);
    }
}
