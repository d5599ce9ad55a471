use colored::Colorize;
use console::Term;
use std::io;
use crate::config::DisplayConfig;
use crate::render::canvas::{Canvas, Color};
use crate::utils::{GameError, GameResult};

/// Terminal columns and rows kept free around the playfield for the score
/// line and borders.
const RESERVED_COLS: u32 = 4;
const RESERVED_ROWS: u32 = 5;

/// A logical-pixel canvas rasterized onto a grid of terminal cells.
///
/// Each cell covers `cell_width x cell_height` logical pixels and takes the
/// color of the last shape painted over it.
#[derive(Debug, Clone)]
pub struct TerminalCanvas {
    width: f64,
    height: f64,
    cell_width: f64,
    cell_height: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Color>,
}

impl TerminalCanvas {
    pub fn new(width: f64, height: f64, cell_width: u32, cell_height: u32) -> GameResult<Self> {
        if cell_width == 0 || cell_height == 0 {
            return Err(GameError::canvas("Cell size must be greater than 0"));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(GameError::canvas(format!("Invalid surface size {}x{}", width, height)));
        }

        let (cell_width, cell_height) = (cell_width as f64, cell_height as f64);
        let cols = (width / cell_width).ceil() as usize;
        let rows = (height / cell_height).ceil() as usize;

        Ok(Self {
            width,
            height,
            cell_width,
            cell_height,
            cols,
            rows,
            cells: vec![Color::BLACK; cols * rows],
        })
    }

    /// Sizes a canvas to the terminal, capped by the configured maximum.
    pub fn fit_to_terminal(term_rows: u16, term_cols: u16, display: &DisplayConfig) -> GameResult<Self> {
        let (width, height) = fit_dimensions(term_rows, term_cols, display);
        Self::new(width, height, display.cell_width, display.cell_height)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Color> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    fn paint(&mut self, col: usize, row: usize, color: Color) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = color;
        }
    }

    fn col_range(&self, from_x: f64, to_x: f64) -> (usize, usize) {
        let start = (from_x / self.cell_width).floor().max(0.0) as usize;
        let end = ((to_x / self.cell_width).ceil().max(0.0) as usize).min(self.cols);
        (start, end)
    }

    fn row_range(&self, from_y: f64, to_y: f64) -> (usize, usize) {
        let start = (from_y / self.cell_height).floor().max(0.0) as usize;
        let end = ((to_y / self.cell_height).ceil().max(0.0) as usize).min(self.rows);
        (start, end)
    }

    /// One string per cell row, colored with truecolor backgrounds.
    pub fn render_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols)
            .map(|row| {
                row.iter()
                    .map(|c| " ".on_truecolor(c.r, c.g, c.b).to_string())
                    .collect::<String>()
            })
            .collect()
    }

    /// Redraws the grid from the top-left corner, followed by `footer`.
    pub fn present(&self, term: &Term, footer: &str) -> io::Result<()> {
        term.move_cursor_to(0, 0)?;
        for line in self.render_lines() {
            term.write_line(&line)?;
        }
        term.clear_line()?;
        term.write_line(footer)?;
        term.flush()
    }
}

/// Logical canvas size for a terminal of the given size.
pub fn fit_dimensions(term_rows: u16, term_cols: u16, display: &DisplayConfig) -> (f64, f64) {
    let cols = (term_cols as u32).saturating_sub(RESERVED_COLS);
    let rows = (term_rows as u32).saturating_sub(RESERVED_ROWS);
    let width = (cols * display.cell_width).min(display.max_canvas_width);
    let height = (rows * display.cell_height).min(display.max_canvas_height);
    (width as f64, height as f64)
}

impl Canvas for TerminalCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.cells.fill(Color::BLACK);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let (col_start, col_end) = self.col_range(x, x + width);
        let (row_start, row_end) = self.row_range(y, y + height);

        for row in row_start..row_end {
            for col in col_start..col_end {
                self.paint(col, row, color);
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let (col_start, col_end) = self.col_range(cx - radius, cx + radius);
        let (row_start, row_end) = self.row_range(cy - radius, cy + radius);
        let mut painted = false;

        for row in row_start..row_end {
            for col in col_start..col_end {
                let center_x = (col as f64 + 0.5) * self.cell_width;
                let center_y = (row as f64 + 0.5) * self.cell_height;
                let (dx, dy) = (center_x - cx, center_y - cy);
                if dx * dx + dy * dy <= radius * radius {
                    self.paint(col, row, color);
                    painted = true;
                }
            }
        }

        // Shapes smaller than a cell still show up in the cell under their center.
        if !painted && cx >= 0.0 && cy >= 0.0 {
            let col = (cx / self.cell_width) as usize;
            let row = (cy / self.cell_height) as usize;
            self.paint(col, row, color);
        }
    }
}
