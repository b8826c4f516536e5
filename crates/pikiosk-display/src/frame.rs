//! Character-grid frames and the display seam

use pikiosk_core::prelude::*;

/// Text columns on a 128 px wide panel with a 6 px font.
pub const COLUMNS: usize = 21;

/// Text rows on a 64 px tall panel with a 10 px font.
pub const ROWS: usize = 6;

/// One run of text at a grid position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOp {
    pub col: u8,
    pub row: u8,
    pub text: String,
    /// Drawn inverted
    pub highlight: bool,
}

/// Everything drawn for one screen, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    ops: Vec<TextOp>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run of text, clipped at the right edge. Off-grid text is dropped.
    pub fn push(&mut self, col: usize, row: usize, text: &str, highlight: bool) {
        if row >= ROWS || col >= COLUMNS || text.is_empty() {
            return;
        }
        let text: String = text.chars().take(COLUMNS - col).collect();
        self.ops.push(TextOp {
            col: col as u8,
            row: row as u8,
            text,
            highlight,
        });
    }

    pub fn text(&mut self, col: usize, row: usize, text: &str) {
        self.push(col, row, text, false);
    }

    pub fn highlighted(&mut self, col: usize, row: usize, text: &str) {
        self.push(col, row, text, true);
    }

    /// Drop everything on `row`.
    pub fn clear_row(&mut self, row: usize) {
        self.ops.retain(|op| op.row as usize != row);
    }

    pub fn ops(&self) -> &[TextOp] {
        &self.ops
    }

    /// Row contents as plain text with trailing blanks removed.
    pub fn line(&self, row: usize) -> String {
        let mut cells = [' '; COLUMNS];
        for op in self.ops.iter().filter(|op| op.row as usize == row) {
            for (i, ch) in op.text.chars().enumerate() {
                if let Some(cell) = cells.get_mut(op.col as usize + i) {
                    *cell = ch;
                }
            }
        }
        cells.iter().collect::<String>().trim_end().to_string()
    }

    /// Highlighted text on `row`, if any.
    pub fn highlight_on(&self, row: usize) -> Option<(usize, &str)> {
        self.ops
            .iter()
            .find(|op| op.row as usize == row && op.highlight)
            .map(|op| (op.col as usize, op.text.as_str()))
    }
}

/// A text display addressed as a character grid.
///
/// Drawing goes to a buffer; nothing is visible until [`flush`](Self::flush).
pub trait DisplayCapability {
    fn clear(&mut self) -> Result<()>;

    fn draw_text(&mut self, col: u8, row: u8, text: &str, highlight: bool) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}
