#![forbid(unsafe_code)]

//! A minimal cell grid the view draws into before it is flushed to the
//! terminal in one pass.

use std::io::{self, Write};

use crossterm::{cursor, queue, style};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// How a cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    Bold,
    Dim,
    Reverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cell {
    /// Grapheme drawn here; empty for the tail of a wide grapheme.
    content: String,
    tone: Tone,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: " ".to_string(),
            tone: Tone::Plain,
        }
    }
}

/// Fixed-size grid of cells plus an optional cursor position.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    cursor: Option<(u16, u16)>,
}

impl Canvas {
    /// A blank canvas.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            cursor: None,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Draw `text` from `(x, y)`, stopping before column `x + max_width` or
    /// the right edge. Returns the column after the last cell written.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, max_width: u16, tone: Tone) -> u16 {
        let limit = x.saturating_add(max_width).min(self.width);
        let mut col = x;
        for grapheme in text.graphemes(true) {
            let w = u16::try_from(grapheme.width()).unwrap_or(u16::MAX);
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > limit {
                break;
            }
            if let Some(i) = self.index(col, y) {
                self.cells[i] = Cell {
                    content: grapheme.to_string(),
                    tone,
                };
            }
            for tail in 1..w {
                if let Some(i) = self.index(col + tail, y) {
                    self.cells[i] = Cell {
                        content: String::new(),
                        tone,
                    };
                }
            }
            col += w;
        }
        col
    }

    /// Fill `width` cells from `(x, y)` with spaces in `tone`.
    pub fn fill(&mut self, x: u16, y: u16, width: u16, tone: Tone) {
        for col in x..x.saturating_add(width).min(self.width) {
            if let Some(i) = self.index(col, y) {
                self.cells[i] = Cell {
                    content: " ".to_string(),
                    tone,
                };
            }
        }
    }

    /// Show the cursor at `(x, y)` after flushing.
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Some((x.min(self.width.saturating_sub(1)), y));
    }

    #[must_use]
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Text of row `y`, trailing spaces included.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.index(x, y))
            .map(|i| self.cells[i].content.as_str())
            .collect()
    }

    /// Tone of the cell at `(x, y)`.
    #[must_use]
    pub fn tone_at(&self, x: u16, y: u16) -> Option<Tone> {
        self.index(x, y).map(|i| self.cells[i].tone)
    }

    /// Write the whole grid to `out`, one attribute change per tone run.
    /// Every cell is written, so no clear is needed first.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn flush<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, cursor::Hide)?;
        for y in 0..self.height {
            queue!(out, cursor::MoveTo(0, y))?;
            let mut current = Tone::Plain;
            queue!(out, style::SetAttribute(style::Attribute::Reset))?;
            for x in 0..self.width {
                let Some(i) = self.index(x, y) else { continue };
                let cell = &self.cells[i];
                if cell.tone != current {
                    queue!(out, style::SetAttribute(style::Attribute::Reset))?;
                    if let Some(attr) = attribute(cell.tone) {
                        queue!(out, style::SetAttribute(attr))?;
                    }
                    current = cell.tone;
                }
                queue!(out, style::Print(&cell.content))?;
            }
        }
        queue!(out, style::SetAttribute(style::Attribute::Reset))?;
        if let Some((x, y)) = self.cursor {
            queue!(out, cursor::MoveTo(x, y), cursor::Show)?;
        }
        out.flush()
    }
}

fn attribute(tone: Tone) -> Option<style::Attribute> {
    match tone {
        Tone::Plain => None,
        Tone::Bold => Some(style::Attribute::Bold),
        Tone::Dim => Some(style::Attribute::Dim),
        Tone::Reverse => Some(style::Attribute::Reverse),
    }
}
