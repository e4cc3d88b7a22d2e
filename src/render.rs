use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::components::{CellView, Pos};
use crate::session::GameSession;

const CELL_W: usize = 2;
// HUD above the maze, message and history lines below it.
const EXTRA_ROWS: usize = 3;

/// Which part of the maze is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Whole maze, no player marker.
    Full,
    /// Only cells around the player.
    Fogged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Player,
    Wall,
    Path,
    Exit,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: Glyph::Hidden,
    color: Color::Reset,
};

/// Text drawn around the maze.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    pub hud: String,
    pub message: String,
    pub history: String,
}

/// Redraws only the cells and text lines that changed since the last frame.
pub struct Renderer {
    last: Vec<Cell>,
    last_overlay: [String; 3],
    width: usize,
    height: usize,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_overlay: Default::default(),
            width: 0,
            height: 0,
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn render<W, R>(
        &mut self,
        out: &mut W,
        term_size: (u16, u16),
        session: &GameSession<R>,
        reveal: Reveal,
        overlay: &Overlay,
    ) -> io::Result<()>
    where
        W: Write,
    {
        let (width, height) = (session.width(), session.height());
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.last = vec![BLANK; width * height];
            self.needs_full = true;
        }

        let needed_h = (height + EXTRA_ROWS) as u16;
        let needed_w = (width * CELL_W) as u16;
        let (term_w, term_h) = term_size;

        out.queue(MoveTo(0, 0))?;
        if term_w < needed_w || term_h < needed_h {
            out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        let lines = [
            (self.origin_y - 1, &overlay.hud, Color::White),
            (self.origin_y + height as u16, &overlay.message, Color::Green),
            (self.origin_y + height as u16 + 1, &overlay.history, Color::Grey),
        ];
        for (idx, (row, text, color)) in lines.into_iter().enumerate() {
            if self.needs_full || *text != self.last_overlay[idx] {
                out.queue(MoveTo(self.origin_x, row))?;
                out.queue(Clear(ClearType::CurrentLine))?;
                out.queue(SetForegroundColor(color))?;
                out.queue(Print(text))?;
                out.queue(ResetColor)?;
                self.last_overlay[idx] = text.clone();
            }
        }

        for y in 0..height {
            for x in 0..width {
                let cell = cell_for(session, Pos::new(x, y), reveal);
                let idx = y * width + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(out, x, y, cell)?;
                }
            }
        }
        self.needs_full = false;

        out.flush()
    }

    fn draw_cell<W: Write>(&self, out: &mut W, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Player => "● ",
            Glyph::Wall => "██",
            Glyph::Path => "· ",
            Glyph::Exit => "▒▒",
            Glyph::Hidden => "  ",
        };
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        out.queue(MoveTo(x_pos, y_pos))?;
        out.queue(SetForegroundColor(cell.color))?;
        out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                out.queue(Print(' '))?;
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_for<R>(session: &GameSession<R>, pos: Pos, reveal: Reveal) -> Cell {
    if reveal == Reveal::Fogged {
        if pos == session.player() {
            return Cell {
                glyph: Glyph::Player,
                color: Color::Red,
            };
        }
        if !session.is_visible(pos) {
            return BLANK;
        }
    }
    match session.cell_view(pos) {
        Some(CellView::Wall) => Cell {
            glyph: Glyph::Wall,
            color: Color::DarkRed,
        },
        Some(CellView::Exit) => Cell {
            glyph: Glyph::Exit,
            color: Color::Magenta,
        },
        Some(CellView::Open) => Cell {
            glyph: Glyph::Path,
            color: Color::DarkYellow,
        },
        None => BLANK,
    }
}
