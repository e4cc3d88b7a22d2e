// Value types shared by the generator, the session and the renderer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, `max(|dx|, |dy|)`.
    pub fn chebyshev(self, other: Pos) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    /// Parses an input token. Unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Dir> {
        match token.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "k" => Some(Dir::Up),
            "down" | "arrowdown" | "j" => Some(Dir::Down),
            "left" | "arrowleft" | "h" => Some(Dir::Left),
            "right" | "arrowright" | "l" => Some(Dir::Right),
            _ => None,
        }
    }
}

/// What a renderer should draw for a revealed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Open,
    Wall,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCell {
    pub pos: Pos,
    pub view: CellView,
}
