use std::ops::Index;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::components::{Cell, Pos};

/// Interior cell the carve always starts from.
pub const CARVE_START: Pos = Pos { x: 1, y: 1 };

// Up, right, down, left on the 2-step lattice.
const CARVE_STEPS: [(isize, isize); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

/// Row-major grid of cells, addressed as `grid[pos]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// A `width × height` grid of walls. Dimensions below 1 are raised to 1.
    pub fn walls(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![vec![Cell::Wall; width]; height],
        }
    }

    /// Builds a grid from rows. Returns `None` for empty or ragged input.
    pub fn from_rows(cells: Vec<Vec<Cell>>) -> Option<Self> {
        let height = cells.len();
        let width = cells.first().map(|row| row.len()).unwrap_or(0);
        if width == 0 || cells.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.get(pos) == Some(Cell::Open)
    }

    pub(crate) fn set(&mut self, pos: Pos, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(pos.y).and_then(|row| row.get_mut(pos.x)) {
            *slot = cell;
        }
    }

    /// Converts signed coordinates into a position inside the grid.
    pub fn checked_pos(&self, x: isize, y: isize) -> Option<Pos> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Pos { x, y })
    }

    /// Strictly inside the outer wall ring: `0 < coord < dimension - 1`.
    pub fn is_interior(&self, x: isize, y: isize) -> bool {
        x > 0 && y > 0 && x < self.width as isize - 1 && y < self.height as isize - 1
    }

    pub fn is_boundary(&self, pos: Pos) -> bool {
        pos.x < self.width
            && pos.y < self.height
            && (pos.x == 0 || pos.y == 0 || pos.x == self.width - 1 || pos.y == self.height - 1)
    }

    /// Where carving starts, clamped into grids that are one cell wide or high.
    pub fn carve_start(&self) -> Pos {
        Pos {
            x: CARVE_START.x.min(self.width - 1),
            y: CARVE_START.y.min(self.height - 1),
        }
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Cell::Open)
                .map(move |(x, _)| Pos { x, y })
        })
    }

    pub fn open_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == Cell::Open)
            .count()
    }
}

impl Index<Pos> for Grid {
    type Output = Cell;

    fn index(&self, pos: Pos) -> &Cell {
        &self.cells[pos.y][pos.x]
    }
}

/// Decides the order in which a cell's four carve steps are tried.
///
/// Every `rand::Rng` shuffles uniformly. [`FixedOrder`] keeps the base order
/// up, right, down, left, which makes carving fully deterministic.
pub trait CarveOrder {
    fn order(&mut self, steps: &mut [(isize, isize)]);
}

impl<R: Rng + ?Sized> CarveOrder for R {
    fn order(&mut self, steps: &mut [(isize, isize)]) {
        steps.shuffle(self);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedOrder;

impl CarveOrder for FixedOrder {
    fn order(&mut self, _steps: &mut [(isize, isize)]) {}
}

struct Frame {
    pos: Pos,
    steps: [(isize, isize); 4],
    next: usize,
}

impl Frame {
    fn enter<O: CarveOrder + ?Sized>(pos: Pos, order: &mut O) -> Self {
        let mut steps = CARVE_STEPS;
        order.order(&mut steps);
        Self {
            pos,
            steps,
            next: 0,
        }
    }
}

/// Recursive-backtracker maze generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MazeGenerator;

impl MazeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Carves a perfect maze. Even dimensions are bumped to the next odd value.
    ///
    /// Depth-first search runs on an explicit stack of frames, one per entered
    /// cell, so large mazes do not grow the call stack. Steps are permuted when a
    /// cell is entered, which gives the same visiting order as the recursive form.
    pub fn generate<O: CarveOrder + ?Sized>(&self, width: usize, height: usize, order: &mut O) -> Grid {
        let mut grid = Grid::walls(odd(width), odd(height));
        let start = grid.carve_start();
        grid.set(start, Cell::Open);

        let mut stack = vec![Frame::enter(start, order)];
        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.steps.len() {
                stack.pop();
                continue;
            }
            let (dx, dy) = frame.steps[frame.next];
            frame.next += 1;
            let (x, y) = (frame.pos.x as isize, frame.pos.y as isize);

            if !grid.is_interior(x + dx, y + dy) {
                continue;
            }
            let target = Pos::new((x + dx) as usize, (y + dy) as usize);
            if grid[target] != Cell::Wall {
                continue;
            }
            let between = Pos::new((x + dx / 2) as usize, (y + dy / 2) as usize);
            grid.set(between, Cell::Open);
            grid.set(target, Cell::Open);
            stack.push(Frame::enter(target, order));
        }

        debug!(
            "carved {}x{} maze with {} open cells",
            grid.width(),
            grid.height(),
            grid.open_count()
        );
        grid
    }

    pub fn generate_seeded(&self, width: usize, height: usize, seed: u64) -> Grid {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(width, height, &mut rng)
    }
}

fn odd(n: usize) -> usize {
    let n = n.max(1);
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}
