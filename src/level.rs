use log::warn;
use rand::Rng;

use crate::components::{Cell, Pos};
use crate::maze::Grid;

pub const MAX_LEVEL: u32 = 50;
pub const BASE_SIZE: usize = 21;
/// Levels per size band.
pub const LEVEL_BAND: u32 = 5;
pub const SIZE_STEP: usize = 2;
pub const MAX_START_ATTEMPTS: usize = 1000;

/// Maze side length for a level: grows by two cells every five levels.
pub fn maze_size(level: u32) -> usize {
    let band = level.max(1).saturating_sub(1) / LEVEL_BAND;
    BASE_SIZE + band as usize * SIZE_STEP
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSide {
    Right,
    Bottom,
}

/// Rejection-samples an open interior cell.
///
/// Gives up after [`MAX_START_ATTEMPTS`] draws and falls back to the carve
/// start, or the first open cell if that one is walled.
pub fn random_start(grid: &Grid, rng: &mut impl Rng) -> Pos {
    if grid.width() >= 3 && grid.height() >= 3 {
        for _ in 0..MAX_START_ATTEMPTS {
            let pos = Pos::new(
                rng.gen_range(1..grid.width() - 1),
                rng.gen_range(1..grid.height() - 1),
            );
            if grid.is_open(pos) {
                return pos;
            }
        }
        warn!(
            "no open start cell after {} draws on a {}x{} grid",
            MAX_START_ATTEMPTS,
            grid.width(),
            grid.height()
        );
    }
    fallback_start(grid)
}

fn fallback_start(grid: &Grid) -> Pos {
    let start = grid.carve_start();
    if grid.is_open(start) {
        return start;
    }
    grid.open_cells().next().unwrap_or(start)
}

/// Places the exit on a uniformly chosen side. See [`place_exit_on`].
pub fn place_exit(grid: &mut Grid, rng: &mut impl Rng) -> Pos {
    let side = if rng.gen_bool(0.5) {
        ExitSide::Right
    } else {
        ExitSide::Bottom
    };
    place_exit_on(grid, side)
}

/// Punches the exit through the right or bottom wall.
///
/// The line just inside that wall is scanned from index 1 and the first open
/// interior neighbour wins. Without one, the scan runs off into the far
/// corner and the exit lands there. The boundary cell is forced open either way.
pub fn place_exit_on(grid: &mut Grid, side: ExitSide) -> Pos {
    let (width, height) = (grid.width(), grid.height());
    let exit = match side {
        ExitSide::Right => {
            let y = scan(height, |y| width >= 2 && grid.is_open(Pos::new(width - 2, y)));
            Pos::new(width - 1, y)
        }
        ExitSide::Bottom => {
            let x = scan(width, |x| height >= 2 && grid.is_open(Pos::new(x, height - 2)));
            Pos::new(x, height - 1)
        }
    };
    grid.set(exit, Cell::Open);
    exit
}

fn scan(len: usize, is_open: impl Fn(usize) -> bool) -> usize {
    (1..len.saturating_sub(1))
        .find(|&i| is_open(i))
        .unwrap_or(len - 1)
}
