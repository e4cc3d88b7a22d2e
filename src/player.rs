use crate::components::{Dir, Pos};
use crate::maze::Grid;

/// The cell one step away in `dir`, if it is inside the grid and open.
pub fn target(grid: &Grid, pos: Pos, dir: Dir) -> Option<Pos> {
    let (dx, dy) = dir.delta();
    let next = grid.checked_pos(pos.x as isize + dx, pos.y as isize + dy)?;
    grid.is_open(next).then_some(next)
}

pub fn can_move(grid: &Grid, pos: Pos, dir: Dir) -> bool {
    target(grid, pos, dir).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Cell;

    fn corridor() -> Grid {
        // ###
        // ..#
        // #.#
        let w = Cell::Wall;
        let o = Cell::Open;
        Grid::from_rows(vec![vec![w, w, w], vec![o, o, w], vec![w, o, w]]).unwrap()
    }

    #[test]
    fn moves_into_open_cells() {
        let grid = corridor();
        let pos = Pos::new(1, 1);
        assert_eq!(target(&grid, pos, Dir::Left), Some(Pos::new(0, 1)));
        assert_eq!(target(&grid, pos, Dir::Down), Some(Pos::new(1, 2)));
    }

    #[test]
    fn walls_block() {
        let grid = corridor();
        let pos = Pos::new(1, 1);
        assert!(!can_move(&grid, pos, Dir::Up));
        assert!(!can_move(&grid, pos, Dir::Right));
    }

    #[test]
    fn edges_block() {
        let grid = corridor();
        assert!(!can_move(&grid, Pos::new(0, 1), Dir::Left));
        assert!(!can_move(&grid, Pos::new(1, 2), Dir::Down));
    }
}
