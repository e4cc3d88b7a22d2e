use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{Cell, CellView, Dir, Pos, VisibleCell};
use crate::level::{self, MAX_LEVEL};
use crate::maze::{Grid, MazeGenerator};
use crate::player;

pub const DEFAULT_VIEW_RADIUS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Full maze on show, player frozen.
    Previewing,
    Playing,
    Won,
    /// Every level has been cleared.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Rejected,
    Moved,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(u32),
    Completed,
}

/// One player's run through the levels.
pub struct GameSession<R = StdRng> {
    generator: MazeGenerator,
    rng: R,
    grid: Grid,
    player: Pos,
    exit: Pos,
    view_radius: usize,
    level: u32,
    history: Vec<String>,
    phase: Phase,
    recorded: bool,
}

impl GameSession<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> GameSession<R> {
    /// Starts at level 1 in the preview phase.
    pub fn new(rng: R) -> Self {
        Self::with_view_radius(rng, DEFAULT_VIEW_RADIUS)
    }

    pub fn with_view_radius(rng: R, view_radius: usize) -> Self {
        let mut session = Self {
            generator: MazeGenerator::new(),
            rng,
            grid: Grid::walls(1, 1),
            player: Pos::default(),
            exit: Pos::default(),
            view_radius,
            level: 1,
            history: Vec::new(),
            phase: Phase::Previewing,
            recorded: false,
        };
        session.start_level(1);
        session
    }

    /// Builds a fresh maze for `level` and enters the preview phase.
    ///
    /// Levels outside `1..=MAX_LEVEL` are ignored and return `false`.
    pub fn start_level(&mut self, level: u32) -> bool {
        if level == 0 || level > MAX_LEVEL {
            warn!("ignoring start of level {level}, valid range is 1..={MAX_LEVEL}");
            return false;
        }
        let size = level::maze_size(level);
        self.grid = self.generator.generate(size, size, &mut self.rng);
        self.level = level;
        self.player = level::random_start(&self.grid, &mut self.rng);
        self.exit = level::place_exit(&mut self.grid, &mut self.rng);
        self.phase = Phase::Previewing;
        self.recorded = false;
        info!(
            "level {} started: {}x{} maze, start {:?}, exit {:?}",
            level,
            self.grid.width(),
            self.grid.height(),
            self.player,
            self.exit
        );
        true
    }

    /// Moves the exit to a freshly chosen spot on the right or bottom wall.
    ///
    /// The previous exit is walled up again so the border keeps a single
    /// opening. Nothing changes while the player stands on the exit.
    pub fn place_exit(&mut self) -> Pos {
        if self.player == self.exit {
            return self.exit;
        }
        self.grid.set(self.exit, Cell::Wall);
        self.exit = level::place_exit(&mut self.grid, &mut self.rng);
        self.exit
    }

    /// Ends the preview. Returns `false` outside [`Phase::Previewing`].
    pub fn begin_play(&mut self) -> bool {
        if self.phase != Phase::Previewing {
            return false;
        }
        self.phase = Phase::Playing;
        true
    }

    /// Moves the player one cell if the target is open and play is underway.
    pub fn try_move(&mut self, dir: Dir) -> MoveOutcome {
        if self.phase != Phase::Playing {
            debug!("move {dir:?} ignored in phase {:?}", self.phase);
            return MoveOutcome::Rejected;
        }
        let Some(next) = player::target(&self.grid, self.player, dir) else {
            debug!("move {dir:?} from {:?} blocked", self.player);
            return MoveOutcome::Rejected;
        };
        self.player = next;
        if self.check_win() {
            self.phase = Phase::Won;
            info!("level {} exit reached", self.level);
            return MoveOutcome::Won;
        }
        MoveOutcome::Moved
    }

    /// Like [`try_move`](Self::try_move) for a textual direction. Unknown
    /// tokens are rejected.
    pub fn try_move_token(&mut self, token: &str) -> MoveOutcome {
        match Dir::parse(token) {
            Some(dir) => self.try_move(dir),
            None => {
                warn!("unrecognized direction {token:?}");
                MoveOutcome::Rejected
            }
        }
    }

    /// Goes to the next level, or to [`Phase::Completed`] after the last one.
    pub fn advance_level(&mut self) -> Advance {
        if self.phase == Phase::Completed {
            return Advance::Completed;
        }
        if self.level < MAX_LEVEL {
            let next = self.level + 1;
            self.start_level(next);
            Advance::Next(next)
        } else {
            self.phase = Phase::Completed;
            info!("all {MAX_LEVEL} levels complete");
            Advance::Completed
        }
    }

    /// Appends the level time to the history. Accepted once per won level.
    pub fn record_completion(&mut self, elapsed: impl Into<String>) -> bool {
        if self.phase != Phase::Won || self.recorded {
            warn!("completion for level {} not recorded in phase {:?}", self.level, self.phase);
            return false;
        }
        let elapsed = elapsed.into();
        info!("level {} completed in {}", self.level, elapsed);
        self.history.push(elapsed);
        self.recorded = true;
        true
    }
}

impl<R> GameSession<R> {
    pub fn check_win(&self) -> bool {
        self.player == self.exit
    }

    /// Cells within the view radius (Chebyshev) of the player.
    pub fn visible_cells(&self) -> Vec<VisibleCell> {
        let r = self.view_radius;
        let x0 = self.player.x.saturating_sub(r);
        let y0 = self.player.y.saturating_sub(r);
        let x1 = self.player.x.saturating_add(r).min(self.grid.width() - 1);
        let y1 = self.player.y.saturating_add(r).min(self.grid.height() - 1);

        let mut cells = Vec::with_capacity((x1 - x0 + 1) * (y1 - y0 + 1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                let pos = Pos::new(x, y);
                if let Some(view) = self.cell_view(pos) {
                    cells.push(VisibleCell { pos, view });
                }
            }
        }
        cells
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        pos.chebyshev(self.player) <= self.view_radius
    }

    /// How a cell looks with nothing hidden. `None` outside the grid.
    pub fn cell_view(&self, pos: Pos) -> Option<CellView> {
        if pos == self.exit {
            return Some(CellView::Exit);
        }
        self.grid.get(pos).map(|cell| match cell {
            Cell::Open => CellView::Open,
            Cell::Wall => CellView::Wall,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn exit(&self) -> Pos {
        self.exit
    }

    pub fn view_radius(&self) -> usize {
        self.view_radius
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        MAX_LEVEL
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(seed: u64) -> GameSession {
        let mut session = GameSession::seeded(seed);
        assert!(session.begin_play());
        session
    }

    // Walks the player to the exit with a depth-first search over the maze.
    fn walk_to_exit(session: &mut GameSession) -> MoveOutcome {
        let path = path_to_exit(session);
        let mut outcome = MoveOutcome::Rejected;
        for dir in path {
            outcome = session.try_move(dir);
            assert_ne!(outcome, MoveOutcome::Rejected);
        }
        outcome
    }

    fn path_to_exit(session: &GameSession) -> Vec<Dir> {
        let grid = session.grid();
        let mut seen = vec![vec![false; grid.width()]; grid.height()];
        let mut stack = vec![(session.player(), Vec::new())];
        while let Some((pos, path)) = stack.pop() {
            if pos == session.exit() {
                return path;
            }
            if seen[pos.y][pos.x] {
                continue;
            }
            seen[pos.y][pos.x] = true;
            for dir in Dir::ALL {
                if let Some(next) = player::target(grid, pos, dir) {
                    let mut path = path.clone();
                    path.push(dir);
                    stack.push((next, path));
                }
            }
        }
        panic!("exit unreachable");
    }

    #[test]
    fn new_session_previews_level_one() {
        let session = GameSession::seeded(1);
        assert_eq!(session.level(), 1);
        assert_eq!(session.max_level(), 50);
        assert_eq!(session.phase(), Phase::Previewing);
        assert_eq!((session.width(), session.height()), (21, 21));
        assert!(session.grid().is_open(session.player()));
        assert!(session.grid().is_open(session.exit()));
        assert!(session.grid().is_boundary(session.exit()));
        assert!(session.history().is_empty());
    }

    #[test]
    fn moves_are_ignored_during_preview() {
        let mut session = GameSession::seeded(2);
        let before = session.player();
        for dir in Dir::ALL {
            assert_eq!(session.try_move(dir), MoveOutcome::Rejected);
        }
        assert_eq!(session.player(), before);
    }

    #[test]
    fn try_move_follows_the_grid() {
        for seed in 0..10 {
            let mut session = playing(seed);
            for dir in Dir::ALL {
                let before = session.player();
                let expected = player::target(session.grid(), before, dir);
                let outcome = session.try_move(dir);
                match expected {
                    Some(next) => {
                        assert_ne!(outcome, MoveOutcome::Rejected);
                        assert_eq!(session.player(), next);
                        // Step back so every direction is tried from the same cell.
                        if outcome == MoveOutcome::Moved {
                            let back = match dir {
                                Dir::Up => Dir::Down,
                                Dir::Down => Dir::Up,
                                Dir::Left => Dir::Right,
                                Dir::Right => Dir::Left,
                            };
                            assert_eq!(session.try_move(back), MoveOutcome::Moved);
                        } else {
                            break;
                        }
                    }
                    None => {
                        assert_eq!(outcome, MoveOutcome::Rejected);
                        assert_eq!(session.player(), before);
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_tokens_are_no_ops() {
        let mut session = playing(3);
        let before = session.player();
        assert_eq!(session.try_move_token("sideways"), MoveOutcome::Rejected);
        assert_eq!(session.player(), before);
    }

    #[test]
    fn win_only_on_the_exit() {
        let mut session = playing(4);
        let path = path_to_exit(&session);
        let (last, rest) = path.split_last().expect("start is never the exit");
        for dir in rest {
            assert_eq!(session.try_move(*dir), MoveOutcome::Moved);
            assert!(!session.check_win());
        }
        assert_eq!(session.try_move(*last), MoveOutcome::Won);
        assert!(session.check_win());
        assert_eq!(session.player(), session.exit());
        assert_eq!(session.phase(), Phase::Won);
        // No more moves once won.
        assert_eq!(session.try_move(Dir::Left), MoveOutcome::Rejected);
    }

    #[test]
    fn visible_cells_form_a_clipped_square() {
        let session = GameSession::seeded(5);
        let player = session.player();
        let visible = session.visible_cells();
        assert!(visible.len() <= 25);
        assert!(visible.iter().all(|c| c.pos.chebyshev(player) <= 2));
        assert!(visible.iter().any(|c| c.pos == player && c.view == CellView::Open));

        let expected: usize = (0..session.height())
            .flat_map(|y| (0..session.width()).map(move |x| Pos::new(x, y)))
            .filter(|p| session.is_visible(*p))
            .count();
        assert_eq!(visible.len(), expected);
    }

    #[test]
    fn exit_is_tagged_when_in_view() {
        let mut session = playing(6);
        walk_to_exit(&mut session);
        let visible = session.visible_cells();
        let exit = visible.iter().find(|c| c.pos == session.exit()).unwrap();
        assert_eq!(exit.view, CellView::Exit);
        // The exit sits on the boundary, so the square is clipped.
        assert!(visible.len() < 25);
    }

    #[test]
    fn completion_is_recorded_once_per_win() {
        let mut session = playing(7);
        assert!(!session.record_completion("00:01"));
        assert_eq!(walk_to_exit(&mut session), MoveOutcome::Won);
        assert!(session.record_completion("00:42"));
        assert!(!session.record_completion("00:43"));
        assert_eq!(session.history(), ["00:42".to_string()]);
    }

    #[test]
    fn advancing_regenerates_and_keeps_history() {
        let mut session = playing(8);
        walk_to_exit(&mut session);
        session.record_completion("00:10");
        assert_eq!(session.advance_level(), Advance::Next(2));
        assert_eq!(session.level(), 2);
        assert_eq!(session.phase(), Phase::Previewing);
        assert_eq!(session.history().len(), 1);
        assert!(session.grid().is_open(session.player()));
        assert!(!session.check_win());
    }

    #[test]
    fn level_bands_change_the_maze_size() {
        let mut session = GameSession::seeded(9);
        assert!(session.start_level(6));
        assert_eq!(session.width(), 23);
        assert!(session.start_level(11));
        assert_eq!(session.height(), 25);
        assert!(!session.start_level(0));
        assert!(!session.start_level(MAX_LEVEL + 1));
        assert_eq!(session.level(), 11);
    }

    #[test]
    fn last_level_completes_without_regenerating() {
        let mut session = GameSession::seeded(10);
        session.start_level(MAX_LEVEL);
        session.begin_play();
        walk_to_exit(&mut session);
        assert!(session.record_completion("01:00"));

        let grid = session.grid().clone();
        assert_eq!(session.advance_level(), Advance::Completed);
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.level(), MAX_LEVEL);
        assert_eq!(session.grid(), &grid);
        assert_eq!(session.advance_level(), Advance::Completed);
    }

    fn open_boundary(session: &GameSession) -> Vec<Pos> {
        let grid = session.grid();
        grid.open_cells().filter(|p| grid.is_boundary(*p)).collect()
    }

    #[test]
    fn replacing_the_exit_keeps_one_border_opening() {
        for seed in [4, 12, 21, 33] {
            let mut session = GameSession::seeded(seed);
            for _ in 0..8 {
                let exit = session.place_exit();
                assert_eq!(session.exit(), exit);
                assert!(session.grid().is_boundary(exit));
                assert!(session.grid().is_open(exit));
                assert_eq!(open_boundary(&session), vec![exit], "seed {seed}");
            }
        }
    }

    #[test]
    fn exit_stays_put_under_the_player() {
        let mut session = playing(14);
        walk_to_exit(&mut session);
        let exit = session.exit();
        assert_eq!(session.place_exit(), exit);
        assert_eq!(open_boundary(&session), vec![exit]);
        assert!(session.grid().is_open(session.player()));
    }

    #[test]
    fn huge_view_radius_reveals_the_whole_grid() {
        let session = GameSession::with_view_radius(StdRng::seed_from_u64(1), usize::MAX);
        let visible = session.visible_cells();
        assert_eq!(visible.len(), session.width() * session.height());
        assert!(session.is_visible(Pos::new(0, 0)));
    }

    #[test]
    fn custom_view_radius() {
        let session = GameSession::with_view_radius(StdRng::seed_from_u64(13), 0);
        let visible = session.visible_cells();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].pos, session.player());
    }
}
