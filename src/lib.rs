//! Fog maze: a perfect-maze generator and the single-player exploration game
//! that runs on top of it.
//!
//! [`MazeGenerator`] carves a spanning tree over an odd-sized grid.
//! [`GameSession`] picks a start and an exit for each level, validates moves,
//! reports the cells around the player and walks through the level phases.
//! The `fog-maze` binary drives a session in the terminal.

pub mod clock;
pub mod components;
pub mod config;
pub mod error;
pub mod level;
pub mod maze;
pub mod player;
pub mod render;
pub mod session;

pub use clock::{elapsed_since, format_elapsed, Clock, ManualClock, Stopwatch, SystemClock};
pub use components::{Cell, CellView, Dir, Pos, VisibleCell};
pub use config::Settings;
pub use error::{MazeError, MazeResult};
pub use level::{maze_size, ExitSide, MAX_LEVEL};
pub use maze::{CarveOrder, FixedOrder, Grid, MazeGenerator};
pub use render::{Overlay, Renderer, Reveal};
pub use session::{Advance, GameSession, MoveOutcome, Phase};
