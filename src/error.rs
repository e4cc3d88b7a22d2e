use std::path::PathBuf;

/// Errors raised by the terminal front end. The game core itself never fails.
#[derive(thiserror::Error, Debug)]
pub enum MazeError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type MazeResult<T> = Result<T, MazeError>;
