//! Configuration errors. Wheel operations themselves never fail: a command
//! issued in the wrong phase is simply ignored.

use thiserror::Error;

/// The riddle table does not line up with the wheel's segment range `1..=N`.
#[derive(Debug, Error)]
pub enum RiddleTableError {
    #[error("riddle table is empty")]
    Empty,
    #[error("riddle id {id} is outside the segment range 1..={segments}")]
    OutOfRange { id: u32, segments: u32 },
    #[error("riddle id {0} appears more than once")]
    Duplicate(u32),
    #[error("no riddle for segment {0}")]
    Missing(u32),
    #[error("malformed riddle table: {0}")]
    Parse(String),
}
