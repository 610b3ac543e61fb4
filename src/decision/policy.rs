//! Direction decision policy.
//!
//! Picks the slice with the most free space (lowest index on ties) and maps
//! its position relative to the middle slice `floor(num_slices / 2)` to a
//! command. Memoryless: the history plays no part.

use std::fmt;

use crate::scanner::FreeSpaceVector;

/// Movement command handed to the actuator side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Best slice lies left of the middle
    Left,
    /// Best slice is the middle one
    Forward,
    /// Best slice lies right of the middle
    Right,
}

impl Command {
    /// All commands, left to right
    pub const ALL: [Command; 3] = [Command::Left, Command::Forward, Command::Right];

    /// Command text as shown to operators
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Left => "Move Left",
            Command::Forward => "Move Forward",
            Command::Right => "Move Right",
        }
    }

    /// Map a slice index to a command for the given slice count.
    pub fn for_slice(index: usize, num_slices: usize) -> Self {
        let mid = num_slices / 2;
        if index < mid {
            Command::Left
        } else if index > mid {
            Command::Right
        } else {
            Command::Forward
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one frame's decision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Slice with the most free space
    pub best_index: usize,
    /// Resulting command
    pub command: Command,
}

/// Decide a direction from per-slice free-space counts.
///
/// An empty vector cannot come out of the estimator; it is treated as a
/// single blocked slice and yields index 0.
pub fn decide(free_space: &FreeSpaceVector) -> Decision {
    let best_index = free_space.argmax().unwrap_or(0);
    Decision {
        best_index,
        command: Command::for_slice(best_index, free_space.len()),
    }
}
