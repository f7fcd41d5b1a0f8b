//! Engine error taxonomy.

use core::fmt;

use bb_ir::Tick;

/// Fatal engine errors.
///
/// Channel exhaustion is deliberately absent: a note that finds no voice
/// is dropped, counted, and logged, never raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// A note references a track with no mapped voice pool.
    UnmappedTrack(u16),
    /// The virtual clock was asked to move backwards.
    TimeReversal { from: Tick, to: Tick },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnmappedTrack(track) => {
                write!(f, "track {} has no mapped voice pool", track)
            }
            EngineError::TimeReversal { from, to } => {
                write!(f, "clock moved backwards: {} -> {}", from, to)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}
