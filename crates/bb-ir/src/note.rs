//! Note records and their dispatch ordering.

use core::cmp::Ordering;

use crate::tick::Tick;

/// A single note in the extracted timeline. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Note {
    /// Source instrument (program number). Carried through, not yet
    /// interpreted by the engine.
    pub instrument: u8,
    /// MIDI note id (pitch).
    pub note: u8,
    /// Start tick.
    pub start: Tick,
    /// Length in ticks.
    pub duration: Tick,
    /// Logical track this note belongs to.
    pub track: u16,
}

impl Note {
    /// Create a note record.
    pub const fn new(instrument: u8, note: u8, start: Tick, duration: Tick, track: u16) -> Self {
        Self { instrument, note, start, duration, track }
    }

    /// Tick at which the note ends.
    pub const fn end(&self) -> Tick {
        self.start.saturating_add(self.duration)
    }
}

/// Dispatch order: ascending start tick; simultaneous notes by descending
/// note id. The remaining fields keep the order total.
impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| other.note.cmp(&self.note))
            .then_with(|| self.track.cmp(&other.track))
            .then_with(|| self.instrument.cmp(&other.instrument))
            .then_with(|| self.duration.cmp(&other.duration))
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_start_sorts_first() {
        let a = Note::new(0, 60, 0, 480, 0);
        let b = Note::new(0, 60, 480, 480, 0);
        assert!(a < b);
    }

    #[test]
    fn simultaneous_notes_order_by_descending_pitch() {
        let low = Note::new(0, 60, 0, 480, 0);
        let high = Note::new(0, 72, 0, 480, 0);
        assert!(high < low);
    }

    #[test]
    fn end_is_start_plus_duration() {
        let note = Note::new(0, 69, 120, 360, 1);
        assert_eq!(note.end(), 480);
    }

    #[test]
    fn end_saturates_instead_of_wrapping() {
        let note = Note::new(0, 69, Tick::MAX - 10, 100, 0);
        assert_eq!(note.end(), Tick::MAX);
    }
}
