//! Tick-based musical time and tempo conversion.

/// Musical time in ticks. Real duration depends on [`Tempo`].
pub type Tick = u64;

/// Sentinel for "no pending deadline". Compares greater than every real
/// tick, so it is the identity for `min`-aggregation of wake times.
pub const NEVER: Tick = Tick::MAX;

/// Timeline resolution in ticks per quarter note.
///
/// Fixed across the whole pipeline: the extractor emits ticks at this
/// resolution and the player converts them back with it. Changing one
/// side without the other skews playback speed and envelope offsets.
pub const TICKS_PER_QUARTER: u32 = 480;

/// Default tempo when a score carries no `tempo` record.
pub const DEFAULT_TEMPO_MICROS: u32 = 500_000;

/// Tempo as microseconds per quarter note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tempo {
    /// Microseconds per quarter note (500000 = 120 BPM).
    pub micros_per_quarter: u32,
}

impl Default for Tempo {
    fn default() -> Self {
        Self { micros_per_quarter: DEFAULT_TEMPO_MICROS }
    }
}

impl Tempo {
    /// Create a tempo from microseconds per quarter note.
    pub const fn new(micros_per_quarter: u32) -> Self {
        Self { micros_per_quarter }
    }

    /// Convert a tick delta to real microseconds.
    ///
    /// Exact integer math: the virtual clock always lands on whole ticks,
    /// so repeated conversion accumulates no drift.
    pub const fn delta_micros(self, ticks: Tick) -> u64 {
        ticks * self.micros_per_quarter as u64 / TICKS_PER_QUARTER as u64
    }
}
