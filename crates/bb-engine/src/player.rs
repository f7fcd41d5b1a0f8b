//! The playback scheduler: a virtual tick clock over the note timeline.
//!
//! `Player` is pure discrete-event machinery: each `tick` dispatches the
//! notes due now and reports the next tick at which anything changes.
//! Real-time pacing between ticks belongs to the host.

use bb_ir::{Score, Tick, NEVER};

use crate::error::EngineError;
use crate::router::TrackRouter;

/// Longest duration a dispatched note may hold a voice, in ticks. Longer
/// notes are truncated so a single held chord cannot starve the pool.
pub const MAX_NOTE_TICKS: Tick = 960;

/// Scheduler lifecycle: `begin` -> `tick`* -> `finish`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// Created, clock not started.
    Idle,
    /// Between `begin` and `finish`.
    Running,
    /// `finish` ran; all hardware silenced.
    Silenced,
}

/// Owns the score, the router, and the virtual clock for one session.
pub struct Player {
    score: Score,
    router: TrackRouter,
    time: Tick,
    cursor: usize,
    state: PlayerState,
}

impl core::fmt::Debug for Player {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Player")
            .field("time", &self.time)
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Player {
    /// Build a player for `score` over `router`.
    ///
    /// Fails if any track in the score has no mapped pool; the check
    /// runs here so a bad routing table can never surface mid-playback.
    /// The score is brought into dispatch order (a no-op for timelines
    /// the extractor already sorted).
    pub fn new(mut score: Score, router: TrackRouter) -> Result<Self, EngineError> {
        router.validate(&score)?;
        score.sort_notes();
        Ok(Self { score, router, time: 0, cursor: 0, state: PlayerState::Idle })
    }

    /// The score under playback.
    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Current virtual time.
    pub fn time(&self) -> Tick {
        self.time
    }

    /// Lifecycle state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// True once `finish` has run.
    pub fn is_finished(&self) -> bool {
        self.state == PlayerState::Silenced
    }

    /// Notes dropped so far by exhausted pools.
    pub fn dropped_notes(&self) -> u64 {
        self.router.dropped_notes()
    }

    /// The routing table (read-only; for inspection and tests).
    pub fn router(&self) -> &TrackRouter {
        &self.router
    }

    /// Reset the clock and cursor and silence all hardware.
    pub fn begin(&mut self) {
        self.time = 0;
        self.cursor = 0;
        self.router.silence_all();
        self.state = PlayerState::Running;
    }

    /// One scheduler step at virtual time `now`.
    ///
    /// Dispatches every note due at `now` (simultaneous notes in score
    /// order: descending pitch), advances the router, and returns the
    /// next tick that needs attention: the earliest of voice note-ends,
    /// envelope keyframes, and the next note start. [`NEVER`] means the
    /// timeline and all voices are exhausted.
    ///
    /// Successive return values are non-decreasing; `now` must be too.
    pub fn tick(&mut self, now: Tick) -> Result<Tick, EngineError> {
        if now < self.time {
            return Err(EngineError::TimeReversal { from: self.time, to: now });
        }
        self.time = now;

        while let Some(&note) = self.score.notes.get(self.cursor) {
            if note.start > now {
                break;
            }
            let mut note = note;
            note.duration = note.duration.min(MAX_NOTE_TICKS);
            self.router.route(note)?;
            self.cursor += 1;
        }

        let pool_wake = self.router.advance(now);
        let next_start = self.score.notes.get(self.cursor).map_or(NEVER, |n| n.start);
        Ok(pool_wake.min(next_start))
    }

    /// End the session: silence everything.
    pub fn finish(&mut self) {
        self.router.silence_all();
        self.state = PlayerState::Silenced;
    }
}
