//! Host controller for buzzbox playback.
//!
//! Drives a `Player` in real time: the blocking run loop that waits out
//! the gaps between scheduler ticks, and a background playback thread
//! with a stop hook that always leaves the hardware silenced.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use bb_engine::{EngineError, Player};
use bb_ir::{Tick, NEVER};

// Re-export common types so hosts don't need every crate directly.
pub use bb_engine::{AmplitudeMode, SilentChannel, ToneChannel, TrackRouter, Voice, VoicePool};
pub use bb_formats::{parse_score, write_score, FormatError};
pub use bb_ir::{EnvelopeShape, Note, Score, Tempo};

/// Controls how the run loop waits out the gap between scheduler ticks.
pub trait Pacer {
    /// Block for `micros` microseconds.
    fn wait_micros(&mut self, micros: u64);
}

/// Wall-clock pacer backed by `std::thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn wait_micros(&mut self, micros: u64) {
        std::thread::sleep(Duration::from_micros(micros));
    }
}

/// Totals reported by a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Final virtual time in ticks.
    pub end_tick: Tick,
    /// Real time spent waiting between ticks, in microseconds.
    pub waited_micros: u64,
    /// Notes dropped by saturated pools.
    pub dropped_notes: u64,
}

/// Run a player to completion, blocking between ticks.
pub fn run(player: &mut Player, pacer: &mut dyn Pacer) -> Result<RunSummary, EngineError> {
    run_until(player, pacer, |_| false)
}

/// Run a player until the timeline is exhausted or `stop` returns true.
///
/// `stop` is polled once per loop iteration with the current virtual
/// time, before the next wait begins. The hardware is silenced on every
/// exit path, including errors.
pub fn run_until(
    player: &mut Player,
    pacer: &mut dyn Pacer,
    mut stop: impl FnMut(Tick) -> bool,
) -> Result<RunSummary, EngineError> {
    let tempo = player.score().tempo;
    let mut waited: u64 = 0;
    let mut now: Tick = 0;

    player.begin();
    loop {
        if stop(now) {
            break;
        }
        let next = match player.tick(now) {
            Ok(next) => next,
            Err(err) => {
                player.finish();
                return Err(err);
            }
        };
        if next == NEVER {
            break;
        }
        let step = tempo.delta_micros(next - now);
        pacer.wait_micros(step);
        waited += step;
        now = next;
    }
    player.finish();

    Ok(RunSummary {
        end_tick: now,
        waited_micros: waited,
        dropped_notes: player.dropped_notes(),
    })
}

/// Owns background playback of one player at a time.
#[derive(Default)]
pub struct Controller {
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    current_tick: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<Player, EngineError>>>,
}

impl Controller {
    pub fn new() -> Self {
        Self { playback: None }
    }

    /// Start playing on a background thread, replacing any current
    /// playback (which is stopped and discarded).
    pub fn play(&mut self, player: Player) {
        let _ = self.stop();

        let stop_signal = Arc::new(AtomicBool::new(false));
        let current_tick = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stop = stop_signal.clone();
        let tick = current_tick.clone();
        let done = finished.clone();

        let thread = std::thread::spawn(move || playback_thread(player, stop, tick, done));

        self.playback = Some(PlaybackHandle {
            stop_signal,
            current_tick,
            finished,
            thread: Some(thread),
        });
    }

    /// Stop playback and hand the player back, silenced.
    ///
    /// Returns `None` when nothing was playing, `Some(Err(..))` when the
    /// session died of a fatal engine error.
    pub fn stop(&mut self) -> Option<Result<Player, EngineError>> {
        let mut pb = self.playback.take()?;
        pb.stop_signal.store(true, Ordering::Relaxed);
        let handle = pb.thread.take()?;
        handle.join().ok()
    }

    /// Whether a playback thread is running and not yet finished.
    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    /// Whether the current playback ran to completion (or was stopped).
    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    /// Current virtual tick of the running playback.
    pub fn position(&self) -> Option<Tick> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        Some(pb.current_tick.load(Ordering::Relaxed))
    }
}

fn playback_thread(
    mut player: Player,
    stop_signal: Arc<AtomicBool>,
    current_tick: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
) -> Result<Player, EngineError> {
    let mut pacer = SleepPacer;
    let result = run_until(&mut player, &mut pacer, |now| {
        current_tick.store(now, Ordering::Relaxed);
        stop_signal.load(Ordering::Relaxed)
    });
    finished.store(true, Ordering::Relaxed);
    result.map(|_| player)
}
