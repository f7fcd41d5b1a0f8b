//! VoicePool: a fixed set of voices with allocation and stealing.

use arrayvec::ArrayVec;

use bb_ir::{EnvelopeShape, Note, Tick, NEVER};

use crate::voice::Voice;

/// Maximum voices one pool can hold.
pub const MAX_POOL_VOICES: usize = 16;

/// A fixed pool of voices serving one or more tracks.
///
/// Invariant: the free list and the set of busy voices partition the
/// pool; a voice index is in exactly one of them.
#[derive(Default)]
pub struct VoicePool {
    voices: ArrayVec<Voice, MAX_POOL_VOICES>,
    free: ArrayVec<usize, MAX_POOL_VOICES>,
    /// Track that most recently played on each voice; input to the
    /// stealing heuristic only.
    last_track: ArrayVec<Option<u16>, MAX_POOL_VOICES>,
    shape: EnvelopeShape,
    dropped: u64,
}

impl VoicePool {
    /// Create an empty pool with a flat envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty pool whose notes play the given envelope shape.
    pub fn with_shape(shape: EnvelopeShape) -> Self {
        Self { shape, ..Self::default() }
    }

    /// Add a voice, returning its index; `None` once the pool is full.
    pub fn add_voice(&mut self, voice: Voice) -> Option<usize> {
        if self.voices.is_full() {
            return None;
        }
        let idx = self.voices.len();
        self.voices.push(voice);
        self.last_track.push(None);
        self.free.push(idx);
        Some(idx)
    }

    /// Number of voices in the pool.
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// True if the pool holds no voices.
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Number of voices currently playing a note.
    pub fn busy_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_busy()).count()
    }

    /// Notes dropped because no voice could be freed.
    pub fn dropped_notes(&self) -> u64 {
        self.dropped
    }

    /// Voice at `idx`.
    pub fn voice(&self, idx: usize) -> Option<&Voice> {
        self.voices.get(idx)
    }

    /// Give `note` a voice, stealing one if the pool is saturated.
    ///
    /// Voices whose note has already ended by `note.start` are reclaimed
    /// first, so a note landing exactly on another's end tick reuses its
    /// voice rather than stealing. Returns the voice index used, or
    /// `None` if the note was dropped (every busy voice belongs to a
    /// distinct track).
    pub fn assign(&mut self, note: Note) -> Option<usize> {
        self.reclaim(note.start);

        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => match self.steal_target() {
                Some(idx) => idx,
                None => {
                    self.dropped += 1;
                    log::warn!(
                        "no free voice for note {} on track {}; dropping",
                        note.note,
                        note.track
                    );
                    return None;
                }
            },
        };

        self.last_track[idx] = Some(note.track);
        self.voices[idx].play(note, &self.shape);
        Some(idx)
    }

    /// Pick the voice to steal: scanning in index order, the first voice
    /// whose last track was already seen on an earlier voice. Stealing
    /// from a track that holds several voices preserves inter-track
    /// diversity over intra-track polyphony.
    fn steal_target(&self) -> Option<usize> {
        let mut seen = ArrayVec::<u16, MAX_POOL_VOICES>::new();
        for (idx, last) in self.last_track.iter().enumerate() {
            match last {
                Some(track) if seen.contains(track) => return Some(idx),
                Some(track) => seen.push(*track),
                None => {}
            }
        }
        None
    }

    /// Return ended voices to the free list and silence them.
    fn reclaim(&mut self, time: Tick) {
        for (idx, voice) in self.voices.iter_mut().enumerate() {
            if time >= voice.busy_until() {
                voice.silence();
                self.free.push(idx);
            }
        }
    }

    /// Advance the pool to `time`: silence and free every voice whose
    /// note has ended, drain envelope keyframes on all voices, and
    /// return the earliest tick at which the pool needs attention again
    /// (next note end or next keyframe; [`NEVER`] when fully idle).
    pub fn advance(&mut self, time: Tick) -> Tick {
        self.reclaim(time);

        let mut wake = NEVER;
        for voice in &mut self.voices {
            wake = wake.min(voice.busy_until());
            wake = wake.min(voice.advance(time));
        }
        wake
    }

    /// Silence every voice and reset the free list to all indices.
    pub fn silence_all(&mut self) {
        self.free.clear();
        for (idx, voice) in self.voices.iter_mut().enumerate() {
            voice.silence();
            self.free.push(idx);
        }
    }
}
