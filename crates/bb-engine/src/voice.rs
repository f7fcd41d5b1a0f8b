//! Voice: one hardware output channel and the note it is playing.

use alloc::boxed::Box;

use bb_ir::{EnvelopeShape, Note, Tick, NEVER};

use crate::keyframes::KeyframeQueue;
use crate::output::{AmplitudeMode, ToneChannel};
use crate::pitch::note_to_freq;

/// Keyframe storage reserved per voice; `play` stays allocation-free for
/// envelope shapes up to this many breakpoints.
const KEYFRAME_CAPACITY: usize = 16;

/// One voice: a tone channel plus the state of its current note.
///
/// A voice plays at most one note at a time; `play` on a busy voice is a
/// steal and simply replaces the previous note.
pub struct Voice {
    channel: Box<dyn ToneChannel>,
    mode: AmplitudeMode,
    max_volume: f32,
    note: Option<Note>,
    /// Tick at which the current note ends; [`NEVER`] while idle.
    busy_until: Tick,
    keyframes: KeyframeQueue,
}

impl Voice {
    /// Wrap a tone channel into an idle voice at full volume.
    pub fn new(channel: Box<dyn ToneChannel>, mode: AmplitudeMode) -> Self {
        Self {
            channel,
            mode,
            max_volume: 1.0,
            note: None,
            busy_until: NEVER,
            keyframes: KeyframeQueue::with_capacity(KEYFRAME_CAPACITY),
        }
    }

    /// Cap this voice's output level (clamped to [0, 1]).
    pub fn with_max_volume(mut self, max_volume: f32) -> Self {
        self.max_volume = max_volume.clamp(0.0, 1.0);
        self
    }

    /// The note currently assigned, if any.
    pub fn note(&self) -> Option<Note> {
        self.note
    }

    /// Whether a note is currently assigned.
    pub fn is_busy(&self) -> bool {
        self.note.is_some()
    }

    /// Tick at which the current note ends; [`NEVER`] while idle.
    pub fn busy_until(&self) -> Tick {
        self.busy_until
    }

    /// Start playing `note`, replacing whatever was on this voice.
    ///
    /// Programs the channel frequency, resets the level to full volume,
    /// and loads `shape` translated to ticks absolute from the note start.
    pub fn play(&mut self, note: Note, shape: &EnvelopeShape) {
        self.busy_until = note.end();
        self.keyframes.load(shape, note.start);
        // TODO: pick a duty preset from note.instrument once channels
        // expose timbre control.
        self.channel.set_frequency(note_to_freq(note.note));
        self.apply_level(1.0);
        self.note = Some(note);
    }

    /// Apply every keyframe due at or before `time`, in order, and
    /// return the tick of the next pending keyframe ([`NEVER`] if none).
    ///
    /// `time` must be non-decreasing across a session.
    pub fn advance(&mut self, time: Tick) -> Tick {
        while let Some(frame) = self.keyframes.pop_due(time) {
            self.apply_level(frame.level);
        }
        self.keyframes.next_tick()
    }

    /// Detach the current note and put the channel in its safe state.
    pub fn silence(&mut self) {
        self.keyframes.clear();
        self.channel.silence();
        self.note = None;
        self.busy_until = NEVER;
    }

    fn apply_level(&mut self, level: f32) {
        if self.mode == AmplitudeMode::Soft {
            self.channel.set_amplitude(level.clamp(0.0, 1.0) * self.max_volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq)]
    enum Op {
        Freq(u32),
        Amp(f32),
        Silence,
    }

    #[derive(Clone, Default)]
    struct LogChannel {
        ops: Arc<Mutex<Vec<Op>>>,
    }

    impl ToneChannel for LogChannel {
        fn set_frequency(&mut self, hz: u32) {
            self.ops.lock().unwrap().push(Op::Freq(hz));
        }
        fn set_amplitude(&mut self, level: f32) {
            self.ops.lock().unwrap().push(Op::Amp(level));
        }
        fn silence(&mut self) {
            self.ops.lock().unwrap().push(Op::Silence);
        }
    }

    fn logged_voice(mode: AmplitudeMode) -> (Voice, Arc<Mutex<Vec<Op>>>) {
        let channel = LogChannel::default();
        let ops = channel.ops.clone();
        (Voice::new(Box::new(channel), mode), ops)
    }

    fn note_a4(start: Tick, duration: Tick) -> Note {
        Note::new(0, 69, start, duration, 0)
    }

    #[test]
    fn play_programs_frequency_and_full_volume() {
        let (mut voice, ops) = logged_voice(AmplitudeMode::Soft);
        voice.play(note_a4(0, 480), &EnvelopeShape::flat());

        assert_eq!(*ops.lock().unwrap(), [Op::Freq(440), Op::Amp(1.0)]);
        assert!(voice.is_busy());
        assert_eq!(voice.busy_until(), 480);
    }

    #[test]
    fn advance_drains_keyframes_in_order() {
        let (mut voice, ops) = logged_voice(AmplitudeMode::Soft);
        let shape = EnvelopeShape::from_points(&[(100, 0.6), (200, 0.3)]);
        voice.play(note_a4(1000, 480), &shape);
        ops.lock().unwrap().clear();

        assert_eq!(voice.advance(1050), 1100);
        assert!(ops.lock().unwrap().is_empty());

        assert_eq!(voice.advance(1200), NEVER);
        assert_eq!(*ops.lock().unwrap(), [Op::Amp(0.6), Op::Amp(0.3)]);
    }

    #[test]
    fn keep_mode_never_writes_amplitude() {
        let (mut voice, ops) = logged_voice(AmplitudeMode::Keep);
        let shape = EnvelopeShape::from_points(&[(100, 0.5)]);
        voice.play(note_a4(0, 480), &shape);

        // Keyframes are still consumed, so wake timing matches Soft mode.
        assert_eq!(voice.advance(50), 100);
        assert_eq!(voice.advance(150), NEVER);
        assert_eq!(*ops.lock().unwrap(), [Op::Freq(440)]);
    }

    #[test]
    fn max_volume_scales_levels() {
        let (voice, ops) = logged_voice(AmplitudeMode::Soft);
        let mut voice = voice.with_max_volume(0.5);
        let shape = EnvelopeShape::from_points(&[(10, 0.5)]);
        voice.play(note_a4(0, 480), &shape);
        voice.advance(10);

        assert_eq!(
            *ops.lock().unwrap(),
            [Op::Freq(440), Op::Amp(0.5), Op::Amp(0.25)]
        );
    }

    #[test]
    fn silence_detaches_and_resets() {
        let (mut voice, ops) = logged_voice(AmplitudeMode::Soft);
        voice.play(note_a4(0, 480), &EnvelopeShape::from_points(&[(100, 0.5)]));
        voice.silence();

        assert!(!voice.is_busy());
        assert_eq!(voice.busy_until(), NEVER);
        assert_eq!(voice.advance(NEVER - 1), NEVER);
        assert_eq!(ops.lock().unwrap().last(), Some(&Op::Silence));
    }

    #[test]
    fn replay_replaces_previous_note() {
        let (mut voice, _ops) = logged_voice(AmplitudeMode::Soft);
        voice.play(note_a4(0, 480), &EnvelopeShape::flat());
        let second = Note::new(0, 72, 240, 480, 1);
        voice.play(second, &EnvelopeShape::flat());

        assert_eq!(voice.note(), Some(second));
        assert_eq!(voice.busy_until(), 720);
    }
}
