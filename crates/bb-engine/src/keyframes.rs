//! Per-voice envelope keyframe queue.

use alloc::vec::Vec;

use bb_ir::{EnvelopeShape, Tick, NEVER};

/// A volume keyframe at an absolute tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// Absolute tick at which the level applies.
    pub tick: Tick,
    /// Target level in [0, 1].
    pub level: f32,
}

/// Keyframes for the note currently on a voice, sorted ascending by tick.
///
/// Keyframes are consumed via a cursor that advances forward without
/// removing elements, keeping the realtime drain path allocation-free.
/// `load` reuses the backing storage between notes.
#[derive(Clone, Debug, Default)]
pub struct KeyframeQueue {
    frames: Vec<Keyframe>,
    /// Next keyframe to consume (advances during playback).
    cursor: usize,
}

impl KeyframeQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self { frames: Vec::new(), cursor: 0 }
    }

    /// Create an empty queue with room for `cap` keyframes, so `load`
    /// stays allocation-free for shapes up to that size.
    pub fn with_capacity(cap: usize) -> Self {
        Self { frames: Vec::with_capacity(cap), cursor: 0 }
    }

    /// Replace the contents with `shape` translated to absolute ticks
    /// (`start + offset` per breakpoint). The shape is already sorted,
    /// so the queue is too.
    pub fn load(&mut self, shape: &EnvelopeShape, start: Tick) {
        self.frames.clear();
        self.cursor = 0;
        self.frames.extend(shape.points().iter().map(|p| Keyframe {
            tick: start.saturating_add(p.offset),
            level: p.level,
        }));
    }

    /// Drop all pending keyframes.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }

    /// Consume and return the next keyframe due at or before `time`.
    pub fn pop_due(&mut self, time: Tick) -> Option<Keyframe> {
        let frame = *self.frames.get(self.cursor)?;
        if frame.tick <= time {
            self.cursor += 1;
            Some(frame)
        } else {
            None
        }
    }

    /// Tick of the next unconsumed keyframe, or [`NEVER`] if none remain.
    pub fn next_tick(&self) -> Tick {
        self.frames.get(self.cursor).map_or(NEVER, |f| f.tick)
    }

    /// True once every keyframe has been consumed.
    pub fn is_drained(&self) -> bool {
        self.cursor >= self.frames.len()
    }
}
