//! Per-note volume envelope shapes.
//!
//! A shape describes volume breakpoints relative to a note's start tick.
//! The engine translates it to absolute ticks when a voice starts a note
//! and consumes the keyframes as the clock passes them.

use alloc::vec::Vec;

use crate::tick::Tick;

/// One envelope breakpoint: target level at an offset from note start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreakPoint {
    /// Offset from the note's start tick.
    pub offset: Tick,
    /// Target level in [0, 1].
    pub level: f32,
}

/// A volume envelope shape, breakpoints sorted ascending by offset.
///
/// Shapes are built in order and never re-sorted; levels are clamped to
/// [0, 1] on construction. An empty shape means "hold full volume".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvelopeShape {
    points: Vec<BreakPoint>,
}

impl EnvelopeShape {
    /// Flat shape: the note holds full volume for its whole duration.
    pub const fn flat() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a shape from `(offset, level)` pairs.
    ///
    /// Offsets must be non-decreasing; levels are clamped to [0, 1].
    pub fn from_points(points: &[(Tick, f32)]) -> Self {
        debug_assert!(
            points.windows(2).all(|w| w[0].0 <= w[1].0),
            "envelope offsets must be non-decreasing"
        );
        Self {
            points: points
                .iter()
                .map(|&(offset, level)| BreakPoint { offset, level: level.clamp(0.0, 1.0) })
                .collect(),
        }
    }

    /// Exponential decay from full volume down to `floor` over `span`
    /// ticks, in `steps` equal breakpoints.
    pub fn decay(steps: u32, span: Tick, floor: f32) -> Self {
        let floor = floor.clamp(0.0, 1.0);
        let mut points = Vec::with_capacity(steps as usize);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            points.push(BreakPoint {
                offset: span * i as Tick / steps as Tick,
                level: libm::powf(floor, t),
            });
        }
        Self { points }
    }

    /// The breakpoints in ascending offset order.
    pub fn points(&self) -> &[BreakPoint] {
        &self.points
    }

    /// Number of breakpoints.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for the flat (breakpoint-free) shape.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
