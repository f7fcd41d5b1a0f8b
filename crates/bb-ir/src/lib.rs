//! Core IR types for the buzzbox playback engine.
//!
//! This crate defines the note timeline representation shared by the
//! extractor-facing format parsers and the playback engine. Notes are
//! expressed in ticks at a fixed resolution; tempo converts tick deltas
//! into real microseconds.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod envelope;
mod note;
mod score;
mod tick;

pub use envelope::{BreakPoint, EnvelopeShape};
pub use note::Note;
pub use score::Score;
pub use tick::{Tempo, Tick, DEFAULT_TEMPO_MICROS, NEVER, TICKS_PER_QUARTER};
