//! Polyphonic playback engine for buzzbox.
//!
//! A fixed pool of hardware tone channels (PWM buzzers) is multiplexed
//! across an arbitrary number of logical tracks. Voices drive single
//! channels, pools allocate and steal voices under pressure, the router
//! fans notes out to pools, and the player walks the note timeline on a
//! virtual tick clock, reporting when it next needs to wake.
//!
//! The engine never sleeps and never touches GPIO/PWM registers: real
//! time lives in the host (`bb-master`) and hardware lives behind the
//! [`ToneChannel`] trait.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
mod keyframes;
mod output;
mod pitch;
mod player;
mod pool;
mod router;
mod voice;

pub use error::EngineError;
pub use keyframes::{Keyframe, KeyframeQueue};
pub use output::{AmplitudeMode, SilentChannel, ToneChannel};
pub use pitch::note_to_freq;
pub use player::{Player, PlayerState, MAX_NOTE_TICKS};
pub use pool::{VoicePool, MAX_POOL_VOICES};
pub use router::{PoolKey, TrackRouter};
pub use voice::Voice;
