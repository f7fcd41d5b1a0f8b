//! The hardware seam: one square-wave output channel.

/// How a channel realizes per-note volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AmplitudeMode {
    /// Duty cycle is fixed in hardware; level writes are skipped and the
    /// note plays at the channel's configured loudness.
    Keep,
    /// Level writes are forwarded as duty-cycle updates.
    #[default]
    Soft,
}

/// One physical sound output capable of a single frequency and level at
/// a time.
///
/// The engine programs channels exclusively through this trait; the
/// GPIO/PWM register binding behind it is the host's concern.
pub trait ToneChannel: Send {
    /// Program the output frequency in Hz.
    fn set_frequency(&mut self, hz: u32);

    /// Program the output level, 0.0 (mute) to 1.0 (full volume).
    fn set_amplitude(&mut self, level: f32);

    /// Stop audible output and leave the pin in a safe state.
    fn silence(&mut self);
}

/// A channel that ignores every write.
///
/// Useful for dry runs, for padding a pool while hardware is partially
/// wired, and as a stand-in under test.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentChannel;

impl ToneChannel for SilentChannel {
    fn set_frequency(&mut self, _hz: u32) {}
    fn set_amplitude(&mut self, _level: f32) {}
    fn silence(&mut self) {}
}
