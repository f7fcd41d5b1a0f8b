//! MIDI note to square-wave frequency conversion.

/// Reference pitch: MIDI note 69 (A4) at 440 Hz, equal temperament.
const A4_NOTE: i32 = 69;
const A4_HZ: f64 = 440.0;

/// Convert a MIDI note id to the nearest integer frequency in Hz.
pub fn note_to_freq(note: u8) -> u32 {
    let semitones = note as i32 - A4_NOTE;
    libm::round(A4_HZ * libm::exp2(semitones as f64 / 12.0)) as u32
}
