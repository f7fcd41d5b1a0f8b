//! The line-oriented `tempo` / `note` score encoding.
//!
//! ```text
//! tempo <microsecondsPerQuarterNote>
//! note <instrument> <noteId> <startTick> <durationTick> <track>
//! ```
//!
//! Lines with an unrecognized leading token are skipped so newer
//! producers can add record kinds without breaking old consumers.

use std::fmt::Write as _;
use std::str::FromStr;

use bb_ir::{Note, Score, Tempo};

use crate::FormatError;

/// Parse a score from its text encoding.
///
/// The first `tempo` record wins; without one the default of 500000
/// microseconds per quarter note applies. Note order is preserved as
/// read; the player sorts into dispatch order itself.
pub fn parse_score(input: &str) -> Result<Score, FormatError> {
    let mut score = Score::default();
    let mut saw_tempo = false;

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let mut fields = raw.split_whitespace();
        match fields.next() {
            Some("tempo") => {
                let micros = parse_field(fields.next(), line)?;
                if !saw_tempo {
                    score.tempo = Tempo::new(micros);
                    saw_tempo = true;
                }
            }
            Some("note") => {
                let instrument = parse_field(fields.next(), line)?;
                let note = parse_field(fields.next(), line)?;
                let start = parse_field(fields.next(), line)?;
                let duration = parse_field(fields.next(), line)?;
                let track = parse_field(fields.next(), line)?;
                score.push(Note::new(instrument, note, start, duration, track));
            }
            // Unknown token, blank line: skip.
            _ => {}
        }
    }

    Ok(score)
}

/// Render a score back into its text encoding.
pub fn write_score(score: &Score) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "tempo {}", score.tempo.micros_per_quarter);
    for n in &score.notes {
        let _ = writeln!(
            out,
            "note {} {} {} {} {}",
            n.instrument, n.note, n.start, n.duration, n.track
        );
    }
    out
}

fn parse_field<T: FromStr>(field: Option<&str>, line: usize) -> Result<T, FormatError> {
    field
        .ok_or(FormatError::MalformedRecord { line })?
        .parse()
        .map_err(|_| FormatError::BadField { line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_ir::DEFAULT_TEMPO_MICROS;

    #[test]
    fn parses_tempo_and_notes() {
        let score = parse_score("tempo 600000\nnote 0 69 0 480 0\nnote 3 72 480 240 1\n")
            .unwrap();

        assert_eq!(score.tempo, Tempo::new(600_000));
        assert_eq!(score.len(), 2);
        assert_eq!(score.notes[0], Note::new(0, 69, 0, 480, 0));
        assert_eq!(score.notes[1], Note::new(3, 72, 480, 240, 1));
    }

    #[test]
    fn missing_tempo_defaults() {
        let score = parse_score("note 0 69 0 480 0\n").unwrap();
        assert_eq!(score.tempo.micros_per_quarter, DEFAULT_TEMPO_MICROS);
    }

    #[test]
    fn first_tempo_record_wins() {
        let score = parse_score("tempo 400000\ntempo 700000\n").unwrap();
        assert_eq!(score.tempo, Tempo::new(400_000));
    }

    #[test]
    fn unknown_tokens_are_skipped() {
        let score = parse_score("title weather\n\nnote 0 69 0 480 0\nend\n").unwrap();
        assert_eq!(score.len(), 1);
    }

    #[test]
    fn short_note_record_fails_with_line_number() {
        let err = parse_score("tempo 500000\nnote 0 69 0\n").unwrap_err();
        assert_eq!(err, FormatError::MalformedRecord { line: 2 });
    }

    #[test]
    fn non_numeric_field_fails_with_line_number() {
        let err = parse_score("note 0 A4 0 480 0\n").unwrap_err();
        assert_eq!(err, FormatError::BadField { line: 1 });
    }

    #[test]
    fn trailing_fields_are_ignored() {
        let score = parse_score("note 0 69 0 480 0 extra\n").unwrap();
        assert_eq!(score.len(), 1);
    }

    #[test]
    fn write_then_parse_preserves_the_score() {
        let mut score = Score::new(Tempo::new(450_000));
        score.push(Note::new(1, 60, 0, 480, 0));
        score.push(Note::new(1, 64, 480, 480, 2));

        let text = write_score(&score);
        assert_eq!(parse_score(&text).unwrap(), score);
    }
}
