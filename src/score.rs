use std::str::FromStr;

use thiserror::Error;

use crate::InputEvent;

/// Errors parsing a [`Score`]
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    /// A note isn't written as `key:start:end`
    #[error("expected key:start:end, got '{0}'")]
    MalformedNote(String),

    /// The key isn't a single character
    #[error("invalid key '{0}'")]
    InvalidKey(String),

    /// A time isn't a number
    #[error("invalid time '{0}'")]
    InvalidTime(String),

    /// A note ends before it starts, or starts before zero
    #[error("note '{key}' has an invalid range {start} to {end}")]
    InvalidRange {
        /// The key of the note
        key: char,
        /// When the key is pressed
        start: f64,
        /// When the key is released
        end: f64,
    },
}

/// One key held from `start` to `end` seconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreNote {
    /// The key to press
    pub key: char,

    /// When the key is pressed, in seconds
    pub start: f64,

    /// When the key is released, in seconds
    pub end: f64,
}

impl FromStr for ScoreNote {
    type Err = ScoreError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.split(':');

        let (Some(key), Some(start), Some(end), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ScoreError::MalformedNote(text.to_string()));
        };

        let mut characters = key.chars();
        let key = match (characters.next(), characters.next()) {
            (Some(character), None) => character,
            _ => return Err(ScoreError::InvalidKey(key.to_string())),
        };

        let start = parse_time(start)?;
        let end = parse_time(end)?;

        if start < 0.0 || end <= start {
            return Err(ScoreError::InvalidRange { key, start, end });
        }

        Ok(Self { key, start, end })
    }
}

fn parse_time(text: &str) -> Result<f64, ScoreError> {
    text.parse::<f64>()
        .ok()
        .filter(|time| time.is_finite())
        .ok_or_else(|| ScoreError::InvalidTime(text.to_string()))
}

/// Key presses and releases laid out in time
///
/// Written as whitespace separated notes, each `key:start_seconds:end_seconds`,
/// for example `a:0.0:0.5 s:0.5:1.0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Score {
    notes: Vec<ScoreNote>,
}

impl Score {
    /// Parse a score
    pub fn parse(text: &str) -> Result<Self, ScoreError> {
        let notes = text
            .split_whitespace()
            .map(ScoreNote::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { notes })
    }

    /// The notes in the order they were written
    pub fn notes(&self) -> &[ScoreNote] {
        &self.notes
    }

    /// When the last key is released, in seconds
    pub fn duration(&self) -> f64 {
        self.notes.iter().map(|note| note.end).fold(0.0, f64::max)
    }

    /// Events that happen in `[start, end)` seconds, earliest first
    ///
    /// Releases come before presses at the same time, so a key can be
    /// released and pressed again on the same instant.
    pub fn events_between(&self, start: f64, end: f64) -> Vec<InputEvent> {
        let in_range = |time: f64| start <= time && time < end;

        let mut events: Vec<(f64, InputEvent)> = self
            .notes
            .iter()
            .flat_map(|note| {
                [
                    (note.start, InputEvent::KeyDown(note.key)),
                    (note.end, InputEvent::KeyUp(note.key)),
                ]
            })
            .filter(|(time, _)| in_range(*time))
            .collect();

        events.sort_by(|(time_a, event_a), (time_b, event_b)| {
            time_a
                .total_cmp(time_b)
                .then_with(|| release_first(event_a).cmp(&release_first(event_b)))
        });

        events.into_iter().map(|(_, event)| event).collect()
    }
}

fn release_first(event: &InputEvent) -> u8 {
    match event {
        InputEvent::KeyUp(_) => 0,
        InputEvent::KeyDown(_) => 1,
    }
}

impl FromStr for Score {
    type Err = ScoreError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn parses_notes() {
        let score = Score::parse("a:0.0:0.5  s:0.5:1.25\n").unwrap();

        assert_eq!(
            score.notes(),
            &[
                ScoreNote {
                    key: 'a',
                    start: 0.0,
                    end: 0.5
                },
                ScoreNote {
                    key: 's',
                    start: 0.5,
                    end: 1.25
                },
            ]
        );
        assert_relative_eq!(score.duration(), 1.25);
    }

    #[test]
    fn empty_score_has_no_duration() {
        let score = Score::parse("   ").unwrap();
        assert!(score.notes().is_empty());
        assert_relative_eq!(score.duration(), 0.0);
    }

    #[test]
    fn rejects_bad_notes() {
        assert_eq!(
            Score::parse("a:0.0"),
            Err(ScoreError::MalformedNote("a:0.0".into()))
        );
        assert_eq!(
            Score::parse("ab:0:1"),
            Err(ScoreError::InvalidKey("ab".into()))
        );
        assert_eq!(
            Score::parse("a:soon:1"),
            Err(ScoreError::InvalidTime("soon".into()))
        );
        assert!(matches!(
            Score::parse("a:1.0:0.5"),
            Err(ScoreError::InvalidRange { key: 'a', .. })
        ));
    }

    #[test]
    fn events_fall_in_half_open_ranges() {
        let score = Score::parse("a:0.0:0.5 s:0.25:1.0").unwrap();

        assert_eq!(
            score.events_between(0.0, 0.5),
            vec![InputEvent::KeyDown('a'), InputEvent::KeyDown('s')]
        );
        assert_eq!(
            score.events_between(0.5, 1.0),
            vec![InputEvent::KeyUp('a')]
        );
        assert_eq!(
            score.events_between(1.0, 2.0),
            vec![InputEvent::KeyUp('s')]
        );
    }

    #[test]
    fn release_comes_before_press_at_the_same_time() {
        let score = Score::parse("a:0.5:1.0 a:0.0:0.5").unwrap();

        assert_eq!(
            score.events_between(0.0, 2.0),
            vec![
                InputEvent::KeyDown('a'),
                InputEvent::KeyUp('a'),
                InputEvent::KeyDown('a'),
                InputEvent::KeyUp('a'),
            ]
        );
    }
}
