/// Frequency of middle C in Hz
pub const MIDDLE_C: f64 = 261.63;

/// Frequency ratio between two neighbouring semitones
pub const SEMITONE: f64 = 1.059463;

/// The keys of one octave, from middle C upwards
///
/// The white keys sit on the home row and the black keys on the row above.
pub const KEY_TONE_MAPPING: [char; 13] = [
    'a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k',
];

/// The tone in Hz played by `key`, if the key is part of the piano
pub fn tone_for_key(key: char) -> Option<f64> {
    KEY_TONE_MAPPING
        .iter()
        .position(|candidate| *candidate == key)
        .map(|semitones| MIDDLE_C * SEMITONE.powi(semitones as i32))
}
