//! A USB computer keyboard used as a one-octave note source.
//!
//! The bottom row of a QWERTY keyboard plays the white notes from middle C
//! (`Z X C V B N M ,`) and the row above plays the black notes
//! (`S D G H J`).  The keyboard reports every held key at once as a raw HID
//! boot-protocol report; the first key code in the report picks the note,
//! and a report with no playable key silences the voice.

use crate::midi::NoteHandler;
use crate::midi_const::*;

/// HID usage code of the `A` key.  Letters follow consecutively up to `Z`.
const KEYCODE_A: u8 = 0x04;
/// HID usage code of the `Z` key
const KEYCODE_Z: u8 = 0x1D;
/// HID usage code of the `,` key
const KEYCODE_COMMA: u8 = 0x36;

/// The playable keys and the notes they play
pub const KEY_NOTES: [(char, u8); 13] = [
    (',', C5),
    ('M', B4),
    ('J', Bb4),
    ('N', A4),
    ('H', Ab4),
    ('B', G4),
    ('G', Gb4),
    ('V', F4),
    ('C', E4),
    ('D', Eb4),
    ('X', D4),
    ('S', Db4),
    ('Z', C4),
];

/// Translate a HID key code to the character printed on the key, for the
/// letter keys and the comma
pub fn keycode_to_char(code: u8) -> Option<char> {
    match code {
        KEYCODE_A..=KEYCODE_Z => Some(char::from(b'A' + (code - KEYCODE_A))),
        KEYCODE_COMMA => Some(','),
        _ => None,
    }
}

/// The note played by the key printed with `ch`, if any
pub fn char_to_note(ch: char) -> Option<u8> {
    KEY_NOTES
        .iter()
        .find(|(key, _)| *key == ch)
        .map(|&(_, note)| note)
}

/// The note selected by a raw report of up to six held key codes.  Only the
/// first non-zero key code is considered.
pub fn note_from_report(raw_keys: &[u8; 6]) -> Option<u8> {
    let code = raw_keys.iter().copied().find(|&code| code != 0)?;
    keycode_to_char(code).and_then(char_to_note)
}

/// Apply a raw key report: play the selected note, or silence the voice if
/// no playable key is held.  Modifier keys are ignored.  Returns the note
/// played.
pub fn handle_report<H: NoteHandler + ?Sized>(
    _modifiers: u8,
    raw_keys: &[u8; 6],
    handler: &H,
) -> Option<u8> {
    let note = note_from_report(raw_keys);
    match note {
        Some(n) => handler.note_on(n),
        None => handler.all_notes_off(),
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::VoiceControls;

    #[test]
    fn keycodes() {
        assert_eq!(keycode_to_char(0x04), Some('A'));
        assert_eq!(keycode_to_char(0x1D), Some('Z'));
        assert_eq!(keycode_to_char(0x36), Some(','));
        assert_eq!(keycode_to_char(0x28), None);
    }
    #[test]
    fn bottom_row_is_one_octave() {
        let codes = [0x1D, 0x16, 0x1B, 0x07, 0x06, 0x19, 0x0A, 0x05, 0x0B, 0x11, 0x0D, 0x10, 0x36];
        for (i, code) in codes.into_iter().enumerate() {
            let note = note_from_report(&[code, 0, 0, 0, 0, 0]);
            assert_eq!(note, Some(C4 + i as u8));
        }
    }
    #[test]
    fn first_key_wins() {
        // 'A' isn't playable, so nothing plays even though 'Z' is held too
        assert_eq!(note_from_report(&[0, 0x04, 0x1D, 0, 0, 0]), None);
        assert_eq!(note_from_report(&[0, 0, 0x10, 0x1D, 0, 0]), Some(B4));
        assert_eq!(note_from_report(&[0; 6]), None);
    }
    #[test]
    fn release_silences() {
        let controls = VoiceControls::new();
        assert_eq!(handle_report(0, &[0x1D, 0, 0, 0, 0, 0], &controls), Some(C4));
        assert_eq!(controls.active_key(), Some(C4));
        assert_eq!(controls.target_frequency(), Some(261.626));
        assert_eq!(handle_report(0, &[0; 6], &controls), None);
        assert_eq!(controls.active_key(), None);
    }
}
