//! This crate contains the voice engine for a small monophonic FM synthesizer
//! intended for bare-metal targets.  It is `no_std` and performs no allocation:
//! every object is constructed once at startup and lives for the lifetime of
//! the program.
//!
//! The engine is built from three pieces:
//!
//!  - [devices]: phase-counting oscillators reading from a shared sine table
//!    (plus computed square, sawtooth and triangle shapes), and the FM routing
//!    that chains an intensity LFO, an FM modulator and the audible carrier.
//!  - [voice]: the parameter cells shared with the control context
//!    ([voice::VoiceControls]) and the audio-context [voice::Voice] that turns
//!    the carrier output into integer hardware samples.
//!  - [midi]: a byte-at-a-time Note On/Off decoder for serial MIDI, plus the
//!    dispatch step used directly by packet-framed transports like USB MIDI.
//!
//! A USB computer keyboard can also be used as a note source (see [keyboard]).
//!
//! The audio path is designed to be called from an interrupt or a realtime
//! thread: it never blocks, never logs, and only reads the shared parameter
//! cells once per buffer.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

mod float_approx;

pub mod context;
pub mod devices;
pub mod keyboard;
pub mod midi;
pub mod voice;

/// This module contains `u8` constants for MIDI note numbers and the fixed
/// equal-tempered frequency table used to tune the voice.  Note numbers use
/// standard musical notation, so `midi_const::C4 == 60u8` is middle C and
/// `midi_const::A4 == 69u8` is A440.
///
/// As with musical notation, flats are written with a lowercase `b`, breaking
/// the convention for `const` values in Rust.  No constants are provided for
/// sharps - use the enharmonic flat.
pub mod midi_const;

/// True if using libm for floating-point math, false if using internal
/// approximation functions
pub const USE_LIBM: bool = cfg!(feature = "libm");

pub use context::{Context, OutputRange};
pub use devices::{FmOperators, MixMode, Osc, Waveform};
pub use midi::{dispatch_packet, MidiDecoder, NoteEvent, NoteHandler};
pub use midi_const::midi_note_to_frequency;
pub use voice::{Pot, Voice, VoiceControls, VoiceParams};
