//! This module contains the signal generators of the voice: the waveform
//! lookup, a phase-counting oscillator, and the FM chain built from three of
//! them.

mod fm;
mod osc;
pub mod wavetable;

pub use fm::{FmOperators, FmParams, MixMode};
pub use osc::{Osc, MOD_SCALE};
pub use wavetable::Waveform;
