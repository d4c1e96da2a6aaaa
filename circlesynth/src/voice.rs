//! This module contains the monophonic voice: the audio-context [Voice], which
//! owns the oscillators, and the [VoiceControls] it reads its parameters from.

use crate::context::{Context, OutputRange};
use crate::devices::{FmOperators, FmParams, MixMode, Waveform};
use crate::midi_const::midi_note_to_frequency;

mod controls;

pub use controls::{Pot, VoiceControls, FM_RATIOS, POT_MAX};

/// A snapshot of every parameter of the voice, taken once per buffer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceParams {
    /// The held note, if any
    pub key: Option<u8>,
    /// Waveform of both the carrier and the modulator
    pub waveform: Waveform,
    /// FM depth, from 0 to 1
    pub fm_intensity: f32,
    /// Rate of the intensity LFO, in Hz
    pub mod_rate: f32,
    /// Modulator frequency as a multiple of the carrier frequency
    pub fm_ratio: f32,
}

impl VoiceParams {
    /// The frequency of the held note, if any
    pub fn frequency(&self) -> Option<f32> {
        self.key.and_then(midi_note_to_frequency)
    }
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            key: None,
            waveform: Waveform::Sine,
            fm_intensity: 0.0,
            mod_rate: 0.0,
            fm_ratio: FM_RATIOS[0],
        }
    }
}

/// A single FM voice, rendering integer samples for the audio output.
///
/// While no note is held the oscillators are not ticked at all, so every
/// note starts from the phase the previous one stopped at and the output is
/// exactly the null level of the [OutputRange].
#[derive(Clone, Debug)]
pub struct Voice {
    ops: FmOperators,
    range: OutputRange,
    key: Option<u8>,
}

impl Voice {
    /// Constructor
    pub fn new(context: &Context, range: OutputRange, mode: MixMode) -> Self {
        Self {
            ops: FmOperators::new(context, mode),
            range,
            key: None,
        }
    }
    /// Push a parameter snapshot onto the oscillators.  The snapshot stays in
    /// effect until the next call.
    pub fn latch(&mut self, params: &VoiceParams) {
        self.key = params.key;
        self.ops.apply(&FmParams {
            waveform: params.waveform,
            // silence leaves the oscillators tuned to the previous note
            frequency: params.frequency().unwrap_or(0.0),
            ratio: params.fm_ratio,
            intensity: params.fm_intensity,
            rate: params.mod_rate,
        });
    }
    /// Generate one sample
    pub fn render_sample(&mut self) -> i32 {
        if self.key.is_none() {
            return self.range.null();
        }
        let level = self.ops.tick();
        self.range.map(level)
    }
    /// Fill `buf` with interleaved stereo frames, both channels carrying the
    /// same sample, using the parameters in `controls` as they are at the
    /// start of the call.  Returns the number of values written, which is the
    /// length of `buf` rounded down to a whole frame.
    ///
    /// This never blocks, so it is safe to call from an interrupt handler or
    /// a realtime audio callback.
    pub fn render(&mut self, controls: &VoiceControls, buf: &mut [i32]) -> usize {
        self.latch(&controls.snapshot());
        let mut written = 0;
        for frame in buf.chunks_exact_mut(2) {
            let smp = self.render_sample();
            frame[0] = smp;
            frame[1] = smp;
            written += 2;
        }
        written
    }
    /// The note latched for the current buffer
    pub fn active_key(&self) -> Option<u8> {
        self.key
    }
    /// The output range samples are mapped onto
    pub fn range(&self) -> &OutputRange {
        &self.range
    }
    /// The oscillators of this voice
    pub fn operators(&self) -> &FmOperators {
        &self.ops
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(&Context::default(), OutputRange::default(), MixMode::Fm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::{MidiDecoder, NoteHandler};

    fn voice() -> Voice {
        Voice::new(&Context::new(48000), OutputRange::new(0, 4000), MixMode::Fm)
    }

    #[test]
    fn silence_is_null_level() {
        let controls = VoiceControls::new();
        controls.set_pot_control(Pot::Intensity, 800);
        controls.set_pot_control(Pot::Rate, 300);
        let mut voice = voice();
        let mut buf = [7i32; 512];
        for _ in 0..4 {
            assert_eq!(voice.render(&controls, &mut buf), 512);
            assert!(buf.iter().all(|&x| x == 2000));
        }
        assert_eq!(voice.operators().carrier().phase(), 0);
    }
    #[test]
    fn render_odd_buffer_writes_whole_frames() {
        let controls = VoiceControls::new();
        let mut voice = voice();
        let mut buf = [7i32; 5];
        assert_eq!(voice.render(&controls, &mut buf), 4);
        assert_eq!(buf[4], 7);
    }
    #[test]
    fn note_renders_carrier_pitch() {
        let controls = VoiceControls::new();
        controls.set_pot_control(Pot::Wave, 256); // square
        controls.note_on(69);
        let mut voice = voice();
        // one second, so 440 full cycles of a 109 sample period
        let mut buf = [0i32; 2 * 48000];
        voice.render(&controls, &mut buf);
        assert_eq!(voice.operators().carrier().frequency(), 440.0);
        let mut rising_edges = 0;
        let mut last = None;
        for pair in buf.chunks_exact(2) {
            assert_eq!(pair[0], pair[1]);
            assert!(pair[0] == 0 || pair[0] == 4000);
            if last == Some(0) && pair[0] == 4000 {
                rising_edges += 1;
            }
            last = Some(pair[0]);
        }
        assert_eq!(rising_edges, 48000 / 109);
    }
    #[test]
    fn phase_frozen_while_silent() {
        let controls = VoiceControls::new();
        let mut voice = voice();
        controls.note_on(60);
        let mut buf = [0i32; 200];
        voice.render(&controls, &mut buf);
        let phase = voice.operators().carrier().phase();
        controls.note_off(60);
        voice.render(&controls, &mut buf);
        assert_eq!(voice.operators().carrier().phase(), phase);
        // the previous tuning is kept while silent
        assert_eq!(voice.operators().carrier().frequency(), 261.626);
    }
    #[test]
    fn repeated_notes_are_reproducible() {
        let controls = VoiceControls::new();
        controls.set_pot_control(Pot::Intensity, 1023);
        controls.set_pot_control(Pot::Ratio, 300);
        let mut a = voice();
        let mut b = voice();
        let mut buf_a = [0i32; 256];
        let mut buf_b = [0i32; 256];
        controls.note_on(57);
        a.render(&controls, &mut buf_a);
        b.render(&controls, &mut buf_b);
        assert_eq!(buf_a, buf_b);
    }
    #[test]
    fn midi_bytes_to_samples() {
        let controls = VoiceControls::new();
        let mut decoder = MidiDecoder::new();
        decoder.feed_all(&[0x90, 0x3C, 0x40], &controls);
        assert_eq!(controls.target_frequency(), Some(261.626));
        let mut voice = voice();
        let mut buf = [0i32; 64];
        voice.render(&controls, &mut buf);
        assert_eq!(voice.active_key(), Some(60));
        assert!(buf.iter().any(|&x| x != 2000));
        decoder.feed_all(&[0x80, 0x3C, 0x00], &controls);
        voice.render(&controls, &mut buf);
        assert!(buf.iter().all(|&x| x == 2000));
    }
}
