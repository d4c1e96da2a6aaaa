use super::wavetable::{self, Waveform};
use crate::context::Context;
use crate::float_approx;

/// The frequency deviation, in Hz, produced by a modulator at full output
/// and full modulation depth
pub const MOD_SCALE: f32 = 20.0;

/// The frequency an oscillator starts at before it is first tuned
const DEFAULT_FREQUENCY: f32 = 20.0;

/// A phase-counting oscillator
///
/// The oscillator counts samples within the current period and looks up its
/// output in the shared [wavetable](super::wavetable), so the period is always
/// a whole number of samples.  The period is recomputed on every tick, which
/// lets a modulator sweep the instantaneous frequency continuously.
///
/// An oscillator may be frequency modulated by another oscillator: the
/// modulator's most recent output level, scaled by this oscillator's
/// modulation depth and [MOD_SCALE], is added to the tuned frequency.  The
/// routing is owned by the caller (see [FmOperators](super::FmOperators)),
/// which hands the modulator to [Osc::tick].
#[derive(Clone, Debug)]
pub struct Osc {
    waveform: Waveform,
    base_frequency: f32,
    detune: f32,
    frequency: f32,
    mod_depth: f32,
    sample_rate: u32,
    phase: u32,
    level: f32,
}

impl Osc {
    /// Constructor.  The sample rate of `context` is fixed for the lifetime of
    /// the oscillator.
    pub fn new(context: &Context) -> Self {
        Self {
            waveform: Waveform::Sine,
            base_frequency: DEFAULT_FREQUENCY,
            detune: 0.0,
            frequency: DEFAULT_FREQUENCY,
            mod_depth: 0.0,
            sample_rate: context.sample_rate(),
            phase: 0,
            level: 0.0,
        }
    }
    /// Set the waveform used from the next tick onwards
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }
    /// Set the centre frequency, in Hz.  Non-positive frequencies are ignored
    /// and the previous frequency is kept.
    pub fn set_frequency(&mut self, hz: f32) {
        if hz > 0.0 {
            self.base_frequency = hz;
            self.retune();
        }
    }
    /// Set the detune, in semitones, within `[-1, 1]`
    pub fn set_detune(&mut self, semitones: f32) {
        debug_assert!((-1.0..=1.0).contains(&semitones));
        self.detune = semitones.clamp(-1.0, 1.0);
        self.retune();
    }
    /// Set how strongly the modulator affects this oscillator, within `[0, 1]`.
    /// Zero disables modulation.
    pub fn set_mod_depth(&mut self, fraction: f32) {
        debug_assert!((0.0..=1.0).contains(&fraction));
        self.mod_depth = fraction.clamp(0.0, 1.0);
    }
    fn retune(&mut self) {
        self.frequency = self.base_frequency * float_approx::exp2(self.detune / 12.0);
    }
    /// The current waveform
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }
    /// The tuned (detuned, but unmodulated) frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }
    /// The modulation depth
    pub fn mod_depth(&self) -> f32 {
        self.mod_depth
    }
    /// The number of samples elapsed in the current period
    pub fn phase(&self) -> u32 {
        self.phase
    }
    /// The most recently generated sample, within `[-1, 1]`
    pub fn level(&self) -> f32 {
        self.level
    }
    /// The frequency this oscillator would run at if ticked now with
    /// `modulator`.  May be zero or negative for strong negative modulation.
    pub fn instantaneous_frequency(&self, modulator: Option<&Osc>) -> f32 {
        match modulator {
            Some(m) => self.frequency + m.level() * self.mod_depth * MOD_SCALE,
            None => self.frequency,
        }
    }
    /// The period, in whole samples, of a waveform at `frequency`.  Always at
    /// least one sample.
    fn period(&self, frequency: f32) -> u32 {
        // positive operands, so adding one half and truncating rounds
        let period = (self.sample_rate as f32 / frequency + 0.5) as u32;
        period.max(1)
    }
    /// Advance by one sample.  `modulator` should already have been ticked for
    /// this sample instant.
    ///
    /// If modulation pushes the frequency to zero or below, nothing changes
    /// and the previous output level is held.
    pub fn tick(&mut self, modulator: Option<&Osc>) {
        let frequency = self.instantaneous_frequency(modulator);
        if frequency <= 0.0 {
            return;
        }
        let period = self.period(frequency);
        self.phase += 1;
        if self.phase >= period {
            self.phase = 0;
        }
        self.level = wavetable::sample(self.waveform, self.phase, period);
    }
}

impl Default for Osc {
    fn default() -> Self {
        Self::new(&Context::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn osc(sample_rate: u32, hz: f32) -> Osc {
        let mut osc = Osc::new(&Context::new(sample_rate));
        osc.set_frequency(hz);
        osc
    }

    #[test]
    fn non_positive_frequency_ignored() {
        let mut osc = osc(48000, 440.0);
        osc.set_frequency(-5.0);
        assert_eq!(osc.frequency(), 440.0);
        osc.set_frequency(0.0);
        assert_eq!(osc.frequency(), 440.0);
        osc.set_detune(1.0);
        osc.set_frequency(0.0);
        assert!((osc.frequency() - 466.16).abs() < 0.01);
    }
    #[test]
    fn detune_one_semitone() {
        let mut osc = osc(48000, 440.0);
        osc.set_detune(1.0);
        assert!((osc.frequency() - 440.0 * f32::powf(2.0, 1.0 / 12.0)).abs() < 0.01);
        osc.set_detune(-1.0);
        assert!((osc.frequency() - 440.0 / f32::powf(2.0, 1.0 / 12.0)).abs() < 0.01);
        // retuning keeps the detune
        osc.set_frequency(220.0);
        assert!((osc.frequency() - 220.0 / f32::powf(2.0, 1.0 / 12.0)).abs() < 0.01);
        osc.set_detune(0.0);
        assert_eq!(osc.frequency(), 220.0);
    }
    #[test]
    fn phase_wraps_after_one_period() {
        let mut osc = osc(48000, 4800.0);
        let mut wraps = 0;
        for _ in 0..10 {
            osc.tick(None);
            if osc.phase() == 0 {
                wraps += 1;
            }
        }
        assert_eq!(osc.phase(), 0);
        assert_eq!(wraps, 1);
    }
    #[test]
    fn square_output_follows_phase() {
        let mut osc = osc(48000, 4800.0);
        osc.set_waveform(Waveform::Square);
        let mut out = [0f32; 10];
        for smp in out.iter_mut() {
            osc.tick(None);
            *smp = osc.level();
        }
        // phases 1..=9 then 0
        assert_eq!(out, [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0]);
    }
    #[test]
    fn degenerate_modulation_holds_state() {
        let mut modulator = osc(48000, 4800.0);
        modulator.set_waveform(Waveform::Square);
        modulator.tick(None);
        assert_eq!(modulator.level(), 1.0);
        modulator.tick(None);
        modulator.tick(None);
        modulator.tick(None);
        modulator.tick(None);
        assert_eq!(modulator.level(), -1.0);
        let mut carrier = osc(48000, 10.0);
        carrier.set_waveform(Waveform::Sawtooth);
        carrier.set_mod_depth(1.0);
        carrier.tick(None);
        let (phase, level) = (carrier.phase(), carrier.level());
        // 10Hz - 20Hz < 0
        assert!(carrier.instantaneous_frequency(Some(&modulator)) < 0.0);
        carrier.tick(Some(&modulator));
        assert_eq!(carrier.phase(), phase);
        assert_eq!(carrier.level(), level);
    }
    #[test]
    fn carrier_tracks_latest_modulator_level() {
        // a modulator at half the sample rate alternates -1, +1, -1, ...
        let mut modulator = osc(48000, 24000.0);
        modulator.set_waveform(Waveform::Square);
        let mut carrier = osc(48000, 40.0);
        carrier.set_waveform(Waveform::Sawtooth);
        carrier.set_mod_depth(1.0);

        modulator.tick(None);
        assert_eq!(modulator.level(), -1.0);
        carrier.tick(Some(&modulator));
        // 40Hz - 20Hz = 20Hz, so a 2400 sample period
        assert_eq!(carrier.level(), -1.0 + 2.0 / 2400.0);

        modulator.tick(None);
        assert_eq!(modulator.level(), 1.0);
        carrier.tick(Some(&modulator));
        // 40Hz + 20Hz = 60Hz, so a 800 sample period
        assert_eq!(carrier.level(), -1.0 + 4.0 / 800.0);
    }
    #[test]
    fn zero_depth_ignores_modulator() {
        let mut modulator = osc(48000, 24000.0);
        modulator.set_waveform(Waveform::Square);
        modulator.tick(None);
        let mut carrier = osc(48000, 40.0);
        assert_eq!(carrier.instantaneous_frequency(Some(&modulator)), 40.0);
        carrier.set_mod_depth(0.5);
        assert_eq!(carrier.instantaneous_frequency(Some(&modulator)), 30.0);
    }
    #[test]
    fn above_nyquist_is_single_sample_period() {
        let mut osc = osc(48000, 200000.0);
        for _ in 0..4 {
            osc.tick(None);
            assert_eq!(osc.phase(), 0);
            assert_eq!(osc.level(), 0.0);
        }
    }
}
