use super::osc::Osc;
use super::wavetable::Waveform;
use crate::context::Context;

/// How the modulator is combined with the carrier
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum MixMode {
    /// The modulator drives the carrier's frequency
    #[default]
    Fm,
    /// The carrier runs unmodulated and the two outputs are multiplied
    /// together whenever the FM intensity is non-zero
    Multiply,
}

/// Parameters for [FmOperators], applied once per buffer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FmParams {
    /// Waveform for both the carrier and the modulator
    pub waveform: Waveform,
    /// The carrier frequency in Hz.  Non-positive values keep the previous
    /// tuning.
    pub frequency: f32,
    /// The modulator runs at `frequency * ratio`
    pub ratio: f32,
    /// FM depth from 0 to 1
    pub intensity: f32,
    /// The rate of the intensity LFO in Hz.  Zero disables the LFO.
    pub rate: f32,
}

impl Default for FmParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency: 0.0,
            ratio: 1.0,
            intensity: 0.0,
            rate: 0.0,
        }
    }
}

/// A chain of three [Osc]s: an LFO modulating an FM modulator, which in turn
/// modulates the carrier.
///
/// The oscillators are always ticked LFO first and carrier last, so each
/// oscillator sees the output its modulator produced for the same sample
/// instant.
#[derive(Clone, Debug)]
pub struct FmOperators {
    lfo: Osc,
    modulator: Osc,
    carrier: Osc,
    mode: MixMode,
    intensity: f32,
}

impl FmOperators {
    /// Constructor
    pub fn new(context: &Context, mode: MixMode) -> Self {
        Self {
            lfo: Osc::new(context),
            modulator: Osc::new(context),
            carrier: Osc::new(context),
            mode,
            intensity: 0.0,
        }
    }
    /// Push a new set of parameters onto the oscillators
    pub fn apply(&mut self, params: &FmParams) {
        self.carrier.set_waveform(params.waveform);
        self.modulator.set_waveform(params.waveform);
        let intensity = params.intensity.clamp(0.0, 1.0);
        self.intensity = intensity;
        match self.mode {
            MixMode::Fm => self.carrier.set_mod_depth(intensity),
            MixMode::Multiply => self.carrier.set_mod_depth(0.0),
        }
        // the LFO only wobbles the modulator while it is running
        self.modulator
            .set_mod_depth(if params.rate > 0.0 { intensity } else { 0.0 });
        self.lfo.set_frequency(params.rate);
        self.carrier.set_frequency(params.frequency);
        self.modulator.set_frequency(params.frequency * params.ratio);
    }
    /// Advance every oscillator by one sample and return the mixed level
    pub fn tick(&mut self) -> f32 {
        self.lfo.tick(None);
        self.modulator.tick(Some(&self.lfo));
        match self.mode {
            MixMode::Fm => {
                self.carrier.tick(Some(&self.modulator));
                self.carrier.level()
            }
            MixMode::Multiply => {
                self.carrier.tick(None);
                if self.intensity > 0.0 {
                    self.carrier.level() * self.modulator.level()
                } else {
                    self.carrier.level()
                }
            }
        }
    }
    /// The mixing mode
    pub fn mode(&self) -> MixMode {
        self.mode
    }
    /// The intensity LFO
    pub fn lfo(&self) -> &Osc {
        &self.lfo
    }
    /// The FM modulator
    pub fn modulator(&self) -> &Osc {
        &self.modulator
    }
    /// The audible carrier
    pub fn carrier(&self) -> &Osc {
        &self.carrier
    }
}

impl Default for FmOperators {
    fn default() -> Self {
        Self::new(&Context::default(), MixMode::default())
    }
}
