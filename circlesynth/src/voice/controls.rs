//! Parameter cells shared between the control context, which writes them, and
//! the audio context, which reads them once per buffer.
//!
//! Every parameter lives in its own atomic cell, so a reader sees either the
//! old or the new value of each one and never a torn write.  The note
//! frequency is not stored at all: it is looked up from the active key by the
//! reader, so a key and its frequency can never disagree.

use core::sync::atomic::Ordering::Relaxed;
use core::sync::atomic::{AtomicU16, AtomicU8};

use atomic_float::AtomicF32;

use super::VoiceParams;
use crate::devices::Waveform;
use crate::midi::NoteHandler;
use crate::midi_const::{midi_note_to_frequency, NUM_KEYS};

/// Stored in the key cell when no note is held
const KEY_NONE: u8 = u8::MAX;

/// The largest raw value a pot reports (10 bit ADC)
pub const POT_MAX: u16 = 1023;

/// The modulator/carrier frequency ratios selectable with [Pot::Ratio]
pub const FM_RATIOS: [f32; 8] = [1.0, 2.0, 3.0, 5.0, 7.0, 9.0, 11.0, 13.0];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
/// The control channels (potentiometers) of the synth
pub enum Pot {
    /// Selects the waveform from the top two bits
    Wave,
    /// FM intensity, from 0 to 1
    Intensity,
    /// Rate of the intensity LFO, from 0 to 10.23 Hz
    Rate,
    /// Selects one of the [FM_RATIOS]
    Ratio,
}

impl Pot {
    /// The number of control channels
    pub const COUNT: usize = 4;
    const ELEM: [Pot; Self::COUNT] = [Self::Wave, Self::Intensity, Self::Rate, Self::Ratio];
    /// Returns a slice to all of the control channels, in channel order
    pub const fn pots() -> &'static [Pot] {
        &Self::ELEM
    }
    /// The name of the control
    pub const fn to_str(&self) -> &'static str {
        ["Wave", "Intensity", "Rate", "Ratio"][*self as usize]
    }
    /// Try to create a Pot from its channel number
    pub const fn new_from_u8(value: u8) -> Option<Self> {
        if (value as usize) < Self::COUNT {
            Some(Self::ELEM[value as usize])
        } else {
            None
        }
    }
}

impl TryFrom<u8> for Pot {
    type Error = &'static str;
    fn try_from(value: u8) -> Result<Self, &'static str> {
        Self::new_from_u8(value).ok_or("Unrecognised pot")
    }
}

/// Scale a raw pot value onto the waveform selector
fn wave_from_raw(raw: u16) -> Waveform {
    Waveform::new_from_u8((raw >> 8) as u8).unwrap_or_default()
}

/// Scale a raw pot value onto the FM ratio table
fn ratio_from_raw(raw: u16) -> f32 {
    let index = (raw as usize * FM_RATIOS.len()) / (POT_MAX as usize + 1);
    FM_RATIOS[index.min(FM_RATIOS.len() - 1)]
}

/// The voice state written by the control context: the held note and the
/// four pot-driven parameters.
///
/// This is `Sync`, so a single instance can be shared (e.g. in an `Arc` or a
/// `static`) between the thread or interrupt decoding MIDI and the one
/// rendering audio.  See [Voice::render](super::Voice::render).
pub struct VoiceControls {
    key: AtomicU8,
    waveform: AtomicU8,
    intensity: AtomicF32,
    rate: AtomicF32,
    ratio: AtomicF32,
    pots: [AtomicU16; Pot::COUNT],
}

impl VoiceControls {
    /// Constructor.  No note is held and every pot reads zero.
    pub fn new() -> Self {
        Self {
            key: AtomicU8::new(KEY_NONE),
            waveform: AtomicU8::new(Waveform::Sine as u8),
            intensity: AtomicF32::new(0.0),
            rate: AtomicF32::new(0.0),
            ratio: AtomicF32::new(FM_RATIOS[0]),
            pots: Default::default(),
        }
    }
    /// Apply a raw reading from control channel `pot`.  Unknown channels are
    /// ignored and values above [POT_MAX] are clipped.
    pub fn set_pot(&self, pot: u8, raw: u16) {
        if let Some(pot) = Pot::new_from_u8(pot) {
            self.set_pot_control(pot, raw);
        }
    }
    /// Apply a raw reading from a control channel.  Values above [POT_MAX]
    /// are clipped.
    pub fn set_pot_control(&self, pot: Pot, raw: u16) {
        let raw = raw.min(POT_MAX);
        let old = self.pots[pot as usize].swap(raw, Relaxed);
        match pot {
            Pot::Wave => self.waveform.store(wave_from_raw(raw) as u8, Relaxed),
            Pot::Intensity => self.intensity.store(raw as f32 / POT_MAX as f32, Relaxed),
            Pot::Rate => self.rate.store(raw as f32 / 100.0, Relaxed),
            Pot::Ratio => self.ratio.store(ratio_from_raw(raw), Relaxed),
        }
        if old != raw {
            log::info!(
                "SetPot: {}={} (Waveform={}, Intensity={}, Rate={}, Ratio={})",
                pot.to_str(),
                raw,
                self.waveform().to_str(),
                self.fm_intensity(),
                self.mod_rate(),
                self.fm_ratio()
            );
        }
    }
    /// The last raw value applied to `pot`
    pub fn pot(&self, pot: Pot) -> u16 {
        self.pots[pot as usize].load(Relaxed)
    }
    /// The selected waveform
    pub fn waveform(&self) -> Waveform {
        Waveform::new_from_u8(self.waveform.load(Relaxed)).unwrap_or_default()
    }
    /// The FM intensity, from 0 to 1
    pub fn fm_intensity(&self) -> f32 {
        self.intensity.load(Relaxed)
    }
    /// The intensity LFO rate, in Hz
    pub fn mod_rate(&self) -> f32 {
        self.rate.load(Relaxed)
    }
    /// The modulator/carrier frequency ratio
    pub fn fm_ratio(&self) -> f32 {
        self.ratio.load(Relaxed)
    }
    /// The held note, if any
    pub fn active_key(&self) -> Option<u8> {
        match self.key.load(Relaxed) {
            KEY_NONE => None,
            key => Some(key),
        }
    }
    /// The frequency of the held note, if any
    pub fn target_frequency(&self) -> Option<f32> {
        self.active_key().and_then(midi_note_to_frequency)
    }
    /// Read every parameter once, for use over the next buffer
    pub fn snapshot(&self) -> VoiceParams {
        VoiceParams {
            key: self.active_key(),
            waveform: self.waveform(),
            fm_intensity: self.fm_intensity(),
            mod_rate: self.mod_rate(),
            fm_ratio: self.fm_ratio(),
        }
    }
}

impl Default for VoiceControls {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteHandler for VoiceControls {
    /// Start playing `key`, replacing any held note.  Keys with no entry in
    /// the frequency table are ignored.
    fn note_on(&self, key: u8) {
        if (key as usize) < NUM_KEYS {
            self.key.store(key, Relaxed);
        } else {
            log::trace!("Ignoring note on for key {}", key);
        }
    }
    /// Release `key`.  Only the most recent note is tracked, so releasing any
    /// other key does nothing.
    fn note_off(&self, key: u8) {
        // a failed exchange means some other key is held
        let _ = self.key.compare_exchange(key, KEY_NONE, Relaxed, Relaxed);
    }
    fn all_notes_off(&self) {
        self.key.store(KEY_NONE, Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_pot_uses_top_bits() {
        let controls = VoiceControls::new();
        let expected = [
            (0, Waveform::Sine),
            (255, Waveform::Sine),
            (256, Waveform::Square),
            (600, Waveform::Sawtooth),
            (768, Waveform::Triangle),
            (1023, Waveform::Triangle),
        ];
        for (raw, wave) in expected {
            controls.set_pot(Pot::Wave as u8, raw);
            assert_eq!(controls.waveform(), wave);
        }
    }
    #[test]
    fn linear_pots() {
        let controls = VoiceControls::new();
        controls.set_pot_control(Pot::Intensity, 1023);
        assert_eq!(controls.fm_intensity(), 1.0);
        controls.set_pot_control(Pot::Intensity, 0);
        assert_eq!(controls.fm_intensity(), 0.0);
        controls.set_pot_control(Pot::Rate, 250);
        assert_eq!(controls.mod_rate(), 2.5);
        // clipped to the 10 bit range
        controls.set_pot_control(Pot::Intensity, 5000);
        assert_eq!(controls.fm_intensity(), 1.0);
        assert_eq!(controls.pot(Pot::Intensity), POT_MAX);
    }
    #[test]
    fn ratio_pot_buckets() {
        let controls = VoiceControls::new();
        assert_eq!(controls.fm_ratio(), 1.0);
        for (i, ratio) in FM_RATIOS.iter().enumerate() {
            let low = (i * 128) as u16;
            controls.set_pot_control(Pot::Ratio, low);
            assert_eq!(controls.fm_ratio(), *ratio);
            controls.set_pot_control(Pot::Ratio, low + 127);
            assert_eq!(controls.fm_ratio(), *ratio);
        }
    }
    #[test]
    fn unknown_pot_ignored() {
        let controls = VoiceControls::new();
        let before = controls.snapshot();
        controls.set_pot(4, 1000);
        controls.set_pot(200, 1000);
        assert_eq!(controls.snapshot(), before);
        assert!(Pot::try_from(4).is_err());
        assert_eq!(Pot::try_from(3), Ok(Pot::Ratio));
    }
    #[test]
    fn monophonic_last_note() {
        let controls = VoiceControls::new();
        assert_eq!(controls.active_key(), None);
        assert_eq!(controls.target_frequency(), None);
        controls.note_on(60);
        controls.note_on(64);
        assert_eq!(controls.active_key(), Some(64));
        // releasing the older note does not stop the newer one
        controls.note_off(60);
        assert_eq!(controls.active_key(), Some(64));
        controls.note_off(64);
        assert_eq!(controls.active_key(), None);
        controls.note_on(200);
        assert_eq!(controls.active_key(), None);
        controls.note_on(69);
        assert_eq!(controls.target_frequency(), Some(440.0));
        controls.all_notes_off();
        assert_eq!(controls.active_key(), None);
    }
}
