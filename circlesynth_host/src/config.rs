use std::fs;
use std::path::Path;

use anyhow::{ensure, Context as _};
use circlesynth::context::DEFAULT_SAMPLE_RATE;
use circlesynth::voice::POT_MAX;
use circlesynth::{Context, OutputRange, Pot};
use serde::{Deserialize, Serialize};

/// Settings for the host, loaded from a JSON file.  Every field is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Output sample rate, in Hz
    pub sample_rate: u32,
    /// Words (not frames) per rendered buffer
    pub chunk_size: usize,
    /// Percentage of the device range used for output
    pub volume_percent: u8,
    /// Lowest value the output device accepts
    pub range_min: i16,
    /// Highest value the output device accepts
    pub range_max: i16,
    /// Milliseconds between polls of the pots and the MIDI input
    pub poll_interval_ms: u64,
    /// Maximum number of MIDI bytes read per poll
    pub serial_read_size: usize,
    /// Raw readings of the four pots, in channel order
    pub pots: [u16; Pot::COUNT],
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            chunk_size: 2048,
            volume_percent: 20,
            range_min: i16::MIN,
            range_max: i16::MAX,
            poll_interval_ms: 10,
            serial_read_size: 20,
            pots: [0; Pot::COUNT],
        }
    }
}

impl SynthConfig {
    /// Read and validate a configuration file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }
    /// Parse and validate a configuration
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }
    /// Check the settings are usable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.context()?;
        ensure!(
            self.chunk_size >= 2 && self.chunk_size % 2 == 0,
            "chunk_size must be a non-zero number of stereo frames, got {}",
            self.chunk_size
        );
        ensure!(
            self.volume_percent <= 100,
            "volume_percent must be at most 100, got {}",
            self.volume_percent
        );
        ensure!(
            self.range_min < self.range_max,
            "range_min ({}) must be below range_max ({})",
            self.range_min,
            self.range_max
        );
        ensure!(self.serial_read_size > 0, "serial_read_size must be non-zero");
        if let Some(raw) = self.pots.iter().find(|&&raw| raw > POT_MAX) {
            log::warn!("Pot reading {} will be clipped to {}", raw, POT_MAX);
        }
        Ok(())
    }
    /// The voice context for the configured sample rate
    pub fn context(&self) -> anyhow::Result<Context> {
        Context::try_new(self.sample_rate).map_err(anyhow::Error::msg)
    }
    /// The output range, scaled to the configured volume
    pub fn output_range(&self) -> OutputRange {
        OutputRange::from_device(
            self.range_min as i32,
            self.range_max as i32,
            self.volume_percent,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = SynthConfig::from_json("{}").unwrap();
        assert_eq!(config, SynthConfig::default());
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.chunk_size, 2048);
        assert_eq!(config.serial_read_size, 20);
    }
    #[test]
    fn partial_config() {
        let config =
            SynthConfig::from_json(r#"{"sample_rate": 192000, "pots": [256, 1023, 0, 0]}"#)
                .unwrap();
        assert_eq!(config.sample_rate, 192000);
        assert_eq!(config.pots, [256, 1023, 0, 0]);
        assert_eq!(config.volume_percent, 20);
    }
    #[test]
    fn invalid_configs_rejected() {
        assert!(SynthConfig::from_json(r#"{"sample_rate": 0}"#).is_err());
        assert!(SynthConfig::from_json(r#"{"chunk_size": 3}"#).is_err());
        assert!(SynthConfig::from_json(r#"{"volume_percent": 150}"#).is_err());
        assert!(SynthConfig::from_json(r#"{"range_min": 10, "range_max": 10}"#).is_err());
        assert!(SynthConfig::from_json(r#"{"sample_rate": "fast"}"#).is_err());
        assert!(SynthConfig::from_json("not json").is_err());
    }
    #[test]
    fn output_range_scaled_by_volume() {
        let config = SynthConfig {
            range_min: 0,
            range_max: 4096,
            volume_percent: 50,
            ..Default::default()
        };
        let range = config.output_range();
        assert_eq!(range.low(), 0);
        assert_eq!(range.high(), 2048);
        assert_eq!(range.null(), 1024);
    }
    #[test]
    fn missing_file() {
        let err = SynthConfig::load(Path::new("/nonexistent/circlesynth.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
