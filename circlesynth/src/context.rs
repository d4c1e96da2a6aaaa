//! This module provides objects to reason about the processing context: the
//! audio sample rate, fixed for the lifetime of the engine, and the integer
//! range of the hardware the samples are written to.

/// The sample rate used when none is given (PWM and HDMI audio on the Pi)
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The processing context shared by every oscillator of a voice
pub struct Context {
    sample_rate: u32,
}

impl Context {
    /// Create a new `Context`.  The sample rate must be non-zero.
    pub const fn new(sample_rate: u32) -> Self {
        assert!(sample_rate > 0);
        Self { sample_rate }
    }
    /// Create a new `Context` if the sample rate is usable, or return an error
    /// otherwise.
    pub fn try_new(sample_rate: u32) -> Result<Self, &'static str> {
        Self::try_from(sample_rate)
    }
    /// Returns the sample rate, in Hz.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl TryFrom<u32> for Context {
    type Error = &'static str;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Err("Unsupported Sample Rate"),
            sr => Ok(Self { sample_rate: sr }),
        }
    }
}

/// The integer range a floating point level in `[-1, 1]` is mapped onto.
///
/// `low` corresponds to a level of -1, `high` to +1, and `null` is the value
/// written while the voice is silent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputRange {
    low: i32,
    null: i32,
    high: i32,
}

impl OutputRange {
    /// Create a range from its two extremes.  The null level is the midpoint.
    pub const fn new(low: i32, high: i32) -> Self {
        Self {
            low,
            null: low + (high - low) / 2,
            high,
        }
    }
    /// Create a range scaled down from the full range of an output device,
    /// e.g. `from_device(0, 4096, 20)` uses 20% of a 12 bit PWM range.
    pub const fn from_device(range_min: i32, range_max: i32, volume_percent: u8) -> Self {
        let volume = if volume_percent > 100 {
            100
        } else {
            volume_percent as i64
        };
        let low = (range_min as i64 * volume / 100) as i32;
        let high = (range_max as i64 * volume / 100) as i32;
        Self::new(low, high)
    }
    /// The value corresponding to a level of -1
    pub const fn low(&self) -> i32 {
        self.low
    }
    /// The value written while no note is playing
    pub const fn null(&self) -> i32 {
        self.null
    }
    /// The value corresponding to a level of +1
    pub const fn high(&self) -> i32 {
        self.high
    }
    /// Map a level onto this range.  Levels outside `[-1, 1]` are clipped.
    pub fn map(&self, level: f32) -> i32 {
        let level = level.clamp(-1.0, 1.0);
        let span = (self.high - self.low) as f32;
        // non-negative, so truncation after adding one half rounds to nearest
        let offset = (span * ((level + 1.0) / 2.0) + 0.5) as i32;
        self.low + offset
    }
}

impl Default for OutputRange {
    /// A signed 16 bit range at full volume
    fn default() -> Self {
        Self::new(i16::MIN as i32, i16::MAX as i32)
    }
}
