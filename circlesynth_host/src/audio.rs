//! The audio context: renders buffers from the voice into a WAV file, paced
//! to the sample clock like a hardware output would be.

use std::io::{Seek, Write};
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
use std::thread;
use std::time::{Duration, Instant};

use circlesynth::{Voice, VoiceControls};
use hound::{SampleFormat, WavSpec, WavWriter};

/// The output format: interleaved stereo, signed 16 bit
pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn write_chunk<W: Write + Seek>(writer: &mut WavWriter<W>, samples: &[i32]) -> hound::Result<()> {
    for &smp in samples {
        writer.write_sample(smp.clamp(i16::MIN as i32, i16::MAX as i32) as i16)?;
    }
    Ok(())
}

/// Drives a [Voice] one buffer at a time
pub struct AudioOutput {
    voice: Voice,
    buf: Vec<i32>,
    sample_rate: u32,
    realtime: bool,
}

impl AudioOutput {
    /// Constructor.  `chunk_size` is the number of words (two per frame) in
    /// each buffer.  If `realtime` is set, rendering is throttled to
    /// `sample_rate`.
    pub fn new(voice: Voice, chunk_size: usize, sample_rate: u32, realtime: bool) -> Self {
        Self {
            voice,
            buf: vec![0; chunk_size],
            sample_rate,
            realtime,
        }
    }
    /// Render `total_frames` frames to `writer`, or fewer if `running` is
    /// cleared first.  Returns the number of frames written.
    pub fn run<W: Write + Seek>(
        &mut self,
        controls: &VoiceControls,
        total_frames: u64,
        running: &AtomicBool,
        writer: &mut WavWriter<W>,
    ) -> anyhow::Result<u64> {
        let start = Instant::now();
        let mut frames = 0u64;
        while frames < total_frames && running.load(Relaxed) {
            let words = self.voice.render(controls, &mut self.buf);
            let remaining = (total_frames - frames).saturating_mul(2);
            let words = words.min(usize::try_from(remaining).unwrap_or(usize::MAX));
            write_chunk(writer, &self.buf[..words])?;
            frames += (words / 2) as u64;
            if self.realtime {
                let due = start + Duration::from_secs_f64(frames as f64 / self.sample_rate as f64);
                if let Some(wait) = due.checked_duration_since(Instant::now()) {
                    thread::sleep(wait);
                }
            }
        }
        Ok(frames)
    }
}
