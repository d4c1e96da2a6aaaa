//! Desktop host for the CircleSynth voice.
//!
//! A control thread plays the part of the hardware's main loop: it applies
//! the pot readings and polls the note input at a fixed interval.  An audio
//! thread renders buffers from the shared [VoiceControls] into a WAV file,
//! paced to the sample clock.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, ensure, Context as _};
use clap::Parser;
use hound::WavWriter;

use circlesynth::{MixMode, Pot, Voice, VoiceControls};

mod audio;
mod config;
mod input;

use audio::AudioOutput;
use config::SynthConfig;
use input::{NoteInput, Transport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Mode {
    /// Frequency modulation
    Fm,
    /// Ring modulation
    Multiply,
}

impl From<Mode> for MixMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Fm => MixMode::Fm,
            Mode::Multiply => MixMode::Multiply,
        }
    }
}

/// Render the CircleSynth FM voice to a WAV file
#[derive(Parser, Debug)]
#[command(name = "circlesynth")]
#[command(version)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File to read note input from
    #[arg(short, long)]
    midi: Option<PathBuf>,

    /// Framing of the note input
    #[arg(short, long, value_enum, default_value = "serial")]
    transport: Transport,

    /// How the modulator is combined with the carrier
    #[arg(long, value_enum, default_value = "fm")]
    mode: Mode,

    /// Raw pot readings (0-1023): wave, intensity, rate, ratio
    #[arg(long, value_delimiter = ',', num_args = Pot::COUNT)]
    pots: Option<Vec<u16>>,

    /// Seconds of audio to render
    #[arg(short, long, default_value = "5.0")]
    duration: f64,

    /// Output WAV file
    #[arg(short, long, default_value = "circlesynth.wav")]
    output: PathBuf,

    /// Render as fast as possible instead of in real time
    #[arg(long)]
    offline: bool,
}

fn control_loop<R: Read>(
    controls: &VoiceControls,
    pots: [u16; Pot::COUNT],
    mut input: Option<NoteInput<R>>,
    interval: Duration,
    running: &AtomicBool,
) -> anyhow::Result<()> {
    while running.load(Relaxed) {
        for (channel, &raw) in pots.iter().enumerate() {
            controls.set_pot(channel as u8, raw);
        }
        if let Some(source) = input.as_mut() {
            source.poll(controls).context("Failed to read note input")?;
            if source.is_eof() {
                log::info!("End of note input");
                input = None;
            }
        }
        thread::sleep(interval);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    colog::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SynthConfig::load(path)?,
        None => SynthConfig::default(),
    };
    if let Some(pots) = &args.pots {
        config.pots = pots
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("Expected {} pot readings", Pot::COUNT))?;
    }
    config.validate()?;
    ensure!(
        args.duration.is_finite() && args.duration > 0.0,
        "Duration must be positive"
    );
    log::info!("Configuration: {:?}", config);

    let context = config.context()?;
    let total_frames = (args.duration * config.sample_rate as f64).round() as u64;
    let controls = Arc::new(VoiceControls::new());
    let running = Arc::new(AtomicBool::new(true));

    let input = match &args.midi {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open note input {}", path.display()))?;
            log::info!("Reading {:?} input from {}", args.transport, path.display());
            Some(NoteInput::new(
                BufReader::new(file),
                args.transport,
                config.serial_read_size,
            ))
        }
        None => None,
    };

    let control_thread = {
        let controls = controls.clone();
        let running = running.clone();
        let pots = config.pots;
        let interval = Duration::from_millis(config.poll_interval_ms);
        thread::spawn(move || {
            let result = control_loop(&controls, pots, input, interval, &running);
            if let Err(e) = &result {
                log::error!("Control thread stopped: {:#}", e);
                running.store(false, Relaxed);
            }
            result
        })
    };

    let mut writer = WavWriter::create(&args.output, audio::wav_spec(config.sample_rate))
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let audio_thread = {
        let controls = controls.clone();
        let running = running.clone();
        let voice = Voice::new(&context, config.output_range(), args.mode.into());
        let mut output = AudioOutput::new(
            voice,
            config.chunk_size,
            config.sample_rate,
            !args.offline,
        );
        thread::spawn(move || -> anyhow::Result<u64> {
            let result = output.run(&controls, total_frames, &running, &mut writer);
            running.store(false, Relaxed);
            let frames = result?;
            writer.finalize().context("Failed to finalize WAV file")?;
            Ok(frames)
        })
    };

    let frames = audio_thread
        .join()
        .map_err(|_| anyhow!("Audio thread panicked"))??;
    control_thread
        .join()
        .map_err(|_| anyhow!("Control thread panicked"))??;
    log::info!(
        "Wrote {} frames ({:.2} s) to {}",
        frames,
        frames as f64 / config.sample_rate as f64,
        args.output.display()
    );
    Ok(())
}
