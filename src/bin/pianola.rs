use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use pianola::{
    tone_for_key, AudioOutput, AudioRenderer, CsvFileOutput, Key, Keyboard, RendererHandle,
    Score, SynthConfig, WavFileOutput, KEY_TONE_MAPPING,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "A keyboard-driven synthesizer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the keys that play notes and their tones
    Keys,

    /// Render a score to a .wav or .csv file
    Render {
        /// Notes to play, e.g. "a:0.0:0.5 s:0.5:1.0"
        #[arg(long)]
        score: String,

        /// The file to write
        #[arg(long)]
        output: PathBuf,

        /// A JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seconds to keep rendering after the last note
        #[arg(long, default_value_t = 0.5)]
        tail: f64,
    },

    /// Play a score on the sound device
    #[cfg(feature = "device")]
    Play {
        /// Notes to play, e.g. "a:0.0:0.5 s:0.5:1.0"
        #[arg(long)]
        score: String,

        /// A JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seconds to keep playing after the last note
        #[arg(long, default_value_t = 0.5)]
        tail: f64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .ok();

    match Cli::parse().command {
        Command::Keys => {
            print_keys();
            Ok(())
        }
        Command::Render {
            score,
            output,
            config,
            tail,
        } => render(&score, &output, config.as_deref(), tail),
        #[cfg(feature = "device")]
        Command::Play {
            score,
            config,
            tail,
        } => play(&score, config.as_deref(), tail),
    }
}

fn print_keys() {
    for key in KEY_TONE_MAPPING {
        if let Some(tone) = tone_for_key(key) {
            println!("{key}  {tone:8.2} Hz");
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SynthConfig> {
    match path {
        Some(path) => SynthConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(SynthConfig::default()),
    }
}

/// A renderer with a quit key and a piano, in that order
fn create_renderer(config: &SynthConfig) -> anyhow::Result<AudioRenderer> {
    let mut renderer = AudioRenderer::new(config.output_settings());

    let handle = renderer.handle();
    let mut keyboard = Keyboard::new();
    keyboard.add_key(Key::new(config.quit_key).with_down_callback(move || handle.terminate()));
    renderer.add_input_handler(Box::new(keyboard));

    let piano = config
        .create_piano(renderer.context())
        .context("failed to create piano")?;
    tracing::debug!(volume = %piano.volume(), voices = piano.pool_size(), "Created piano");
    renderer.add_input_handler(Box::new(piano));

    Ok(renderer)
}

fn send_events(handle: &RendererHandle, score: &Score, start: f64, end: f64) {
    for event in score.events_between(start, end) {
        handle.send(event);
    }
}

fn log_latency(renderer: &AudioRenderer) {
    if let Some(latency) = renderer.lead_output().and_then(|output| output.latency()) {
        tracing::info!(
            blocks = renderer.frame_count(),
            latency_us = latency.as_micros() as u64,
            "Average time between blocks"
        );
    }
}

fn render(
    score: &str,
    output_path: &Path,
    config_path: Option<&Path>,
    tail: f64,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let score = Score::parse(score).context("failed to parse score")?;
    let settings = config.output_settings();

    let output: Box<dyn AudioOutput> = match output_path
        .extension()
        .and_then(|extension| extension.to_str())
    {
        Some("wav") => Box::new(WavFileOutput::new(settings, output_path)),
        Some("csv") => Box::new(CsvFileOutput::new(settings, output_path)),
        _ => bail!(
            "unsupported output file {}, expected .wav or .csv",
            output_path.display()
        ),
    };

    let mut renderer = create_renderer(&config)?;
    renderer.add_output(output)?;
    renderer.start()?;

    let handle = renderer.handle();
    let block_seconds = settings.frames_per_buffer as f64 / settings.sample_rate as f64;
    let block_count = ((score.duration() + tail.max(0.0)) / block_seconds).ceil() as u64;

    for block in 0..block_count {
        let start = block as f64 * block_seconds;
        send_events(&handle, &score, start, start + block_seconds);

        if !renderer.render_block()? && !handle.is_running() {
            break;
        }
    }

    log_latency(&renderer);
    renderer.terminate()?;

    tracing::info!(
        path = %output_path.display(),
        seconds = renderer.frame_count() as f64 * block_seconds,
        "Rendered score"
    );

    Ok(())
}

#[cfg(feature = "device")]
fn play(score: &str, config_path: Option<&Path>, tail: f64) -> anyhow::Result<()> {
    use std::time::{Duration, Instant};

    use pianola::DeviceOutput;

    let config = load_config(config_path)?;
    let score = Score::parse(score).context("failed to parse score")?;

    let mut renderer = create_renderer(&config)?;
    renderer.add_output(Box::new(DeviceOutput::new(config.output_settings())))?;
    renderer.start().context("failed to start the sound device")?;

    let handle = renderer.handle();
    let total = Duration::from_secs_f64(score.duration() + tail.max(0.0));

    let conductor = std::thread::Builder::new()
        .name("pianola-score".into())
        .spawn(move || {
            let start = Instant::now();
            let mut previous = 0.0;

            while handle.is_running() {
                let elapsed = start.elapsed();
                let now = elapsed.as_secs_f64();

                send_events(&handle, &score, previous, now);
                previous = now;

                if elapsed >= total {
                    handle.terminate();
                }

                std::thread::sleep(Duration::from_millis(1));
            }
        })
        .context("failed to start the score thread")?;

    renderer.run()?;
    log_latency(&renderer);

    if conductor.join().is_err() {
        tracing::error!("Score thread panicked");
    }

    Ok(())
}
