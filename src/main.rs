//! Solfege CLI - scale and interval ear training in the terminal

use clap::{Parser, Subcommand};
use solfege::config::TrainerConfig;
use solfege::controller::{Command, Controller, TrainerHandle};
use solfege::interval::IntervalQuality;
use solfege::pitch::PitchClass;
use solfege::prompt::IntervalPrompt;
use solfege::render::{render_to_file, RenderConfig};
use solfege::scale::ScaleMode;
use solfege::session::{Feedback, Phase};
use solfege::synth::{ToneSpec, ToneSynth};
use solfege::trainer::{Snapshot, Trainer};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "solfege")]
#[command(about = "Scale and interval ear training", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/solfege/config.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the pitches and step pattern of a scale
    Scale {
        /// Root pitch (C, C#, Db, ...)
        root: PitchClass,

        /// Mode name (ionian, dorian, ... or major/minor)
        #[arg(default_value = "ionian")]
        mode: ScaleMode,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Play the scale on the default output device
        #[arg(short, long)]
        play: bool,
    },

    /// List every interval above a root
    Intervals {
        /// Root pitch
        root: PitchClass,
    },

    /// Render a scale or an interval to WAV
    Render {
        /// Output WAV file path
        output: PathBuf,

        /// Root pitch
        #[arg(short, long, default_value = "C")]
        root: PitchClass,

        /// Mode to render (ignored when --interval is given)
        #[arg(short, long, default_value = "ionian")]
        mode: ScaleMode,

        /// Render root and target of this interval instead of a scale
        #[arg(short, long)]
        interval: Option<IntervalQuality>,

        /// Sample rate in Hz (default: from config)
        #[arg(short, long)]
        sample_rate: Option<u32>,

        /// Output channels
        #[arg(long, default_value = "2")]
        channels: u16,
    },

    /// Interactive training session
    Train {
        /// Seed for interval prompts
        #[arg(long)]
        seed: Option<u64>,

        /// Run without opening an audio device
        #[arg(long)]
        silent: bool,

        /// Don't play new interval prompts automatically
        #[arg(long)]
        no_present: bool,

        /// Print every state change as a JSON line
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = TrainerConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Scale {
            root,
            mode,
            json,
            play,
        } => {
            let pitches = mode.pitches(root);
            if json {
                let value = serde_json::json!({
                    "root": root,
                    "mode": mode,
                    "pattern": mode.pattern(),
                    "pitches": pitches,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", root.name(), mode.name());
                println!("  Pattern: {}", mode.pattern());
                let names: Vec<&str> = pitches.iter().map(|p| p.short_name()).collect();
                println!("  Pitches: {}", names.join(" "));
            }

            if play {
                let synth = ToneSynth::with_default_output(ToneSpec::from(&config.tone));
                synth.play_sequence(&pitches);
                while synth.is_busy() {
                    std::thread::sleep(std::time::Duration::from_millis(50));
                }
            }
        }

        Commands::Intervals { root } => {
            println!("Intervals above {}:", root.name());
            for quality in IntervalQuality::ALL {
                println!(
                    "  {:>3}  {:<15} {:>2} semitones  {}",
                    quality.short_name(),
                    quality.name(),
                    quality.semitones(),
                    quality.above(root).name()
                );
            }
        }

        Commands::Render {
            output,
            root,
            mode,
            interval,
            sample_rate,
            channels,
        } => {
            let pitches = match interval {
                Some(quality) => IntervalPrompt::new(root, quality).notes().to_vec(),
                None => mode.pitches(root),
            };
            let render_config = RenderConfig {
                sample_rate: sample_rate.unwrap_or(config.tone.sample_rate),
                channels,
                tone: ToneSpec::from(&config.tone),
            };

            let stats = render_to_file(&pitches, &render_config, &output)?;
            println!("Wrote {}", output.display());
            stats.print_summary();
        }

        Commands::Train {
            seed,
            silent,
            no_present,
            json,
        } => {
            let mut config = config;
            if seed.is_some() {
                config.seed = seed;
            }
            if no_present {
                config.present_intervals = false;
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(train(config, silent, json))?;
        }
    }

    Ok(())
}

async fn train(
    config: TrainerConfig,
    silent: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let trainer = if silent {
        Trainer::with_synth(ToneSynth::silent(ToneSpec::from(&config.tone)), &config)
    } else {
        Trainer::from_config(&config)
    };

    let (controller, handle) = Controller::new(trainer);

    print_help();
    let (trainer, result) = tokio::join!(controller.run(), drive(handle, json));
    result?;

    // Quitting mid-dictation still reports the score so far
    let session = trainer.session();
    if session.phase.is_dictation() {
        println!("{}", trainer.snapshot().summary());
    }
    Ok(())
}

enum Input {
    Command(Command),
    Status,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let input = match (first.to_ascii_lowercase().as_str(), arg) {
        ("root", Some(pitch)) => Input::Command(Command::SelectRoot(pitch.parse()?)),
        ("mode", Some(mode)) => Input::Command(Command::SelectMode(mode.parse()?)),
        ("scale", None) => Input::Command(Command::StartScaleTraining),
        ("intervals", None) => Input::Command(Command::StartIntervalTraining),
        ("replay" | "r", None) => Input::Command(Command::ReplayPrompt),
        ("stop", None) => Input::Command(Command::Stop),
        ("new", None) => Input::Command(Command::NewSession),
        ("status", None) => Input::Status,
        ("help" | "?", None) => Input::Help,
        ("quit" | "q" | "exit", None) => Input::Quit,
        (_, None) => Input::Command(Command::SubmitAnswer(first.parse()?)),
        _ => return Err(format!("Unrecognized input: {}", line.trim())),
    };
    Ok(Some(input))
}

async fn drive(mut handle: TrainerHandle, json: bool) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = handle.snapshot();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Ok(Some(Input::Command(command))) => {
                        handle.send(command);
                    }
                    Ok(Some(Input::Status)) => print_status(&handle.snapshot()),
                    Ok(Some(Input::Help)) => print_help(),
                    Ok(Some(Input::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => println!("{}", e),
                }
            }
            snapshot = handle.changed() => {
                let Some(snapshot) = snapshot else { break };
                if json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    report(&last, &snapshot);
                }
                last = snapshot;
            }
        }
    }

    handle.send(Command::Shutdown);
    Ok(())
}

/// Print what changed between two snapshots
fn report(prev: &Snapshot, next: &Snapshot) {
    if next.phase != prev.phase {
        match next.phase {
            Phase::Unconfigured => println!("New session. Choose a root and a mode."),
            Phase::ScaleDictation => {
                if let (Some(root), Some(mode), Some(pattern)) = (next.root, next.mode, &next.pattern)
                {
                    println!(
                        "Scale dictation: play {} {} ({}) from the root up",
                        root, mode, pattern
                    );
                }
            }
            Phase::IntervalDictation => println!("Interval dictation: name the upper note"),
            Phase::Finished => {
                println!("Finished");
                println!("{}", next.summary());
            }
        }
    } else if next.root != prev.root || next.mode != prev.mode {
        print_status(next);
    }

    if next.feedback != prev.feedback {
        match next.feedback {
            Feedback::Correct => println!("  correct"),
            Feedback::Incorrect => println!("  incorrect"),
            Feedback::Neutral => {}
        }
    }

    if next.phase == Phase::ScaleDictation
        && next.scale_progress_index != prev.scale_progress_index
    {
        println!("  degree {}/{}", next.scale_progress_index, next.scale.len());
    }

    if next.awaiting_answer && (!prev.awaiting_answer || next.phase != prev.phase) {
        if let (Some(root), Some(quality)) = (next.prompt_root, next.prompt_quality) {
            println!("  {} above {}?", quality.name(), root);
        }
    }
}

fn print_status(snapshot: &Snapshot) {
    let root = snapshot.root.map(|r| r.name()).unwrap_or("-");
    let mode = snapshot.mode.map(|m| m.name()).unwrap_or("-");
    println!(
        "{:?}  root: {}  mode: {}  correct: {}  errors: {}  elapsed: {}s",
        snapshot.phase, root, mode, snapshot.correct_count, snapshot.error_count, snapshot.elapsed_secs
    );
}

fn print_help() {
    println!("Commands:");
    println!("  root <pitch>   choose the root (C, F#, Bb, ...)");
    println!("  mode <mode>    choose the mode (ionian .. locrian, major, minor)");
    println!("  scale          start scale dictation");
    println!("  intervals      start interval dictation");
    println!("  <pitch>        answer");
    println!("  replay         play the current interval again");
    println!("  stop           finish the session");
    println!("  new            discard the session");
    println!("  status         show the current state");
    println!("  quit");
}
