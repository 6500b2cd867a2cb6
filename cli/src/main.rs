use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use crokinole_core::*;

use crate::script::{ReplayOptions, Script};

mod script;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded session script and export the match record
    Replay {
        script: PathBuf,

        /// Directory the record is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Print the record instead of writing it
        #[arg(long)]
        stdout: bool,

        /// Log rejected events and continue
        #[arg(short, long)]
        keep_going: bool,

        /// Accept score sheets whose twenties disagree with the tracked counts
        #[arg(long)]
        accept_mismatch: bool,
    },
    /// Classify a click on the standard concentric board
    Classify {
        x: f64,
        y: f64,

        /// Width of the canvas the click was taken on
        #[arg(long, requires = "display_height")]
        display_width: Option<f64>,

        /// Height of the canvas the click was taken on
        #[arg(long, requires = "display_width")]
        display_height: Option<f64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    match args.command {
        Command::Replay {
            script,
            out_dir,
            stdout,
            keep_going,
            accept_mismatch,
        } => replay(
            &script,
            &out_dir,
            stdout,
            ReplayOptions {
                keep_going,
                accept_mismatch,
            },
        ),
        Command::Classify {
            x,
            y,
            display_width,
            display_height,
        } => {
            let display = display_width.zip(display_height);
            classify(Point::new(x, y), display)
        }
    }
}

fn init_logging(verbose: &Verbosity<InfoLevel>) {
    use tracing_subscriber::filter::LevelFilter;

    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn replay(path: &Path, out_dir: &Path, stdout: bool, options: ReplayOptions) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let script = Script::parse(&text)?;
    log::info!(
        "Replaying {} event(s) from {}",
        script.events.len(),
        path.display()
    );

    let mut game = script.replay(options)?;
    let record = game.end_match();
    let json = record.to_json_pretty()?;

    if stdout {
        println!("{json}");
        return Ok(());
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Cannot create {}", out_dir.display()))?;
    let target = out_dir.join(record.filename());
    std::fs::write(&target, json).with_context(|| format!("Cannot write {}", target.display()))?;

    let totals = game.total_points();
    log::info!(
        "Wrote {} round(s) to {} ({} {} - {} {})",
        record.rounds.len(),
        target.display(),
        record.metadata.players.one.name,
        totals.one,
        totals.two,
        record.metadata.players.two.name
    );
    Ok(())
}

fn classify(click: Point, display: Option<(f64, f64)>) -> Result<()> {
    let classifier = ZoneClassifier::new(ReferenceSurface::concentric());
    let point = match display {
        Some(display) => scale_to_canonical(click, display, classifier.surface().size()),
        None => click,
    };
    let zone = classifier.classify(point);
    let twenty = if zone.is_twenty() { ", counts as a twenty" } else { "" };
    println!(
        "({:.1}, {:.1}): {} ({} points{twenty})",
        point.x, point.y, zone.name, zone.points
    );
    Ok(())
}
