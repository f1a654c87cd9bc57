//! Robot Program CLI Application
//!
//! Command-line front end for the program engine. It uses the program-engine
//! library and adds:
//! - Loading and re-saving program files
//! - Tree rendering with nesting indent
//! - Simulated runs that replay interpreter snapshots through the highlight poll

use anyhow::{bail, Context, Result};
use clap::Parser;
use program_engine::{save, ControlSurface, IntervalTimer};
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod report;
mod state;

use config::AppConfig;
use state::ScriptedInterpreter;

type Surface = ControlSurface<IntervalTimer, ScriptedInterpreter>;

/// Robot Program - Inspect and simulate robot editor programs
#[derive(Parser, Debug)]
#[command(name = "program-cli")]
#[command(about = "Inspect and simulate robot editor programs", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a saved program (JSON)
    #[arg(short, long, value_name = "FILE")]
    program: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Replay the configured interpreter snapshots and show live highlights
    #[arg(short, long)]
    simulate: bool,

    /// Write the program back out as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Robot Program CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using engine library v{}", program_engine::VERSION);

    let Some(program_path) = &args.program else {
        println!("Robot Program - No input specified");
        println!("\nQuick Start:");
        println!("  program-cli --program demo.json");
        println!("  program-cli --program demo.json --config config.toml --simulate");
        println!("\nUse --help for more options");
        return Ok(());
    };

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    let mut surface = load_program(program_path, &config)?;
    log::info!("Loaded {}", report::summarize(surface.event_list()));

    if !args.quiet {
        print!("{}", report::render_header(program_path, chrono::Local::now()));
        println!();
        print!("{}", report::render_program(surface.event_list(), surface.highlights(), &config.display));
    }

    if args.simulate {
        simulate(&mut surface, &config, args.quiet)?;
    }

    if let Some(output) = &args.output {
        let text = save::to_json(&surface.get_save_data())?;
        fs::write(output, text).with_context(|| format!("Failed to write program: {:?}", output))?;
        log::info!("Program written to {:?}", output);
    }

    Ok(())
}

/// Read a program file and load it into a fresh control surface
fn load_program(path: &Path, config: &AppConfig) -> Result<Surface> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read program: {:?}", path))?;
    let records = save::from_json(&text).with_context(|| format!("Failed to parse program: {:?}", path))?;

    let interpreter = ScriptedInterpreter::new(&config.simulation.snapshots);
    let mut surface = ControlSurface::new(config.engine.clone(), IntervalTimer::new(), interpreter);
    surface
        .load_data(&records)
        .with_context(|| format!("Failed to load program: {:?}", path))?;
    Ok(surface)
}

/// Replay every configured snapshot, one per poll tick, on the wall clock
fn simulate(surface: &mut Surface, config: &AppConfig, quiet: bool) -> Result<()> {
    if surface.interpreter().is_empty() {
        log::warn!("No simulation snapshots configured, nothing to run");
        return Ok(());
    }

    if let Some(index) = config.simulation.select_event {
        let handle = surface
            .event_list()
            .get_at(index)
            .map(|(handle, _)| handle)
            .with_context(|| format!("simulation.select_event {} is out of range", index))?;
        surface.select_event(handle)?;
    }

    if !quiet {
        println!("\n───────────────────────────────────────────────");
        println!("  Simulating {} tick(s)", surface.interpreter().len());
        println!("───────────────────────────────────────────────");
    }

    surface.set_script_mode(true);
    while !surface.interpreter().is_finished() {
        if let Some(wait) = surface.timer().until_next_tick() {
            std::thread::sleep(wait);
        }
        if !surface.pump() {
            continue;
        }
        if !quiet {
            println!("\nTick {}:", surface.interpreter().polled());
            print!("{}", report::render_program(surface.event_list(), surface.highlights(), &config.display));
        }
    }
    surface.set_script_mode(false);

    if !surface.highlights().is_empty() {
        bail!("Highlights remain after leaving script mode");
    }
    log::info!("Simulation finished, highlights cleared");
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args()))
        .init();
}
