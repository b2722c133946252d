//! UFO Arena headless runner
//!
//! Plays one autopilot session to completion and prints the final snapshot
//! as JSON. Rendering and audio front ends drive the same `GameState` API.
//!
//! Usage: ufo-arena [--config FILE] [--seed N] [--level N] [--max-ticks N]

use std::path::PathBuf;

use clap::Parser;
use ufo_arena::autopilot::Autopilot;
use ufo_arena::sim::{GameState, LogSink};
use ufo_arena::{Result, Settings};

#[derive(Parser, Debug)]
#[command(name = "ufo-arena")]
#[command(about = "Play one autopilot session headless and print the final snapshot")]
struct Args {
    /// Settings JSON; missing fields fall back to the default game
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
    /// Starting level (1-based)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    level: u32,
    /// Give up after this many ticks
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,
}

fn run(args: Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut state = GameState::try_new(settings, args.level, args.seed)?;
    let mut pilot = Autopilot::new();
    let mut sink = LogSink;

    while !state.is_finished() && state.time_ticks < args.max_ticks {
        pilot.drive(&mut state);
        state.tick();
        state.forward_events(&mut sink);
    }

    if !state.phase().is_terminal() {
        log::warn!("Tick budget of {} exhausted before the session ended", args.max_ticks);
    }

    let snapshot = state.snapshot();
    state.teardown();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("UFO Arena (headless) starting...");

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["ufo-arena"]).expect("defaults");
        assert_eq!(args.level, 1);
        assert_eq!(args.seed, 0x5EED);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "ufo-arena",
            "--seed",
            "7",
            "--level",
            "3",
            "--max-ticks",
            "100",
            "--config",
            "arena.json",
        ])
        .expect("flags");
        assert_eq!(args.seed, 7);
        assert_eq!(args.level, 3);
        assert_eq!(args.max_ticks, 100);
        assert_eq!(args.config, Some(PathBuf::from("arena.json")));
    }

    #[test]
    fn test_args_reject_garbage() {
        assert!(Args::try_parse_from(["ufo-arena", "--seed", "x"]).is_err());
        assert!(Args::try_parse_from(["ufo-arena", "--level"]).is_err());
        assert!(Args::try_parse_from(["ufo-arena", "--level", "0"]).is_err());
        assert!(Args::try_parse_from(["ufo-arena", "--bogus"]).is_err());
    }
}
