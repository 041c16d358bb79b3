use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use twenty48::engine::Move;
use twenty48::sim::{self, SimReport};
use twenty48::tui;

#[derive(Debug, Parser)]
#[command(name = "twenty48", about = "2048 in the terminal")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Cmd>,

    /// Tracing filter, e.g. "info", "twenty48=debug". Logs go to stderr.
    #[arg(long, global = true, default_value = "warn")]
    log: String,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Play interactively (the default)
    Play {
        /// Seed the tile generator for a reproducible game
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play random legal moves headlessly and summarize the results
    Simulate {
        /// Number of games to play
        #[arg(long, default_value_t = 100)]
        games: u64,
        /// Base seed; game i uses seed + i
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Moves every game plays before random play, e.g. "left,left,up"
        #[arg(long, value_delimiter = ',')]
        opening: Vec<Move>,
        /// Per-game: stop after this many effective moves
        #[arg(long)]
        max_moves: Option<u32>,
        /// Print one JSON line per game before the report
        #[arg(long)]
        per_game: bool,
        /// Suppress the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&args.log).context("invalid --log filter")?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.cmd.unwrap_or(Cmd::Play { seed: None }) {
        Cmd::Play { seed } => play(seed),
        Cmd::Simulate { games, seed, opening, max_moves, per_game, quiet } => {
            simulate(games, seed, &opening, max_moves, per_game, quiet)
        }
    }
}

fn play(seed: Option<u64>) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let final_state = tui::run(&mut rng)?;
    println!("Score: {} | moves: {} | highest tile: {}", final_state.score, final_state.moves, final_state.board.highest_tile());
    Ok(())
}

fn simulate(games: u64, seed: u64, opening: &[Move], max_moves: Option<u32>, per_game: bool, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} games")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let summaries = sim::simulate_many(games, seed, opening, max_moves, |_| pb.inc(1));
    pb.finish_and_clear();
    info!(games, elapsed_s = start.elapsed().as_secs_f64(), "simulation finished");

    if per_game {
        for s in &summaries {
            println!("{}", serde_json::to_string(s)?);
        }
    }
    let report = SimReport::from_summaries(&summaries);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
