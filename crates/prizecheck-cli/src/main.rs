//! prizecheck CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "prizecheck", version, about = "Prize-recall trainer for trading-card decks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example deck
    Init,

    /// Validate deck TOML files
    Validate {
        /// Path to deck file or directory
        #[arg(long)]
        deck: PathBuf,

        /// Show each card's chance of being prized
        #[arg(long)]
        details: bool,
    },

    /// Shuffle a deck and show the hand and draw pile
    Deal {
        /// Path to deck file
        #[arg(long)]
        deck: PathBuf,

        /// Seed for a repeatable deal (defaults to config, then random)
        #[arg(long)]
        seed: Option<u64>,

        /// Also show the prize cards
        #[arg(long)]
        reveal: bool,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a round of prize guesses and update the rank
    Round {
        /// Path to deck file
        #[arg(long)]
        deck: PathBuf,

        /// Seed the round was dealt with (defaults to config)
        #[arg(long)]
        seed: Option<u64>,

        /// Guessed card instances (comma-separated, e.g. "sv2-27#0,sve-5#40")
        #[arg(long, default_value = "")]
        guess: String,

        /// Seconds used before submitting
        #[arg(long, conflicts_with = "remaining")]
        used_time: Option<f64>,

        /// Seconds left on the countdown when submitting
        #[arg(long)]
        remaining: Option<f64>,

        /// Seconds available (defaults to config)
        #[arg(long)]
        total_time: Option<f64>,

        /// Profile file path (defaults to config)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Score without saving the profile
        #[arg(long)]
        dry_run: bool,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the current rank and recent rounds
    Rank {
        /// Profile file path (defaults to config)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Reset the rank and personal best
    Reset {
        /// Profile file path (defaults to config)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Start over at this tier instead of Poké Ball (e.g. greatball, t2)
        #[arg(long)]
        tier: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("prizecheck=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { deck, details } => commands::validate::execute(deck, details),
        Commands::Deal {
            deck,
            seed,
            reveal,
            format,
            config,
        } => commands::deal::execute(deck, seed, reveal, format, config),
        Commands::Round {
            deck,
            seed,
            guess,
            used_time,
            remaining,
            total_time,
            profile,
            dry_run,
            format,
            config,
        } => commands::round::execute(commands::round::RoundArgs {
            deck,
            seed,
            guess,
            used_time,
            remaining,
            total_time,
            profile,
            dry_run,
            format,
            config,
        }),
        Commands::Rank {
            profile,
            format,
            config,
        } => commands::rank::execute(profile, format, config),
        Commands::Reset {
            profile,
            tier,
            config,
        } => commands::reset::execute(profile, tier, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
