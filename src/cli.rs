use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Inspect bencoded data and .torrent metainfo files.
#[derive(Parser, Debug)]
#[command(name = "rusbit-meta", version, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (defaults to ./rusbit.toml when present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a bencoded string and print it as JSON.
    Decode {
        /// The bencoded value, e.g. `l4:spami42ee`.
        value: String,
    },
    /// Print the tracker URL, sizes, info hash and piece hashes of a torrent.
    Info {
        torrent: PathBuf,

        /// Print the metainfo as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
