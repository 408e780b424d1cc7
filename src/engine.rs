// src/engine.rs
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::bencode::{bvalue_to_json, Decoder};
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::torrent::Torrent;

/// Runs one parsed command, writing its output to `out`.
pub fn use_command(cli: &Cli, config: &Config, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Decode { value } => decode(value, config, out),
        Command::Info { torrent, json } => print_info(torrent, *json, config, out),
    }
}

fn decode(value: &str, config: &Config, out: &mut dyn Write) -> Result<()> {
    let bvalue = Decoder::new(value.as_bytes())
        .with_max_depth(config.max_depth)
        .decode_complete()
        .context("decoding bencoded value")?;
    debug!("decoded {} from {} bytes", bvalue.type_name(), value.len());

    writeln!(out, "{}", serde_json::to_string(&bvalue_to_json(&bvalue))?)?;
    Ok(())
}

fn print_info(path: &Path, json: bool, config: &Config, out: &mut dyn Write) -> Result<()> {
    let buf = std::fs::read(path)
        .with_context(|| format!("reading torrent file {}", path.display()))?;
    info!("read {} bytes from {}", buf.len(), path.display());

    let torrent = Torrent::from_bytes_with_max_depth(&buf, config.max_depth)
        .with_context(|| format!("parsing torrent file {}", path.display()))?;
    debug!("{} pieces, info hash {}", torrent.info.pieces.len(), torrent.info_hash);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&torrent)?)?;
        return Ok(());
    }

    writeln!(out, "Tracker URL: {}", torrent.announce)?;
    if let Some(name) = &torrent.info.name {
        writeln!(out, "File Name: {}", name)?;
    }
    writeln!(out, "Length: {}", torrent.info.total_length())?;
    writeln!(out, "Info Hash: {}", torrent.info_hash)?;
    writeln!(out, "Piece Length: {}", torrent.info.piece_length)?;
    writeln!(out, "Number of Pieces: {}", torrent.info.pieces.len())?;

    if config.show_piece_hashes {
        writeln!(out, "Piece Hashes:")?;
        for piece_hash in torrent.info.piece_hashes_hex() {
            writeln!(out, "{}", piece_hash)?;
        }
    }
    Ok(())
}
