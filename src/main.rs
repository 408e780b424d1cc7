use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use log::debug;

use rusbit_meta::cli::Cli;
use rusbit_meta::config::Config;
use rusbit_meta::engine::use_command;

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level().as_str()),
    )
    .init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => {
            debug!("using {:?}", config);
            config
        }
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let res = use_command(&cli, &config, &mut out).and_then(|()| Ok(out.flush()?));
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
