//! CLI entry point for gridfolio.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use gridfolio_server::commands;
use gridfolio_server::config::Config;
use gridfolio_server::error::Error;

#[derive(Parser)]
#[command(name = "gridfolio")]
#[command(about = "Portfolio statistics and grid-search optimization")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Override the configured listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print statistics for a weighted portfolio
    Stats {
        /// Comma-separated tickers, e.g. AAPL,MSFT
        #[arg(long, value_delimiter = ',', required = true)]
        tickers: Vec<String>,

        /// Comma-separated weights, one per ticker
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        weights: Vec<f64>,
    },

    /// Print the optimal grid allocation
    Optimize {
        /// min_variance or max_sharpe
        mode: String,

        /// Comma-separated tickers
        #[arg(long, value_delimiter = ',', required = true)]
        tickers: Vec<String>,
    },

    /// List the instrument universe
    Instruments,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let mut config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Err(e) = config.validate() {
                eprintln!("Error: {e}");
                process::exit(1);
            }
            commands::serve(&config)
        }
        Command::Stats { tickers, weights } => {
            commands::stats_report(&tickers, &weights).map(|out| println!("{out}"))
        }
        Command::Optimize { mode, tickers } => {
            commands::optimize_report(&config.optimizer(), &tickers, &mode)
                .map(|out| println!("{out}"))
        }
        Command::Instruments => {
            print!("{}", commands::instruments_table());
            Ok(())
        }
    };

    if let Err(e) = result {
        match &e {
            Error::Portfolio(err) => {
                eprintln!("Error: {err}");
                process::exit(2);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
