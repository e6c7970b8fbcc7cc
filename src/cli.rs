use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::api::{
    ApiError, AppState, DEFAULT_CURRENCY_SYMBOL, SimulatePayload, run_comparison, run_http_server,
    run_simulation,
};
use crate::core::{Assumptions, EngineConfig};

#[derive(Debug, Parser)]
#[command(name = "fintwin", about = "Month-by-month personal finance projections")]
pub struct Cli {
    #[command(flatten)]
    pub assumptions: AssumptionArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Default yearly assumptions, in percent. Requests may still override them.
#[derive(Debug, Clone, Args)]
pub struct AssumptionArgs {
    #[arg(long, global = true, default_value_t = 8.0)]
    pub income_growth_rate: f64,
    #[arg(long, global = true, default_value_t = 6.0)]
    pub inflation_rate: f64,
    #[arg(long, global = true, default_value_t = 7.0)]
    pub savings_return_rate: f64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the /twin HTTP API.
    Serve {
        #[arg(long, env = "FINTWIN_HOST", default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, env = "FINTWIN_PORT", default_value_t = 8080)]
        port: u16,
        #[arg(long, env = "FINTWIN_CURRENCY_SYMBOL", default_value = DEFAULT_CURRENCY_SYMBOL)]
        currency_symbol: String,
    },
    /// Run one request file through the simulator and print the JSON response.
    Simulate {
        /// Request JSON file, or `-` for stdin.
        #[arg(long)]
        input: PathBuf,
        /// Compare baseline, increased and aggressive savings instead.
        #[arg(long)]
        compare: bool,
        #[arg(long)]
        pretty: bool,
        #[arg(long, env = "FINTWIN_CURRENCY_SYMBOL", default_value = DEFAULT_CURRENCY_SYMBOL)]
        currency_symbol: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("server error: {0}")]
    Server(#[source] io::Error),
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        let mut text = err.to_string();
        for detail in err.details() {
            text.push_str(&format!("\n  {detail}"));
        }
        CliError::Rejected(text)
    }
}

pub fn build_engine_config(args: &AssumptionArgs) -> Result<EngineConfig, CliError> {
    if !args.income_growth_rate.is_finite() || !(0.0..=50.0).contains(&args.income_growth_rate) {
        return Err(CliError::InvalidArgument(
            "--income-growth-rate must be between 0 and 50".to_string(),
        ));
    }

    if !args.inflation_rate.is_finite() || !(0.0..=30.0).contains(&args.inflation_rate) {
        return Err(CliError::InvalidArgument(
            "--inflation-rate must be between 0 and 30".to_string(),
        ));
    }

    if !args.savings_return_rate.is_finite() || !(0.0..=30.0).contains(&args.savings_return_rate)
    {
        return Err(CliError::InvalidArgument(
            "--savings-return-rate must be between 0 and 30".to_string(),
        ));
    }

    Ok(EngineConfig {
        default_assumptions: Assumptions {
            income_growth_rate: args.income_growth_rate / 100.0,
            inflation_rate: args.inflation_rate / 100.0,
            savings_return_rate: args.savings_return_rate / 100.0,
        },
        ..EngineConfig::default()
    })
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = build_engine_config(&cli.assumptions)?;

    match cli.command {
        Command::Serve {
            host,
            port,
            currency_symbol,
        } => {
            let state = AppState::new(config, &currency_symbol);
            run_http_server(SocketAddr::new(host, port), state)
                .await
                .map_err(CliError::Server)
        }
        Command::Simulate {
            input,
            compare,
            pretty,
            currency_symbol,
        } => {
            let raw = read_input(&input)?;
            let state = AppState::new(config, &currency_symbol);
            let today = Local::now().date_naive();
            println!("{}", simulate_json(&state, &raw, compare, pretty, today)?);
            Ok(())
        }
    }
}

/// Runs a raw JSON request through the same pipeline as the HTTP handlers.
pub fn simulate_json(
    state: &AppState,
    raw: &str,
    compare: bool,
    pretty: bool,
    today: NaiveDate,
) -> Result<String, CliError> {
    let payload = serde_json::from_str::<SimulatePayload>(raw)?;
    if compare {
        render(&run_comparison(state, payload, today)?, pretty)
    } else {
        render(&run_simulation(state, payload, today)?, pretty)
    }
}

fn render<T: Serialize>(body: &T, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(body)?
    } else {
        serde_json::to_string(body)?
    };
    Ok(text)
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let result = if path == Path::new("-") {
        io::read_to_string(io::stdin())
    } else {
        std::fs::read_to_string(path)
    };
    result.map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}
