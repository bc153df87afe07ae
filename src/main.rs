use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use wealthwise::api::{ServerConfig, current_year, run_http_server};
use wealthwise::core::config::DEFAULT_PORT;
use wealthwise::core::risk::{MarketCapUniverse, PortfolioMix, StockExposure, assess};
use wealthwise::core::{FinancialProfile, generate_scenarios, project};

#[derive(Parser, Debug)]
#[command(
    name = "wealthwise",
    about = "Retirement corpus projection and pension payout scenario scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(
            long,
            help = "CSV of listed symbols ranked by market cap (first column, header row)"
        )]
        market_cap_universe: Option<PathBuf>,
    },
    /// Print the year-by-year corpus projection for a profile as JSON.
    Project {
        #[arg(long, help = "Profile JSON file, or - for stdin")]
        profile: PathBuf,
        #[arg(long, help = "Calendar year of the current age; defaults to this year")]
        base_year: Option<i32>,
    },
    /// Print the scored payout scenarios for a profile as JSON.
    Scenarios {
        #[arg(long, help = "Profile JSON file, or - for stdin")]
        profile: PathBuf,
    },
    /// Score portfolio risk tolerance from asset totals.
    Risk {
        #[arg(long, default_value_t = 0.0)]
        fd_value: f64,
        #[arg(long, default_value_t = 0.0)]
        stock_value: f64,
        #[arg(long, default_value_t = 0.0)]
        mf_value: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            market_cap_universe,
        } => {
            let universe = match market_cap_universe {
                Some(path) => load_universe(&path)?,
                None => MarketCapUniverse::default(),
            };
            run_http_server(ServerConfig { port, universe })
                .await
                .context("HTTP server failed")?;
        }
        Command::Project { profile, base_year } => {
            let profile = read_profile(&profile)?;
            let points = project(&profile, base_year.unwrap_or_else(current_year))?;
            print_json(&points)?;
        }
        Command::Scenarios { profile } => {
            let profile = read_profile(&profile)?;
            let scenarios = generate_scenarios(&profile)?;
            print_json(&scenarios)?;
        }
        Command::Risk {
            fd_value,
            stock_value,
            mf_value,
        } => {
            let mix = PortfolioMix {
                fixed_deposits: fd_value,
                stocks: StockExposure::Total(stock_value),
                mutual_funds: mf_value,
            };
            let assessment = assess(&mix, &MarketCapUniverse::default())?;
            print_json(&assessment)?;
        }
    }
    Ok(())
}

fn read_profile(path: &Path) -> Result<FinancialProfile> {
    let mut raw = String::new();
    if path.as_os_str() == "-" {
        io::stdin().read_to_string(&mut raw)?;
    } else {
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut raw))
            .with_context(|| format!("failed to read profile {}", path.display()))?;
    }
    serde_json::from_str(&raw).context("profile is not valid JSON")
}

fn load_universe(path: &Path) -> Result<MarketCapUniverse> {
    let file = File::open(path)
        .with_context(|| format!("failed to open market-cap universe {}", path.display()))?;
    let universe = MarketCapUniverse::from_csv(file)
        .with_context(|| format!("failed to parse market-cap universe {}", path.display()))?;
    info!("loaded {} ranked symbols", universe.len());
    Ok(universe)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
