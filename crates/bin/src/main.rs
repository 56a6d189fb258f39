//! Breadth CLI binary.
//!
//! Computes, per industry, the daily share of stocks whose 50-day SMA is
//! above their 200-day SMA over the past five years, charts each industry
//! and emails the charts.

mod logging;

use breadth::{LOOKBACK_YEARS, TickerUniverse, compute_industry_breadth};
use breadth_data::DateRange;
use breadth_data::yahoo::YahooQuoteProvider;
use breadth_output::{
    ChartConfig, EmailContent, MailConfig, SmtpMailer, compose_message, render_attachments,
};
use breadth_signals::CrossoverConfig;
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use logging::{LoggingConfig, init_logging};
use std::path::PathBuf;
use std::process;
use std::time::Duration as StdDuration;
use tracing::info;

#[derive(Parser)]
#[command(name = "breadth")]
#[command(
    about = "Email per-industry charts of the share of stocks with SMA 50 above SMA 200",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Ticker list, one SYMBOL,INDUSTRY pair per line
    #[arg(long, default_value = "tickers.txt")]
    tickers: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging(&LoggingConfig::from_env())?;

    let cli = Cli::parse();

    // Everything that can be rejected up front is checked before any request
    let mail_config = MailConfig::from_env()?;
    let universe = TickerUniverse::from_path(&cli.tickers)?;
    info!(
        path = %cli.tickers.display(),
        tickers = universe.len(),
        industries = universe.industries().len(),
        "Loaded ticker list"
    );

    let crossover = CrossoverConfig::default();
    let period = DateRange::trailing_years(Utc::now().date_naive(), LOOKBACK_YEARS);
    info!(start = %period.start(), end = %period.end(), "Analysis period");

    let provider = YahooQuoteProvider::try_new()?;

    let pb = ProgressBar::new(universe.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message("Fetching price history...");

    let breadth = match compute_industry_breadth(
        &provider,
        &universe,
        &period,
        &crossover,
        Some(&pb),
    )
    .await
    {
        Ok(breadth) => {
            pb.finish_with_message(format!("Processed {} industries", breadth.len()));
            breadth
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(format!("Failed to compute industry breadth: {}", e).into());
        }
    };

    let chart_config = ChartConfig::new(LOOKBACK_YEARS, &crossover);
    let attachments = render_attachments(&breadth, &period, &chart_config)?;

    let message = compose_message(&mail_config, &EmailContent::default(), &attachments)?;
    SmtpMailer::new(&mail_config)?.send(message).await?;
    info!(attachments = attachments.len(), "Email sent with attachments");

    Ok(())
}
