use std::process::ExitCode;

use anyhow::{Context, Result};
use log::{error, info};
use sqlx::postgres::PgPoolOptions;

use clock::SystemClock;
use config::Config;
use pipeline::Report;
use source::HttpSource;
use warehouse::postgres::PgWarehouse;

mod bnr;
mod clock;
mod config;
mod error;
mod parser;
mod pipeline;
mod rate_record;
mod source;
mod warehouse;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match import().await {
        Ok(report) => {
            info!(
                "Import from {} successfully completed: {} rows processed.",
                report.url, report.rows
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Critical error during execution: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn import() -> Result<Report> {
    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_lazy(&config.database_url)
        .context("Invalid DATABASE_URL")?;
    let source = HttpSource::new(config.fetch_timeout)?;
    let warehouse = PgWarehouse::new(pool);

    let report = pipeline::run(&config, &source, &warehouse, &SystemClock).await?;

    Ok(report)
}
