use log::{info, warn};

use crate::clock::Clock;
use crate::config::Config;
use crate::error::PipelineError;
use crate::parser;
use crate::source::{self, RateSource};
use crate::warehouse::{self, Warehouse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub url: String,
    pub rows: usize,
}

/// One import run: fetch, parse, upsert.
///
/// A document without rates finishes with zero rows and never touches the
/// warehouse. `ingested_at` is taken from `clock` once and shared by every
/// record of the run.
pub async fn run<S, W, C>(
    config: &Config,
    source: &S,
    warehouse: &W,
    clock: &C,
) -> Result<Report, PipelineError>
where
    S: RateSource,
    W: Warehouse,
    C: Clock,
{
    let url = source::resolve(config.mode, config.year.as_deref());

    info!("Downloading data from: {}", url);
    let xml = source.fetch(&url).await?;

    let records = parser::parse(&xml, clock.now())?;
    if records.is_empty() {
        warn!("No data found to process.");
        return Ok(Report { url, rows: 0 });
    }

    warehouse::upsert(warehouse, &records, &config.table_id, clock).await?;

    Ok(Report {
        url,
        rows: records.len(),
    })
}
