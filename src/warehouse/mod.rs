//! Idempotent upsert of rate records through a per-run staging table.

use log::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::TableId;
use crate::error::UpsertError;
use crate::rate_record::RateRecord;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Table store able to run the staging-table-and-MERGE upsert.
#[allow(async_fn_in_trait)]
pub trait Warehouse {
    /// Writes `records` into `table`, creating it if needed and replacing
    /// whatever it held before.
    async fn load_table(&self, table: &TableId, records: &[RateRecord]) -> Result<u64, UpsertError>;

    /// Merges `staging` into `target` on (`date`, `currency`): new keys are
    /// inserted, existing keys get `value` and `ingested_at` overwritten,
    /// keys missing from `staging` are left alone.
    async fn merge(&self, target: &TableId, staging: &TableId) -> Result<u64, UpsertError>;

    /// Drops `table`; an absent table is not an error.
    async fn drop_table(&self, table: &TableId) -> Result<(), UpsertError>;
}

/// Upserts `records` into `target` and returns the number of merged rows.
///
/// The staging table is dropped whether or not the merge succeeded. A failed
/// drop is only logged.
pub async fn upsert<W, C>(
    warehouse: &W,
    records: &[RateRecord],
    target: &TableId,
    clock: &C,
) -> Result<u64, UpsertError>
where
    W: Warehouse,
    C: Clock,
{
    let staging = staging_table(target, clock);

    let result = load_and_merge(warehouse, records, target, &staging).await;

    if let Err(e) = warehouse.drop_table(&staging).await {
        warn!("Cleanup of temporary table {} failed: {}", staging, e);
    }

    result
}

async fn load_and_merge<W: Warehouse>(
    warehouse: &W,
    records: &[RateRecord],
    target: &TableId,
    staging: &TableId,
) -> Result<u64, UpsertError> {
    info!("Loading data into temporary table {}", staging);
    warehouse.load_table(staging, records).await?;

    info!("Executing MERGE into {}...", target);
    warehouse.merge(target, staging).await
}

fn staging_table<C: Clock>(target: &TableId, clock: &C) -> TableId {
    let nonce = Uuid::new_v4().simple().to_string();
    let suffix = format!("_temp_{}_{}", clock.now().timestamp_micros(), &nonce[..8]);
    target.with_suffix(&suffix)
}
