use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::config::TableId;
use crate::error::UpsertError;
use crate::rate_record::RateRecord;

use super::Warehouse;

/// Rows per INSERT; five binds each keeps us under the 65535 parameter cap.
const INSERT_BATCH: usize = 1000;

/// PostgreSQL 15+ warehouse (needs `MERGE`).
pub struct PgWarehouse {
    pool: PgPool,
}

impl PgWarehouse {
    pub fn new(pool: PgPool) -> Self {
        PgWarehouse { pool }
    }
}

fn create_sql(table: &TableId) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            date DATE NOT NULL,
            currency TEXT NOT NULL,
            value NUMERIC NOT NULL,
            multiplier INTEGER NOT NULL,
            ingested_at TIMESTAMPTZ NOT NULL
        )",
        table.quoted()
    )
}

fn merge_sql(target: &TableId, staging: &TableId) -> String {
    format!(
        "MERGE INTO {} AS t
        USING {} AS s
        ON t.date = s.date AND t.currency = s.currency
        WHEN NOT MATCHED THEN
          INSERT (date, currency, value, multiplier, ingested_at)
          VALUES (s.date, s.currency, s.value, s.multiplier, s.ingested_at)
        WHEN MATCHED THEN
          UPDATE SET value = s.value, ingested_at = s.ingested_at",
        target.quoted(),
        staging.quoted()
    )
}

impl Warehouse for PgWarehouse {
    async fn load_table(&self, table: &TableId, records: &[RateRecord]) -> Result<u64, UpsertError> {
        let load_err = |source: sqlx::Error| UpsertError::Load {
            table: table.to_string(),
            source,
        };

        let mut tx = self.pool.begin().await.map_err(load_err)?;

        sqlx::query(&create_sql(table))
            .execute(&mut *tx)
            .await
            .map_err(load_err)?;
        sqlx::query(&format!("TRUNCATE TABLE {}", table.quoted()))
            .execute(&mut *tx)
            .await
            .map_err(load_err)?;

        for chunk in records.chunks(INSERT_BATCH) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {} (date, currency, value, multiplier, ingested_at) ",
                table.quoted()
            ));
            builder.push_values(chunk, |mut b, r| {
                b.push_bind(r.date)
                    .push_bind(r.currency.as_str())
                    .push_bind(r.value)
                    .push_bind(r.multiplier)
                    .push_bind(r.ingested_at);
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(load_err)?;
        }

        tx.commit().await.map_err(load_err)?;

        Ok(records.len() as u64)
    }

    async fn merge(&self, target: &TableId, staging: &TableId) -> Result<u64, UpsertError> {
        let result = sqlx::query(&merge_sql(target, staging))
            .execute(&self.pool)
            .await
            .map_err(|source| UpsertError::Merge {
                target: target.to_string(),
                source,
            })?;

        Ok(result.rows_affected())
    }

    async fn drop_table(&self, table: &TableId) -> Result<(), UpsertError> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table.quoted()))
            .execute(&self.pool)
            .await
            .map_err(|source| UpsertError::Drop {
                table: table.to_string(),
                source,
            })?;

        Ok(())
    }
}
