use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::config::TableId;
use crate::error::UpsertError;
use crate::rate_record::RateRecord;

use super::Warehouse;

/// In-process stand-in for the warehouse, with failure injection.
#[derive(Default)]
pub struct MemoryWarehouse {
    tables: Mutex<BTreeMap<String, Vec<RateRecord>>>,
    dropped: Mutex<Vec<String>>,
    pub fail_load: bool,
    pub fail_merge: bool,
    pub fail_drop: bool,
}

impl MemoryWarehouse {
    pub fn with_table(table: &TableId, rows: Vec<RateRecord>) -> Self {
        let warehouse = MemoryWarehouse::default();
        warehouse.tables.lock().unwrap().insert(table.to_string(), rows);
        warehouse
    }

    pub fn rows(&self, table: &TableId) -> Vec<RateRecord> {
        self.tables
            .lock()
            .unwrap()
            .get(&table.to_string())
            .cloned()
            .unwrap_or_default()
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.lock().unwrap().keys().cloned().collect()
    }

    pub fn dropped(&self) -> Vec<String> {
        self.dropped.lock().unwrap().clone()
    }
}

fn injected(what: &str) -> sqlx::Error {
    sqlx::Error::Protocol(format!("injected {} failure", what))
}

impl Warehouse for MemoryWarehouse {
    async fn load_table(&self, table: &TableId, records: &[RateRecord]) -> Result<u64, UpsertError> {
        if self.fail_load {
            return Err(UpsertError::Load {
                table: table.to_string(),
                source: injected("load"),
            });
        }

        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), records.to_vec());
        Ok(records.len() as u64)
    }

    async fn merge(&self, target: &TableId, staging: &TableId) -> Result<u64, UpsertError> {
        let merge_err = |source: sqlx::Error| UpsertError::Merge {
            target: target.to_string(),
            source,
        };
        if self.fail_merge {
            return Err(merge_err(injected("merge")));
        }

        let mut tables = self.tables.lock().unwrap();
        let source = tables
            .get(&staging.to_string())
            .cloned()
            .ok_or_else(|| merge_err(sqlx::Error::RowNotFound))?;
        let rows = tables
            .get_mut(&target.to_string())
            .ok_or_else(|| merge_err(sqlx::Error::RowNotFound))?;

        for incoming in &source {
            match rows.iter_mut().find(|row| row.key() == incoming.key()) {
                Some(row) => {
                    row.value = incoming.value;
                    row.ingested_at = incoming.ingested_at;
                }
                None => rows.push(incoming.clone()),
            }
        }

        Ok(source.len() as u64)
    }

    async fn drop_table(&self, table: &TableId) -> Result<(), UpsertError> {
        if self.fail_drop {
            return Err(UpsertError::Drop {
                table: table.to_string(),
                source: injected("drop"),
            });
        }

        self.tables.lock().unwrap().remove(&table.to_string());
        self.dropped.lock().unwrap().push(table.to_string());
        Ok(())
    }
}
