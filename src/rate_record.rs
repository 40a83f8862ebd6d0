use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// One published rate, keyed by (`date`, `currency`).
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub date: NaiveDate,
    pub currency: String,
    pub value: Decimal,
    /// Number of foreign currency units the value applies to.
    pub multiplier: i32,
    pub ingested_at: DateTime<Utc>,
}

impl RateRecord {
    pub fn key(&self) -> (NaiveDate, &str) {
        (self.date, &self.currency)
    }
}
