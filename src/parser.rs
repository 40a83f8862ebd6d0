use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::bnr::{DataSet, Rate};
use crate::error::ParseError;
use crate::rate_record::RateRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Flattens a BNR rate document into one record per (`Cube`, `Rate`) pair,
/// in document order.
///
/// Every record carries the same `ingested_at`. A document without any rate
/// yields an empty vector; any bad entry fails the whole document.
pub fn parse(xml: &str, ingested_at: DateTime<Utc>) -> Result<Vec<RateRecord>, ParseError> {
    let data_set: DataSet = quick_xml::de::from_str(xml)?;

    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for cube in &data_set.body.cubes {
        let date = NaiveDate::parse_from_str(cube.date.trim(), DATE_FORMAT).map_err(|source| {
            ParseError::Date {
                date: cube.date.clone(),
                source,
            }
        })?;

        for rate in &cube.rates {
            let record = to_record(date, rate, ingested_at)?;
            let (date, currency) = record.key();
            if !seen.insert((date, currency.to_string())) {
                return Err(ParseError::DuplicateRate {
                    date,
                    currency: record.currency,
                });
            }
            records.push(record);
        }
    }

    Ok(records)
}

fn to_record(
    date: NaiveDate,
    rate: &Rate,
    ingested_at: DateTime<Utc>,
) -> Result<RateRecord, ParseError> {
    let currency = rate.currency.trim().to_string();
    let text = rate.value.trim();

    let value = Decimal::from_str(text).map_err(|source| ParseError::Value {
        date,
        currency: currency.clone(),
        text: text.to_string(),
        source,
    })?;
    if value <= Decimal::ZERO {
        return Err(ParseError::NonPositiveValue {
            date,
            currency,
            text: text.to_string(),
        });
    }

    let multiplier = match rate.multiplier.as_deref().map(str::trim) {
        None => 1,
        Some(m) => match m.parse::<i32>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ParseError::Multiplier {
                    date,
                    currency,
                    text: m.to_string(),
                });
            }
        },
    };

    Ok(RateRecord {
        date,
        currency,
        value,
        multiplier,
        ingested_at,
    })
}
