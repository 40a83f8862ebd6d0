use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set.")]
    Missing(&'static str),

    #[error("invalid {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Can't build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Can't download {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Can't download {url}: {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed rate document: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("invalid date {date:?}: {source}")]
    Date {
        date: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid value {text:?} for {currency} on {date}: {source}")]
    Value {
        date: NaiveDate,
        currency: String,
        text: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("non-positive value {text:?} for {currency} on {date}")]
    NonPositiveValue {
        date: NaiveDate,
        currency: String,
        text: String,
    },

    #[error("invalid multiplier {text:?} for {currency} on {date}")]
    Multiplier {
        date: NaiveDate,
        currency: String,
        text: String,
    },

    #[error("duplicate rate for {currency} on {date}")]
    DuplicateRate { date: NaiveDate, currency: String },
}

#[derive(Debug, Error)]
pub enum UpsertError {
    #[error("Can't load staging table {table}: {source}")]
    Load {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("MERGE into {target} failed: {source}")]
    Merge {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Can't drop staging table {table}: {source}")]
    Drop {
        table: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Terminal failure of one import run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Upsert(#[from] UpsertError),
}
