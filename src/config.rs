use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::error::ConfigError;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    #[default]
    Daily,
    History,
}

impl ImportMode {
    /// `history` selects the yearly documents; any other value means daily.
    pub fn from_setting(value: &str) -> ImportMode {
        match value.trim() {
            "history" => ImportMode::History,
            "daily" => ImportMode::Daily,
            other => {
                warn!("Unrecognized IMPORT_MODE {:?}, importing the daily document", other);
                ImportMode::Daily
            }
        }
    }
}

/// Destination table, `table` or `schema.table`, folded to lowercase like an
/// unquoted Postgres identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableId {
    pub schema: Option<String>,
    pub name: String,
}

impl TableId {
    /// Identifier with every part double-quoted, ready to be spliced into SQL.
    pub fn quoted(&self) -> String {
        match &self.schema {
            Some(schema) => format!("\"{}\".\"{}\"", schema, self.name),
            None => format!("\"{}\"", self.name),
        }
    }

    /// Sibling table in the same schema with `suffix` appended to the name.
    ///
    /// The name is shortened so the result fits Postgres' 63-byte identifier
    /// limit and the suffix is never cut off.
    pub fn with_suffix(&self, suffix: &str) -> TableId {
        const MAX_IDENTIFIER: usize = 63;

        let keep = MAX_IDENTIFIER.saturating_sub(suffix.len()).min(self.name.len());

        TableId {
            schema: self.schema.clone(),
            name: format!("{}{}", &self.name[..keep], suffix),
        }
    }
}

impl FromStr for TableId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<String> = s.trim().split('.').map(str::to_ascii_lowercase).collect();
        let valid = |p: &String| {
            !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        };

        match parts.as_slice() {
            [name] if valid(name) => Ok(TableId {
                schema: None,
                name: name.clone(),
            }),
            [schema, name] if valid(schema) && valid(name) => Ok(TableId {
                schema: Some(schema.clone()),
                name: name.clone(),
            }),
            _ => Err(ConfigError::Invalid {
                name: "TABLE_ID",
                value: s.to_string(),
                reason: "expected `table` or `schema.table` of letters, digits and `_`",
            }),
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub table_id: TableId,
    pub mode: ImportMode,
    pub year: Option<String>,
    pub database_url: String,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let table_id = get("TABLE_ID")
            .ok_or(ConfigError::Missing("TABLE_ID"))?
            .parse::<TableId>()?;
        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let mode = match get("IMPORT_MODE") {
            Some(mode) => ImportMode::from_setting(&mode),
            None => ImportMode::default(),
        };
        let year = get("IMPORT_YEAR");
        let fetch_timeout = match get("FETCH_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    name: "FETCH_TIMEOUT_SECS",
                    value: secs,
                    reason: "expected a positive number of seconds",
                })?,
            None => DEFAULT_FETCH_TIMEOUT,
        };

        Ok(Config {
            table_id,
            mode,
            year,
            database_url,
            fetch_timeout,
        })
    }
}
