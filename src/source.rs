use std::time::Duration;

use reqwest::Client;

use crate::config::ImportMode;
use crate::error::FetchError;

const DAILY_URL: &str = "https://www.bnr.ro/nbrfxrates.xml";

/// Location of the rate document for `mode`.
///
/// Historical mode without a year falls back to the daily document. The year
/// is not validated.
pub fn resolve(mode: ImportMode, year: Option<&str>) -> String {
    match (mode, year) {
        (ImportMode::History, Some(year)) if !year.is_empty() => {
            format!("https://www.bnr.ro/files/xml/years/nbrfxrates{}.xml", year)
        }
        _ => DAILY_URL.to_string(),
    }
}

#[allow(async_fn_in_trait)]
pub trait RateSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(HttpSource { client })
    }
}

impl RateSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().await.map_err(transport)?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }

        let text = resp.text().await.map_err(transport)?;

        Ok(text)
    }
}
