use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;

use crate::models::{BatchResult, Event};
use crate::normalize::{normalize, RawEvent};

const DISCOVERY_BASE_URL: &str = "https://app.ticketmaster.com/discovery/v2";
const DEFAULT_PAGE_SIZE: u16 = 20;
const REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
    pub size: Option<u16>,
}

impl SearchQuery {
    pub fn for_artist(name: impl Into<String>) -> Self {
        Self {
            keyword: Some(name.into()),
            ..Self::default()
        }
    }

    fn with_keyword(&self, keyword: &str) -> Self {
        let mut query = self.clone();
        query.keyword = Some(keyword.to_string());
        query
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("missing API key")]
    MissingApiKey,
    #[error("http error: {0}")]
    Http(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub struct TicketmasterClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for TicketmasterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketmasterClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TicketmasterClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DiscoveryError> {
        Self::with_base_url(api_key, DISCOVERY_BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, DiscoveryError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DiscoveryError::MissingApiKey);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("tour-track/0.1 (+https://github.com/mike/tour-track)")
            .build()
            .map_err(|err| DiscoveryError::Http(err.to_string()))?;
        Ok(Self {
            http,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// Runs one search. Transport and parse failures are logged and degrade
    /// to an empty list so a single bad lookup cannot abort a batch.
    pub fn search_events(&self, query: &SearchQuery) -> Vec<Event> {
        match self.fetch_events(query) {
            Ok(events) => events,
            Err(err) => {
                log::warn!("event search failed: {err}");
                Vec::new()
            }
        }
    }

    /// Searches once per artist name, in the given order, substituting the
    /// name into the keyword field. Every name gets an entry, empty or not.
    pub fn track_multiple_artists(
        &self,
        artists: &[String],
        options: &SearchQuery,
    ) -> BatchResult {
        let mut results = BatchResult::new();
        for artist in artists {
            log::info!("searching for {artist}");
            let events = self.search_events(&options.with_keyword(artist));
            results.insert(artist.clone(), events);
        }
        results
    }

    fn fetch_events(&self, query: &SearchQuery) -> Result<Vec<Event>, DiscoveryError> {
        let url = self.events_url(query)?;
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|err| DiscoveryError::Http(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|err| DiscoveryError::Http(err.to_string()))?;

        if !status.is_success() {
            return Err(DiscoveryError::Http(format!(
                "status {}: {}",
                status, text
            )));
        }

        parse_events_response(&text)
    }

    // Absent optional fields are omitted entirely so the provider applies
    // its own defaults; apikey, size, and the date sort are always sent.
    fn events_url(&self, query: &SearchQuery) -> Result<Url, DiscoveryError> {
        let mut url = Url::parse(&format!("{}/events.json", self.base_url))
            .map_err(|err| DiscoveryError::Http(err.to_string()))?;

        let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("size", &size.to_string())
            .append_pair("sort", "date,asc");

        let optional = [
            ("keyword", &query.keyword),
            ("city", &query.city),
            ("countryCode", &query.country_code),
            ("startDateTime", &query.start_date_time),
            ("endDateTime", &query.end_date_time),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                url.query_pairs_mut().append_pair(key, value);
            }
        }

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct EventsEnvelope {
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedEvents>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedEvents {
    #[serde(default)]
    events: Vec<RawEvent>,
}

// A body without the `_embedded.events` container is a valid "no matches"
// response, not an error.
fn parse_events_response(text: &str) -> Result<Vec<Event>, DiscoveryError> {
    let envelope: EventsEnvelope =
        serde_json::from_str(text).map_err(|err| DiscoveryError::Parse(err.to_string()))?;
    let raw_events = envelope
        .embedded
        .map(|embedded| embedded.events)
        .unwrap_or_default();
    Ok(raw_events.into_iter().map(normalize).collect())
}
