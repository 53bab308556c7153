use serde::Deserialize;

use crate::models::{Event, EventArtist, Venue};

// Discovery API payload mirrors. Every field is optional on the wire; the
// defaults are applied leaf-first in normalize below.

#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub name: Option<String>,
    pub url: Option<String>,
    pub dates: Option<RawDates>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<RawEventEmbedded>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDates {
    pub start: Option<RawStart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStart {
    #[serde(rename = "localDate")]
    pub local_date: Option<String>,
    #[serde(rename = "localTime")]
    pub local_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEventEmbedded {
    #[serde(default)]
    pub venues: Vec<RawVenue>,
    #[serde(default)]
    pub attractions: Vec<RawAttraction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVenue {
    pub name: Option<String>,
    pub city: Option<RawNamed>,
    pub country: Option<RawNamed>,
    pub address: Option<RawAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAddress {
    pub line1: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAttraction {
    pub name: Option<String>,
    #[serde(default)]
    pub classifications: Vec<RawClassification>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawClassification {
    pub genre: Option<RawNamed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNamed {
    pub name: Option<String>,
}

/// Flattens one raw provider event into a fully populated record. Never
/// fails; anything the provider left out is replaced with its sentinel
/// default. An embedded venue or attraction list that is present but empty
/// counts as missing.
pub fn normalize(raw: RawEvent) -> Event {
    let start = raw.dates.and_then(|dates| dates.start).unwrap_or_default();

    let (venues, attractions) = match raw.embedded {
        Some(embedded) => (embedded.venues, embedded.attractions),
        None => (Vec::new(), Vec::new()),
    };

    // Multi-venue events are not modeled; only the first venue is surfaced.
    let venue = venues.into_iter().next().map(|venue| Venue {
        name: venue.name.unwrap_or_else(|| "Unknown Venue".to_string()),
        city: nested_name(venue.city),
        country: nested_name(venue.country),
        address: venue
            .address
            .and_then(|address| address.line1)
            .unwrap_or_else(|| "N/A".to_string()),
    });

    let artists = attractions
        .into_iter()
        .map(|attraction| EventArtist {
            name: attraction.name.unwrap_or_else(|| "Unknown".to_string()),
            genre: nested_name(
                attraction
                    .classifications
                    .into_iter()
                    .next()
                    .and_then(|classification| classification.genre),
            ),
        })
        .collect();

    Event {
        name: raw.name.unwrap_or_else(|| "Unknown Event".to_string()),
        date: start.local_date.unwrap_or_else(|| "TBA".to_string()),
        time: start.local_time.unwrap_or_else(|| "TBA".to_string()),
        url: raw.url.unwrap_or_default(),
        venue,
        artists,
    }
}

fn nested_name(value: Option<RawNamed>) -> String {
    value
        .and_then(|named| named.name)
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_EVENT: &str = r#"{
        "name": "Radiohead: Everything In Its Right Place Tour",
        "type": "event",
        "id": "Z698xZb_Z17GGa1",
        "url": "https://www.ticketmaster.nl/event/286453",
        "locale": "en-us",
        "dates": {
            "start": {
                "localDate": "2025-09-12",
                "localTime": "20:00:00",
                "dateTBD": false,
                "timeTBA": false
            },
            "timezone": "Europe/Amsterdam",
            "status": { "code": "onsale" }
        },
        "_embedded": {
            "venues": [
                {
                    "name": "Ziggo Dome",
                    "type": "venue",
                    "id": "Z198xZb_Z171axd",
                    "city": { "name": "Amsterdam" },
                    "country": { "name": "Netherlands", "countryCode": "NL" },
                    "address": { "line1": "De Passage 100" }
                }
            ],
            "attractions": [
                {
                    "name": "Radiohead",
                    "classifications": [
                        {
                            "primary": true,
                            "segment": { "name": "Music" },
                            "genre": { "id": "KnvZfZ7vAeA", "name": "Rock" }
                        }
                    ]
                },
                { "name": "The Smile", "classifications": [] },
                { "classifications": [ { "segment": { "name": "Music" } } ] }
            ]
        }
    }"#;

    fn parse(json: &str) -> RawEvent {
        serde_json::from_str(json).expect("parse raw event")
    }

    #[test]
    fn normalizes_fully_populated_event() {
        let event = normalize(parse(SAMPLE_EVENT));

        assert_eq!(event.name, "Radiohead: Everything In Its Right Place Tour");
        assert_eq!(event.date, "2025-09-12");
        assert_eq!(event.time, "20:00:00");
        assert_eq!(event.url, "https://www.ticketmaster.nl/event/286453");

        let venue = event.venue.expect("venue");
        assert_eq!(venue.name, "Ziggo Dome");
        assert_eq!(venue.city, "Amsterdam");
        assert_eq!(venue.country, "Netherlands");
        assert_eq!(venue.address, "De Passage 100");
    }

    #[test]
    fn attraction_list_keeps_length_and_order() {
        let event = normalize(parse(SAMPLE_EVENT));
        assert_eq!(event.artists.len(), 3);
        assert_eq!(event.artists[0].name, "Radiohead");
        assert_eq!(event.artists[0].genre, "Rock");
        // empty classification list
        assert_eq!(event.artists[1].name, "The Smile");
        assert_eq!(event.artists[1].genre, "Unknown");
        // no name, classification without a genre
        assert_eq!(event.artists[2].name, "Unknown");
        assert_eq!(event.artists[2].genre, "Unknown");
    }

    #[test]
    fn defaults_apply_per_missing_child() {
        let event = normalize(parse(
            r#"{
                "name": "Test Show",
                "dates": { "start": { "localDate": "2025-06-01" } },
                "_embedded": {
                    "venues": [ { "name": "Arena X", "city": { "name": "Metropolis" } } ]
                }
            }"#,
        ));

        assert_eq!(event.name, "Test Show");
        assert_eq!(event.date, "2025-06-01");
        assert_eq!(event.time, "TBA");
        assert_eq!(event.url, "");
        let venue = event.venue.expect("venue");
        assert_eq!(venue.name, "Arena X");
        assert_eq!(venue.city, "Metropolis");
        assert_eq!(venue.country, "Unknown");
        assert_eq!(venue.address, "N/A");
        assert!(event.artists.is_empty());
    }

    #[test]
    fn bare_payload_gets_every_default() {
        let event = normalize(parse("{}"));
        assert_eq!(event.name, "Unknown Event");
        assert_eq!(event.date, "TBA");
        assert_eq!(event.time, "TBA");
        assert_eq!(event.url, "");
        assert_eq!(event.venue, None);
        assert!(event.artists.is_empty());
    }

    #[test]
    fn missing_embedding_yields_no_venue() {
        let event = normalize(parse(r#"{ "name": "Solo Set" }"#));
        assert_eq!(event.venue, None);
        assert!(event.artists.is_empty());
    }

    #[test]
    fn empty_venue_list_counts_as_missing() {
        let event = normalize(parse(
            r#"{ "name": "Solo Set", "_embedded": { "venues": [], "attractions": [] } }"#,
        ));
        assert_eq!(event.venue, None);
        assert!(event.artists.is_empty());
    }

    #[test]
    fn dates_without_start_fall_back_to_tba() {
        let event = normalize(parse(r#"{ "dates": { "timezone": "Europe/Amsterdam" } }"#));
        assert_eq!(event.date, "TBA");
        assert_eq!(event.time, "TBA");
    }

    #[test]
    fn normalize_is_deterministic() {
        let raw = parse(SAMPLE_EVENT);
        let first = normalize(raw.clone());
        let second = normalize(raw);
        assert_eq!(first, second);
    }
}
