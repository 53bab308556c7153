use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Event;

pub fn print_events(events: &[Event]) {
    if events.is_empty() {
        println!("No events found.");
        return;
    }

    for (index, event) in events.iter().enumerate() {
        println!("\n{}. {}", index + 1, event.name);
        println!("   Date: {} at {}", event.date, event.time);
        match &event.venue {
            Some(venue) => {
                println!("   Venue: {}", venue.name);
                println!("   Location: {}, {}", venue.city, venue.country);
            }
            None => {
                println!("   Venue: N/A");
                println!("   Location: N/A, N/A");
            }
        }
        if !event.artists.is_empty() {
            let names: Vec<&str> = event.artists.iter().map(|a| a.name.as_str()).collect();
            println!("   Artists: {}", names.join(", "));
        }
        println!("   Tickets: {}", event.url);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSummary {
    pub country: String,
    pub city: String,
    pub date_range: DateRange,
    pub total_events: usize,
    pub events: Vec<Event>,
}

impl SearchSummary {
    pub fn new(
        country: &str,
        city: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
        events: Vec<Event>,
    ) -> Self {
        Self {
            country: country.to_string(),
            city: city
                .map(str::to_string)
                .unwrap_or_else(|| "All cities".to_string()),
            date_range: DateRange {
                start: start.format("%Y-%m-%d").to_string(),
                end: end.format("%Y-%m-%d").to_string(),
            },
            total_events: events.len(),
            events,
        }
    }
}

pub fn save_summary(summary: &SearchSummary, path: &Path) -> Result<()> {
    let contents =
        serde_json::to_string_pretty(summary).context("unable to serialize summary")?;
    fs::write(path, contents).with_context(|| format!("unable to write {}", path.display()))?;
    Ok(())
}

pub fn summary_filename(country: &str, city: Option<&str>, start: NaiveDate) -> String {
    let city_part = city
        .filter(|value| !value.trim().is_empty())
        .map(|value| format!("_{}", value.trim().to_lowercase().replace(' ', "_")))
        .unwrap_or_default();
    format!(
        "events_{}{}_{}.json",
        country.to_lowercase(),
        city_part,
        start.format("%Y%m%d")
    )
}
