use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local};
use clap::Parser;

use tour_track::output::{self, SearchSummary};
use tour_track::ticketmaster::{SearchQuery, TicketmasterClient};

/// Track upcoming concerts through the Ticketmaster Discovery API.
///
/// Without --artist flags, sweeps a whole country (optionally narrowed to a
/// city) over the coming date window. With them, looks each artist up
/// individually within the same window.
#[derive(Parser, Debug)]
#[command(name = "tour-track", version, about)]
struct Cli {
    /// Ticketmaster Discovery API key (free at developer.ticketmaster.com)
    #[arg(long, env = "TICKETMASTER_API_KEY")]
    api_key: Option<String>,

    /// Two-letter ISO 3166-1 country code, e.g. NL or US
    #[arg(long)]
    country: Option<String>,

    /// City to narrow results down to; omit to search the whole country
    #[arg(long)]
    city: Option<String>,

    /// Artist to track; repeat the flag to track several
    #[arg(long = "artist")]
    artists: Vec<String>,

    /// How many days ahead to search
    #[arg(long, default_value_t = 14)]
    days: i64,

    /// Results per query (the provider caps a page at 200)
    #[arg(long, default_value_t = 200)]
    size: u16,

    /// Output file; derived from country, city, and date when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let api_key = resolve_api_key(cli.api_key)?;
    let country = resolve_country(cli.country)?;
    let city = cli
        .city
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let start = Local::now();
    let end = start + Duration::days(cli.days);
    let start_date = start.date_naive();
    let end_date = end.date_naive();

    let client = TicketmasterClient::new(api_key)?;
    let base_query = SearchQuery {
        city: city.clone(),
        country_code: Some(country.clone()),
        start_date_time: Some(start.format("%Y-%m-%dT00:00:00Z").to_string()),
        end_date_time: Some(end.format("%Y-%m-%dT23:59:59Z").to_string()),
        size: Some(cli.size),
        ..SearchQuery::default()
    };

    let location = match city.as_deref() {
        Some(city) => format!("{city}, {country}"),
        None => format!("all of {country}"),
    };
    println!("Searching for events in {location}");
    println!("Date range: {start_date} to {end_date}");

    if cli.artists.is_empty() {
        let events = client.search_events(&base_query);
        println!("\n=== Found {} events in {location} ===", events.len());
        output::print_events(&events);

        let summary = SearchSummary::new(&country, city.as_deref(), start_date, end_date, events);
        let path = cli.out.unwrap_or_else(|| {
            PathBuf::from(output::summary_filename(&country, city.as_deref(), start_date))
        });
        output::save_summary(&summary, &path)?;
        println!("\nResults saved to {}", path.display());
    } else {
        let results = client.track_multiple_artists(&cli.artists, &base_query);
        for (artist, events) in results.iter() {
            println!("\n=== {} ({} events) ===", artist, events.len());
            output::print_events(events);
        }
        if let Some(path) = cli.out {
            let contents = serde_json::to_string_pretty(&results)
                .context("unable to serialize batch results")?;
            std::fs::write(&path, contents)
                .with_context(|| format!("unable to write {}", path.display()))?;
            println!("\nResults saved to {}", path.display());
        }
    }

    Ok(())
}

fn resolve_api_key(flag: Option<String>) -> Result<String> {
    if let Some(key) = flag {
        let key = key.trim().to_string();
        if !key.is_empty() {
            return Ok(key);
        }
    }
    let key = prompt("Enter your Ticketmaster API key: ")?;
    if key.is_empty() {
        bail!("an API key is required");
    }
    Ok(key)
}

fn resolve_country(flag: Option<String>) -> Result<String> {
    let value = match flag {
        Some(value) => value,
        None => prompt("Enter country code (e.g. NL for the Netherlands): ")?,
    };
    validate_country(&value)
}

fn validate_country(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("country code must be exactly two letters, got {trimmed:?}");
    }
    Ok(trimmed.to_uppercase())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().context("unable to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("unable to read stdin")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_is_upper_cased() {
        assert_eq!(validate_country("nl").expect("valid code"), "NL");
        assert_eq!(validate_country("  gb  ").expect("valid code"), "GB");
    }

    #[test]
    fn bad_country_codes_are_rejected() {
        assert!(validate_country("").is_err());
        assert!(validate_country("N").is_err());
        assert!(validate_country("NLD").is_err());
        assert!(validate_country("N1").is_err());
    }
}
