use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    pub name: String,
    pub date: String,
    pub time: String,
    pub url: String,
    #[serde(
        default,
        serialize_with = "venue_as_object",
        deserialize_with = "venue_from_object"
    )]
    pub venue: Option<Venue>,
    pub artists: Vec<EventArtist>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Venue {
    pub name: String,
    pub city: String,
    pub country: String,
    pub address: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventArtist {
    pub name: String,
    pub genre: String,
}

impl Event {
    pub fn headliner(&self) -> String {
        self.artists
            .first()
            .map(|artist| artist.name.clone())
            .unwrap_or_else(|| self.name.clone())
    }
}

// An event without embedded venue data serializes as "venue": {} rather
// than null, so consumers never see an absent or null field.
fn venue_as_object<S>(venue: &Option<Venue>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match venue {
        Some(venue) => venue.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

fn venue_from_object<'de, D>(deserializer: D) -> Result<Option<Venue>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct MaybeVenue {
        name: Option<String>,
        city: Option<String>,
        country: Option<String>,
        address: Option<String>,
    }

    // A written venue always carries a name, so an object without one is
    // the empty placeholder.
    let fields = MaybeVenue::deserialize(deserializer)?;
    Ok(fields.name.map(|name| Venue {
        name,
        city: fields.city.unwrap_or_else(|| "Unknown".to_string()),
        country: fields.country.unwrap_or_else(|| "Unknown".to_string()),
        address: fields.address.unwrap_or_else(|| "N/A".to_string()),
    }))
}

/// Per-artist batch results, ordered by the first time each name was seen.
#[derive(Debug, Default, Clone)]
pub struct BatchResult {
    entries: Vec<(String, Vec<Event>)>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    // A repeated name replaces the earlier value but keeps its position.
    pub fn insert(&mut self, artist: String, events: Vec<Event>) {
        match self.entries.iter_mut().find(|(name, _)| *name == artist) {
            Some(entry) => entry.1 = events,
            None => self.entries.push((artist, events)),
        }
    }

    pub fn get(&self, artist: &str) -> Option<&[Event]> {
        self.entries
            .iter()
            .find(|(name, _)| name == artist)
            .map(|(_, events)| events.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Event])> {
        self.entries
            .iter()
            .map(|(name, events)| (name.as_str(), events.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for BatchResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, events) in &self.entries {
            map.serialize_entry(name, events)?;
        }
        map.end()
    }
}
