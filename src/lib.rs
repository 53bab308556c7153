pub mod models;
pub mod normalize;
pub mod output;
pub mod ticketmaster;

pub use models::{BatchResult, Event, EventArtist, Venue};
pub use ticketmaster::{DiscoveryError, SearchQuery, TicketmasterClient};
