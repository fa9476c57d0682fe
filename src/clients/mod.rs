/// Capability interface the question pipeline fetches catalog data through
pub mod catalog;
/// Access credential state and the auto-renew timer
pub mod credential;
/// Catalog records exchanged with the question pipeline
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Spotify API client
pub mod spotify;

pub use catalog::CatalogClient;
pub use spotify::{ClientOptions, SpotifyClient};
