use crate::clients::{
    entities::{NamedItem, PageRequest, PlaylistSummary, TrackRecord},
    errors::Result,
};

/// Everything the question pipeline needs from a music catalog.
///
/// [`SpotifyClient`](crate::clients::SpotifyClient) talks to the real Web API;
/// tests provide their own implementation backed by fixtures.
#[allow(async_fn_in_trait)]
pub trait CatalogClient {
    /// The access token currently held, if any and not yet expired.
    fn current_credential(&self) -> Option<String>;

    /// Obtain a fresh access token and store it on the client.
    async fn refresh_credential(&self) -> Result<()>;

    async fn playlist_summary(&self, owner_id: &str, playlist_id: &str)
    -> Result<PlaylistSummary>;

    async fn playlist_tracks_page(
        &self,
        owner_id: &str,
        playlist_id: &str,
        page: &PageRequest,
    ) -> Result<Vec<TrackRecord>>;

    async fn related_artists(&self, artist_id: &str) -> Result<Vec<NamedItem>>;

    async fn artist_top_tracks(&self, artist_id: &str, market: &str) -> Result<Vec<NamedItem>>;
}
