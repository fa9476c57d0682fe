use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use log::debug;
use rspotify::{
    ClientCredsSpotify, Credentials,
    model::{ArtistId, Country, FullTrack, Market, PlayableItem, PlaylistId},
    prelude::*,
};

use crate::clients::{
    catalog::CatalogClient,
    credential::{AccessCredential, RenewalHandle, spawn_renewal},
    entities::{
        AlbumRecord, ArtistRecord, ImageRecord, NamedItem, PageRequest, PlaylistSummary,
        TrackRecord,
    },
    errors::{Error, Result},
};

impl From<FullTrack> for TrackRecord {
    fn from(track: FullTrack) -> TrackRecord {
        TrackRecord {
            uri: track.id.as_ref().map(|id| id.uri()).unwrap_or_default(),
            name: track.name,
            artists: track
                .artists
                .into_iter()
                .map(|artist| ArtistRecord {
                    id: artist.id.map(|id| id.id().to_owned()).unwrap_or_default(),
                    name: artist.name,
                })
                .collect(),
            preview_url: track.preview_url,
            album: AlbumRecord {
                images: track
                    .album
                    .images
                    .into_iter()
                    .map(|image| ImageRecord {
                        url: image.url,
                        width: image.width,
                        height: image.height,
                    })
                    .collect(),
            },
            external_urls: track.external_urls,
        }
    }
}

/// Client id/secret for the client-credentials grant
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub client_id: String,
    pub client_secret: String,
    /// Keep renewing the access token in the background before it expires
    pub auto_renew: bool,
}

impl ClientOptions {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        ClientOptions {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auto_renew: false,
        }
    }

    #[must_use]
    pub fn auto_renew(mut self, enabled: bool) -> Self {
        self.auto_renew = enabled;
        self
    }

    // Read options from environment variables or raise a configuration error
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("RSPOTIFY_CLIENT_ID").map_err(|_| {
            Error::ConfigurationError("Missing RSPOTIFY_CLIENT_ID in environment variables".into())
        })?;
        let client_secret = std::env::var("RSPOTIFY_CLIENT_SECRET").map_err(|_| {
            Error::ConfigurationError(
                "Missing RSPOTIFY_CLIENT_SECRET in environment variables".into(),
            )
        })?;
        let auto_renew = std::env::var("SPOTQUIZ_AUTO_RENEW")
            .is_ok_and(|value| matches!(value.trim(), "1" | "true" | "yes"));

        Ok(Self::new(client_id, client_secret).auto_renew(auto_renew))
    }

    fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::ConfigurationError(
                "Supply client id for Spotify API".into(),
            ));
        }
        if self.client_secret.trim().is_empty() {
            return Err(Error::ConfigurationError(
                "Supply client secret for Spotify API".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct CredentialState {
    credential: Option<AccessCredential>,
    // Replacing the handle aborts the previous renewal task
    renewal: Option<RenewalHandle>,
}

fn lock_state(state: &Mutex<CredentialState>) -> MutexGuard<'_, CredentialState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Spotify Web API transport using the client-credentials flow.
pub struct SpotifyClient {
    spotify: ClientCredsSpotify,
    state: Arc<Mutex<CredentialState>>,
    auto_renew: bool,
}

impl SpotifyClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        options.validate()?;
        let creds = Credentials::new(&options.client_id, &options.client_secret);
        Ok(SpotifyClient {
            spotify: ClientCredsSpotify::new(creds),
            state: Arc::new(Mutex::new(CredentialState::default())),
            auto_renew: options.auto_renew,
        })
    }

    // Create a SpotifyClient from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    /// Whether a background renewal task is currently armed.
    pub fn is_renewal_armed(&self) -> bool {
        lock_state(&self.state)
            .renewal
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn arm_renewal(&self, delay: Duration) -> RenewalHandle {
        let spotify = self.spotify.clone();
        // Weak, so dropping the client also drops (and aborts) this task
        let state = Arc::downgrade(&self.state);
        spawn_renewal(delay, move || {
            let spotify = spotify.clone();
            let state = Weak::clone(&state);
            async move {
                let credential = request_credential(&spotify).await?;
                let next = credential.renewal_delay();
                let Some(state) = state.upgrade() else {
                    return Ok(None);
                };
                lock_state(&state).credential = Some(credential);
                debug!("Access token has been renewed");
                Ok(Some(next))
            }
        })
    }
}

async fn request_credential(spotify: &ClientCredsSpotify) -> Result<AccessCredential> {
    spotify.request_token().await?;
    let shared = spotify.get_token();
    let guard = shared
        .lock()
        .await
        .map_err(|_| Error::ParseError("Access token lock is poisoned".into()))?;
    let token = guard.as_ref().ok_or_else(|| {
        Error::ParseError("Client credentials grant returned no access token".into())
    })?;
    let expires_in = u64::try_from(token.expires_in.num_seconds()).unwrap_or(0);
    Ok(AccessCredential::new(
        token.access_token.clone(),
        Duration::from_secs(expires_in),
    ))
}

fn parse_market(code: &str) -> Result<Market> {
    let country: Country = serde_json::from_value(serde_json::Value::from(code))
        .map_err(|_| Error::ParseError(format!("Unknown market code {code:?}")))?;
    Ok(Market::Country(country))
}

impl CatalogClient for SpotifyClient {
    fn current_credential(&self) -> Option<String> {
        lock_state(&self.state)
            .credential
            .as_ref()
            .filter(|credential| !credential.is_expired())
            .map(|credential| credential.access_token().to_owned())
    }

    async fn refresh_credential(&self) -> Result<()> {
        let credential = request_credential(&self.spotify).await?;
        debug!(
            "Access token has been set, it expires in {} seconds",
            credential.expires_in().as_secs()
        );
        let delay = credential.renewal_delay();
        let renewal = self.auto_renew.then(|| self.arm_renewal(delay));

        let mut state = lock_state(&self.state);
        state.credential = Some(credential);
        if let Some(handle) = renewal {
            state.renewal = Some(handle);
        }
        Ok(())
    }

    async fn playlist_summary(
        &self,
        owner_id: &str,
        playlist_id: &str,
    ) -> Result<PlaylistSummary> {
        debug!("Fetching playlist {playlist_id} owned by {owner_id}");
        let id = PlaylistId::from_id(playlist_id)?;
        let playlist = self.spotify.playlist(id, None, None).await?;
        Ok(PlaylistSummary {
            total_track_count: playlist.tracks.total,
        })
    }

    async fn playlist_tracks_page(
        &self,
        owner_id: &str,
        playlist_id: &str,
        page: &PageRequest,
    ) -> Result<Vec<TrackRecord>> {
        debug!(
            "Fetching {} tracks at offset {} from playlist {playlist_id} owned by {owner_id}",
            page.limit, page.offset
        );
        let id = PlaylistId::from_id(playlist_id)?;
        let market = parse_market(&page.market)?;
        let items = self
            .spotify
            .playlist_items_manual(id, None, Some(market), Some(page.limit), Some(page.offset))
            .await?;

        // Podcast episodes and unavailable entries can't become questions
        Ok(items
            .items
            .into_iter()
            .filter_map(|item| match item.track {
                Some(PlayableItem::Track(track)) => Some(TrackRecord::from(track)),
                _ => None,
            })
            .collect())
    }

    async fn related_artists(&self, artist_id: &str) -> Result<Vec<NamedItem>> {
        let id = ArtistId::from_id(artist_id)?;
        #[allow(deprecated)]
        let artists = self.spotify.artist_related_artists(id).await?;
        Ok(artists
            .into_iter()
            .map(|artist| NamedItem { name: artist.name })
            .collect())
    }

    async fn artist_top_tracks(&self, artist_id: &str, market: &str) -> Result<Vec<NamedItem>> {
        let id = ArtistId::from_id(artist_id)?;
        let tracks = self
            .spotify
            .artist_top_tracks(id, Some(parse_market(market)?))
            .await?;
        Ok(tracks
            .into_iter()
            .map(|track| NamedItem { name: track.name })
            .collect())
    }
}
