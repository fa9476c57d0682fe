use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named, owned collection of tracks identified by owner + id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    pub id: String,
    pub owner: String,
}

impl Playlist {
    pub fn new(name: impl Into<String>, id: impl Into<String>, owner: impl Into<String>) -> Self {
        Playlist {
            name: name.into(),
            id: id.into(),
            owner: owner.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub total_track_count: u32,
}

/// Paging window for a playlist tracks request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
    pub market: String,
}

// Raw track shape, a subset of the Spotify "track object"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRecord>,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub album: AlbumRecord,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumRecord {
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Anything the enrichment endpoints return that carries a display name
/// (related artists, top tracks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItem {
    pub name: String,
}
