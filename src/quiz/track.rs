use std::collections::HashSet;

use crate::clients::entities::{ImageRecord, Playlist, TrackRecord};

/// Album artwork shown next to a question
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<ImageRecord> for TrackImage {
    fn from(image: ImageRecord) -> Self {
        TrackImage {
            url: image.url,
            width: image.width,
            height: image.height,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMeta {
    pub http_link: String,
    pub uri_link: String,
}

/// Auxiliary data a question draws its wrong answers from.
///
/// A track carries at most one kind, so a question never has to choose
/// between two pools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Enrichment {
    #[default]
    None,
    TopTracks(Vec<String>),
    RelatedArtists(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Track {
    title: String,
    artist_name: String,
    artist_id: String,
    audio_preview_url: Option<String>,
    image: Option<TrackImage>,
    meta: TrackMeta,
    enrichment: Enrichment,
    playlist: Playlist,
}

impl Track {
    pub fn new(record: TrackRecord, playlist: &Playlist) -> Self {
        let TrackRecord {
            name,
            artists,
            preview_url,
            album,
            mut external_urls,
            uri,
        } = record;

        // Index 1 is the medium (300px) album cover
        let mut images = album.images;
        let image = if images.len() > 1 {
            Some(images.swap_remove(1))
        } else {
            images.pop()
        };

        let (artist_name, artist_id) = artists
            .into_iter()
            .next()
            .map(|artist| (artist.name, artist.id))
            .unwrap_or_default();

        Track {
            title: name,
            artist_name,
            artist_id,
            audio_preview_url: preview_url,
            image: image.map(TrackImage::from),
            meta: TrackMeta {
                http_link: external_urls.remove("spotify").unwrap_or_default(),
                uri_link: uri,
            },
            enrichment: Enrichment::None,
            playlist: playlist.clone(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist_name(&self) -> &str {
        &self.artist_name
    }

    pub fn artist_id(&self) -> &str {
        &self.artist_id
    }

    pub fn audio_preview_url(&self) -> Option<&str> {
        self.audio_preview_url.as_deref()
    }

    pub fn image(&self) -> Option<&TrackImage> {
        self.image.as_ref()
    }

    pub fn meta(&self) -> &TrackMeta {
        &self.meta
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn enrichment(&self) -> &Enrichment {
        &self.enrichment
    }

    pub fn related_artists(&self) -> &[String] {
        match &self.enrichment {
            Enrichment::RelatedArtists(names) => names,
            _ => &[],
        }
    }

    pub fn top_tracks(&self) -> &[String] {
        match &self.enrichment {
            Enrichment::TopTracks(names) => names,
            _ => &[],
        }
    }

    /// Replaces any previous enrichment.
    pub fn set_related_artists<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.enrichment = Enrichment::RelatedArtists(dedup(names));
    }

    /// Replaces any previous enrichment.
    pub fn set_top_tracks<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.enrichment = Enrichment::TopTracks(dedup(names));
    }

    pub fn is_playable(&self) -> bool {
        self.audio_preview_url
            .as_deref()
            .is_some_and(|url| !url.is_empty())
    }
}

// Keeps the first occurrence of each name
fn dedup<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
