//! Multiple-choice question generation from playlist tracks.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::clients::entities::Playlist;

/// Sampling, enrichment and assembly of a question set
pub mod builder;
/// A single multiple-choice question
pub mod question;
/// Playable track with its enrichment data
pub mod track;

pub use builder::QuestionSetBuilder;
pub use question::Question;
pub use track::{Enrichment, Track, TrackImage, TrackMeta};

pub const DEFAULT_PLAYLIST_NAME: &str = "Top 100 tracks currently on Spotify";
pub const DEFAULT_PLAYLIST_ID: &str = "4hOKQuZbraPDIfaGbM3lKI";
pub const DEFAULT_PLAYLIST_OWNER: &str = "spotify";
/// Market used for playlist pages and top tracks lookups
pub const MARKET: &str = "SE";
/// Tracks fetched per playlist page, which is also the sampling window
pub const PAGE_SIZE: u32 = 100;
pub const MAX_QUESTIONS: usize = 12;
pub const DEFAULT_QUESTION_AMOUNT: usize = 10;
pub const NUMBER_OF_CHOICES: usize = 4;

/// The playlist used when the caller does not name one.
pub fn default_playlist() -> Playlist {
    Playlist::new(
        DEFAULT_PLAYLIST_NAME,
        DEFAULT_PLAYLIST_ID,
        DEFAULT_PLAYLIST_OWNER,
    )
}

/// Which kinds of questions a set should contain.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum QuestionType {
    #[serde(rename = "track title")]
    TrackTitle,
    #[serde(rename = "artist name")]
    ArtistName,
    /// Alternate between artist and title questions by position
    #[default]
    #[serde(rename = "mix")]
    Mix,
}

/// What a single question asks the player to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "track title")]
    TrackTitle,
    #[serde(rename = "artist name")]
    ArtistName,
}

impl QuestionType {
    /// Kind of question the track at `index` of a batch should get.
    pub fn kind_for(self, index: usize) -> QuestionKind {
        match self {
            QuestionType::TrackTitle => QuestionKind::TrackTitle,
            QuestionType::ArtistName => QuestionKind::ArtistName,
            QuestionType::Mix if index % 2 == 1 => QuestionKind::TrackTitle,
            QuestionType::Mix => QuestionKind::ArtistName,
        }
    }
}

/// Clamp a requested question amount into `0..=MAX_QUESTIONS`.
pub fn clamp_amount(amount: i64) -> usize {
    usize::try_from(amount).map_or(0, |amount| amount.min(MAX_QUESTIONS))
}
