use futures::future::try_join_all;
use log::{debug, info};
use rand::{Rng, seq::SliceRandom};

use crate::{
    clients::{
        catalog::CatalogClient,
        entities::{PageRequest, Playlist},
        errors::Result,
    },
    quiz::{MARKET, PAGE_SIZE, QuestionKind, QuestionType, question::Question, track::Track},
};

/// Drives one question set: playlist fetch, sampling, enrichment and assembly.
pub struct QuestionSetBuilder<'a, C> {
    client: &'a C,
    playlist: Playlist,
    question_type: QuestionType,
    amount: usize,
}

impl<'a, C: CatalogClient> QuestionSetBuilder<'a, C> {
    pub fn new(
        client: &'a C,
        playlist: Playlist,
        question_type: QuestionType,
        amount: usize,
    ) -> Self {
        QuestionSetBuilder {
            client,
            playlist,
            question_type,
            amount,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Fetch, sample and enrich tracks, then return the questions in random order.
    ///
    /// Returns fewer than `amount` questions when the fetched page holds fewer
    /// playable tracks. Any catalog failure aborts the whole set.
    pub async fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Question>> {
        let Playlist { id, owner, .. } = &self.playlist;

        let summary = self.client.playlist_summary(owner, id).await?;
        let page = PageRequest {
            limit: PAGE_SIZE,
            offset: window_offset(summary.total_track_count, rng),
            market: MARKET.to_owned(),
        };
        debug!(
            "Playlist {id} has {} tracks, reading from offset {}",
            summary.total_track_count, page.offset
        );

        let records = self.client.playlist_tracks_page(owner, id, &page).await?;
        let fetched = records.len();
        let mut tracks: Vec<Track> = records
            .into_iter()
            .map(|record| Track::new(record, &self.playlist))
            .filter(Track::is_playable)
            .collect();
        debug!("{} of {fetched} fetched tracks are playable", tracks.len());

        tracks.shuffle(rng);
        tracks.truncate(self.amount);

        let tracks = self.enrich(tracks).await?;
        let mut questions: Vec<Question> = tracks
            .into_iter()
            .map(|track| Question::new(track, rng))
            .collect();
        questions.shuffle(rng);

        info!(
            "Generated {} questions from playlist \"{}\"",
            questions.len(),
            self.playlist.name
        );
        Ok(questions)
    }

    // All lookups are in flight at once; results keep the input order
    async fn enrich(&self, tracks: Vec<Track>) -> Result<Vec<Track>> {
        try_join_all(
            tracks
                .into_iter()
                .enumerate()
                .map(|(index, track)| self.enrich_track(self.question_type.kind_for(index), track)),
        )
        .await
    }

    async fn enrich_track(&self, kind: QuestionKind, mut track: Track) -> Result<Track> {
        match kind {
            QuestionKind::TrackTitle => {
                let top_tracks = self
                    .client
                    .artist_top_tracks(track.artist_id(), MARKET)
                    .await?;
                track.set_top_tracks(top_tracks.into_iter().map(|item| item.name));
            }
            QuestionKind::ArtistName => {
                let related = self.client.related_artists(track.artist_id()).await?;
                track.set_related_artists(related.into_iter().map(|item| item.name));
            }
        }
        Ok(track)
    }
}

/// Random start of a page-sized window, so large playlists surface
/// different tracks on every call.
pub fn window_offset<R: Rng + ?Sized>(total_tracks: u32, rng: &mut R) -> u32 {
    if total_tracks > PAGE_SIZE {
        rng.random_range(0..=total_tracks - PAGE_SIZE)
    } else {
        0
    }
}
