use log::warn;
use rand::{Rng, seq::IndexedRandom, seq::SliceRandom};

use crate::quiz::{
    NUMBER_OF_CHOICES, QuestionKind,
    track::{Enrichment, Track},
};

/// One multiple-choice question built around a single enriched track.
#[derive(Debug, Clone)]
pub struct Question {
    kind: Option<QuestionKind>,
    choices: Vec<String>,
    track: Track,
}

impl Question {
    /// Build the question and draw its distractors with `rng`.
    ///
    /// The kind follows the track's enrichment: top tracks make a title
    /// question, related artists an artist question. A track without
    /// enrichment yields a question with no kind and no choices.
    pub fn new<R: Rng + ?Sized>(track: Track, rng: &mut R) -> Self {
        let (kind, choices) = match track.enrichment() {
            Enrichment::TopTracks(titles) if !titles.is_empty() => (
                Some(QuestionKind::TrackTitle),
                title_choices(track.title(), titles, rng),
            ),
            Enrichment::RelatedArtists(names) if !names.is_empty() => (
                Some(QuestionKind::ArtistName),
                artist_choices(track.artist_name(), names, rng),
            ),
            _ => (None, Vec::new()),
        };

        if kind.is_some() && choices.len() < NUMBER_OF_CHOICES {
            warn!(
                "Only {} choices available for \"{}\" by {}",
                choices.len(),
                track.title(),
                track.artist_name()
            );
        }

        Question {
            kind,
            choices,
            track,
        }
    }

    pub fn kind(&self) -> Option<QuestionKind> {
        self.kind
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// The choices in a fresh random order on every call.
    pub fn choices(&self) -> Vec<String> {
        self.shuffled_choices(&mut rand::rng())
    }

    pub fn shuffled_choices<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut choices = self.choices.clone();
        choices.shuffle(rng);
        choices
    }

    pub fn correct_answer(&self) -> Option<&str> {
        match self.kind? {
            QuestionKind::TrackTitle => Some(self.track.title()),
            QuestionKind::ArtistName => Some(self.track.artist_name()),
        }
    }

    pub fn check_answer(&self, candidate: &str) -> bool {
        self.correct_answer() == Some(candidate)
    }

    /// Whether the enrichment pool was large enough for a full set of choices.
    pub fn is_complete(&self) -> bool {
        self.kind.is_some() && self.choices.len() == NUMBER_OF_CHOICES
    }
}

fn title_choices<R: Rng + ?Sized>(title: &str, top_tracks: &[String], rng: &mut R) -> Vec<String> {
    let pool: Vec<&str> = top_tracks
        .iter()
        .map(String::as_str)
        .filter(|candidate| *candidate != title)
        .collect();
    let mut choices: Vec<String> = pool
        .choose_multiple(rng, NUMBER_OF_CHOICES - 1)
        .map(|candidate| (*candidate).to_owned())
        .collect();
    choices.push(title.to_owned());
    choices
}

// Related artists never contain the artist itself, so no filtering here
fn artist_choices<R: Rng + ?Sized>(artist: &str, related: &[String], rng: &mut R) -> Vec<String> {
    let mut choices: Vec<String> = related
        .choose_multiple(rng, NUMBER_OF_CHOICES - 1)
        .cloned()
        .collect();
    choices.push(artist.to_owned());
    choices
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::clients::entities::{ArtistRecord, Playlist, TrackRecord};

    fn track(title: &str, artist: &str) -> Track {
        let record = TrackRecord {
            name: title.into(),
            artists: vec![ArtistRecord {
                id: "artist-id".into(),
                name: artist.into(),
            }],
            preview_url: Some("https://p.scdn.co/mp3-preview/x".into()),
            ..TrackRecord::default()
        };
        Track::new(record, &Playlist::new("test", "playlist-id", "owner"))
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn title_question_excludes_own_title_from_distractors() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut t = track("Hey Jude", "The Beatles");
        t.set_top_tracks(names(&["Hey Jude", "Let It Be", "Yesterday", "Help!", "Something"]));
        let question = Question::new(t, &mut rng);

        assert_eq!(question.kind(), Some(QuestionKind::TrackTitle));
        assert_eq!(question.correct_answer(), Some("Hey Jude"));
        let choices = question.choices();
        assert_eq!(choices.len(), NUMBER_OF_CHOICES);
        assert_eq!(choices.iter().filter(|c| *c == "Hey Jude").count(), 1);
        let unique: HashSet<_> = choices.iter().collect();
        assert_eq!(unique.len(), NUMBER_OF_CHOICES);
        assert!(question.is_complete());
    }

    #[test]
    fn artist_question_draws_from_related_artists() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut t = track("Dancing Queen", "ABBA");
        let related = names(&["Boney M.", "Roxette", "Ace of Base", "Bee Gees", "Blondie"]);
        t.set_related_artists(related.clone());
        let question = Question::new(t, &mut rng);

        assert_eq!(question.kind(), Some(QuestionKind::ArtistName));
        assert_eq!(question.correct_answer(), Some("ABBA"));
        let choices = question.choices();
        assert_eq!(choices.len(), NUMBER_OF_CHOICES);
        assert!(choices.contains(&"ABBA".to_string()));
        assert_eq!(
            choices.iter().filter(|c| related.contains(c)).count(),
            NUMBER_OF_CHOICES - 1
        );
    }

    #[test]
    fn small_pool_gives_fewer_choices() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = track("Hey Jude", "The Beatles");
        t.set_top_tracks(names(&["Hey Jude", "Let It Be", "Yesterday"]));
        let question = Question::new(t, &mut rng);

        let choices = question.choices();
        assert_eq!(choices.len(), 3);
        assert!(choices.contains(&"Hey Jude".to_string()));
        assert!(!question.is_complete());
    }

    #[test]
    fn unenriched_track_has_no_kind() {
        let mut rng = StdRng::seed_from_u64(1);
        let question = Question::new(track("Hey Jude", "The Beatles"), &mut rng);

        assert_eq!(question.kind(), None);
        assert_eq!(question.correct_answer(), None);
        assert!(question.choices().is_empty());
        assert!(!question.check_answer("Hey Jude"));
        assert!(!question.is_complete());
    }

    #[test]
    fn checks_answers_strictly() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut t = track("Dancing Queen", "ABBA");
        t.set_related_artists(names(&["Boney M.", "Roxette", "Ace of Base"]));
        let question = Question::new(t, &mut rng);

        assert!(question.check_answer("ABBA"));
        assert!(!question.check_answer("abba"));
        assert!(!question.check_answer("Roxette"));
        assert!(!question.check_answer("wrong answer"));
    }

    #[test]
    fn choices_are_reshuffled_on_each_call() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut t = track("Hey Jude", "The Beatles");
        t.set_top_tracks(names(&["Let It Be", "Yesterday", "Help!", "Something"]));
        let question = Question::new(t, &mut rng);

        let first = question.shuffled_choices(&mut rng);
        let expected: HashSet<_> = first.iter().cloned().collect();
        let mut saw_other_order = false;
        for _ in 0..20 {
            let next = question.shuffled_choices(&mut rng);
            assert_eq!(next.iter().cloned().collect::<HashSet<_>>(), expected);
            saw_other_order |= next != first;
        }
        assert!(saw_other_order);
    }
}
