use log::debug;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    clients::{
        catalog::CatalogClient,
        entities::Playlist,
        errors::Result,
        spotify::{ClientOptions, SpotifyClient},
    },
    quiz::{
        DEFAULT_QUESTION_AMOUNT, QuestionSetBuilder, QuestionType, clamp_amount,
        default_playlist, question::Question,
    },
};

/// What to generate; every field falls back to a default when unset.
#[derive(Debug, Clone, Default)]
pub struct QuestionOptions {
    pub playlist: Option<Playlist>,
    pub question_type: Option<QuestionType>,
    /// Clamped into `0..=12`, defaults to 10
    pub amount: Option<i64>,
}

impl QuestionOptions {
    #[must_use]
    pub fn playlist(mut self, playlist: Playlist) -> Self {
        self.playlist = Some(playlist);
        self
    }

    #[must_use]
    pub fn question_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = Some(question_type);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }
}

// Configuration for the Quizzer struct
pub struct QuizConfig<C> {
    pub client: C,
    /// Fixed seed for reproducible question sets, OS entropy otherwise
    pub seed: Option<u64>,
}

impl<C> QuizConfig<C> {
    pub fn new(client: C) -> Self {
        QuizConfig { client, seed: None }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Assembles a [`QuizConfig`] backed by the Spotify Web API.
#[derive(Default)]
pub struct ConfigBuilder {
    client: Option<SpotifyClient>,
    options: Option<ClientOptions>,
    seed: Option<u64>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn client(mut self, client: SpotifyClient) -> Self {
        self.client = Some(client);
        self
    }

    #[must_use]
    pub fn client_options(mut self, options: ClientOptions) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<QuizConfig<SpotifyClient>> {
        let client = match (self.client, self.options) {
            (Some(client), _) => client,
            (None, Some(options)) => SpotifyClient::new(options)?,
            (None, None) => SpotifyClient::try_default()?,
        };
        Ok(QuizConfig {
            client,
            seed: self.seed,
        })
    }
}

/// Entry point: generates question sets from a catalog.
pub struct Quizzer<C> {
    client: C,
    rng: StdRng,
}

impl<C: CatalogClient> Quizzer<C> {
    pub fn new(config: QuizConfig<C>) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Quizzer {
            client: config.client,
            rng,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Generate a question set; nothing is cached between calls.
    pub async fn generate_questions(&mut self, options: QuestionOptions) -> Result<Vec<Question>> {
        let playlist = options.playlist.unwrap_or_else(default_playlist);
        let question_type = options.question_type.unwrap_or_default();
        let amount = options
            .amount
            .map_or(DEFAULT_QUESTION_AMOUNT, clamp_amount);

        if self.client.current_credential().is_none() {
            debug!("No valid access token, requesting a new one ...");
            self.client.refresh_credential().await?;
        }

        debug!("Building {amount} {question_type:?} questions from playlist {}", playlist.id);
        QuestionSetBuilder::new(&self.client, playlist, question_type, amount)
            .build(&mut self.rng)
            .await
    }
}
