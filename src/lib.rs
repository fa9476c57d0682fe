//! Spotquiz - Multiple-choice music trivia from Spotify playlists
//!
//! This library samples tracks from a playlist, enriches them with related
//! artists or an artist's top tracks, and turns each one into a "guess the
//! artist" or "guess the track title" question with four choices.

/// Client modules for interacting with the music catalog
pub mod clients;
/// Tracks, questions and the question set pipeline
pub mod quiz;
/// Configuration and the top-level question generator
pub mod quizzer;

pub use quizzer::{ConfigBuilder, QuestionOptions, QuizConfig, Quizzer};
