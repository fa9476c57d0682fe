use clap::{Parser, Subcommand};
use log::info;
use spotquiz::{
    ConfigBuilder, QuestionOptions, Quizzer,
    clients::{entities::Playlist, errors::Result},
    quiz::{Question, QuestionKind, QuestionType},
};

#[derive(Parser)]
#[command(name = "spotquiz")]
#[command(version, about = "Generate music trivia questions from a Spotify playlist", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a set of multiple-choice questions
    Questions {
        /// Kind of questions to generate
        #[arg(long = "type", value_enum, default_value_t = QuestionType::Mix)]
        question_type: QuestionType,

        /// Number of questions, at most 12
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<i64>,

        /// Playlist id, defaults to the Spotify top 100 playlist
        #[arg(long, requires = "owner")]
        playlist_id: Option<String>,

        /// Owner of the playlist given with --playlist-id
        #[arg(long, requires = "playlist_id")]
        owner: Option<String>,

        /// Display name of the playlist given with --playlist-id
        #[arg(long, default_value = "Custom playlist")]
        name: String,

        /// Seed for a reproducible question set
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Questions {
            question_type,
            amount,
            playlist_id,
            owner,
            name,
            seed,
        } => {
            let mut options = QuestionOptions::default().question_type(question_type);
            if let Some(amount) = amount {
                options = options.amount(amount);
            }
            if let (Some(id), Some(owner)) = (playlist_id, owner) {
                options = options.playlist(Playlist::new(name, id, owner));
            }
            print_questions(seed, options).await?;
        }
    }
    Ok(())
}

async fn print_questions(seed: Option<u64>, options: QuestionOptions) -> Result<()> {
    info!("Building config ...");
    let config = ConfigBuilder::new().seed(seed).build()?;
    let mut quizzer = Quizzer::new(config);
    let questions = quizzer.generate_questions(options).await?;

    for (number, question) in questions.iter().enumerate() {
        print_question(number + 1, question);
    }
    Ok(())
}

fn print_question(number: usize, question: &Question) {
    let track = question.track();
    let prompt = match question.kind() {
        Some(QuestionKind::TrackTitle) => format!("Guess the title of this {} track", track.artist_name()),
        Some(QuestionKind::ArtistName) => format!("Who performs \"{}\"?", track.title()),
        None => return,
    };
    println!("{number}. {prompt}");
    if let Some(preview) = track.audio_preview_url() {
        println!("   listen: {preview}");
    }
    for (letter, choice) in ('a'..='d').zip(question.choices()) {
        println!("   {letter}) {choice}");
    }
    println!("   answer: {}", question.correct_answer().unwrap_or_default());
    println!();
}
