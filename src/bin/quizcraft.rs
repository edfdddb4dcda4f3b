use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{interval, Duration};
use tracing_subscriber::EnvFilter;

use quizcraft::clients::{GeminiClient, MockClient};
use quizcraft::generator::{CompletionClient, QuizGenerator};
use quizcraft::request::{clamp_time_limit_minutes, Difficulty, QuizRequest};
use quizcraft::session::{Phase, QuizSession};
use quizcraft::tutor::{Tutor, TutorMessage};

#[derive(Parser)]
#[command(name = "quizcraft", about = "Generate and take AI quizzes from your study notes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a quiz from a notes file and take it interactively
    Generate {
        /// Path to a plain-text notes file
        notes: PathBuf,
        /// Number of questions (clamped to 1-20)
        #[arg(short = 'n', long, default_value_t = 5)]
        questions: u32,
        /// easy, medium or hard; anything else falls back to medium
        #[arg(short, long, default_value = "medium")]
        difficulty: String,
        /// Time limit in minutes (clamped up to 1)
        #[arg(short, long, default_value_t = 10)]
        minutes: i64,
        /// Class to attribute the result record to
        #[arg(long, default_value = "default")]
        class_id: String,
        /// Use a canned reply instead of calling the Gemini API
        #[arg(long)]
        mock: bool,
    },
    /// Chat with the AI tutor
    Tutor {
        /// Echo a canned reply instead of calling the Gemini API
        #[arg(long)]
        mock: bool,
    },
}

const MOCK_QUIZ: &str = r#"{
  "questions": [
    {
      "question": "Which keyword declares an immutable binding in Rust?",
      "options": ["let", "mut", "const fn", "static mut"],
      "correct_answer": 0,
      "explanation": "let bindings are immutable unless marked mut."
    },
    {
      "question": "What does the ? operator do?",
      "options": ["Panics", "Propagates errors", "Clones a value", "Spawns a task"],
      "correct_answer": 1,
      "explanation": "? returns early with the error, converting it via From."
    }
  ]
}"#;

const MOCK_TUTOR_REPLY: &str = "Let's break that down step by step.";

fn make_client(mock: bool, canned: &str) -> Result<Box<dyn CompletionClient>> {
    if mock {
        Ok(Box::new(MockClient::fixed(canned)))
    } else {
        Ok(Box::new(GeminiClient::from_env()?))
    }
}

fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn print_questions(session: &QuizSession) {
    for (qi, q) in session.questions().iter().enumerate() {
        println!("\n{}. {}", qi + 1, q.prompt);
        for (oi, option) in q.options.iter().enumerate() {
            println!("   {}) {}", oi + 1, option);
        }
    }
}

fn handle_command(session: &mut QuizSession, line: &str) {
    if line.eq_ignore_ascii_case("check") {
        match session.check_answers() {
            Ok(result) => println!("Checked: {}/{}", result.correct, result.total),
            Err(e) => println!("{e}"),
        }
        return;
    }

    let mut parts = line.split_whitespace();
    let parsed = (
        parts.next().and_then(|s| s.parse::<usize>().ok()),
        parts.next().and_then(|s| s.parse::<usize>().ok()),
    );
    match parsed {
        (Some(question), Some(option)) if question >= 1 && option >= 1 => {
            match session.select_answer(question - 1, option - 1) {
                Ok(()) => println!("Recorded question {question} -> option {option}"),
                Err(e) => println!("{e}"),
            }
        }
        _ => println!("Enter `<question> <option>` (1-based) or `check`."),
    }
}

async fn run_quiz(
    generator: QuizGenerator<Box<dyn CompletionClient>>,
    request: QuizRequest,
    minutes: i64,
    class_id: &str,
) -> Result<()> {
    let mut session = QuizSession::new();
    let token = session.begin_generation()?;

    println!("Generating quiz from your notes...");
    match generator.generate(&request).await {
        Ok(questions) => {
            let duration_secs = clamp_time_limit_minutes(minutes) * 60;
            session.complete_generation(token, questions, duration_secs);
        }
        Err(e) => {
            session.fail_generation(token);
            bail!("quiz generation failed: {e}");
        }
    }

    print_questions(&session);
    println!(
        "\nYou have {}. Answer with `<question> <option>`, then `check`.",
        format_time(session.remaining_secs())
    );

    let mut lines: Lines<BufReader<Stdin>> = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = interval(Duration::from_secs(1));
    ticker.tick().await; // the first tick completes immediately

    while matches!(session.phase(), Phase::Active | Phase::TimedOut) {
        tokio::select! {
            _ = ticker.tick() => {
                let before = session.phase();
                session.tick();
                if before == Phase::Active && session.phase() == Phase::TimedOut {
                    println!("\nTime's up!");
                } else if session.phase() == Phase::Active && session.remaining_secs() == 60 {
                    println!("One minute left.");
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => handle_command(&mut session, line.trim()),
                    None => break, // stdin closed
                }
            }
        }
    }

    let result = session.score();
    println!("\nScore: {}/{}", result.correct, result.total);
    for (qi, q) in session.questions().iter().enumerate() {
        let picked = session.selected_answers().get(&qi).copied();
        let verdict = if picked == Some(q.correct_index) { "correct" } else { "wrong" };
        println!(
            "{}. {verdict} (answer: {})",
            qi + 1,
            q.options[q.correct_index]
        );
        if !q.explanation.is_empty() {
            println!("   {}", q.explanation);
        }
    }

    let record = session.record(class_id);
    println!("\nResult record:\n{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn run_tutor(client: Box<dyn CompletionClient>) -> Result<()> {
    let tutor = Tutor::new(client);
    let mut history: Vec<TutorMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Ask the tutor anything (empty line to quit).");
    while let Some(line) = lines.next_line().await? {
        let message = line.trim().to_string();
        if message.is_empty() {
            break;
        }
        match tutor.ask(&history, &message).await {
            Ok(reply) => {
                println!("{reply}");
                history.push(TutorMessage::student(message));
                history.push(TutorMessage::tutor(reply));
            }
            Err(e) => println!("tutor error: {e}"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            notes,
            questions,
            difficulty,
            minutes,
            class_id,
            mock,
        } => {
            let source = std::fs::read_to_string(&notes)
                .with_context(|| format!("reading notes file {}", notes.display()))?;
            let request = QuizRequest::new(
                source,
                questions,
                Difficulty::parse_or_default(&difficulty),
            )?;
            let generator = QuizGenerator::new(make_client(mock, MOCK_QUIZ)?);
            run_quiz(generator, request, minutes, &class_id).await
        }
        Command::Tutor { mock } => run_tutor(make_client(mock, MOCK_TUTOR_REPLY)?).await,
    }
}
