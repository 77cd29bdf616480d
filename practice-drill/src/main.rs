use anyhow::{Context, Result, bail};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use practice_engine::{
    AnswerPolicy, CompletionStats, Practice, PracticeConfig, PracticeMode, PracticeSize,
    SessionSimulation,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use vocab_data::{Catalog, VocabularyDataSource};

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

#[derive(Parser, Debug)]
#[command(version, about = "Practice Arabic vocabulary flashcards in the terminal", long_about = None)]
struct Args {
    /// JSON array of vocabulary items. Uses the bundled sample catalog if omitted.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// JSON practice config. Missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Clone)]
struct DeckArgs {
    /// medinabook1, medinabook2, medinabook3 or other
    #[arg(short, long, default_value = "medinabook1")]
    source: VocabularyDataSource,

    /// random50, custom or all
    #[arg(long, default_value = "random50")]
    size: PracticeSize,

    /// Deck size for `--size custom`. Anything that isn't a positive number means 100.
    #[arg(long, default_value = "100")]
    count: String,

    /// arabic-to-english or english-to-arabic
    #[arg(short, long, default_value = "arabic-to-english")]
    mode: PracticeMode,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the vocabulary sources and how many words each has
    Sources,
    /// Print the JSON schema of the catalog file format
    Schema,
    /// Run a session to completion with a scripted learner
    Simulate {
        #[command(flatten)]
        deck: DeckArgs,

        /// always-correct, miss-until-review or accuracy:<percent>
        #[arg(short, long, default_value = "accuracy:75")]
        policy: AnswerPolicy,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, default_value_t = 10_000)]
        max_steps: usize,

        /// Write the session's event transcript here
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
    /// Practice interactively
    Drill {
        #[command(flatten)]
        deck: DeckArgs,
    },
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Catalog::from_json_str(SAMPLE_CATALOG).context("Bundled catalog is invalid"),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PracticeConfig> {
    match path {
        Some(path) => PracticeConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(PracticeConfig::default()),
    }
}

fn print_stats(stats: &CompletionStats) {
    println!();
    println!("=== Session complete ===");
    println!("Cards:              {}", stats.total_cards);
    println!("First try:          {}", stats.perfect_count);
    println!("Needed retries:     {}", stats.struggled_count);
    println!("Reviewed 2+ times:  {}", stats.multi_review_count);
    println!("Average attempts:   {:.2}", stats.average_attempts);
    println!("Accuracy:           {}%", stats.accuracy_percent);
    if stats.remaining > 0 {
        println!("Left unfinished:    {}", stats.remaining);
    }
}

fn list_sources(practice: &Practice) {
    for summary in practice.source_summaries() {
        let status = if summary.available {
            format!("{} words", summary.count)
        } else {
            "coming soon".to_string()
        };
        println!(
            "{:<12} {} {:<26} {status}",
            summary.source.to_string(),
            summary.emoji,
            summary.name
        );
    }
}

fn simulate(
    catalog: Catalog,
    config: PracticeConfig,
    deck: DeckArgs,
    policy: AnswerPolicy,
    seed: u64,
    max_steps: usize,
    transcript: Option<PathBuf>,
) -> Result<()> {
    let start_time = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .context("Invalid simulation start time")?;

    let mut simulation = SessionSimulation::new(catalog, config, policy, start_time, seed)
        .with_max_steps(max_steps)
        .start(deck.source, deck.size, &deck.count, deck.mode);

    println!(
        "Simulating {} cards from {} with policy {policy}",
        simulation.practice().total_cards(),
        deck.source.display_name()
    );

    for step in simulation.by_ref() {
        log::debug!("{step:?}");
        let verdict = if step.correct { "✓" } else { "✗" };
        let review = if step.is_review_mode { " (review)" } else { "" };
        println!(
            "{:>5} {verdict} {:<24} remaining {:>3}, set aside {:>3}{review}",
            step.step, step.card_id, step.remaining, step.pending_review
        );
    }

    let practice = simulation.into_practice();
    if !practice.is_complete() {
        log::warn!("Stopped after {max_steps} answers before the deck was finished");
    }
    print_stats(&practice.completion_stats());

    if let Some(path) = transcript {
        let json = practice.transcript_json()?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
        println!("Transcript written to {}", path.display());
    }
    Ok(())
}

/// Lets the real clock catch up with whatever the practice has scheduled.
fn wait_for_pending(practice: &mut Practice) {
    while let Some(ms) = practice.next_pending_in_ms() {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
        practice.tick();
    }
}

fn drill(catalog: Catalog, config: PracticeConfig, deck: DeckArgs) -> Result<()> {
    let mut practice = Practice::new(catalog, config);
    if !practice.select_source(deck.source) {
        bail!("{} has no words to practice yet", deck.source.label());
    }
    practice.set_custom_count(deck.count.clone());
    practice.set_practice_mode(deck.mode);
    practice.select_size(deck.size);

    println!(
        "{} cards from {}. Answer with y (knew it), n (didn't), q (quit).",
        practice.total_cards(),
        deck.source.label()
    );

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    while !practice.is_complete() {
        if !practice.focus_card(0) {
            bail!("Could not pick up the next card");
        }
        let faces = practice
            .focused_card_faces()
            .context("Focused card has no faces")?;
        let progress = practice.live_progress();
        println!();
        if practice.is_review_mode() {
            println!("[review]");
        }
        println!(
            "({} left, {} set aside, {}% right)  {}",
            progress.remaining,
            progress.pending_review,
            progress.attempt_accuracy_percent,
            faces.prompt
        );
        print!("press enter to reveal ");
        std::io::stdout().flush()?;
        if lines.next().transpose()?.is_none() {
            break;
        }
        wait_for_pending(&mut practice);
        println!("  {}  ({})  {}", faces.arabic, faces.transliteration, faces.english);

        let correct = loop {
            print!("did you know it? [y/n/q] ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                practice.exit_practice();
                return Ok(());
            };
            match line.trim() {
                "y" | "Y" => break true,
                "n" | "N" => break false,
                "q" | "Q" => {
                    print_stats(&practice.completion_stats());
                    practice.exit_practice();
                    return Ok(());
                }
                _ => continue,
            }
        };
        practice.answer(correct);
        wait_for_pending(&mut practice);
    }

    print_stats(&practice.completion_stats());
    practice.exit_practice();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = load_catalog(args.catalog.as_ref())?;
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Sources => {
            let practice = Practice::new(catalog, config);
            list_sources(&practice);
        }
        Command::Schema => {
            let schema = Catalog::json_schema()?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Simulate {
            deck,
            policy,
            seed,
            max_steps,
            transcript,
        } => simulate(catalog, config, deck, policy, seed, max_steps, transcript)?,
        Command::Drill { deck } => drill(catalog, config, deck)?,
    }
    Ok(())
}
