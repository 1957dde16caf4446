//! Cubememo CLI
//!
//! Terminal front-end for the blind-solve trainer: scrambles with memo,
//! letter-pair practice and dictionary/encoding management.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use cubememo_core::{
    format_interval, BlindsolveMemo, EncodingConvention, FSRSCard, MemoryWordDict, PieceKind,
    Rating, SelectionReason, Trainer, TrainerConfig,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Cubememo - blindfolded cube memo trainer
#[derive(Parser)]
#[command(name = "cubememo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Blind-solve memo and letter-pair trainer")]
#[command(long_about = "Generates scrambles with their blind-solve memo and drills letter-pair words with FSRS spaced repetition.")]
struct Cli {
    /// Custom data directory (overrides CUBEMEMO_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a scramble and show its memo
    Scramble {
        /// Hide the memo
        #[arg(long)]
        no_memo: bool,
    },

    /// Show the memo for a scramble (default: the last generated one)
    Memo {
        /// Scramble in standard notation
        scramble: Option<String>,
    },

    /// Show the next card to study
    Next {
        /// Also list the cards after it
        #[arg(long, default_value = "0")]
        upcoming: usize,
    },

    /// Rate a card: again, hard, good, easy (or 1-4)
    Rate {
        /// Card id (letter pair)
        card: String,
        rating: String,
    },

    /// Show today's progress
    Stats,

    /// Allow more new cards today
    LearnMore {
        #[arg(default_value = "5")]
        count: u32,
    },

    /// Manage letter-pair words
    Word {
        #[command(subcommand)]
        action: WordAction,
    },

    /// Manage sticker labels
    Encoding {
        #[command(subcommand)]
        action: EncodingAction,
    },

    /// Import an SM-2 flashcard deck (JSON)
    Migrate {
        file: PathBuf,
    },

    /// Reset saved data
    Reset {
        /// Restore the placeholder dictionary and drop all cards
        #[arg(long)]
        words: bool,
        /// Delete everything
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
enum WordAction {
    /// Set the word for a pair (empty clears it)
    Set { pair: String, word: String },
    /// Import a CSV/TSV grid or a JSON object of pair -> word
    Import { file: PathBuf },
    /// List defined words
    List,
}

#[derive(Subcommand)]
enum EncodingAction {
    /// Print the sticker labels
    Show,
    /// Label a sticker, e.g. `edge UF-U A` (empty label removes it)
    Set {
        kind: String,
        sticker: String,
        label: String,
    },
    /// Switch to a built-in table: primary or speffz
    Use { convention: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = TrainerConfig::from_env();
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }
    let mut trainer = Trainer::open(config, Utc::now())?;

    match cli.command {
        Commands::Scramble { no_memo } => run_scramble(&mut trainer, !no_memo).await,
        Commands::Memo { scramble } => run_memo(&trainer, scramble).await,
        Commands::Next { upcoming } => run_next(&mut trainer, upcoming),
        Commands::Rate { card, rating } => run_rate(&mut trainer, &card, &rating),
        Commands::Stats => run_stats(&mut trainer),
        Commands::LearnMore { count } => run_learn_more(&mut trainer, count),
        Commands::Word { action } => run_word(&mut trainer, action),
        Commands::Encoding { action } => run_encoding(&mut trainer, action),
        Commands::Migrate { file } => run_migrate(&mut trainer, file),
        Commands::Reset { words, all } => run_reset(trainer, words, all),
    }
}

fn print_memo(memo: &BlindsolveMemo) {
    let show = |label: &str, kind: PieceKind| {
        let pairs = memo.letter_pairs(kind);
        if pairs.is_empty() {
            println!("{}: {}", label.white().bold(), "solved".dimmed());
        } else {
            println!("{}: {}", label.white().bold(), pairs.join(" ").green());
        }
    };
    show("Edges", PieceKind::Edge);
    show("Corners", PieceKind::Corner);
}

async fn run_scramble(trainer: &mut Trainer, show_memo: bool) -> anyhow::Result<()> {
    trainer.initialize().await;
    let result = trainer.new_scramble()?;

    println!("{}", "=== Scramble ===".cyan().bold());
    println!("{}", result.scramble.yellow().bold());
    if show_memo {
        println!();
        print_memo(&result.memo);
    }
    Ok(())
}

async fn run_memo(trainer: &Trainer, scramble: Option<String>) -> anyhow::Result<()> {
    let scramble = match scramble {
        Some(s) => s,
        None => trainer
            .current_scramble()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("No scramble yet; run `cubememo scramble` first"))?,
    };
    trainer.initialize().await;
    let memo = trainer.memo_for(&scramble)?;

    println!("{}", "=== Memo ===".cyan().bold());
    println!("{}: {}", "Scramble".white().bold(), scramble);
    print_memo(&memo);
    Ok(())
}

fn describe_card(card: &FSRSCard) -> String {
    format!("{} {}", card.code1, card.code2)
}

fn run_next(trainer: &mut Trainer, upcoming: usize) -> anyhow::Result<()> {
    let now = Utc::now();
    let selection = trainer.next_card(now)?;

    let Some(card) = selection.card else {
        println!("{}", selection.message.green());
        return Ok(());
    };

    let reason = match selection.reason {
        SelectionReason::Review => "review".blue(),
        SelectionReason::Learning => "learning".yellow(),
        SelectionReason::New => "new".green(),
        SelectionReason::None => "none".dimmed(),
    };
    println!("{} [{}]", "=== Next Card ===".cyan().bold(), reason);
    println!("{}", selection.message.dimmed());
    println!();
    println!("{}: {}", "Pair".white().bold(), describe_card(&card).bold());
    println!("{}: {}", "Word".white().bold(), card.word);

    let preview = trainer.preview(&card.id, now)?;
    println!();
    println!(
        "{} {}  {} {}  {} {}  {} {}",
        "again".red(),
        preview.again,
        "hard".yellow(),
        preview.hard,
        "good".green(),
        preview.good,
        "easy".blue(),
        preview.easy
    );
    println!("{}", format!("cubememo rate {} <rating>", card.id).dimmed());

    if upcoming > 0 {
        let cards = trainer.upcoming(upcoming + 1, now);
        println!();
        println!("{}", "Upcoming:".white().bold());
        for next in cards.iter().filter(|c| c.id != card.id).take(upcoming) {
            println!("  {} ({})", describe_card(next), next.state);
        }
    }
    Ok(())
}

fn run_rate(trainer: &mut Trainer, card: &str, rating: &str) -> anyhow::Result<()> {
    let rating = Rating::parse_name(rating)
        .ok_or_else(|| anyhow!("Unknown rating '{}': use again, hard, good or easy", rating))?;
    let now = Utc::now();
    let info = trainer.rate(card, rating, now)?;

    let minutes = (info.card.due - now).num_minutes();
    println!(
        "{} {} -> {} (next in {})",
        card.bold(),
        rating,
        info.card.state.to_string().cyan(),
        format_interval(info.card.scheduled_days, Some(minutes))
    );
    Ok(())
}

fn run_stats(trainer: &mut Trainer) -> anyhow::Result<()> {
    let stats = trainer.stats(Utc::now());
    let session = trainer.session().session();

    println!("{}", "=== Today ===".cyan().bold());
    println!();
    println!("{}: {}", "Date".white().bold(), session.date);
    println!("{}: {}", "Due Reviews".white().bold(), stats.due_count);
    println!("{}: {}", "In Learning".white().bold(), stats.learning_count);
    println!(
        "{}: {}/{} ({} left)",
        "New Cards".white().bold(),
        stats.new_cards_today,
        session.new_cards_limit,
        stats.new_cards_remaining
    );
    println!("{}: {}", "Reviews Done".white().bold(), stats.reviews_completed);
    println!();
    println!("{}", "=== Deck ===".cyan().bold());
    println!("{}: {}", "Total Cards".white().bold(), trainer.cards().len());
    println!("{}: {}", "Unseen".white().bold(), stats.total_new);
    println!("{}: {}", "In Review".white().bold(), stats.total_review);

    if stats.completed_today {
        println!();
        println!("{}", "All done for today.".green().bold());
    }
    Ok(())
}

fn run_learn_more(trainer: &mut Trainer, count: u32) -> anyhow::Result<()> {
    trainer.learn_more(count, Utc::now())?;
    println!(
        "New card limit raised to {}",
        trainer.session().session().new_cards_limit.to_string().green()
    );
    Ok(())
}

fn load_words(file: &Path) -> anyhow::Result<MemoryWordDict> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if text.trim_start().starts_with('{') {
        let raw: HashMap<String, String> =
            serde_json::from_str(&text).context("Expected a JSON object of pair -> word")?;
        Ok(MemoryWordDict::from_flat_map(raw))
    } else {
        Ok(MemoryWordDict::from_grid(&text))
    }
}

fn run_word(trainer: &mut Trainer, action: WordAction) -> anyhow::Result<()> {
    let now = Utc::now();
    match action {
        WordAction::Set { pair, word } => {
            trainer.set_word(&pair, &word, now)?;
            println!("{} {}", pair.bold(), "saved".green());
        }
        WordAction::Import { file } => {
            let words = load_words(&file)?;
            let count = trainer.import_words(&words, now)?;
            println!("Imported {} words ({} cards)", count.to_string().green(), trainer.cards().len());
        }
        WordAction::List => {
            let words = &trainer.state().memory_words;
            if words.defined_count() == 0 {
                println!("{}", "No words defined.".dimmed());
            }
            for (pair, word) in words.defined() {
                println!("{}  {}", pair.to_string().bold(), word);
            }
        }
    }
    Ok(())
}

fn run_encoding(trainer: &mut Trainer, action: EncodingAction) -> anyhow::Result<()> {
    match action {
        EncodingAction::Show => {
            let encoding = &trainer.state().encoding;
            let name = encoding
                .convention()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "custom".to_string());
            println!("{} ({})", "=== Encoding ===".cyan().bold(), name);
            for kind in [PieceKind::Edge, PieceKind::Corner] {
                println!();
                println!("{}", kind.as_str().white().bold());
                for (key, label) in encoding.labels(kind) {
                    println!("  {:<7} {}", key.to_string(), label.green());
                }
            }
        }
        EncodingAction::Set {
            kind,
            sticker,
            label,
        } => {
            let kind = PieceKind::parse_name(&kind)
                .ok_or_else(|| anyhow!("Unknown piece kind '{}': use edge or corner", kind))?;
            trainer.set_label(kind, &sticker, &label)?;
            println!("{} {}", sticker.bold(), "updated".green());
        }
        EncodingAction::Use { convention } => {
            let Some(convention) = EncodingConvention::parse_name(&convention) else {
                bail!("Unknown encoding '{}': use primary or speffz", convention);
            };
            trainer.set_encoding(convention)?;
            println!("Using {} labels", convention.to_string().green());
        }
    }
    Ok(())
}

fn run_migrate(trainer: &mut Trainer, file: PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&text)?;
    let count = trainer.import_legacy(&raw, Utc::now())?;
    println!("Migrated {} cards", count.to_string().green());
    Ok(())
}

fn run_reset(mut trainer: Trainer, words: bool, all: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    if all {
        let config = trainer.config().clone();
        drop(trainer);
        cubememo_core::Storage::open(config.data_dir)?.clear()?;
        println!("{}", "All saved data deleted.".yellow());
    } else if words {
        trainer.reset_words(now)?;
        println!("{}", "Dictionary reset.".yellow());
    } else {
        trainer.reset_progress(now)?;
        println!("{}", "Review progress reset.".yellow());
    }
    Ok(())
}
