use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use wordnet_db::LoadMode;
use wordnet_types::Pos;

use wsd_bench::batch::corpus_label;
use wsd_bench::report::{
    write_batch_summary, write_disambiguation, write_distance_matrix, write_json,
    write_word_report,
};
use wsd_bench::{
    AccuracyOptions, Algorithm, AlgorithmScorer, Attribution, BatchSummary, PosPolicy, Scorer,
    UnmatchedPolicy, WordNetInventory, aggregate, collect_dataset_files, evaluate_file,
    phonetic_similarity, sample_files,
};

const DEFAULT_WORDNET_PATH: &str = "open_english_wordnet_2024/oewn2024";
const DEFAULT_WORDNET_IMAGE_PATH: &str = "/app/wordnet";

#[derive(Debug, Parser)]
#[command(
    name = "wsd-bench",
    version,
    about = "Disambiguate words against WordNet and measure how often it works"
)]
struct Cli {
    #[command(flatten)]
    wordnet: WordNetArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct WordNetArgs {
    /// WordNet dict directory (falls back to the bundled locations).
    #[arg(long, global = true, env = "WORDNET_DIR")]
    wordnet_dir: Option<PathBuf>,

    /// How to hold the dictionary files: `mmap` or `owned`.
    #[arg(
        long,
        global = true,
        env = "WORDNET_LOAD_MODE",
        default_value = "mmap",
        value_parser = parse_load_mode
    )]
    wordnet_mode: LoadMode,
}

#[derive(Debug, Args)]
struct ScoringArgs {
    /// original-lesk, simple-lesk, adapted-lesk, cosine-lesk, path, lch, wup, resnik, jcn or lin.
    #[arg(long, short, default_value = "path")]
    algorithm: Algorithm,

    /// Prefer senses with this part of speech (n, v, a, r).
    #[arg(long, value_parser = parse_pos)]
    pos: Option<Pos>,

    /// Give no answer instead of ignoring a part of speech with no senses.
    #[arg(long)]
    strict_pos: bool,
}

impl ScoringArgs {
    fn scorer<'a>(&self, inventory: &'a WordNetInventory) -> AlgorithmScorer<'a, WordNetInventory> {
        let policy = if self.strict_pos {
            PosPolicy::Strict
        } else {
            PosPolicy::Fallback
        };
        AlgorithmScorer::new(inventory, self.algorithm).with_pos(self.pos, policy)
    }
}

#[derive(Debug, Args)]
struct AccuracyArgs {
    /// Leave predictions outside the candidate senses out of the accuracy.
    #[arg(long)]
    drop_unmatched: bool,

    /// Judge each sense against its own most frequent candidate.
    #[arg(long)]
    row_max: bool,
}

impl AccuracyArgs {
    fn options(&self) -> AccuracyOptions {
        AccuracyOptions {
            unmatched: if self.drop_unmatched {
                UnmatchedPolicy::Drop
            } else {
                UnmatchedPolicy::CountAsMiss
            },
            attribution: if self.row_max {
                Attribution::RowMax
            } else {
                Attribution::Exclusive
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pick the sense of a word in a sentence.
    Disambiguate {
        /// Context sentence containing the word.
        sentence: String,
        /// The ambiguous word.
        word: String,
        #[command(flatten)]
        scoring: ScoringArgs,
        /// Print every candidate, best first.
        #[arg(long)]
        all: bool,
    },
    /// Score one dataset file and print its per-sense breakdown.
    Eval {
        file: PathBuf,
        #[command(flatten)]
        scoring: ScoringArgs,
        #[command(flatten)]
        accuracy: AccuracyArgs,
    },
    /// Average accuracy over one or more corpus directories.
    Batch {
        /// Corpus directories, e.g. `acronyms terms`.
        #[arg(required = true)]
        dirs: Vec<PathBuf>,
        /// Evaluate a random sample of this many files per directory.
        #[arg(long)]
        sample: Option<usize>,
        /// Seed for `--sample`.
        #[arg(long)]
        seed: Option<u64>,
        /// Print the summaries as JSON.
        #[arg(long)]
        json: bool,
        /// Only print the summaries, not every word.
        #[arg(long, short)]
        quiet: bool,
        #[command(flatten)]
        scoring: ScoringArgs,
        #[command(flatten)]
        accuracy: AccuracyArgs,
    },
    /// Soundex codes and code distances of a sentence.
    Phonetic {
        sentence: String,
        /// Also print the phonetic similarity of this word to the sentence.
        #[arg(long)]
        word: Option<String>,
    },
}

#[derive(Serialize)]
struct CorpusReport<'a> {
    corpus: String,
    algorithm: String,
    options: AccuracyOptions,
    #[serde(flatten)]
    summary: &'a BatchSummary,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Phonetic { sentence, word } => {
            write_distance_matrix(&mut out, &sentence)?;
            if let Some(word) = word {
                match phonetic_similarity(&word, &sentence) {
                    Some(score) => writeln!(out, "phonetic similarity of {word}: {score:.4}")?,
                    None => bail!("the sentence has no words"),
                }
            }
        }
        Command::Disambiguate {
            sentence,
            word,
            scoring,
            all,
        } => {
            if sentence.trim().is_empty() {
                bail!("no sentence written, please write a context sentence");
            }
            if !sentence.split_whitespace().any(|token| token == word) {
                bail!("`{word}` is not in the context sentence");
            }
            let inventory = load_inventory(&cli.wordnet)?;
            let scorer = scoring.scorer(&inventory);
            let outcome = scorer.score(&sentence, &word);
            write_disambiguation(&mut out, &word, &outcome, &inventory, all)?;
        }
        Command::Eval {
            file,
            scoring,
            accuracy,
        } => {
            let inventory = load_inventory(&cli.wordnet)?;
            let scorer = scoring.scorer(&inventory);
            let outcome = evaluate_file(&file, &inventory, &scorer, accuracy.options())?;
            write_word_report(&mut out, &outcome, &inventory)?;
        }
        Command::Batch {
            dirs,
            sample,
            seed,
            json,
            quiet,
            scoring,
            accuracy,
        } => {
            let inventory = load_inventory(&cli.wordnet)?;
            let scorer = scoring.scorer(&inventory);
            let options = accuracy.options();
            let mut summaries = Vec::with_capacity(dirs.len());
            for dir in &dirs {
                let files = collect_dataset_files(dir)
                    .with_context(|| format!("list dataset files in {}", dir.display()))?;
                let files = match sample {
                    Some(n) => sample_files(&files, n, seed),
                    None => files,
                };
                info!(
                    corpus = %dir.display(),
                    files = files.len(),
                    algorithm = %scoring.algorithm,
                    "evaluating corpus"
                );
                let per_word = !quiet && !json;
                let mut write_error = None;
                let summary = aggregate(&files, &inventory, &scorer, options, |outcome| {
                    if per_word
                        && write_error.is_none()
                        && let Err(err) = write_word_report(&mut out, outcome, &inventory)
                    {
                        write_error = Some(err);
                    }
                })?;
                if let Some(err) = write_error {
                    return Err(err.into());
                }
                summaries.push((corpus_label(dir), summary));
            }

            if json {
                let reports: Vec<CorpusReport<'_>> = summaries
                    .iter()
                    .map(|(corpus, summary)| CorpusReport {
                        corpus: corpus.clone(),
                        algorithm: scoring.algorithm.to_string(),
                        options,
                        summary,
                    })
                    .collect();
                write_json(&mut out, &reports)?;
            } else {
                for (corpus, summary) in &summaries {
                    write_batch_summary(&mut out, corpus, summary)?;
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn load_inventory(args: &WordNetArgs) -> anyhow::Result<WordNetInventory> {
    let path = args
        .wordnet_dir
        .clone()
        .unwrap_or_else(default_wordnet_path);
    info!(
        "using wordnet at {} (mode: {:?})",
        path.display(),
        args.wordnet_mode
    );
    WordNetInventory::load(&path, args.wordnet_mode)
        .with_context(|| format!("load wordnet from {}", path.display()))
}

fn default_wordnet_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_WORDNET_PATH);
    if local.exists() {
        return local;
    }
    PathBuf::from(DEFAULT_WORDNET_IMAGE_PATH)
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    LoadMode::parse(raw).ok_or_else(|| format!("unknown load mode `{raw}` (expected mmap or owned)"))
}

fn parse_pos(raw: &str) -> Result<Pos, String> {
    Pos::parse_name(raw).ok_or_else(|| format!("unknown part of speech `{raw}`"))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
}
