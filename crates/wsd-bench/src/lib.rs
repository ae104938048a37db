//! Word-sense disambiguation scorers and an accuracy harness over WordNet.
//!
//! A [`Scorer`] picks a sense for an ambiguous word in a sentence; the
//! harness runs it over labelled example files and reports how often the
//! chosen sense lines up with the annotation.
//!
//! ```no_run
//! use wordnet_db::LoadMode;
//! use wsd_bench::{AccuracyOptions, Algorithm, AlgorithmScorer, WordNetInventory, evaluate_file};
//!
//! # fn main() -> anyhow::Result<()> {
//! let inventory = WordNetInventory::load("/path/to/wordnet", LoadMode::Mmap)?;
//! let scorer = AlgorithmScorer::new(&inventory, "path".parse::<Algorithm>()?);
//! let outcome = evaluate_file("terms/cold_pmids_tagged.arff", &inventory, &scorer, AccuracyOptions::default())?;
//! println!("{:?}", outcome.mean_accuracy());
//! # Ok(()) }
//! ```

pub mod algorithm;
pub mod batch;
pub mod dataset;
pub mod disambiguate;
pub mod eval;
pub mod inventory;
pub mod lesk;
pub mod phonetic;
pub mod report;

#[cfg(test)]
mod testing;

pub use algorithm::{Algorithm, AlgorithmScorer, ParseAlgorithmError};
pub use batch::{BatchError, BatchSummary, WordStatus, WordSummary, aggregate, sample_files};
pub use dataset::{DatasetError, Example, LineDefect, Word, collect_dataset_files};
pub use disambiguate::{Disambiguation, PosPolicy, RankedSense, max_similarity};
pub use eval::{
    AccuracyOptions, Attribution, ConfusionMatrix, Scorer, UnmatchedPolicy, WordAccuracy,
    WordOutcome, WordScore, accuracy, evaluate_file, evaluate_word, score_word,
};
pub use inventory::{SenseInventory, SignatureDepth, WordNetInventory};
pub use lesk::{LeskVariant, lesk};
pub use phonetic::{distance_matrix, edit_distance, phonetic_code, phonetic_similarity};
