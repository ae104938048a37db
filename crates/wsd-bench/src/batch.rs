//! Accuracy over many words.

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::dataset::DatasetError;
use crate::eval::{AccuracyOptions, Scorer, WordOutcome, evaluate_file};
use crate::inventory::SenseInventory;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(
        "no word could be scored: {files} files, {errors} missing from the sense inventory, {unscorable} without counted predictions"
    )]
    NoScoredWords {
        files: usize,
        errors: usize,
        unscorable: usize,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordStatus {
    Scored,
    NotInInventory,
    Unscorable,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordSummary {
    pub word: String,
    pub path: PathBuf,
    pub status: WordStatus,
    pub accuracy: Option<f64>,
}

impl WordSummary {
    fn from_outcome(outcome: &WordOutcome) -> Self {
        let accuracy = outcome.mean_accuracy();
        let status = match (outcome, accuracy) {
            (WordOutcome::NotInInventory(_), _) => WordStatus::NotInInventory,
            (WordOutcome::Scored(_), Some(_)) => WordStatus::Scored,
            (WordOutcome::Scored(_), None) => WordStatus::Unscorable,
        };
        let word = outcome.word();
        Self {
            word: word.surface_form().to_string(),
            path: word.path().to_path_buf(),
            status,
            accuracy,
        }
    }
}

/// Totals for one batch of dataset files.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchSummary {
    pub files: usize,
    pub scored: usize,
    /// Words missing from the sense inventory.
    pub errors: usize,
    /// Words in the inventory with no counted prediction for any sense.
    pub unscorable: usize,
    /// Mean of the scored words' accuracies.
    pub mean_accuracy: f64,
    pub words: Vec<WordSummary>,
}

/// Evaluate every file and average the accuracies of the scorable words.
///
/// `on_word` sees each outcome as soon as it is computed. A malformed file
/// aborts the batch.
pub fn aggregate<I, S, F>(
    paths: &[PathBuf],
    inventory: &I,
    scorer: &S,
    options: AccuracyOptions,
    mut on_word: F,
) -> Result<BatchSummary, BatchError>
where
    I: SenseInventory + ?Sized,
    S: Scorer + ?Sized,
    F: FnMut(&WordOutcome),
{
    let mut words = Vec::with_capacity(paths.len());
    let mut total = 0.0;
    for path in paths {
        let outcome = evaluate_file(path, inventory, scorer, options)?;
        on_word(&outcome);
        let summary = WordSummary::from_outcome(&outcome);
        match summary.status {
            WordStatus::Scored => total += summary.accuracy.unwrap_or_default(),
            WordStatus::NotInInventory => {
                info!(word = %summary.word, "word missing from the sense inventory");
            }
            WordStatus::Unscorable => {
                warn!(word = %summary.word, "no prediction could be counted for any sense");
            }
        }
        words.push(summary);
    }

    let count = |status: WordStatus| words.iter().filter(|w| w.status == status).count();
    let scored = count(WordStatus::Scored);
    let errors = count(WordStatus::NotInInventory);
    let unscorable = count(WordStatus::Unscorable);
    if scored == 0 {
        return Err(BatchError::NoScoredWords {
            files: paths.len(),
            errors,
            unscorable,
        });
    }

    Ok(BatchSummary {
        files: paths.len(),
        scored,
        errors,
        unscorable,
        mean_accuracy: total / scored as f64,
        words,
    })
}

/// Up to `n` files chosen at random, in their original order.
///
/// A seed makes the choice reproducible.
pub fn sample_files(paths: &[PathBuf], n: usize, seed: Option<u64>) -> Vec<PathBuf> {
    if n >= paths.len() {
        return paths.to_vec();
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut chosen: Vec<usize> = (0..paths.len()).collect();
    chosen.shuffle(&mut rng);
    chosen.truncate(n);
    chosen.sort_unstable();
    chosen.into_iter().map(|idx| paths[idx].clone()).collect()
}

/// Short label for a corpus directory, e.g. `acronyms`.
pub fn corpus_label(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
