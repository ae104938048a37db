//! Confusion matrices and per-word accuracy.
//!
//! Every example of a word is run through a [`Scorer`]; the predicted sense
//! is located among the word's candidate senses and counted against the
//! annotated (gold) sense. Predictions that cannot be placed are counted
//! separately instead of vanishing, and [`UnmatchedPolicy`] decides whether
//! they weigh on the accuracy.

use std::path::Path;

use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;
use serde::Serialize;
use tracing::debug;
use wordnet_types::SynsetId;

use crate::dataset::{DatasetError, Word};
use crate::disambiguate::Disambiguation;
use crate::inventory::SenseInventory;

/// Anything that can pick a sense for `target` in `sentence`.
pub trait Scorer {
    fn score(&self, sentence: &str, target: &str) -> Disambiguation;
}

impl<F> Scorer for F
where
    F: Fn(&str, &str) -> Disambiguation,
{
    fn score(&self, sentence: &str, target: &str) -> Disambiguation {
        self(sentence, target)
    }
}

/// Where a single prediction ended up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placement {
    Candidate(usize),
    Unmatched,
    Abstained,
}

/// Gold senses (rows) against candidate senses (columns).
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix {
    candidates: Vec<SynsetId>,
    counts: Vec<Vec<u32>>,
    unmatched: Vec<u32>,
    abstained: Vec<u32>,
}

impl ConfusionMatrix {
    pub fn new(sense_count: u32, candidates: Vec<SynsetId>) -> Self {
        let rows = sense_count as usize;
        Self {
            counts: vec![vec![0; candidates.len()]; rows],
            unmatched: vec![0; rows],
            abstained: vec![0; rows],
            candidates,
        }
    }

    /// Count one prediction for the 1-based `gold` sense.
    ///
    /// `None` when `gold` has no row; nothing is counted then.
    pub fn record(&mut self, gold: u32, prediction: Option<SynsetId>) -> Option<Placement> {
        let row = (gold as usize).checked_sub(1)?;
        if row >= self.counts.len() {
            return None;
        }
        let placement = match prediction {
            None => Placement::Abstained,
            Some(sense) => match self.candidates.iter().position(|c| *c == sense) {
                Some(col) => Placement::Candidate(col),
                None => Placement::Unmatched,
            },
        };
        match placement {
            Placement::Candidate(col) => self.counts[row][col] += 1,
            Placement::Unmatched => self.unmatched[row] += 1,
            Placement::Abstained => self.abstained[row] += 1,
        }
        Some(placement)
    }

    pub fn candidates(&self) -> &[SynsetId] {
        &self.candidates
    }

    pub fn sense_count(&self) -> usize {
        self.counts.len()
    }

    /// Counts for the 0-based gold row.
    pub fn row(&self, row: usize) -> &[u32] {
        self.counts.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn unmatched(&self, row: usize) -> u32 {
        self.unmatched.get(row).copied().unwrap_or(0)
    }

    pub fn abstained(&self, row: usize) -> u32 {
        self.abstained.get(row).copied().unwrap_or(0)
    }

    /// Predictions kept out of the grid, over all rows.
    pub fn discarded(&self) -> u32 {
        self.unmatched.iter().chain(&self.abstained).sum()
    }
}

/// Whether predictions outside the grid count against a sense.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum UnmatchedPolicy {
    /// Unmatched and abstained predictions enlarge the row total.
    #[default]
    CountAsMiss,
    /// Only predictions inside the grid are considered.
    Drop,
}

/// How a gold sense is tied to the candidate it is judged against.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Attribution {
    /// Each candidate backs at most one gold sense, chosen to maximise the
    /// summed per-sense accuracy.
    #[default]
    Exclusive,
    /// Each gold sense takes its own most frequent candidate.
    RowMax,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AccuracyOptions {
    pub unmatched: UnmatchedPolicy,
    pub attribution: Attribution,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SenseAccuracy {
    /// 1-based gold sense.
    pub gold: u32,
    /// Column the sense was judged against.
    pub candidate: Option<usize>,
    pub correct: u32,
    pub total: u32,
    /// `None` for a sense with no counted predictions.
    pub accuracy: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordAccuracy {
    pub senses: Vec<SenseAccuracy>,
    /// Mean over senses with an accuracy; `None` when there are none.
    pub mean: Option<f64>,
}

/// Per-sense and mean accuracy of a confusion matrix.
pub fn accuracy(matrix: &ConfusionMatrix, options: AccuracyOptions) -> WordAccuracy {
    let totals: Vec<u32> = (0..matrix.sense_count())
        .map(|row| {
            let counted: u32 = matrix.row(row).iter().sum();
            match options.unmatched {
                UnmatchedPolicy::CountAsMiss => {
                    counted + matrix.unmatched(row) + matrix.abstained(row)
                }
                UnmatchedPolicy::Drop => counted,
            }
        })
        .collect();
    let assignment = match options.attribution {
        Attribution::Exclusive => exclusive_assignment(matrix, &totals),
        Attribution::RowMax => (0..matrix.sense_count())
            .map(|row| row_max(matrix.row(row)))
            .collect(),
    };

    let senses: Vec<SenseAccuracy> = assignment
        .into_iter()
        .zip(totals)
        .enumerate()
        .map(|(row, (candidate, total))| {
            let correct = candidate.map_or(0, |col| matrix.row(row)[col]);
            SenseAccuracy {
                gold: row as u32 + 1,
                candidate,
                correct,
                total,
                accuracy: (total > 0).then(|| f64::from(correct) / f64::from(total)),
            }
        })
        .collect();

    let scored: Vec<f64> = senses.iter().filter_map(|sense| sense.accuracy).collect();
    let mean = (!scored.is_empty()).then(|| scored.iter().sum::<f64>() / scored.len() as f64);
    WordAccuracy { senses, mean }
}

/// First column holding the row maximum.
fn row_max(cells: &[u32]) -> Option<usize> {
    let max = *cells.iter().max()?;
    cells.iter().position(|count| *count == max)
}

/// Fixed-point resolution of a per-sense accuracy in the assignment weights.
const ACCURACY_SCALE: f64 = 1e9;

/// Give every gold row a distinct column so that the summed per-sense
/// accuracy is as large as possible.
///
/// Among equally good assignments the lower gold sense keeps the larger
/// cell. Rows left without a real column get `None`.
fn exclusive_assignment(matrix: &ConfusionMatrix, totals: &[u32]) -> Vec<Option<usize>> {
    let rows = matrix.sense_count();
    let cols = matrix.candidates().len();
    let size = rows.max(cols);
    if rows == 0 || cols == 0 {
        return vec![None; rows];
    }

    // The tie-break term summed over any assignment stays below `tie_span`.
    let counted: i64 = (0..rows)
        .flat_map(|row| matrix.row(row).iter())
        .map(|count| i64::from(*count))
        .sum();
    let tie_span = counted * rows as i64 + 1;

    let mut weights = Matrix::new(size, size, 0i64);
    for (row, total) in totals.iter().enumerate() {
        if *total == 0 {
            continue;
        }
        for (col, count) in matrix.row(row).iter().enumerate() {
            let share = (f64::from(*count) / f64::from(*total) * ACCURACY_SCALE).round() as i64;
            let preference = i64::from(*count) * (rows - row) as i64;
            weights[(row, col)] = share * tie_span + preference;
        }
    }

    let (_, assigned) = kuhn_munkres(&weights);
    assigned
        .into_iter()
        .take(rows)
        .map(|col| (col < cols).then_some(col))
        .collect()
}

/// Outcome of running a scorer over every example of a word.
#[derive(Clone, Debug, PartialEq)]
pub enum WordScore {
    NotInInventory,
    Scored(ConfusionMatrix),
}

/// Build the confusion matrix of `word` under `scorer`.
pub fn score_word<I, S>(word: &Word, inventory: &I, scorer: &S) -> WordScore
where
    I: SenseInventory + ?Sized,
    S: Scorer + ?Sized,
{
    let lemma = inventory.lemmatize(word.surface_form());
    let candidates = inventory.senses(&lemma, None);
    if candidates.is_empty() {
        debug!(word = word.surface_form(), "not in the sense inventory");
        return WordScore::NotInInventory;
    }

    let mut matrix = ConfusionMatrix::new(word.sense_count(), candidates);
    for example in word.examples() {
        let prediction = scorer.score(&example.sentence, word.surface_form()).best();
        let placement = matrix.record(example.gold_sense, prediction);
        debug_assert!(
            placement.is_some(),
            "gold sense {} has no row",
            example.gold_sense
        );
    }
    debug!(
        word = word.surface_form(),
        examples = word.examples().len(),
        discarded = matrix.discarded(),
        "word scored"
    );
    WordScore::Scored(matrix)
}

/// A scored word together with its accuracy.
#[derive(Clone, Debug)]
pub struct WordEvaluation {
    pub word: Word,
    pub matrix: ConfusionMatrix,
    pub accuracy: WordAccuracy,
}

#[derive(Clone, Debug)]
pub enum WordOutcome {
    NotInInventory(Word),
    Scored(WordEvaluation),
}

impl WordOutcome {
    pub fn word(&self) -> &Word {
        match self {
            WordOutcome::NotInInventory(word) => word,
            WordOutcome::Scored(evaluation) => &evaluation.word,
        }
    }

    /// Mean accuracy, when the word could be scored at all.
    pub fn mean_accuracy(&self) -> Option<f64> {
        match self {
            WordOutcome::NotInInventory(_) => None,
            WordOutcome::Scored(evaluation) => evaluation.accuracy.mean,
        }
    }
}

/// Parse, score and measure one dataset file.
pub fn evaluate_word<I, S>(
    word: Word,
    inventory: &I,
    scorer: &S,
    options: AccuracyOptions,
) -> WordOutcome
where
    I: SenseInventory + ?Sized,
    S: Scorer + ?Sized,
{
    match score_word(&word, inventory, scorer) {
        WordScore::NotInInventory => WordOutcome::NotInInventory(word),
        WordScore::Scored(matrix) => {
            let accuracy = accuracy(&matrix, options);
            WordOutcome::Scored(WordEvaluation {
                word,
                matrix,
                accuracy,
            })
        }
    }
}

/// [`evaluate_word`] on the word parsed from `path`.
pub fn evaluate_file<I, S>(
    path: impl AsRef<Path>,
    inventory: &I,
    scorer: &S,
    options: AccuracyOptions,
) -> Result<WordOutcome, DatasetError>
where
    I: SenseInventory + ?Sized,
    S: Scorer + ?Sized,
{
    let word = Word::from_path(path)?;
    Ok(evaluate_word(word, inventory, scorer, options))
}
