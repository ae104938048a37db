//! Console and JSON reports.

use std::io::{self, Write};

use serde::Serialize;

use crate::batch::BatchSummary;
use crate::disambiguate::Disambiguation;
use crate::eval::{WordEvaluation, WordOutcome};
use crate::inventory::{SenseInventory, SignatureDepth};
use crate::phonetic::{distance_matrix, phonetic_code};

fn percent(value: f64) -> String {
    format!("{:.2}", value * 100.0)
}

/// Per-sense breakdown and average of one word.
pub fn write_word_report<W, I>(out: &mut W, outcome: &WordOutcome, inventory: &I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: SenseInventory + ?Sized,
{
    match outcome {
        WordOutcome::NotInInventory(word) => {
            writeln!(
                out,
                "The word {} is not in the Wordnet database\n",
                word.surface_form()
            )
        }
        WordOutcome::Scored(evaluation) => write_evaluation(out, evaluation, inventory),
    }
}

fn write_evaluation<W, I>(out: &mut W, evaluation: &WordEvaluation, inventory: &I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: SenseInventory + ?Sized,
{
    let matrix = &evaluation.matrix;
    let names: Vec<String> = matrix
        .candidates()
        .iter()
        .map(|sense| inventory.sense_name(*sense))
        .collect();

    for sense in &evaluation.accuracy.senses {
        let row = (sense.gold - 1) as usize;
        writeln!(out, "M{} was disambiguated as:", sense.gold)?;
        for (count, name) in matrix.row(row).iter().zip(&names) {
            writeln!(out, "{count} times as the synset {name}")?;
        }
        let unmatched = matrix.unmatched(row);
        let abstained = matrix.abstained(row);
        if unmatched + abstained > 0 {
            writeln!(
                out,
                "{unmatched} times outside the candidate synsets, {abstained} times without a sense"
            )?;
        }
        match (sense.accuracy, sense.candidate) {
            (Some(accuracy), Some(col)) => writeln!(
                out,
                "M{} has an accuracy of {}% corresponding to the synset {}",
                sense.gold,
                percent(accuracy),
                names[col]
            )?,
            (Some(accuracy), None) => writeln!(
                out,
                "M{} has an accuracy of {}%",
                sense.gold,
                percent(accuracy)
            )?,
            (None, _) => writeln!(out, "M{} has no counted prediction", sense.gold)?,
        }
    }

    let word = evaluation.word.surface_form();
    match evaluation.accuracy.mean {
        Some(mean) => writeln!(
            out,
            "\nThe word {word} has an average accuracy equals to {}%\n",
            percent(mean)
        ),
        None => writeln!(out, "\nThe word {word} could not be scored\n"),
    }
}

/// One-line summary of a batch, e.g. `for 10 acronyms: 62.50% considering 2 missing ...`.
pub fn write_batch_summary<W>(out: &mut W, label: &str, summary: &BatchSummary) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(
        out,
        "for {} {label}: {}% considering {} missing from the wordnet database",
        summary.files,
        percent(summary.mean_accuracy),
        summary.errors
    )?;
    if summary.unscorable > 0 {
        writeln!(
            out,
            "{} words had no counted prediction and were left out",
            summary.unscorable
        )?;
    }
    Ok(())
}

/// The chosen sense, or the whole ranking with `all`.
pub fn write_disambiguation<W, I>(
    out: &mut W,
    word: &str,
    outcome: &Disambiguation,
    inventory: &I,
    all: bool,
) -> io::Result<()>
where
    W: Write + ?Sized,
    I: SenseInventory + ?Sized,
{
    match outcome {
        Disambiguation::NotInInventory => {
            writeln!(out, "The word {word} is not in the Wordnet database")
        }
        Disambiguation::NoCandidates => {
            writeln!(out, "The word {word} has no sense with the requested part of speech")
        }
        Disambiguation::Ranked(ranking) => {
            let shown = if all { ranking.len() } else { 1 };
            for ranked in ranking.iter().take(shown) {
                let definition = inventory
                    .signature(ranked.sense, SignatureDepth::Definition)
                    .join(" ");
                writeln!(
                    out,
                    "{:<20} {:>10.4}  {definition}",
                    inventory.sense_name(ranked.sense),
                    ranked.score
                )?;
            }
            Ok(())
        }
    }
}

/// Soundex codes of the context tokens followed by their distance matrix.
pub fn write_distance_matrix<W>(out: &mut W, context: &str) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let tokens: Vec<&str> = context.split_whitespace().collect();
    let codes: Vec<String> = tokens
        .iter()
        .map(|token| phonetic_code(token))
        .collect();
    for (token, code) in tokens.iter().zip(&codes) {
        writeln!(out, "{token}: {code}")?;
    }
    for row in distance_matrix(context) {
        let cells: Vec<String> = row.iter().map(usize::to_string).collect();
        writeln!(out, "{}", cells.join(" "))?;
    }
    Ok(())
}

/// Pretty-printed JSON followed by a newline.
pub fn write_json<W, T>(out: &mut W, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
