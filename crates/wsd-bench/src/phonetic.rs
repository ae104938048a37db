//! Soundex codes and edit distances between them.
//!
//! The phonetic signal compares how a word sounds against the words around
//! it: each word is reduced to its four-character Soundex code and codes are
//! compared by Levenshtein distance.

use once_cell::sync::Lazy;
use rphonetic::{Encoder, Soundex};

/// Length of a Soundex code, and the similarity of two identical codes.
pub const CODE_LEN: usize = 4;

static SOUNDEX: Lazy<Soundex> = Lazy::new(Soundex::default);

/// American Soundex code of `word`; empty when it has no ASCII letters.
pub fn phonetic_code(word: &str) -> String {
    let letters: String = word.chars().filter(char::is_ascii_alphabetic).collect();
    if letters.is_empty() {
        return String::new();
    }
    SOUNDEX.encode(&letters)
}

/// Levenshtein distance using a single row sized by the shorter input.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short: Vec<char> = short.chars().collect();
    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (j, lc) in long.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = j + 1;
        for (i, sc) in short.iter().enumerate() {
            let above = row[i + 1];
            row[i + 1] = if *sc == lc {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[i])
            };
            diagonal = above;
        }
    }
    row[short.len()]
}

/// `4 - mean code distance` between `word` and each whitespace token of `context`.
///
/// Not clamped, so very dissimilar contexts go negative. `None` for an empty context.
pub fn phonetic_similarity(word: &str, context: &str) -> Option<f64> {
    let code = phonetic_code(word);
    let distances: Vec<usize> = context
        .split_whitespace()
        .map(|token| edit_distance(&code, &phonetic_code(token)))
        .collect();
    if distances.is_empty() {
        return None;
    }
    let mean = distances.iter().sum::<usize>() as f64 / distances.len() as f64;
    Some(CODE_LEN as f64 - mean)
}

/// Pairwise code distances between the whitespace tokens of `context`.
pub fn distance_matrix(context: &str) -> Vec<Vec<usize>> {
    let codes: Vec<String> = context.split_whitespace().map(phonetic_code).collect();
    codes
        .iter()
        .map(|a| codes.iter().map(|b| edit_distance(a, b)).collect())
        .collect()
}
