//! Gloss-overlap (Lesk) disambiguation.

use std::collections::{HashMap, HashSet};
use std::fmt;

use wordnet_types::{Pos, SynsetId};

use crate::disambiguate::{Disambiguation, PosPolicy, RankedSense, candidate_senses, rank};
use crate::inventory::{SenseInventory, SignatureDepth};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LeskVariant {
    /// Context against the bare definition.
    Original,
    /// Context against definition, examples and lemma names.
    Simple,
    /// Simple signature extended with the related senses' signatures.
    Adapted,
    /// Cosine of term-frequency vectors over the simple signature.
    Cosine,
}

impl LeskVariant {
    pub const ALL: [LeskVariant; 4] = [
        LeskVariant::Original,
        LeskVariant::Simple,
        LeskVariant::Adapted,
        LeskVariant::Cosine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LeskVariant::Original => "original-lesk",
            LeskVariant::Simple => "simple-lesk",
            LeskVariant::Adapted => "adapted-lesk",
            LeskVariant::Cosine => "cosine-lesk",
        }
    }

    fn depth(self) -> SignatureDepth {
        match self {
            LeskVariant::Original => SignatureDepth::Definition,
            LeskVariant::Simple | LeskVariant::Cosine => SignatureDepth::Extended,
            LeskVariant::Adapted => SignatureDepth::Related,
        }
    }
}

impl fmt::Display for LeskVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Lowercased, lemmatized content words of `text`.
pub fn content_words<I>(inventory: &I, text: &str) -> Vec<String>
where
    I: SenseInventory + ?Sized,
{
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
        .map(|token| inventory.lemmatize(&token))
        .collect()
}

fn bag(words: Vec<String>) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for word in words {
        *counts.entry(word).or_insert(0.0) += 1.0;
    }
    counts
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(word, x)| b.get(word).map(|y| x * y))
        .sum();
    let norm = |v: &HashMap<String, f64>| v.values().map(|x| x * x).sum::<f64>().sqrt();
    let denominator = norm(a) * norm(b);
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}

/// Rank the senses of `ambiguous` by gloss overlap with `context`.
pub fn lesk<I>(
    inventory: &I,
    context: &str,
    ambiguous: &str,
    variant: LeskVariant,
    pos: Option<Pos>,
    policy: PosPolicy,
) -> Disambiguation
where
    I: SenseInventory + ?Sized,
{
    let lemma = inventory.lemmatize(ambiguous);
    let candidates = match candidate_senses(inventory, &lemma, pos, policy) {
        Ok(candidates) => candidates,
        Err(outcome) => return outcome,
    };

    let context_words = content_words(inventory, context);
    let context_set: HashSet<&str> = context_words.iter().map(String::as_str).collect();
    let context_bag = bag(context_words.clone());

    let signature_words = |sense: SynsetId| -> Vec<String> {
        inventory
            .signature(sense, variant.depth())
            .iter()
            .flat_map(|fragment| content_words(inventory, fragment))
            .collect()
    };

    let mut ranking: Vec<RankedSense> = candidates
        .into_iter()
        .map(|sense| {
            let words = signature_words(sense);
            let score = match variant {
                LeskVariant::Cosine => cosine(&context_bag, &bag(words)),
                _ => {
                    let signature: HashSet<&str> = words.iter().map(String::as_str).collect();
                    signature.intersection(&context_set).count() as f64
                }
            };
            RankedSense { sense, score }
        })
        .collect();

    rank(&mut ranking, false);
    Disambiguation::Ranked(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeInventory, noun};

    fn inventory() -> FakeInventory {
        FakeInventory::new()
            .sense("bank", noun(1), "sloping land beside a body of water")
            .sense("bank", noun(2), "a financial institution that accepts deposits")
            .sense("deposit", noun(3), "money put into an account")
    }

    #[test]
    fn content_words_drop_stopwords_and_lemmatize() {
        let inv = inventory();
        let words = content_words(&inv, "The Banks, of the river!");
        assert_eq!(words, vec!["bank".to_string(), "river".to_string()]);
    }

    #[test]
    fn every_variant_prefers_overlapping_gloss() {
        let inv = inventory();
        for variant in LeskVariant::ALL {
            let outcome = lesk(
                &inv,
                "I made deposits at the financial institution",
                "bank",
                variant,
                None,
                PosPolicy::Fallback,
            );
            assert_eq!(outcome.best(), Some(noun(2)), "{variant}");
        }
    }

    #[test]
    fn overlap_counts_distinct_shared_words() {
        let inv = inventory();
        let outcome = lesk(
            &inv,
            "water water land",
            "bank",
            LeskVariant::Original,
            None,
            PosPolicy::Fallback,
        );
        assert_eq!(outcome.ranking()[0].sense, noun(1));
        assert_eq!(outcome.ranking()[0].score, 2.0);
        assert_eq!(outcome.ranking()[1].score, 0.0);
    }

    #[test]
    fn absent_word_is_reported() {
        let inv = inventory();
        let outcome = lesk(
            &inv,
            "nothing here",
            "zyzzyva",
            LeskVariant::Simple,
            None,
            PosPolicy::Fallback,
        );
        assert_eq!(outcome, Disambiguation::NotInInventory);
    }

    #[test]
    fn cosine_of_disjoint_bags_is_zero() {
        let a = bag(vec!["river".into()]);
        let b = bag(vec!["money".into(), "money".into()]);
        assert_eq!(cosine(&a, &b), 0.0);
        assert!((cosine(&b, &b) - 1.0).abs() < 1e-12);
        assert_eq!(cosine(&a, &HashMap::new()), 0.0);
    }
}
