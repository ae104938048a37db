//! Max-similarity disambiguation, optionally blended with the phonetic signal.

use std::cmp::Ordering;

use tracing::debug;
use wordnet_db::SimilarityOption;
use wordnet_types::{Pos, SynsetId};

use crate::inventory::SenseInventory;
use crate::phonetic::phonetic_similarity;

/// A candidate sense and the score it was ranked by.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedSense {
    pub sense: SynsetId,
    pub score: f64,
}

/// Result of asking a scorer for the sense of a word.
#[derive(Clone, Debug, PartialEq)]
pub enum Disambiguation {
    /// The lemmatized word has no senses at all.
    NotInInventory,
    /// The word has senses, but none survived the part-of-speech filter.
    NoCandidates,
    /// Candidates, best first.
    Ranked(Vec<RankedSense>),
}

impl Disambiguation {
    pub fn best(&self) -> Option<SynsetId> {
        self.ranking().first().map(|ranked| ranked.sense)
    }

    pub fn ranking(&self) -> &[RankedSense] {
        match self {
            Disambiguation::Ranked(ranking) => ranking,
            _ => &[],
        }
    }
}

/// What to do when a part-of-speech filter removes every sense.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PosPolicy {
    /// Ignore the filter and use every sense.
    #[default]
    Fallback,
    /// Report [`Disambiguation::NoCandidates`].
    Strict,
}

/// Senses of `lemma` a scorer should choose between.
pub(crate) fn candidate_senses<I>(
    inventory: &I,
    lemma: &str,
    pos: Option<Pos>,
    policy: PosPolicy,
) -> Result<Vec<SynsetId>, Disambiguation>
where
    I: SenseInventory + ?Sized,
{
    let all = inventory.senses(lemma, None);
    if all.is_empty() {
        return Err(Disambiguation::NotInInventory);
    }
    let Some(pos) = pos else {
        return Ok(all);
    };
    let filtered: Vec<SynsetId> = all.iter().copied().filter(|id| id.pos == pos).collect();
    match (filtered.is_empty(), policy) {
        (false, _) => Ok(filtered),
        (true, PosPolicy::Fallback) => Ok(all),
        (true, PosPolicy::Strict) => Err(Disambiguation::NoCandidates),
    }
}

/// Stable sort so equal scores keep inventory order.
pub(crate) fn rank(ranking: &mut [RankedSense], ascending: bool) {
    let order = |a: &RankedSense, b: &RankedSense| -> Ordering { a.score.total_cmp(&b.score) };
    if ascending {
        ranking.sort_by(order);
    } else {
        ranking.sort_by(|a, b| order(b, a));
    }
}

/// Whitespace tokens of `context` with surrounding punctuation removed.
pub(crate) fn context_tokens(context: &str) -> impl Iterator<Item = &str> {
    context
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty())
}

/// Rank the senses of `ambiguous` by their summed similarity to the context.
///
/// For every context word the best similarity over that word's senses is
/// taken, and may be negative (0 when none of its senses compare). Under
/// [`SimilarityOption::Path`] each term is blended half and half with the
/// phonetic similarity of the two words, halved. Information-content measures rank ascending, the rest descending.
pub fn max_similarity<I>(
    inventory: &I,
    context: &str,
    ambiguous: &str,
    option: SimilarityOption,
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
    let blend = option == SimilarityOption::Path;

    let context_words: Vec<(Vec<SynsetId>, f64)> = context_tokens(context)
        .map(|token| {
            let senses = inventory.senses(&inventory.lemmatize(token), None);
            let phonetic = if blend {
                phonetic_similarity(ambiguous, token).unwrap_or(0.0)
            } else {
                0.0
            };
            (senses, phonetic)
        })
        .collect();

    let mut ranking: Vec<RankedSense> = candidates
        .into_iter()
        .map(|sense| {
            let score = context_words
                .iter()
                .map(|(senses, phonetic)| {
                    let best = senses
                        .iter()
                        .filter_map(|other| inventory.similarity(sense, *other, option))
                        .reduce(f64::max)
                        .unwrap_or(0.0);
                    if blend {
                        0.5 * best + 0.5 * (phonetic / 2.0)
                    } else {
                        best
                    }
                })
                .sum();
            RankedSense { sense, score }
        })
        .collect();

    rank(&mut ranking, option.ranks_ascending());
    debug!(word = ambiguous, %option, candidates = ranking.len(), "ranked senses");
    Disambiguation::Ranked(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeInventory, noun, verb};

    fn bank_inventory() -> FakeInventory {
        FakeInventory::new()
            .sense("bank", noun(1), "sloping land beside a river")
            .sense("bank", noun(2), "financial institution")
            .sense("bank", verb(3), "tip laterally")
            .sense("river", noun(10), "a large stream")
            .sense("money", noun(20), "medium of exchange")
            .similar(noun(1), noun(10), 0.5)
            .similar(noun(2), noun(20), 0.25)
    }

    #[test]
    fn absent_word_is_not_in_inventory() {
        let inv = bank_inventory();
        let outcome = max_similarity(
            &inv,
            "the zyzzyva sat",
            "zyzzyva",
            SimilarityOption::WuPalmer,
            None,
            PosPolicy::Fallback,
        );
        assert_eq!(outcome, Disambiguation::NotInInventory);
        assert_eq!(outcome.best(), None);
    }

    #[test]
    fn picks_sense_most_similar_to_context() {
        let inv = bank_inventory();
        let river = max_similarity(
            &inv,
            "we walked along the river bank.",
            "bank",
            SimilarityOption::WuPalmer,
            None,
            PosPolicy::Fallback,
        );
        assert_eq!(river.best(), Some(noun(1)));

        let money = max_similarity(
            &inv,
            "she took money to the bank",
            "bank",
            SimilarityOption::WuPalmer,
            None,
            PosPolicy::Fallback,
        );
        assert_eq!(money.best(), Some(noun(2)));
        assert_eq!(money.ranking().len(), 3);
    }

    #[test]
    fn information_content_measures_rank_lowest_first() {
        let inv = bank_inventory();
        let outcome = max_similarity(
            &inv,
            "river bank",
            "bank",
            SimilarityOption::Resnik,
            None,
            PosPolicy::Fallback,
        );
        let scores: Vec<f64> = outcome.ranking().iter().map(|r| r.score).collect();
        assert!(scores.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(outcome.best(), Some(noun(2)));
    }

    #[test]
    fn ties_keep_inventory_order() {
        let inv = bank_inventory();
        let outcome = max_similarity(
            &inv,
            "bank",
            "bank",
            SimilarityOption::LeacockChodorow,
            None,
            PosPolicy::Fallback,
        );
        let order: Vec<SynsetId> = outcome.ranking().iter().map(|r| r.sense).collect();
        assert_eq!(order, vec![noun(1), noun(2), verb(3)]);
    }

    #[test]
    fn path_blends_in_phonetic_similarity() {
        let inv = bank_inventory();
        let context = "river";
        let outcome = max_similarity(
            &inv,
            context,
            "bank",
            SimilarityOption::Path,
            None,
            PosPolicy::Fallback,
        );
        let phonetic = phonetic_similarity("bank", context).unwrap();
        let top = outcome.ranking()[0];
        assert_eq!(top.sense, noun(1));
        assert!((top.score - (0.5 * 0.5 + 0.5 * (phonetic / 2.0))).abs() < 1e-12);
    }

    #[test]
    fn negative_similarities_are_kept() {
        let inv = bank_inventory()
            .similar(noun(1), noun(20), -0.25)
            .similar(noun(2), noun(20), -0.5);
        let outcome = max_similarity(
            &inv,
            "money",
            "bank",
            SimilarityOption::LeacockChodorow,
            Some(Pos::Noun),
            PosPolicy::Strict,
        );
        let ranking = outcome.ranking();
        assert_eq!(ranking[0].sense, noun(1));
        assert_eq!(ranking[0].score, -0.25);
        assert_eq!(ranking[1].score, -0.5);
    }

    #[test]
    fn pos_filter_falls_back_unless_strict() {
        let inv = bank_inventory();
        let verbs = max_similarity(
            &inv,
            "river bank",
            "bank",
            SimilarityOption::WuPalmer,
            Some(Pos::Verb),
            PosPolicy::Fallback,
        );
        assert_eq!(verbs.best(), Some(verb(3)));
        assert_eq!(verbs.ranking().len(), 1);

        let adjectives = |policy| {
            max_similarity(
                &inv,
                "river bank",
                "bank",
                SimilarityOption::WuPalmer,
                Some(Pos::Adj),
                policy,
            )
        };
        assert_eq!(adjectives(PosPolicy::Fallback).ranking().len(), 3);
        assert_eq!(adjectives(PosPolicy::Strict), Disambiguation::NoCandidates);
    }
}
