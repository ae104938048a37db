use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use wordnet_db::SimilarityOption;
use wordnet_types::Pos;

use crate::disambiguate::{Disambiguation, PosPolicy, max_similarity};
use crate::eval::Scorer;
use crate::inventory::SenseInventory;
use crate::lesk::{LeskVariant, lesk};

/// Every disambiguation method the harness can evaluate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Algorithm {
    Lesk(LeskVariant),
    MaxSimilarity(SimilarityOption),
}

impl Algorithm {
    /// Lesk variants first, then the similarity measures.
    pub fn all() -> impl Iterator<Item = Algorithm> {
        LeskVariant::ALL
            .into_iter()
            .map(Algorithm::Lesk)
            .chain(SimilarityOption::ALL.into_iter().map(Algorithm::MaxSimilarity))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Lesk(variant) => fmt::Display::fmt(variant, f),
            Algorithm::MaxSimilarity(SimilarityOption::Resnik) => f.pad("resnik"),
            Algorithm::MaxSimilarity(option) => fmt::Display::fmt(option, f),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown algorithm `{0}` (expected one of: {names})", names = algorithm_names())]
pub struct ParseAlgorithmError(String);

fn algorithm_names() -> String {
    Algorithm::all()
        .map(|algorithm| algorithm.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let lesk = match normalized.as_str() {
            "original-lesk" | "original" => Some(LeskVariant::Original),
            "simple-lesk" | "simple" => Some(LeskVariant::Simple),
            "adapted-lesk" | "adapted" => Some(LeskVariant::Adapted),
            "cosine-lesk" | "cosine" => Some(LeskVariant::Cosine),
            _ => None,
        };
        if let Some(variant) = lesk {
            return Ok(Algorithm::Lesk(variant));
        }
        normalized
            .parse::<SimilarityOption>()
            .map(Algorithm::MaxSimilarity)
            .map_err(|_| ParseAlgorithmError(s.to_string()))
    }
}

/// An [`Algorithm`] bound to an inventory and a part-of-speech filter.
pub struct AlgorithmScorer<'a, I: ?Sized> {
    pub inventory: &'a I,
    pub algorithm: Algorithm,
    pub pos: Option<Pos>,
    pub policy: PosPolicy,
}

impl<'a, I: SenseInventory + ?Sized> AlgorithmScorer<'a, I> {
    pub fn new(inventory: &'a I, algorithm: Algorithm) -> Self {
        Self {
            inventory,
            algorithm,
            pos: None,
            policy: PosPolicy::default(),
        }
    }

    pub fn with_pos(mut self, pos: Option<Pos>, policy: PosPolicy) -> Self {
        self.pos = pos;
        self.policy = policy;
        self
    }
}

impl<I: SenseInventory + ?Sized> Scorer for AlgorithmScorer<'_, I> {
    fn score(&self, sentence: &str, target: &str) -> Disambiguation {
        match self.algorithm {
            Algorithm::Lesk(variant) => lesk(
                self.inventory,
                sentence,
                target,
                variant,
                self.pos,
                self.policy,
            ),
            Algorithm::MaxSimilarity(option) => max_similarity(
                self.inventory,
                sentence,
                target,
                option,
                self.pos,
                self.policy,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeInventory, noun};

    #[test]
    fn names_round_trip() {
        for algorithm in Algorithm::all() {
            let name = algorithm.to_string();
            assert_eq!(name.parse::<Algorithm>().ok(), Some(algorithm), "{name}");
        }
        assert_eq!(
            "res".parse::<Algorithm>().ok(),
            Some(Algorithm::MaxSimilarity(SimilarityOption::Resnik))
        );
        assert_eq!(
            "Simple_Lesk".parse::<Algorithm>().ok(),
            Some(Algorithm::Lesk(LeskVariant::Simple))
        );
    }

    #[test]
    fn unknown_name_lists_choices() {
        let err = "magic".parse::<Algorithm>().unwrap_err().to_string();
        assert!(err.contains("magic"));
        assert!(err.contains("cosine-lesk"));
        assert!(err.contains("resnik"));
    }

    #[test]
    fn scorer_dispatches_to_algorithm() {
        let inv = FakeInventory::new()
            .sense("bank", noun(1), "land beside water")
            .sense("bank", noun(2), "financial institution")
            .sense("water", noun(3), "a liquid")
            .similar(noun(2), noun(3), 0.9);

        let lesk = AlgorithmScorer::new(&inv, Algorithm::Lesk(LeskVariant::Original));
        assert_eq!(lesk.score("water bank", "bank").best(), Some(noun(1)));

        let wup = AlgorithmScorer::new(&inv, "wup".parse().unwrap());
        assert_eq!(wup.score("water bank", "bank").best(), Some(noun(2)));
    }
}
