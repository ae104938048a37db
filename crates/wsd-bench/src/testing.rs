//! Hand-built sense inventory for unit tests.

use std::collections::HashMap;

use wordnet_db::SimilarityOption;
use wordnet_types::{Pos, SynsetId};

use crate::inventory::{SenseInventory, SignatureDepth};

pub(crate) fn noun(offset: u32) -> SynsetId {
    SynsetId {
        pos: Pos::Noun,
        offset,
    }
}

pub(crate) fn verb(offset: u32) -> SynsetId {
    SynsetId {
        pos: Pos::Verb,
        offset,
    }
}

struct FakeSense {
    lemma: String,
    id: SynsetId,
    gloss: String,
}

/// Senses, glosses and similarity scores spelled out by the test.
///
/// Similarities not listed are undefined, except that a sense is fully
/// similar (`1.0`) to itself.
#[derive(Default)]
pub(crate) struct FakeInventory {
    senses: Vec<FakeSense>,
    similarities: HashMap<(SynsetId, SynsetId), f64>,
}

impl FakeInventory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn sense(mut self, lemma: &str, id: SynsetId, gloss: &str) -> Self {
        self.senses.push(FakeSense {
            lemma: lemma.to_string(),
            id,
            gloss: gloss.to_string(),
        });
        self
    }

    pub(crate) fn similar(mut self, a: SynsetId, b: SynsetId, score: f64) -> Self {
        self.similarities.insert((a, b), score);
        self.similarities.insert((b, a), score);
        self
    }

    fn known(&self, lemma: &str) -> bool {
        self.senses.iter().any(|sense| sense.lemma == lemma)
    }
}

impl SenseInventory for FakeInventory {
    fn lemmatize(&self, surface: &str) -> String {
        let lower = surface.to_lowercase();
        match lower.strip_suffix('s') {
            Some(stem) if !self.known(&lower) && self.known(stem) => stem.to_string(),
            _ => lower,
        }
    }

    fn senses(&self, lemma: &str, pos: Option<Pos>) -> Vec<SynsetId> {
        self.senses
            .iter()
            .filter(|sense| sense.lemma == lemma)
            .filter(|sense| pos.is_none_or(|pos| sense.id.pos == pos))
            .map(|sense| sense.id)
            .collect()
    }

    fn similarity(&self, a: SynsetId, b: SynsetId, _option: SimilarityOption) -> Option<f64> {
        if a == b {
            return Some(1.0);
        }
        self.similarities.get(&(a, b)).copied()
    }

    fn signature(&self, sense: SynsetId, depth: SignatureDepth) -> Vec<String> {
        let Some(found) = self.senses.iter().find(|s| s.id == sense) else {
            return Vec::new();
        };
        match depth {
            SignatureDepth::Definition => vec![found.gloss.clone()],
            SignatureDepth::Extended | SignatureDepth::Related => {
                vec![found.gloss.clone(), found.lemma.clone()]
            }
        }
    }

    fn sense_name(&self, sense: SynsetId) -> String {
        let Some(found) = self.senses.iter().find(|s| s.id == sense) else {
            return sense.to_string();
        };
        let number = self
            .senses
            .iter()
            .filter(|s| s.lemma == found.lemma && s.id.pos == sense.pos)
            .position(|s| s.id == sense)
            .map_or(0, |idx| idx + 1);
        format!("{}.{}.{:02}", found.lemma, sense.pos.to_char(), number)
    }
}
