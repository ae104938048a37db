//! The sense inventory consulted by every scorer.
//!
//! Scorers only see [`SenseInventory`], so they can be exercised against a
//! handful of hand-written senses as easily as against a full WordNet.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use wordnet_db::{LoadMode, SimilarityOption, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::{Pos, Relation, Synset, SynsetId};

/// How much gloss text goes into a Lesk signature.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SignatureDepth {
    /// The definition only.
    Definition,
    /// Definition, usage examples and lemma names.
    Extended,
    /// [`SignatureDepth::Extended`] for the sense and its related senses.
    Related,
}

/// Read-only lexical knowledge used to rank senses.
pub trait SenseInventory {
    /// Dictionary form of a surface word; the normalized surface when unknown.
    fn lemmatize(&self, surface: &str) -> String;

    /// Senses of `lemma` in inventory order, restricted to `pos` when given.
    fn senses(&self, lemma: &str, pos: Option<Pos>) -> Vec<SynsetId>;

    /// Pairwise similarity; `None` when the measure is undefined for the pair.
    fn similarity(&self, a: SynsetId, b: SynsetId, option: SimilarityOption) -> Option<f64>;

    /// Gloss fragments describing `sense`, for overlap scoring.
    fn signature(&self, sense: SynsetId, depth: SignatureDepth) -> Vec<String>;

    /// Human-readable sense name such as `bank.n.02`.
    fn sense_name(&self, sense: SynsetId) -> String;
}

const SIGNATURE_RELATIONS: [Relation; 10] = [
    Relation::Hypernym,
    Relation::InstanceHypernym,
    Relation::Hyponym,
    Relation::InstanceHyponym,
    Relation::MemberHolonym,
    Relation::PartHolonym,
    Relation::MemberMeronym,
    Relation::PartMeronym,
    Relation::SimilarTo,
    Relation::AlsoSee,
];

/// [`SenseInventory`] backed by a loaded WordNet dictionary.
pub struct WordNetInventory {
    wordnet: WordNet,
    morphy: Morphy,
}

impl WordNetInventory {
    pub fn new(wordnet: WordNet, morphy: Morphy) -> Self {
        Self { wordnet, morphy }
    }

    /// Load the dictionary and its exception lists from `dict_dir`.
    pub fn load(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let start = Instant::now();
        let wordnet = WordNet::load_with_mode(dir, mode)?;
        let morphy = Morphy::load(dir)?;
        info!(
            synsets = wordnet.synset_count(),
            lemmas = wordnet.index_count(),
            "wordnet loaded in {} ms",
            start.elapsed().as_millis()
        );
        Ok(Self::new(wordnet, morphy))
    }

    pub fn wordnet(&self) -> &WordNet {
        &self.wordnet
    }
}

fn push_extended(out: &mut Vec<String>, synset: &Synset<'_>) {
    out.push(synset.gloss.definition.to_string());
    out.extend(synset.gloss.examples.iter().map(|ex| ex.to_string()));
    out.extend(synset.lemmas.iter().map(|lemma| lemma.replace('_', " ")));
}

impl SenseInventory for WordNetInventory {
    fn lemmatize(&self, surface: &str) -> String {
        self.morphy
            .lemmatize(surface, None, |pos, lemma| self.wordnet.lemma_exists(pos, lemma))
    }

    fn senses(&self, lemma: &str, pos: Option<Pos>) -> Vec<SynsetId> {
        match pos {
            Some(pos) => self.wordnet.synsets_for_lemma(pos, lemma).to_vec(),
            None => self.wordnet.synsets_any_pos(lemma),
        }
    }

    fn similarity(&self, a: SynsetId, b: SynsetId, option: SimilarityOption) -> Option<f64> {
        self.wordnet.similarity(a, b, option)
    }

    fn signature(&self, sense: SynsetId, depth: SignatureDepth) -> Vec<String> {
        let Some(synset) = self.wordnet.get_synset(sense) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        match depth {
            SignatureDepth::Definition => out.push(synset.gloss.definition.to_string()),
            SignatureDepth::Extended => push_extended(&mut out, &synset),
            SignatureDepth::Related => {
                push_extended(&mut out, &synset);
                for relation in SIGNATURE_RELATIONS {
                    for target in synset.related(relation) {
                        if let Some(related) = self.wordnet.get_synset(target) {
                            push_extended(&mut out, &related);
                        }
                    }
                }
            }
        }
        out
    }

    fn sense_name(&self, sense: SynsetId) -> String {
        self.wordnet
            .sense_name(sense)
            .unwrap_or_else(|| sense.to_string())
    }
}
