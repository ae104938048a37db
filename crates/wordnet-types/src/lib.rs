//! Shared, zero-copy types for reading WordNet as a sense inventory.
//!
//! Text fields borrow from a backing buffer (`&str`); identifiers stay in
//! their raw file representation (`offset`, `ss_type`). Pointer symbols are
//! decoded into [`Relation`] so callers can walk the taxonomy without
//! re-parsing symbol strings.
//!
//! ```rust
//! use wordnet_types::{Pos, Relation, SynsetId};
//!
//! let pos = Pos::from_char('n').unwrap();
//! let id = SynsetId { pos, offset: 1740 };
//! assert_eq!(id.to_string(), "n:00001740");
//! assert_eq!(Relation::from_symbol("@i"), Some(Relation::InstanceHypernym));
//! ```

use std::fmt;

/// Part-of-speech marker as used by WordNet files (`n`, `v`, `a`/`s`, `r`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    /// Lookup order used when no part of speech is requested.
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character into an enum.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*`/`data.*`.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix of the `index.*`/`data.*` file holding this POS.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }

    /// Parse a user-facing POS name (`n`, `noun`, `v`, `verb`, ...).
    pub fn parse_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "n" | "noun" => Some(Pos::Noun),
            "v" | "verb" => Some(Pos::Verb),
            "a" | "s" | "adj" | "adjective" => Some(Pos::Adj),
            "r" | "adv" | "adverb" => Some(Pos::Adv),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Pos::Noun => 0,
            Pos::Verb => 1,
            Pos::Adj => 2,
            Pos::Adv => 3,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        })
    }
}

/// Fixed-size table keyed by [`Pos`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerPos<T>([T; 4]);

impl<T> PerPos<T> {
    pub fn from_fn(mut f: impl FnMut(Pos) -> T) -> Self {
        Self(Pos::ALL.map(&mut f))
    }

    /// Fallible counterpart of [`PerPos::from_fn`], stopping at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Pos) -> Result<T, E>) -> Result<Self, E> {
        let [noun, verb, adj, adv] = Pos::ALL;
        Ok(Self([f(noun)?, f(verb)?, f(adj)?, f(adv)?]))
    }

    pub fn get(&self, pos: Pos) -> &T {
        &self.0[pos.index()]
    }

    pub fn get_mut(&mut self, pos: Pos) -> &mut T {
        &mut self.0[pos.index()]
    }
}

/// `(offset, pos)` pair uniquely identifying a synset within the WordNet files.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u32,
}

impl fmt::Display for SynsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:08}", self.pos.to_char(), self.offset)
    }
}

/// Raw `ss_type` marker from `data.*`, including adjective satellites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SynsetType {
    Noun,
    Verb,
    Adj,
    Adv,
    AdjSatellite,
}

impl SynsetType {
    /// Parse the `ss_type` character from a data line.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(SynsetType::Noun),
            'v' => Some(SynsetType::Verb),
            'a' => Some(SynsetType::Adj),
            's' => Some(SynsetType::AdjSatellite),
            'r' => Some(SynsetType::Adv),
            _ => None,
        }
    }
}

/// Semantic and lexical relations encoded by pointer symbols.
///
/// Only the relations used by similarity measures and gloss-overlap
/// signatures are decoded; other symbols are skipped by the loader.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Relation {
    Hypernym,
    InstanceHypernym,
    Hyponym,
    InstanceHyponym,
    MemberHolonym,
    SubstanceHolonym,
    PartHolonym,
    MemberMeronym,
    SubstanceMeronym,
    PartMeronym,
    Antonym,
    SimilarTo,
    AlsoSee,
    Attribute,
    Entailment,
    Cause,
    VerbGroup,
}

impl Relation {
    /// Decode a `data.*` pointer symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let rel = match symbol {
            "@" => Relation::Hypernym,
            "@i" => Relation::InstanceHypernym,
            "~" => Relation::Hyponym,
            "~i" => Relation::InstanceHyponym,
            "#m" => Relation::MemberHolonym,
            "#s" => Relation::SubstanceHolonym,
            "#p" => Relation::PartHolonym,
            "%m" => Relation::MemberMeronym,
            "%s" => Relation::SubstanceMeronym,
            "%p" => Relation::PartMeronym,
            "!" => Relation::Antonym,
            "&" => Relation::SimilarTo,
            "^" => Relation::AlsoSee,
            "=" => Relation::Attribute,
            "*" => Relation::Entailment,
            ">" => Relation::Cause,
            "$" => Relation::VerbGroup,
            _ => return None,
        };
        Some(rel)
    }

    /// Whether this pointer climbs the is-a taxonomy.
    pub fn is_hypernym(self) -> bool {
        matches!(self, Relation::Hypernym | Relation::InstanceHypernym)
    }
}

/// Parsed gloss with convenience helpers while keeping the raw text intact.
#[derive(Clone, Debug)]
pub struct Gloss<'a> {
    pub raw: &'a str,
    pub definition: &'a str,
    pub examples: Vec<&'a str>,
}

/// Synset record restricted to the fields a sense inventory needs.
#[derive(Clone, Debug)]
pub struct Synset<'a> {
    pub id: SynsetId,
    pub synset_type: SynsetType,
    pub lemmas: Vec<&'a str>,
    pub relations: &'a [(Relation, SynsetId)],
    pub gloss: Gloss<'a>,
}

impl Synset<'_> {
    /// Targets of every pointer carrying `relation`.
    pub fn related(&self, relation: Relation) -> impl Iterator<Item = SynsetId> + '_ {
        self.relations
            .iter()
            .filter(move |(rel, _)| *rel == relation)
            .map(|(_, target)| *target)
    }

    /// Direct hypernyms, including instance hypernyms.
    pub fn hypernyms(&self) -> impl Iterator<Item = SynsetId> + '_ {
        self.relations
            .iter()
            .filter(|(rel, _)| rel.is_hypernym())
            .map(|(_, target)| *target)
    }
}

/// Index record from `index.*`: a lemma and its ordered senses.
#[derive(Clone, Debug)]
pub struct IndexEntry<'a> {
    pub lemma: &'a str,
    pub pos: Pos,
    pub tagsense_cnt: u32,
    pub synset_offsets: &'a [u32],
}

impl IndexEntry<'_> {
    /// 1-based sense number of `offset` for this lemma.
    pub fn sense_number(&self, offset: u32) -> Option<u32> {
        self.synset_offsets
            .iter()
            .position(|off| *off == offset)
            .map(|idx| idx as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_taxonomy_symbols() {
        assert_eq!(Relation::from_symbol("@"), Some(Relation::Hypernym));
        assert!(Relation::InstanceHypernym.is_hypernym());
        assert!(!Relation::Hyponym.is_hypernym());
        assert_eq!(Relation::from_symbol("+"), None);
    }

    #[test]
    fn satellites_fold_into_adjectives() {
        assert_eq!(Pos::from_char('s'), Some(Pos::Adj));
        assert_eq!(Pos::parse_name("Noun"), Some(Pos::Noun));
        assert_eq!(Pos::parse_name("x"), None);
    }

    #[test]
    fn per_pos_table_is_keyed_by_pos() {
        let mut table = PerPos::from_fn(|pos| pos.to_char().to_string());
        table.get_mut(Pos::Verb).push('!');
        assert_eq!(table.get(Pos::Verb), "v!");
        assert_eq!(table.get(Pos::Adv), "r");
    }

    #[test]
    fn sense_numbers_are_one_based() {
        let offsets = [10, 20, 30];
        let entry = IndexEntry {
            lemma: "bank",
            pos: Pos::Noun,
            tagsense_cnt: 2,
            synset_offsets: &offsets,
        };
        assert_eq!(entry.sense_number(20), Some(2));
        assert_eq!(entry.sense_number(40), None);
    }
}
