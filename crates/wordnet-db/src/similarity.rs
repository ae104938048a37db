//! Pairwise synset similarity measures.
//!
//! Taxonomy measures (`path`, `lch`, `wup`) count hypernym edges; the
//! information-content measures (`res`, `jcn`, `lin`) weigh the lowest common
//! subsumer by how rare it is in the sense-tagged corpus.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use wordnet_types::SynsetId;

use crate::WordNet;
use crate::taxonomy::needs_virtual_root;

/// Semantic similarity measure.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SimilarityOption {
    Path,
    LeacockChodorow,
    WuPalmer,
    Resnik,
    JiangConrath,
    Lin,
}

impl SimilarityOption {
    pub const ALL: [SimilarityOption; 6] = [
        SimilarityOption::Path,
        SimilarityOption::LeacockChodorow,
        SimilarityOption::WuPalmer,
        SimilarityOption::Resnik,
        SimilarityOption::JiangConrath,
        SimilarityOption::Lin,
    ];

    /// Whether the measure is built on information content.
    pub fn uses_information_content(self) -> bool {
        matches!(
            self,
            SimilarityOption::Resnik | SimilarityOption::JiangConrath | SimilarityOption::Lin
        )
    }

    /// Candidate rankings under information-content measures keep the lowest score first.
    pub fn ranks_ascending(self) -> bool {
        self.uses_information_content()
    }

    pub fn name(self) -> &'static str {
        match self {
            SimilarityOption::Path => "path",
            SimilarityOption::LeacockChodorow => "lch",
            SimilarityOption::WuPalmer => "wup",
            SimilarityOption::Resnik => "res",
            SimilarityOption::JiangConrath => "jcn",
            SimilarityOption::Lin => "lin",
        }
    }
}

impl fmt::Display for SimilarityOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown similarity option: {0}")]
pub struct ParseSimilarityError(String);

impl FromStr for SimilarityOption {
    type Err = ParseSimilarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "path" => Ok(SimilarityOption::Path),
            "lch" | "leacock-chodorow" => Ok(SimilarityOption::LeacockChodorow),
            "wup" | "wu-palmer" => Ok(SimilarityOption::WuPalmer),
            "res" | "resnik" => Ok(SimilarityOption::Resnik),
            "jcn" | "jiang-conrath" => Ok(SimilarityOption::JiangConrath),
            "lin" => Ok(SimilarityOption::Lin),
            _ => Err(ParseSimilarityError(s.to_string())),
        }
    }
}

impl WordNet {
    /// Similarity of two synsets under `option`.
    ///
    /// `None` when the measure is undefined for the pair, e.g. across parts of
    /// speech or for adjectives under information-content measures.
    pub fn similarity(&self, a: SynsetId, b: SynsetId, option: SimilarityOption) -> Option<f64> {
        match option {
            SimilarityOption::Path => self.path_similarity(a, b),
            SimilarityOption::LeacockChodorow => self.lch_similarity(a, b),
            SimilarityOption::WuPalmer => self.wup_similarity(a, b),
            SimilarityOption::Resnik => self.resnik_similarity(a, b),
            SimilarityOption::JiangConrath => self.jcn_similarity(a, b),
            SimilarityOption::Lin => self.lin_similarity(a, b),
        }
    }

    /// `1 / (d + 1)` where `d` is the shortest hypernym path length.
    pub fn path_similarity(&self, a: SynsetId, b: SynsetId) -> Option<f64> {
        let distance = self.shortest_path_distance(a, b)?;
        Some(1.0 / f64::from(distance + 1))
    }

    /// `-ln((d + 1) / 2D)` with `D` the taxonomy depth of the POS.
    pub fn lch_similarity(&self, a: SynsetId, b: SynsetId) -> Option<f64> {
        if a.pos != b.pos {
            return None;
        }
        let mut depth = self.taxonomy_depth(a.pos);
        if needs_virtual_root(a.pos) {
            depth += 1;
        }
        if depth == 0 {
            return None;
        }
        let distance = self.shortest_path_distance(a, b)?;
        Some(-(f64::from(distance + 1) / (2.0 * f64::from(depth))).ln())
    }

    /// `2 * depth(lcs) / (len(a) + len(b))`, lengths measured from the root.
    pub fn wup_similarity(&self, a: SynsetId, b: SynsetId) -> Option<f64> {
        if a.pos != b.pos {
            return None;
        }
        let from_a = self.hypernym_distances(a);
        let from_b = self.hypernym_distances(b);
        let (depth, len_a, len_b) = match self.lowest_common_hypernym(a, b) {
            Some(lcs) => {
                let depth = self.max_depth(lcs) + 1;
                (depth, from_a[&lcs] + depth, from_b[&lcs] + depth)
            }
            None if needs_virtual_root(a.pos) => (
                1,
                self.root_distance(&from_a) + 2,
                self.root_distance(&from_b) + 2,
            ),
            None => return None,
        };
        Some(2.0 * f64::from(depth) / f64::from(len_a + len_b))
    }

    /// Information content of the most informative common subsumer.
    pub fn resnik_similarity(&self, a: SynsetId, b: SynsetId) -> Option<f64> {
        self.lcs_information(a, b).map(|(_, _, lcs_ic)| lcs_ic)
    }

    /// `1 / (IC(a) + IC(b) - 2 * IC(lcs))`; infinite for identical concepts.
    pub fn jcn_similarity(&self, a: SynsetId, b: SynsetId) -> Option<f64> {
        if a == b {
            return Some(f64::INFINITY);
        }
        let (ic_a, ic_b, lcs_ic) = self.lcs_information(a, b)?;
        if ic_a == 0.0 || ic_b == 0.0 {
            return Some(0.0);
        }
        let difference = ic_a + ic_b - 2.0 * lcs_ic;
        if difference <= 0.0 {
            return Some(f64::INFINITY);
        }
        Some(1.0 / difference)
    }

    /// `2 * IC(lcs) / (IC(a) + IC(b))`.
    pub fn lin_similarity(&self, a: SynsetId, b: SynsetId) -> Option<f64> {
        let (ic_a, ic_b, lcs_ic) = self.lcs_information(a, b)?;
        let denominator = ic_a + ic_b;
        if denominator == 0.0 {
            return Some(if a == b { 1.0 } else { 0.0 });
        }
        Some(2.0 * lcs_ic / denominator)
    }

    /// `(IC(a), IC(b), IC(lcs))`, with a subsumer-less pair scoring 0 for the lcs.
    fn lcs_information(&self, a: SynsetId, b: SynsetId) -> Option<(f64, f64, f64)> {
        if a.pos != b.pos {
            return None;
        }
        let table = self.information_content();
        let ic_a = table.ic(a)?;
        let ic_b = table.ic(b)?;
        let from_b = self.hypernym_distances(b);
        let lcs_ic = self
            .hypernym_distances(a)
            .into_keys()
            .filter(|ancestor| from_b.contains_key(ancestor))
            .filter_map(|ancestor| table.ic(ancestor))
            .fold(0.0, f64::max);
        Some((ic_a, ic_b, lcs_ic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_option_aliases() {
        assert_eq!("Resnik".parse::<SimilarityOption>().ok(), Some(SimilarityOption::Resnik));
        assert_eq!("wup".parse::<SimilarityOption>().ok(), Some(SimilarityOption::WuPalmer));
        assert!("cosine".parse::<SimilarityOption>().is_err());
    }

    #[test]
    fn information_content_measures_rank_ascending() {
        for option in SimilarityOption::ALL {
            assert_eq!(option.ranks_ascending(), option.uses_information_content());
        }
        assert!(!SimilarityOption::Path.ranks_ascending());
    }
}
