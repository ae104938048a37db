use std::collections::HashMap;

use wordnet_types::{PerPos, Pos, SynsetId};

use crate::WordNet;

/// Corpus frequencies propagated up the taxonomy.
///
/// Every synset starts with a count of one (add-one smoothing) plus its
/// tagged sense counts from `cntlist.rev`. A synset's frequency is its own
/// count plus the counts of everything it subsumes.
pub struct InformationContent {
    freq: HashMap<SynsetId, f64>,
    totals: PerPos<f64>,
}

impl InformationContent {
    pub(crate) fn build(wn: &WordNet) -> Self {
        let mut own: HashMap<SynsetId, f64> = wn.synsets.keys().map(|id| (*id, 1.0)).collect();
        for (id, count) in wn.own_sense_counts() {
            *own.entry(id).or_insert(1.0) += f64::from(count);
        }

        let mut freq: HashMap<SynsetId, f64> = HashMap::with_capacity(own.len());
        let mut totals: PerPos<f64> = PerPos::default();
        for (id, count) in &own {
            *totals.get_mut(id.pos) += *count;
            for ancestor in wn.hypernym_distances(*id).into_keys() {
                *freq.entry(ancestor).or_insert(0.0) += *count;
            }
        }

        tracing::debug!(synsets = freq.len(), "information content table built");
        Self { freq, totals }
    }

    /// `-ln(p(s))`, where `p` is the subsumed frequency over the POS total.
    ///
    /// Only nouns and verbs have a taxonomy deep enough for this to be meaningful.
    pub fn ic(&self, id: SynsetId) -> Option<f64> {
        if !matches!(id.pos, Pos::Noun | Pos::Verb) {
            return None;
        }
        let freq = *self.freq.get(&id)?;
        let total = *self.totals.get(id.pos);
        if freq <= 0.0 || total <= 0.0 {
            return None;
        }
        Some(-(freq / total).ln())
    }
}
