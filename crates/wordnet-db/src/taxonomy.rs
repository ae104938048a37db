//! Hypernym taxonomy walks.
//!
//! Verbs have no single root in WordNet, so distance queries between verbs
//! that share no hypernym go through a virtual root placed above every verb
//! root, the same convention NLTK uses.

use std::collections::{HashMap, VecDeque};

use wordnet_types::{PerPos, Pos, SynsetId};

use crate::WordNet;

impl WordNet {
    /// Direct hypernyms (including instance hypernyms) of a synset.
    pub fn hypernyms(&self, id: SynsetId) -> Vec<SynsetId> {
        self.synsets
            .get(&id)
            .map(|data| {
                data.relations
                    .iter()
                    .filter(|(rel, _)| rel.is_hypernym())
                    .map(|(_, target)| *target)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Shortest hypernym distance from `id` to each of its ancestors.
    ///
    /// The synset itself is included at distance 0.
    pub fn hypernym_distances(&self, id: SynsetId) -> HashMap<SynsetId, u32> {
        let mut distances = HashMap::from([(id, 0)]);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            let next = distances[&current] + 1;
            for parent in self.hypernyms(current) {
                if !distances.contains_key(&parent) {
                    distances.insert(parent, next);
                    queue.push_back(parent);
                }
            }
        }
        distances
    }

    /// Length of the longest hypernym path from `id` to a root.
    pub fn max_depth(&self, id: SynsetId) -> u32 {
        self.max_depth_memo(id, &mut HashMap::new())
    }

    /// Length of the shortest hypernym path from `id` to a root.
    pub fn min_depth(&self, id: SynsetId) -> u32 {
        let distances = self.hypernym_distances(id);
        distances
            .iter()
            .filter(|(ancestor, _)| self.hypernyms(**ancestor).is_empty())
            .map(|(_, dist)| *dist)
            .min()
            .unwrap_or(0)
    }

    /// Deepest `max_depth` of any synset with this POS.
    pub fn taxonomy_depth(&self, pos: Pos) -> u32 {
        let depths = self.taxonomy_depths.get_or_init(|| {
            let mut memo = HashMap::new();
            let mut depths: PerPos<u32> = PerPos::default();
            for id in self.synsets.keys() {
                let depth = self.max_depth_memo(*id, &mut memo);
                let slot = depths.get_mut(id.pos);
                *slot = (*slot).max(depth);
            }
            depths
        });
        *depths.get(pos)
    }

    /// Minimum number of hypernym edges connecting `a` and `b`.
    pub fn shortest_path_distance(&self, a: SynsetId, b: SynsetId) -> Option<u32> {
        if a == b {
            return Some(0);
        }
        if a.pos != b.pos {
            return None;
        }
        let from_a = self.hypernym_distances(a);
        let from_b = self.hypernym_distances(b);
        let through_common = from_a
            .iter()
            .filter_map(|(ancestor, da)| from_b.get(ancestor).map(|db| da + db))
            .min();
        through_common.or_else(|| {
            needs_virtual_root(a.pos)
                .then(|| self.root_distance(&from_a) + self.root_distance(&from_b) + 2)
        })
    }

    /// Common hypernym with the greatest depth, ties broken by proximity.
    pub fn lowest_common_hypernym(&self, a: SynsetId, b: SynsetId) -> Option<SynsetId> {
        if a.pos != b.pos {
            return None;
        }
        let from_a = self.hypernym_distances(a);
        let from_b = self.hypernym_distances(b);
        let mut memo = HashMap::new();
        from_a
            .iter()
            .filter_map(|(ancestor, da)| from_b.get(ancestor).map(|db| (*ancestor, da + db)))
            .map(|(ancestor, dist)| (self.max_depth_memo(ancestor, &mut memo), dist, ancestor))
            .max_by(|x, y| {
                x.0.cmp(&y.0)
                    .then_with(|| y.1.cmp(&x.1))
                    .then_with(|| y.2.cmp(&x.2))
            })
            .map(|(_, _, ancestor)| ancestor)
    }

    pub(crate) fn root_distance(&self, distances: &HashMap<SynsetId, u32>) -> u32 {
        distances
            .iter()
            .filter(|(ancestor, _)| self.hypernyms(**ancestor).is_empty())
            .map(|(_, dist)| *dist)
            .min()
            .unwrap_or(0)
    }

    fn max_depth_memo(&self, id: SynsetId, memo: &mut HashMap<SynsetId, u32>) -> u32 {
        if let Some(depth) = memo.get(&id) {
            return *depth;
        }
        // Placeholder guards against pointer cycles in malformed data.
        memo.insert(id, 0);
        let depth = self
            .hypernyms(id)
            .into_iter()
            .map(|parent| self.max_depth_memo(parent, memo) + 1)
            .max()
            .unwrap_or(0);
        memo.insert(id, depth);
        depth
    }
}

pub(crate) fn needs_virtual_root(pos: Pos) -> bool {
    pos == Pos::Verb
}
