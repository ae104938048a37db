//! WordNet-style morphological processing (morphy) for sense lookups.
//!
//! Check exceptions, apply suffix rules, and verify candidates via a
//! caller-provided lemma existence predicate. The crate is decoupled from any
//! particular loader; it only depends on `Pos` and the callback you supply.
//!
//! # How it works
//! 1. Emit the surface form if it exists.
//! 2. Check exceptions (`*.exc` files).
//! 3. Apply POS-specific suffix rules, undoing consonant doubling.
//! 4. Deduplicate while preserving provenance (`Surface`, `Exception`, `Rule`).
//!
//! [`Morphy::lemmatize`] folds that into the single answer a disambiguator
//! needs: the first lemma found, trying parts of speech in WordNet order.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_morphy::Morphy;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = "/path/to/wordnet";
//! let wn = WordNet::load_with_mode(dict, LoadMode::Mmap)?;
//! let morph = Morphy::load(dict)?;
//!
//! let lemma = morph.lemmatize("banks", None, |pos, lemma| wn.lemma_exists(pos, lemma));
//! assert_eq!(lemma, "bank");
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-morphy --example lookup -- <dict> [--demo|<word>]`.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wordnet_types::{PerPos, Pos};

/// Where a candidate lemma originated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CandidateSource {
    Surface,
    Exception,
    Rule {
        suffix: &'static str,
        replacement: &'static str,
    },
}

/// A lemma candidate paired with its POS and provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaCandidate<'a> {
    pub pos: Pos,
    pub lemma: Cow<'a, str>,
    pub source: CandidateSource,
}

/// Morphy parameterised by caller-provided existence checks.
#[derive(Default)]
pub struct Morphy {
    exceptions: PerPos<HashMap<String, Vec<String>>>,
}

impl Morphy {
    /// Load morphy exception lists (`*.exc`) from a WordNet dict directory.
    ///
    /// Files are optional; missing ones are treated as empty.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let exceptions =
            PerPos::try_from_fn(|pos| load_exc(dir.join(format!("{}.exc", pos.file_suffix()))))?;
        Ok(Self { exceptions })
    }

    /// Build from in-memory exception pairs `(surface, lemma)`.
    pub fn with_exceptions<'s>(pairs: impl IntoIterator<Item = (Pos, &'s str, &'s str)>) -> Self {
        let mut morph = Self::default();
        for (pos, surface, lemma) in pairs {
            morph
                .exceptions
                .get_mut(pos)
                .entry(normalize(surface))
                .or_default()
                .push(normalize(lemma));
        }
        morph
    }

    /// Generate lemmas for a surface form, returning enriched provenance.
    ///
    /// The callback `lemma_exists` typically delegates to `WordNet::lemma_exists`
    /// so this crate stays ignorant of any concrete database layout.
    pub fn lemmas_for<'a, F>(
        &'a self,
        pos: Pos,
        surface: &str,
        lemma_exists: F,
    ) -> Vec<LemmaCandidate<'a>>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let mut seen: HashSet<Cow<'a, str>> = HashSet::new();
        let mut out: Vec<LemmaCandidate<'a>> = Vec::new();
        let norm_surface = normalize(surface);

        if lemma_exists(pos, &norm_surface) {
            push_unique(
                &mut out,
                &mut seen,
                LemmaCandidate {
                    pos,
                    lemma: Cow::Owned(norm_surface.clone()),
                    source: CandidateSource::Surface,
                },
            );
        }

        if let Some(entries) = self.exceptions.get(pos).get(&norm_surface) {
            for lemma in entries.iter().filter(|lemma| lemma_exists(pos, lemma)) {
                push_unique(
                    &mut out,
                    &mut seen,
                    LemmaCandidate {
                        pos,
                        lemma: Cow::Borrowed(lemma.as_str()),
                        source: CandidateSource::Exception,
                    },
                );
            }
        }

        for &(suffix, replacement) in rules_for(pos) {
            for candidate in apply_rule(&norm_surface, suffix, replacement) {
                if lemma_exists(pos, &candidate) {
                    push_unique(
                        &mut out,
                        &mut seen,
                        LemmaCandidate {
                            pos,
                            lemma: Cow::Owned(candidate),
                            source: CandidateSource::Rule {
                                suffix,
                                replacement,
                            },
                        },
                    );
                }
            }
        }

        out
    }

    /// Base form of `surface`, or its normalized spelling when nothing matches.
    ///
    /// With `pos = None` the parts of speech are tried in [`Pos::ALL`] order
    /// and the first hit wins.
    pub fn lemmatize<F>(&self, surface: &str, pos: Option<Pos>, lemma_exists: F) -> String
    where
        F: Fn(Pos, &str) -> bool,
    {
        let order = match pos {
            Some(pos) => vec![pos],
            None => Pos::ALL.to_vec(),
        };
        order
            .into_iter()
            .find_map(|pos| {
                self.lemmas_for(pos, surface, &lemma_exists)
                    .into_iter()
                    .next()
                    .map(|cand| cand.lemma.into_owned())
            })
            .unwrap_or_else(|| normalize(surface))
    }
}

fn load_exc(path: PathBuf) -> Result<HashMap<String, Vec<String>>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file =
        File::open(&path).with_context(|| format!("open exception file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let mut parts = line.split_whitespace();
        let Some(surface) = parts.next().map(normalize) else {
            continue;
        };
        let lemmas: Vec<String> = parts.map(normalize).collect();
        if !lemmas.is_empty() {
            map.insert(surface, lemmas);
        }
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

fn push_unique<'a>(
    out: &mut Vec<LemmaCandidate<'a>>,
    seen: &mut HashSet<Cow<'a, str>>,
    candidate: LemmaCandidate<'a>,
) {
    if seen.insert(candidate.lemma.clone()) {
        out.push(candidate);
    }
}

/// Candidate stems for one suffix rule.
///
/// When the rule strips to a doubled final consonant (`running` -> `runn`),
/// the undoubled stem is offered first and the literal stem second, so
/// `running` finds `run` while `killed` still finds `kill`.
fn apply_rule(surface: &str, suffix: &str, replacement: &str) -> Vec<String> {
    let Some(stem) = surface.strip_suffix(suffix) else {
        return Vec::new();
    };
    if stem.is_empty() {
        return Vec::new();
    }
    if !replacement.is_empty() {
        return vec![format!("{stem}{replacement}")];
    }

    let mut chars = stem.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a == b && !is_vowel(a) => {
            vec![stem[..stem.len() - a.len_utf8()].to_string(), stem.to_string()]
        }
        _ => vec![stem.to_string()],
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn rules_for(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj => &[("er", ""), ("er", "e"), ("est", ""), ("est", "e")],
        Pos::Adv => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_exists(targets: &[(&str, Pos)]) -> impl Fn(Pos, &str) -> bool {
        let set: HashSet<(Pos, String)> = targets
            .iter()
            .map(|(lemma, pos)| (*pos, normalize(lemma)))
            .collect();
        move |pos, lemma| set.contains(&(pos, normalize(lemma)))
    }

    #[test]
    fn uses_exceptions_and_rules() {
        let morph = Morphy::with_exceptions([(Pos::Noun, "children", "child")]);
        let candidates =
            morph.lemmas_for(Pos::Noun, "children", fake_exists(&[("child", Pos::Noun)]));
        assert_eq!(candidates.len(), 1);
        assert!(matches!(candidates[0].source, CandidateSource::Exception));
        assert_eq!(candidates[0].lemma, "child");
    }

    #[test]
    fn includes_surface_and_rule_hits() {
        let morph = Morphy::default();
        let candidates = morph.lemmas_for(
            Pos::Verb,
            "running",
            fake_exists(&[("running", Pos::Verb), ("run", Pos::Verb)]),
        );
        assert_eq!(candidates.len(), 2);
        assert!(matches!(candidates[0].source, CandidateSource::Surface));
        assert!(matches!(candidates[1].source, CandidateSource::Rule { .. }));
    }

    #[test]
    fn keeps_genuine_double_consonants() {
        let morph = Morphy::default();
        let exists = fake_exists(&[("kill", Pos::Verb)]);
        assert_eq!(morph.lemmatize("killed", None, &exists), "kill");
    }

    #[test]
    fn lemmatize_prefers_nouns_then_falls_back_to_surface() {
        let morph = Morphy::default();
        let exists = fake_exists(&[("bank", Pos::Noun), ("bank", Pos::Verb), ("run", Pos::Verb)]);
        assert_eq!(morph.lemmatize("Banks", None, &exists), "bank");
        assert_eq!(morph.lemmatize("running", None, &exists), "run");
        assert_eq!(morph.lemmatize("running", Some(Pos::Noun), &exists), "running");
        assert_eq!(morph.lemmatize("AA", None, &exists), "aa");
    }
}
