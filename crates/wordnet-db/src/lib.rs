//! Load WordNet as a read-only sense inventory with zero-copy text.
//!
//! This crate ingests the canonical `index.*`/`data.*` files plus the optional
//! `cntlist.rev` sense frequencies, and answers the questions a word-sense
//! disambiguator asks: which synsets does a lemma have, what does each one
//! mean, how are they linked, and how similar are two of them. Callers choose
//! between memory-mapped files or owned buffers at runtime via [`LoadMode`].
//!
//! # Features
//! - Zero-copy text: lemmas, glosses and examples borrow from the source bytes.
//! - Ordered senses per lemma, matching WordNet's sense numbering.
//! - Taxonomy helpers (hypernym closure, depths, path distance, subsumers).
//! - Information content derived from sense frequencies.
//! - Six similarity measures selected by [`SimilarityOption`].
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, SimilarityOption, WordNet};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load_with_mode("/path/to/wordnet", LoadMode::Mmap)?;
//! let dogs = wn.synsets_for_lemma(Pos::Noun, "dog");
//! let cats = wn.synsets_for_lemma(Pos::Noun, "cat");
//! let sim = wn.similarity(dogs[0], cats[0], SimilarityOption::Path);
//! println!("{:?}: {:?}", wn.sense_name(dogs[0]), sim);
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-db --example stats -- <dict>`.

mod ic;
mod similarity;
mod taxonomy;

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use memmap2::Mmap;
use wordnet_types::{Gloss, IndexEntry, PerPos, Pos, Relation, Synset, SynsetId, SynsetType};

pub use ic::InformationContent;
pub use similarity::{ParseSimilarityError, SimilarityOption};

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each WordNet file (fast, zero-copy).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

impl LoadMode {
    /// Parse `mmap`/`owned` case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Some(LoadMode::Mmap),
            "owned" => Some(LoadMode::Owned),
            _ => None,
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum FileKind {
    Data(Pos),
    Index(Pos),
}

#[derive(Clone, Copy)]
struct TextRef {
    file: FileKind,
    start: usize,
    len: usize,
}

struct DictFiles {
    data: PerPos<Buffer>,
    index: PerPos<Buffer>,
}

impl DictFiles {
    fn load(dict_dir: &Path, mode: LoadMode) -> Result<Self> {
        Ok(Self {
            data: PerPos::try_from_fn(|pos| {
                load_file(dict_dir.join(format!("data.{}", pos.file_suffix())), mode)
            })?,
            index: PerPos::try_from_fn(|pos| {
                load_file(dict_dir.join(format!("index.{}", pos.file_suffix())), mode)
            })?,
        })
    }

    fn bytes(&self, file: FileKind) -> &[u8] {
        match file {
            FileKind::Data(pos) => self.data.get(pos).as_slice(),
            FileKind::Index(pos) => self.index.get(pos).as_slice(),
        }
    }

    fn text(&self, r: TextRef) -> &str {
        let bytes = self.bytes(r.file);
        let slice = &bytes[r.start..r.start + r.len];
        // Every referenced line passed `from_utf8` while parsing.
        std::str::from_utf8(slice).expect("wordnet text is valid utf8")
    }
}

struct GlossData {
    raw: TextRef,
    definition: TextRef,
    examples: Vec<TextRef>,
}

struct SynsetData {
    id: SynsetId,
    synset_type: SynsetType,
    lemmas: Vec<TextRef>,
    relations: Vec<(Relation, SynsetId)>,
    gloss: GlossData,
}

struct IndexEntryData {
    lemma: TextRef,
    tagsense_cnt: u32,
    synset_offsets: Vec<u32>,
    senses: Vec<SynsetId>,
}

/// In-memory view of a WordNet dictionary backed by mmap or owned buffers.
pub struct WordNet {
    files: DictFiles,
    index: HashMap<(Pos, String), IndexEntryData>,
    synsets: HashMap<SynsetId, SynsetData>,
    sense_counts: HashMap<(String, Pos, u32), u32>,
    taxonomy_depths: OnceLock<PerPos<u32>>,
    information_content: OnceLock<InformationContent>,
}

impl WordNet {
    /// Load WordNet from a directory containing `data.*` and `index.*` files.
    ///
    /// Defaults to memory-mapping the source files. Use [`load_with_mode`] to
    /// force owned buffers instead.
    ///
    /// [`load_with_mode`]: WordNet::load_with_mode
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    /// Load WordNet choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        for pos in Pos::ALL {
            for prefix in ["data", "index"] {
                let path = dir.join(format!("{prefix}.{}", pos.file_suffix()));
                if !path.exists() {
                    anyhow::bail!("missing required WordNet file: {}", path.display());
                }
            }
        }

        let files = DictFiles::load(dir, mode)?;

        let mut index = HashMap::new();
        let mut synsets = HashMap::new();
        for pos in Pos::ALL {
            let kind = FileKind::Index(pos);
            parse_index(files.bytes(kind), kind, pos, &mut index)?;
            let kind = FileKind::Data(pos);
            parse_data(files.bytes(kind), kind, pos, &mut synsets)?;
        }

        let sense_counts = match load_optional_file(dir.join("cntlist.rev"), LoadMode::Owned)? {
            Some(buffer) => parse_cntlist(buffer.as_slice()),
            None => HashMap::new(),
        };

        Ok(Self {
            files,
            index,
            synsets,
            sense_counts,
            taxonomy_depths: OnceLock::new(),
            information_content: OnceLock::new(),
        })
    }

    /// Check whether a lemma exists for the given POS according to index files.
    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> bool {
        self.index.contains_key(&(pos, normalize_lemma(lemma)))
    }

    /// Fetch a raw `IndexEntry` if present.
    pub fn index_entry(&self, pos: Pos, lemma: &str) -> Option<IndexEntry<'_>> {
        let key = (pos, normalize_lemma(lemma));
        self.index.get(&key).map(|entry| IndexEntry {
            lemma: self.files.text(entry.lemma),
            pos,
            tagsense_cnt: entry.tagsense_cnt,
            synset_offsets: entry.synset_offsets.as_slice(),
        })
    }

    /// Return the synsets associated with a lemma in sense order, or an empty slice.
    pub fn synsets_for_lemma(&self, pos: Pos, lemma: &str) -> &[SynsetId] {
        let key = (pos, normalize_lemma(lemma));
        self.index
            .get(&key)
            .map(|entry| entry.senses.as_slice())
            .unwrap_or(&[])
    }

    /// Synsets for a lemma across every POS, nouns first.
    pub fn synsets_any_pos(&self, lemma: &str) -> Vec<SynsetId> {
        Pos::ALL
            .iter()
            .flat_map(|pos| self.synsets_for_lemma(*pos, lemma).iter().copied())
            .collect()
    }

    /// Fetch a `Synset` by id if loaded.
    pub fn get_synset(&self, id: SynsetId) -> Option<Synset<'_>> {
        self.synsets.get(&id).map(|syn| self.make_synset_view(syn))
    }

    /// Iterate over all synsets as borrowed views.
    pub fn iter_synsets(&self) -> impl Iterator<Item = Synset<'_>> + '_ {
        self.synsets.values().map(|s| self.make_synset_view(s))
    }

    /// NLTK-style display name such as `dog.n.01`.
    ///
    /// Built from the synset's first lemma and that lemma's sense number.
    pub fn sense_name(&self, id: SynsetId) -> Option<String> {
        let data = self.synsets.get(&id)?;
        let lemma = self.files.text(*data.lemmas.first()?);
        let entry = self.index_entry(id.pos, lemma)?;
        let number = entry.sense_number(id.offset)?;
        let marker = match data.synset_type {
            SynsetType::AdjSatellite => 's',
            _ => id.pos.to_char(),
        };
        Some(format!(
            "{}.{}.{:02}",
            lemma.to_ascii_lowercase(),
            marker,
            number
        ))
    }

    /// Number of index entries.
    pub fn index_count(&self) -> usize {
        self.index.len()
    }

    /// Number of synsets.
    pub fn synset_count(&self) -> usize {
        self.synsets.len()
    }

    /// Number of sense-count entries parsed from cntlist.
    pub fn sense_count_entries(&self) -> usize {
        self.sense_counts.len()
    }

    /// Sense frequency for a given lemma/pos/synset, if present in `cntlist.rev`.
    pub fn sense_count(&self, pos: Pos, lemma: &str, synset_offset: u32) -> Option<u32> {
        let normalized = normalize_lemma(lemma);
        let entry = self.index_entry(pos, &normalized)?;
        let sense_number = entry.sense_number(synset_offset)?;
        self.sense_counts
            .get(&(normalized, pos, sense_number))
            .copied()
    }

    /// Information content table, computed on first use.
    pub fn information_content(&self) -> &InformationContent {
        self.information_content
            .get_or_init(|| InformationContent::build(self))
    }

    fn make_synset_view<'a>(&'a self, data: &'a SynsetData) -> Synset<'a> {
        let lemmas = data.lemmas.iter().map(|r| self.files.text(*r)).collect();
        let gloss = Gloss {
            raw: self.files.text(data.gloss.raw),
            definition: self.files.text(data.gloss.definition),
            examples: data
                .gloss
                .examples
                .iter()
                .map(|r| self.files.text(*r))
                .collect(),
        };

        Synset {
            id: data.id,
            synset_type: data.synset_type,
            lemmas,
            relations: data.relations.as_slice(),
            gloss,
        }
    }

    fn own_sense_counts(&self) -> impl Iterator<Item = (SynsetId, u32)> + '_ {
        self.sense_counts
            .iter()
            .filter_map(|((lemma, pos, sense), count)| {
                let entry = self.index.get(&(*pos, lemma.clone()))?;
                let idx = usize::try_from(sense.checked_sub(1)?).ok()?;
                entry.senses.get(idx).map(|id| (*id, *count))
            })
    }
}

fn load_file(path: PathBuf, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

fn load_optional_file(path: PathBuf, mode: LoadMode) -> Result<Option<Buffer>> {
    if !path.exists() {
        return Ok(None);
    }
    load_file(path, mode).map(Some)
}

fn parse_index(
    bytes: &[u8],
    file: FileKind,
    pos: Pos,
    index: &mut HashMap<(Pos, String), IndexEntryData>,
) -> Result<()> {
    for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = strip_cr(raw_line);
        // License header lines start with two spaces.
        if line.is_empty() || matches!(line.first(), Some(b' ' | b'\t')) {
            continue;
        }
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("{:?}:{} not utf8", file, lineno + 1))?;
        let tokens: Vec<&str> = line_str.split_ascii_whitespace().collect();
        if tokens.len() < 6 {
            anyhow::bail!(
                "{:?}:{} malformed index line (too few tokens)",
                file,
                lineno + 1
            );
        }

        let lemma_token = tokens[0];
        let synset_cnt: usize = tokens[2]
            .parse()
            .with_context(|| format!("index {:?}:{} synset_cnt", file, lineno + 1))?;
        let p_cnt: usize = tokens[3]
            .parse()
            .with_context(|| format!("index {:?}:{} p_cnt", file, lineno + 1))?;

        // Skip the pointer symbols and the redundant sense_cnt.
        let mut idx = 4 + p_cnt + 1;
        if tokens.len() <= idx {
            anyhow::bail!("{:?}:{} missing sense counts", file, lineno + 1);
        }
        let tagsense_cnt: u32 = tokens[idx]
            .parse()
            .with_context(|| format!("index {:?}:{} tagsense_cnt", file, lineno + 1))?;
        idx += 1;

        let offsets: Vec<u32> = tokens[idx..]
            .iter()
            .map(|t| {
                t.parse::<u32>()
                    .with_context(|| format!("index {:?}:{} synset_offsets", file, lineno + 1))
            })
            .collect::<Result<_>>()?;
        if offsets.len() != synset_cnt {
            anyhow::bail!(
                "{:?}:{} synset_cnt mismatch (expected {}, got {})",
                file,
                lineno + 1,
                synset_cnt,
                offsets.len()
            );
        }

        let senses = offsets
            .iter()
            .map(|offset| SynsetId {
                pos,
                offset: *offset,
            })
            .collect();
        index.insert(
            (pos, normalize_lemma(lemma_token)),
            IndexEntryData {
                lemma: text_ref_str(file, bytes, lemma_token),
                tagsense_cnt,
                synset_offsets: offsets,
                senses,
            },
        );
    }

    Ok(())
}

fn parse_data(
    bytes: &[u8],
    file: FileKind,
    pos: Pos,
    synsets: &mut HashMap<SynsetId, SynsetData>,
) -> Result<()> {
    for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = strip_cr(raw_line);
        if line.is_empty() || matches!(line.first(), Some(b' ' | b'\t')) {
            continue;
        }
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("{:?}:{} not utf8", file, lineno + 1))?;
        let (left, gloss_part) = match line_str.split_once('|') {
            Some((l, r)) => (l.trim(), r.trim()),
            // Empty gloss still points into the buffer so it can be referenced.
            None => (line_str.trim(), &line_str[line_str.len()..]),
        };

        let tokens: Vec<&str> = left.split_ascii_whitespace().collect();
        if tokens.len() < 4 {
            anyhow::bail!("{:?}:{} malformed data line", file, lineno + 1);
        }

        let offset: u32 = tokens[0]
            .parse()
            .with_context(|| format!("{:?}:{} offset", file, lineno + 1))?;
        let ss_type_char = tokens[2]
            .chars()
            .next()
            .ok_or_else(|| anyhow::anyhow!("{:?}:{} missing ss_type", file, lineno + 1))?;
        let synset_type = SynsetType::from_char(ss_type_char).ok_or_else(|| {
            anyhow::anyhow!("{:?}:{} invalid ss_type {}", file, lineno + 1, ss_type_char)
        })?;
        let w_cnt = usize::from_str_radix(tokens[3], 16)
            .with_context(|| format!("{:?}:{} w_cnt", file, lineno + 1))?;

        let mut idx = 4;
        if tokens.len() < idx + (w_cnt * 2) {
            anyhow::bail!("{:?}:{} not enough word/lex_id pairs", file, lineno + 1);
        }
        let lemmas = tokens[idx..idx + w_cnt * 2]
            .iter()
            .step_by(2)
            .map(|word| text_ref_str(file, bytes, strip_adj_marker(word)))
            .collect();
        idx += w_cnt * 2;

        if tokens.len() <= idx {
            anyhow::bail!("{:?}:{} missing pointer count", file, lineno + 1);
        }
        let p_cnt: usize = tokens[idx]
            .parse()
            .with_context(|| format!("{:?}:{} p_cnt", file, lineno + 1))?;
        idx += 1;

        let mut relations = Vec::with_capacity(p_cnt);
        for _ in 0..p_cnt {
            if tokens.len() < idx + 4 {
                anyhow::bail!("{:?}:{} incomplete pointer block", file, lineno + 1);
            }
            let target_offset: u32 = tokens[idx + 1]
                .parse()
                .with_context(|| format!("{:?}:{} pointer target offset", file, lineno + 1))?;
            let target_pos = tokens[idx + 2]
                .chars()
                .next()
                .and_then(Pos::from_char)
                .ok_or_else(|| anyhow::anyhow!("{:?}:{} pointer target pos", file, lineno + 1))?;
            if let Some(relation) = Relation::from_symbol(tokens[idx]) {
                relations.push((
                    relation,
                    SynsetId {
                        pos: target_pos,
                        offset: target_offset,
                    },
                ));
            }
            idx += 4;
        }
        // Verb frames follow the pointers; the inventory has no use for them.

        let gloss = parse_gloss(file, bytes, gloss_part);
        let id = SynsetId { pos, offset };
        synsets.insert(
            id,
            SynsetData {
                id,
                synset_type,
                lemmas,
                relations,
                gloss,
            },
        );
    }

    Ok(())
}

fn parse_gloss(file: FileKind, root: &[u8], gloss: &str) -> GlossData {
    let trimmed = gloss.trim();
    let mut examples = Vec::new();
    let mut quote_start: Option<usize> = None;
    let mut def_end = trimmed.len();
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '"' => match quote_start.take() {
                Some(start) if idx > start + 1 => {
                    examples.push(text_ref_str(file, root, &trimmed[start + 1..idx]));
                }
                Some(_) => {}
                None => quote_start = Some(idx),
            },
            ';' if quote_start.is_none() && def_end == trimmed.len() => {
                def_end = idx;
            }
            _ => {}
        }
    }

    GlossData {
        raw: text_ref_str(file, root, trimmed),
        definition: text_ref_str(file, root, trimmed[..def_end].trim()),
        examples,
    }
}

/// Parse `cntlist.rev`.
///
/// Accepts the distributed `sense_key sense_number tag_cnt` layout as well as
/// the compact `count lemma pos [sense_number]` layout used by fixtures.
fn parse_cntlist(bytes: &[u8]) -> HashMap<(String, Pos, u32), u32> {
    let mut counts = HashMap::new();
    for raw_line in bytes.split(|b| *b == b'\n') {
        let line = strip_cr(raw_line);
        let Ok(line_str) = std::str::from_utf8(line) else {
            continue;
        };
        let tokens: Vec<&str> = line_str.split_ascii_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }
        let parsed = if let Some((lemma, lex_sense)) = tokens[0].split_once('%') {
            parse_sense_key_count(lemma, lex_sense, tokens[1], tokens[2])
        } else {
            parse_compact_count(&tokens)
        };
        if let Some((key, count)) = parsed {
            *counts.entry(key).or_insert(0) += count;
        }
    }
    counts
}

fn parse_sense_key_count(
    lemma: &str,
    lex_sense: &str,
    sense_number: &str,
    tag_cnt: &str,
) -> Option<((String, Pos, u32), u32)> {
    let pos = match lex_sense.chars().next()? {
        '1' => Pos::Noun,
        '2' => Pos::Verb,
        '3' | '5' => Pos::Adj,
        '4' => Pos::Adv,
        _ => return None,
    };
    let sense_number = sense_number.parse().ok()?;
    let count = tag_cnt.parse().ok()?;
    Some(((normalize_lemma(lemma), pos, sense_number), count))
}

fn parse_compact_count(tokens: &[&str]) -> Option<((String, Pos, u32), u32)> {
    let count = tokens[0].parse().ok()?;
    let pos = tokens[2].chars().next().and_then(Pos::from_char)?;
    let sense_number = tokens.get(3).and_then(|t| t.parse().ok()).unwrap_or(1);
    Some(((normalize_lemma(tokens[1]), pos, sense_number), count))
}

fn text_ref_str(file: FileKind, root: &[u8], token: &str) -> TextRef {
    let start = token.as_ptr() as usize - root.as_ptr() as usize;
    TextRef {
        file,
        start,
        len: token.len(),
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Drop syntactic markers such as `(a)`, `(p)`, `(ip)` from adjective lemmas.
fn strip_adj_marker(word: &str) -> &str {
    match word.find('(') {
        Some(idx) if word.ends_with(')') => &word[..idx],
        _ => word,
    }
}

pub(crate) fn normalize_lemma(text: &str) -> String {
    let mut s = text.trim().to_string();
    s.make_ascii_lowercase();
    s.replace(' ', "_")
}
