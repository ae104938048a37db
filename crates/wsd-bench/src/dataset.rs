//! Per-word example files.
//!
//! One file per ambiguous word, named `<word>_<anything>.arff`. The file
//! declares its senses on an `@ATTRIBUTE class {M1,M2,...}` line, carries a
//! fixed seven-line header, and then one example per line:
//!
//! ```text
//! 9845373,"Outcomes of <e>AA</e> for special populations.",M1
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use walkdir::WalkDir;

/// Lines preceding the first example.
pub const HEADER_LINES: usize = 7;

const CLASS_DECLARATION: &str = "@ATTRIBUTE class";

static EXAMPLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[^"]*"(?P<sentence>.*)"\s*,\s*M?(?P<gold>\d+)\s*$"#).expect("example line regex")
});
static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("markup regex"));
static NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("numeral regex"));

/// What is wrong with an example line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum LineDefect {
    #[error("no quoted sentence")]
    MissingQuote,
    #[error("no gold sense at the end of the line")]
    MissingGoldSense,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: no `@ATTRIBUTE class` line with a sense count", .path.display())]
    MissingClassDeclaration { path: PathBuf },
    #[error("{}:{line}: {defect}", .path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        defect: LineDefect,
    },
    #[error("{}:{line}: gold sense M{gold} outside 1..={sense_count}", .path.display())]
    GoldSenseOutOfRange {
        path: PathBuf,
        line: usize,
        gold: u32,
        sense_count: u32,
    },
}

/// A sentence using the ambiguous word, with its annotated sense.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Example {
    pub sentence: String,
    /// 1-based sense number, always within the owning word's sense count.
    pub gold_sense: u32,
}

/// An ambiguous word and its labelled examples.
#[derive(Clone, Debug)]
pub struct Word {
    surface_form: String,
    sense_count: u32,
    examples: Vec<Example>,
    path: PathBuf,
}

impl Word {
    /// Parse one dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parse dataset text as if it had been read from `path`.
    pub fn parse(path: impl AsRef<Path>, content: &str) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let sense_count = content
            .lines()
            .find(|line| line.contains(CLASS_DECLARATION))
            .and_then(|line| {
                NUMERAL
                    .find_iter(line)
                    .filter_map(|m| m.as_str().parse::<u32>().ok())
                    .max()
            })
            .ok_or_else(|| DatasetError::MissingClassDeclaration {
                path: path.to_path_buf(),
            })?;

        let mut examples = Vec::new();
        for (idx, raw) in content.lines().enumerate().skip(HEADER_LINES) {
            if raw.trim().is_empty() {
                continue;
            }
            let line = idx + 1;
            let example = parse_example(raw).map_err(|defect| DatasetError::MalformedLine {
                path: path.to_path_buf(),
                line,
                defect,
            })?;
            if example.gold_sense == 0 || example.gold_sense > sense_count {
                return Err(DatasetError::GoldSenseOutOfRange {
                    path: path.to_path_buf(),
                    line,
                    gold: example.gold_sense,
                    sense_count,
                });
            }
            examples.push(example);
        }

        Ok(Self {
            surface_form: word_from_path(path),
            sense_count,
            examples,
            path: path.to_path_buf(),
        })
    }

    pub fn surface_form(&self) -> &str {
        &self.surface_form
    }

    pub fn sense_count(&self) -> u32 {
        self.sense_count
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of examples annotated with `gold`.
    pub fn examples_for(&self, gold: u32) -> usize {
        self.examples
            .iter()
            .filter(|example| example.gold_sense == gold)
            .count()
    }

    /// Example count per annotated sense.
    pub fn gold_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for example in &self.examples {
            *counts.entry(example.gold_sense).or_insert(0) += 1;
        }
        counts
    }
}

fn parse_example(line: &str) -> Result<Example, LineDefect> {
    if !line.contains('"') {
        return Err(LineDefect::MissingQuote);
    }
    let caps = EXAMPLE_LINE
        .captures(line)
        .ok_or(LineDefect::MissingGoldSense)?;
    let gold_sense = caps["gold"]
        .parse::<u32>()
        .map_err(|_| LineDefect::MissingGoldSense)?;
    Ok(Example {
        sentence: clean_sentence(&caps["sentence"]),
        gold_sense,
    })
}

/// Strip inline markup and decode the entities found in the corpus.
pub fn clean_sentence(raw: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(raw, "");
    stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Filename stem up to the first underscore.
fn word_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    stem.split('_').next().unwrap_or_default().to_string()
}

/// Every file below `dir`, sorted so runs are reproducible.
pub fn collect_dataset_files(dir: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "% 1. Title: MSH WSD\n\
                          % 2. Source: NLM\n\
                          @RELATION AA\n\
                          \n\
                          @ATTRIBUTE PMID REAL\n\
                          @ATTRIBUTE citation STRING\n\
                          @ATTRIBUTE class {M1,M2}\n";

    fn dataset(body: &str) -> String {
        format!("{HEADER}{body}")
    }

    #[test]
    fn parses_header_and_examples() {
        let text = dataset(
            "9845373,\"Outcomes of <e>AA</e> for special populations.\",M1\n\
             \n\
             1234,\"<e>AA</e> &amp; kidney disease\",M2\n",
        );
        let word = Word::parse("acronyms/AA_pmids_tagged.arff", &text).unwrap();
        assert_eq!(word.surface_form(), "AA");
        assert_eq!(word.sense_count(), 2);
        assert_eq!(word.examples().len(), 2);
        assert_eq!(
            word.examples()[0].sentence,
            "Outcomes of AA for special populations."
        );
        assert_eq!(word.examples()[1].sentence, "AA & kidney disease");
        assert_eq!(word.examples()[1].gold_sense, 2);
        assert_eq!(word.examples_for(1), 1);
        assert_eq!(word.gold_counts(), BTreeMap::from([(1, 1), (2, 1)]));
    }

    #[test]
    fn sentence_may_contain_quotes_and_commas() {
        let text = dataset("7,\"the \"cold\" season, again\",M2\n");
        let word = Word::parse("cold_x.arff", &text).unwrap();
        assert_eq!(word.examples()[0].sentence, "the \"cold\" season, again");
    }

    #[test]
    fn sense_count_is_largest_declared_numeral() {
        let header = HEADER.replace("{M1,M2}", "{M3,M1,M2}");
        let word = Word::parse("x_y.arff", &header).unwrap();
        assert_eq!(word.sense_count(), 3);
        assert!(word.examples().is_empty());
    }

    #[test]
    fn rejects_missing_quote() {
        let text = dataset("1,no quotes here,M1\n");
        let err = Word::parse("x_y.arff", &text).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MalformedLine {
                line: 8,
                defect: LineDefect::MissingQuote,
                ..
            }
        ));
    }

    #[test]
    fn rejects_missing_gold_sense() {
        let text = dataset("1,\"a sentence\",\n");
        let err = Word::parse("x_y.arff", &text).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MalformedLine {
                defect: LineDefect::MissingGoldSense,
                ..
            }
        ));
    }

    #[test]
    fn rejects_gold_sense_outside_declaration() {
        let text = dataset("1,\"a sentence\",M3\n");
        let err = Word::parse("x_y.arff", &text).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::GoldSenseOutOfRange {
                gold: 3,
                sense_count: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_missing_class_declaration() {
        let err = Word::parse("x_y.arff", "@RELATION x\n").unwrap_err();
        assert!(matches!(err, DatasetError::MissingClassDeclaration { .. }));
    }

    #[test]
    fn reads_files_and_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("terms");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("cold_pmids.arff"), dataset("1,\"a cold day\",M1\n")).unwrap();
        fs::write(dir.path().join("AA_pmids.arff"), dataset("1,\"AA\",M2\n")).unwrap();

        let files = collect_dataset_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("AA_pmids.arff"));

        let word = Word::from_path(&files[1]).unwrap();
        assert_eq!(word.surface_form(), "cold");
        assert_eq!(word.path(), files[1].as_path());

        let missing = Word::from_path(dir.path().join("absent.arff")).unwrap_err();
        assert!(matches!(missing, DatasetError::Io { .. }));

        assert!(collect_dataset_files(dir.path().join("absent")).is_err());
    }
}
