use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::Pos;

const USAGE: &str =
    "usage: cargo run -p wordnet-morphy --example lookup -- <dict-dir> [--demo | <sentence>...]";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dict_dir = args.next().map(PathBuf::from).context(USAGE)?;
    let rest: Vec<String> = args.collect();
    let words: Vec<String> = match rest.as_slice() {
        [] => bail!(USAGE),
        [flag] if flag == "--demo" => "I have been prescribed two important drugs today"
            .split_whitespace()
            .map(String::from)
            .collect(),
        words => words.to_vec(),
    };

    let wn = WordNet::load_with_mode(&dict_dir, LoadMode::Mmap)
        .with_context(|| format!("loading WordNet from {}", dict_dir.display()))?;
    let morph = Morphy::load(&dict_dir)
        .with_context(|| format!("loading exceptions from {}", dict_dir.display()))?;
    let exists = |pos, lemma: &str| wn.lemma_exists(pos, lemma);

    println!("Dictionary: {}", dict_dir.display());
    for word in words {
        let lemma = morph.lemmatize(&word, None, &exists);
        let senses = wn.synsets_any_pos(&lemma).len();
        println!("\n{word} -> {lemma} ({senses} senses)");
        for pos in Pos::ALL {
            for cand in morph.lemmas_for(pos, &word, &exists) {
                println!("    {:<5} {:<12} [{:?}]", pos, cand.lemma, cand.source);
            }
        }
    }

    Ok(())
}
