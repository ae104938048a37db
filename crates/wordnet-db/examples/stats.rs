use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use wordnet_db::{LoadMode, WordNet};
use wordnet_types::Pos;

fn main() -> Result<()> {
    let dict_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p wordnet-db --example stats -- <path-to-wordnet-dir>")?;

    let wn = WordNet::load_with_mode(&dict_dir, LoadMode::Mmap)
        .with_context(|| format!("loading WordNet from {}", dict_dir.display()))?;

    let mut lemma_count = 0usize;
    let mut relation_count = 0usize;
    let mut gloss_example_count = 0usize;
    for syn in wn.iter_synsets() {
        lemma_count += syn.lemmas.len();
        relation_count += syn.relations.len();
        gloss_example_count += syn.gloss.examples.len();
    }

    println!("Dictionary: {}", dict_dir.display());
    println!("Index entries: {}", wn.index_count());
    println!("Synsets      : {}", wn.synset_count());
    println!("Lemmas in synsets: {}", lemma_count);
    println!("Decoded relations: {}", relation_count);
    println!("Gloss examples: {}", gloss_example_count);
    println!("Sense-count entries: {}", wn.sense_count_entries());
    for pos in [Pos::Noun, Pos::Verb] {
        println!("Taxonomy depth ({pos}): {}", wn.taxonomy_depth(pos));
    }

    Ok(())
}
