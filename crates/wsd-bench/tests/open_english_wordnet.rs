use std::env;
use std::path::PathBuf;

use wordnet_db::LoadMode;
use wsd_bench::{Algorithm, AlgorithmScorer, Disambiguation, Scorer, SenseInventory, WordNetInventory};

fn dict_dir() -> Option<PathBuf> {
    env::var("WORDNET_DIR").ok().map(PathBuf::from)
}

#[test]
fn every_algorithm_ranks_bank() {
    let Some(dir) = dict_dir() else {
        eprintln!("skipping: WORDNET_DIR not set");
        return;
    };
    let inv = WordNetInventory::load(&dir, LoadMode::Mmap).expect("load open english wordnet");
    let sentence = "I went to the bank to deposit my money";
    let candidates = inv.senses("bank", None);

    for algorithm in Algorithm::all() {
        let scorer = AlgorithmScorer::new(&inv, algorithm);
        let outcome = scorer.score(sentence, "bank");
        let best = outcome.best().expect("bank has senses");
        assert!(candidates.contains(&best), "{algorithm}");
        assert_eq!(outcome.ranking().len(), candidates.len(), "{algorithm}");
        assert_eq!(scorer.score(sentence, "zzqxv"), Disambiguation::NotInInventory);
    }
}
