use std::path::PathBuf;

use wordnet_db::{LoadMode, WordNet};
use wordnet_types::{Pos, Relation, SynsetId, SynsetType};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("wn")
}

fn noun(offset: u32) -> SynsetId {
    SynsetId {
        pos: Pos::Noun,
        offset,
    }
}

#[test]
fn lists_senses_in_index_order() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    assert_eq!(wn.synsets_for_lemma(Pos::Noun, "bank"), &[noun(2600), noun(2800)]);
    assert_eq!(wn.synsets_for_lemma(Pos::Noun, "Bank"), &[noun(2600), noun(2800)]);
    assert!(wn.synsets_for_lemma(Pos::Verb, "bank").is_empty());

    let entry = wn.index_entry(Pos::Noun, "bank").expect("bank index entry");
    assert_eq!(entry.tagsense_cnt, 2);
    assert_eq!(entry.sense_number(2800), Some(2));
}

#[test]
fn merges_parts_of_speech_nouns_first() {
    let wn = WordNet::load_with_mode(fixture_dir(), LoadMode::Owned).expect("load fixtures");
    assert_eq!(wn.synsets_any_pos("run").len(), 1);
    assert_eq!(wn.synsets_any_pos("dog"), vec![noun(2200)]);
    assert!(wn.synsets_any_pos("xyzzy").is_empty());
}

#[test]
fn parses_synset_lemmas_relations_and_gloss() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    let synset = wn.get_synset(noun(2200)).expect("dog synset");

    assert_eq!(synset.synset_type, SynsetType::Noun);
    assert_eq!(synset.lemmas, vec!["dog", "domestic_dog"]);
    assert_eq!(synset.hypernyms().collect::<Vec<_>>(), vec![noun(2100)]);
    assert_eq!(synset.gloss.definition, "a member of the genus Canis");
    assert_eq!(synset.gloss.examples, vec!["the dog barked all night"]);

    let animal = wn.get_synset(noun(2100)).expect("animal synset");
    assert_eq!(animal.related(Relation::Hyponym).count(), 2);
}

#[test]
fn skips_verb_frames_and_adjective_markers() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    let run = wn
        .get_synset(SynsetId {
            pos: Pos::Verb,
            offset: 4100,
        })
        .expect("run synset");
    assert_eq!(run.gloss.definition, "move fast by using one's feet");

    let glad = wn
        .get_synset(SynsetId {
            pos: Pos::Adj,
            offset: 5200,
        })
        .expect("glad synset");
    assert_eq!(glad.synset_type, SynsetType::AdjSatellite);
    assert_eq!(glad.lemmas, vec!["glad"]);
}

#[test]
fn names_senses_like_nltk() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    assert_eq!(wn.sense_name(noun(2800)).as_deref(), Some("bank.n.02"));
    assert_eq!(
        wn.sense_name(SynsetId {
            pos: Pos::Adj,
            offset: 5200
        })
        .as_deref(),
        Some("glad.s.01")
    );
}

#[test]
fn reads_sense_counts() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    assert_eq!(wn.sense_count_entries(), 5);
    assert_eq!(wn.sense_count(Pos::Noun, "bank", 2800), Some(20));
    assert_eq!(wn.sense_count(Pos::Noun, "river", 2900), None);
}

#[test]
fn rejects_incomplete_dictionary() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("data.noun"), "").expect("write");
    let err = WordNet::load(dir.path()).err().expect("missing files");
    assert!(err.to_string().contains("missing required WordNet file"));
}
