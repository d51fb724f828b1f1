use std::collections::BTreeMap;

use proptest::prelude::*;

use super::*;

fn words_of(result: &[Completion]) -> Vec<String> {
    result.iter().map(Completion::text).collect()
}

fn snapshot(dict: &Dictionary) -> BTreeMap<Vec<u8>, u32> {
    dict.most_used(None, 0)
        .unwrap()
        .into_iter()
        .map(|c| (c.word, c.count))
        .collect()
}

#[test]
fn test_add_rejects_short_words() {
    let mut dict = Dictionary::new();
    assert!(matches!(dict.add(b""), Err(DictError::WordTooShort(0))));
    assert!(matches!(dict.add(b"a"), Err(DictError::WordTooShort(1))));
    assert!(dict.add(b"ab").is_ok());
    assert_eq!(dict.len(), 1);
}

#[test]
fn test_add_rejects_non_letters() {
    let mut dict = Dictionary::new();
    assert!(matches!(dict.add(b"don't"), Err(DictError::NotALetter(b'\''))));
    assert!(matches!(dict.add(b"ab1"), Err(DictError::NotALetter(b'1'))));
    // ß and ÿ have no single-byte uppercase form and are not letters here.
    assert!(matches!(
        dict.add(b"stra\xDFe"),
        Err(DictError::NotALetter(0xDF))
    ));
    assert!(matches!(dict.add(b"\xFFa"), Err(DictError::NotALetter(0xFF))));
    assert!(dict.is_empty());
}

#[test]
fn test_stored_words_survive_export_import() {
    let mut dict = Dictionary::new();
    for word in [&b"don't"[..], b"ab1", b"stra\xDFe", b"hello", b"\xC9t\xE9"] {
        let _ = dict.add(word);
    }
    assert_eq!(dict.len(), 2);

    let text = dict.export_weighted_text().unwrap();
    let mut restored = Dictionary::new();
    restored.import_weighted_text(&text).unwrap();
    assert_eq!(snapshot(&restored), snapshot(&dict));
    assert_eq!(restored.frequency(b"hello"), 1);
    assert_eq!(restored.frequency(b"\xE9t\xE9"), 1);
    assert_eq!(restored.frequency(b"don"), 0);
}

#[test]
fn test_add_folds_case() {
    let mut dict = Dictionary::new();
    dict.add(b"Hello").unwrap();
    dict.add(b"HELLO").unwrap();
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.frequency(b"hello"), 2);
    assert_eq!(dict.frequency(b"HeLLo"), 2);

    let lower = dict.most_used(Some(b"hello"), 5).unwrap();
    let upper = dict.most_used(Some(b"HELLO"), 5).unwrap();
    assert_eq!(lower, upper);
    assert_eq!(words_of(&lower), vec!["hello"]);
}

#[test]
fn test_add_folds_latin1() {
    let mut dict = Dictionary::new();
    // "ÉTÉ" in Latin-1
    dict.add(&[0xC9, b'T', 0xC9]).unwrap();
    assert_eq!(dict.frequency(&[0xE9, b't', 0xE9]), 1);
    let result = dict.most_used(Some(&[0xE9]), 0).unwrap();
    assert_eq!(result[0].text(), "été");
}

#[test]
fn test_ranking() {
    let mut dict = Dictionary::new();
    for _ in 0..5 {
        dict.add(b"the").unwrap();
    }
    dict.add(b"that").unwrap();
    dict.add(b"that").unwrap();
    dict.add(b"than").unwrap();

    let result = dict.most_used(Some(b"th"), 2).unwrap();
    assert_eq!(words_of(&result), vec!["the", "that"]);
    assert_eq!(result[0].count, 5);
    assert_eq!(result[1].count, 2);
}

#[test]
fn test_ranking_evicts_weakest() {
    let mut dict = Dictionary::new();
    dict.add(b"aa").unwrap();
    for _ in 0..3 {
        dict.add(b"ab").unwrap();
    }
    for _ in 0..2 {
        dict.add(b"ac").unwrap();
    }
    for _ in 0..4 {
        dict.add(b"ad").unwrap();
    }
    let result = dict.most_used(Some(b"a"), 3).unwrap();
    assert_eq!(words_of(&result), vec!["ad", "ab", "ac"]);
}

#[test]
fn test_ties_keep_traversal_order() {
    let mut dict = Dictionary::new();
    for w in ["mm", "bb", "xx"] {
        dict.add(w.as_bytes()).unwrap();
    }
    // First-level BST is m / (b, x): the lower subtree is visited before
    // m's own child, the higher subtree last.
    let result = dict.most_used(None, 0).unwrap();
    assert_eq!(words_of(&result), vec!["bb", "mm", "xx"]);

    let limited = dict.most_used(None, 2).unwrap();
    assert_eq!(words_of(&limited), vec!["bb", "mm"]);
}

#[test]
fn test_limit_zero_returns_all() {
    let mut dict = Dictionary::new();
    for w in ["one", "two", "three", "four"] {
        dict.add(w.as_bytes()).unwrap();
    }
    assert_eq!(dict.most_used(None, 0).unwrap().len(), 4);
    assert_eq!(dict.most_used(Some(b""), 0).unwrap().len(), 4);
}

#[test]
fn test_fewer_matches_than_limit() {
    let mut dict = Dictionary::new();
    dict.add(b"word").unwrap();
    let result = dict.most_used(Some(b"wo"), 10).unwrap();
    assert_eq!(result.len(), 1);
}

#[test]
fn test_unknown_prefix_is_empty() {
    let mut dict = Dictionary::new();
    dict.add(b"word").unwrap();
    assert!(dict.most_used(Some(b"xyz"), 10).unwrap().is_empty());
    assert!(dict.most_used(Some(b"words"), 10).unwrap().is_empty());
}

#[test]
fn test_empty_dictionary_queries() {
    let dict = Dictionary::new();
    assert!(dict.most_used(None, 0).unwrap().is_empty());
    assert!(dict.export_weighted_text().unwrap().is_empty());
}

#[test]
fn test_prefix_inclusion() {
    let mut dict = Dictionary::new();
    dict.add(b"car").unwrap();
    dict.add(b"cart").unwrap();
    let mut words = words_of(&dict.most_used(Some(b"car"), 0).unwrap());
    words.sort();
    assert_eq!(words, vec!["car", "cart"]);
}

#[test]
fn test_prefix_inclusion_two_letters() {
    let mut dict = Dictionary::new();
    dict.add(b"be").unwrap();
    dict.add(b"bee").unwrap();
    dict.add(b"bee").unwrap();
    let result = dict.most_used(Some(b"be"), 0).unwrap();
    assert_eq!(words_of(&result), vec!["bee", "be"]);
}

#[test]
fn test_export_repeats_words() {
    let mut dict = Dictionary::new();
    dict.add(b"go").unwrap();
    dict.add(b"go").unwrap();
    dict.add(b"go").unwrap();
    assert_eq!(dict.export_weighted_text().unwrap(), b"go\ngo\ngo\n");
}

#[test]
fn test_export_import_roundtrip() {
    let mut dict = Dictionary::new();
    for w in ["the", "the", "that", "Zebra", "apple", "apple", "apple", "than"] {
        dict.add(w.as_bytes()).unwrap();
    }
    let text = dict.export_weighted_text().unwrap();
    let mut restored = Dictionary::new();
    restored.import_weighted_text(&text).unwrap();
    assert_eq!(snapshot(&restored), snapshot(&dict));
}

#[test]
fn test_import_skips_noise() {
    let mut dict = Dictionary::new();
    dict.import_weighted_text(b"a, bb! 42 c-dd\n\nee").unwrap();
    let mut words = words_of(&dict.most_used(None, 0).unwrap());
    words.sort();
    assert_eq!(words, vec!["bb", "dd", "ee"]);
}

#[test]
fn test_import_empty_and_punctuation() {
    let mut dict = Dictionary::new();
    dict.import_weighted_text(b"").unwrap();
    dict.import_weighted_text(b"!!! ... 123 ?").unwrap();
    assert!(dict.is_empty());
}

#[test]
fn test_add_text_counts_words() {
    let mut dict = Dictionary::new();
    let added = dict.add_text(b"The cat saw the dog, I think.").unwrap();
    assert_eq!(added, 6);
    assert_eq!(dict.frequency(b"the"), 2);
    assert_eq!(dict.frequency(b"i"), 0);
}

#[test]
fn test_clear() {
    let mut dict = Dictionary::new();
    dict.add(b"gone").unwrap();
    dict.clear();
    assert!(dict.is_empty());
    assert_eq!(dict.frequency(b"gone"), 0);
}

#[test]
fn test_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dict.hdc");

    let mut dict = Dictionary::new();
    dict.add_text(b"one two two three three three").unwrap();
    dict.save(&path).unwrap();
    assert!(!path.with_extension("tmp").exists());

    let loaded = Dictionary::open(&path).unwrap();
    assert_eq!(snapshot(&loaded), snapshot(&dict));
}

#[test]
fn test_save_empty_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.hdc");
    Dictionary::new().save(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"HUFF\0\0\0\0");
    assert!(Dictionary::open(&path).unwrap().is_empty());
}

#[test]
fn test_open_nonexistent() {
    let dir = tempfile::tempdir().unwrap();
    let dict = Dictionary::open(&dir.path().join("missing.hdc")).unwrap();
    assert!(dict.is_empty());
}

#[test]
fn test_open_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.hdc");
    std::fs::write(&path, b"NOPE\0\0\0\0").unwrap();
    assert!(matches!(
        Dictionary::open(&path),
        Err(DictError::Codec(HuffmanError::InvalidMagic))
    ));
}

#[test]
fn test_merge_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dict.hdc");

    let mut saved = Dictionary::new();
    saved.add_text(b"alpha beta beta").unwrap();
    saved.save(&path).unwrap();

    let mut dict = Dictionary::new();
    dict.add_text(b"beta gamma").unwrap();
    dict.merge_file(&path).unwrap();
    assert_eq!(dict.frequency(b"alpha"), 1);
    assert_eq!(dict.frequency(b"beta"), 3);
    assert_eq!(dict.frequency(b"gamma"), 1);

    assert!(dict.merge_file(&dir.path().join("missing.hdc")).is_err());
}

fn arb_word() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            8 => b'a'..=b'z',
            1 => b'A'..=b'Z',
            1 => 0xE0u8..=0xF6,
            1 => prop::sample::select(vec![b'0', b'7', b'\'', b'-', b',', 0xD7, 0xDF, 0xFF]),
        ],
        1..8,
    )
}

proptest! {
    #[test]
    fn prop_export_import_preserves_frequencies(
        words in prop::collection::vec(arb_word(), 0..60)
    ) {
        let mut dict = Dictionary::new();
        for w in &words {
            let accepted = dict.add(w).is_ok();
            let is_word = w.len() >= MIN_WORD_LEN && w.iter().all(|&b| latin1::is_alpha(b));
            prop_assert_eq!(accepted, is_word);
        }
        let text = dict.export_weighted_text().unwrap();
        let mut restored = Dictionary::new();
        restored.import_weighted_text(&text).unwrap();
        prop_assert_eq!(snapshot(&restored), snapshot(&dict));
    }

    #[test]
    fn prop_most_used_is_sorted_and_bounded(
        words in prop::collection::vec(arb_word(), 0..60),
        limit in 0usize..10,
    ) {
        let mut dict = Dictionary::new();
        for w in &words {
            let _ = dict.add(w);
        }
        let result = dict.most_used(None, limit).unwrap();
        if limit > 0 {
            prop_assert!(result.len() <= limit);
        }
        prop_assert!(result.windows(2).all(|w| w[0].count >= w[1].count));
    }
}
