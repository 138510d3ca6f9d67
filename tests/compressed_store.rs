mod common;

use common::{StoreFile, NEW_FIRST, NEW_SECOND};
use nada_it::{CountPair, LoadError, NgramCompressedCntMap, NgramCounts, NgramStore, StoreKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const FLAG: u16 = 32768;

fn cat_store() -> StoreFile {
    StoreFile::default()
        .token("the", 1)
        .token("cat", 2)
        .token("sat", 3)
        .value(4, 1, 0)
        .keys(&[NEW_FIRST, 1, 2, 3, 0])
}

#[test]
fn loads_minimal_store_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = cat_store().write(dir.path(), "cat.bin");

    let store = NgramCompressedCntMap::initialize(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.find(b"the cat sat _"), CountPair::new(4, 1));
    assert_eq!(store.find(b"the cat dog _"), CountPair::ZERO);
    assert_eq!(store.find(b"_ the cat sat"), CountPair::ZERO);
}

#[test]
fn delta_records_resolve_against_previous_tokens() {
    let file = StoreFile::default()
        .token("a", 5)
        .token("b", 6)
        .token("c", 7)
        .token("d", 8)
        .token("e", 9)
        .token("f", 10)
        .value(1, 0, 0)
        .value(2, 0, 1)
        .value(3, 0, 2)
        .keys(&[NEW_FIRST, 5, 6, 7, 0, 8, 1, NEW_SECOND, 9, 10, 2]);
    let store = NgramCompressedCntMap::from_bytes(&file.bytes()).unwrap();

    assert_eq!(store.keys().len(), 3);
    assert_eq!(store.find(b"a b c _"), CountPair::new(1, 0));
    assert_eq!(store.find(b"a b d _"), CountPair::new(2, 0));
    assert_eq!(store.find(b"a e f _"), CountPair::new(3, 0));
    // carried tokens do not leak into unrelated triples
    assert_eq!(store.find(b"a b f _"), CountPair::ZERO);
}

#[test]
fn value_records_may_arrive_in_any_order() {
    let mut values: Vec<(u32, u32, u16)> = (0..64u16).map(|r| (r as u32 * 10, r as u32, r)).collect();
    values.shuffle(&mut StdRng::seed_from_u64(7));

    let mut file = StoreFile::default().token("x", 1).token("y", 2);
    for (it, they, rank) in values {
        file = file.value(it, they, rank);
    }
    // token3 walks through the ranks with the short record form
    let mut words = vec![NEW_FIRST, 1, 2, 1, 0];
    for rank in 1..64u16 {
        words.extend([1 + rank, rank]);
    }
    file = file.token("z", 33).keys(&words);

    let store = NgramCompressedCntMap::from_bytes(&file.bytes()).unwrap();
    assert_eq!(store.values().len(), 64);
    assert_eq!(store.find(b"x y x _"), CountPair::new(0, 0));
    assert_eq!(store.find(b"x y y _"), CountPair::new(10, 1));
    assert_eq!(store.find(b"x y z _"), CountPair::new(320, 32));
}

#[test]
fn wildcard_position_selects_distinct_entries() {
    let file = StoreFile::default()
        .token("a", 1)
        .token("b", 2)
        .token("c", 3)
        .value(5, 0, 0)
        .value(0, 5, 1)
        .keys(&[NEW_FIRST, 1, 2, 3 + FLAG, 0, 3, 1]);
    let store = NgramCompressedCntMap::from_bytes(&file.bytes()).unwrap();

    assert_eq!(store.find(b"a b _ c"), CountPair::new(5, 0));
    assert_eq!(store.find(b"a b c _"), CountPair::new(0, 5));
    assert_ne!(store.query_key(b"a b _ c"), store.query_key(b"a b c _"));
    assert_eq!(store.find(b"_ a b c"), CountPair::ZERO);
    assert_eq!(store.find(b"a _ b c"), CountPair::ZERO);
}

#[test]
fn corrupt_files_are_rejected_whole() {
    let dir = tempfile::tempdir().unwrap();

    let dangling = cat_store().keys(&[4, 9]);
    let err = NgramCompressedCntMap::initialize(&dangling.write(dir.path(), "dangling.bin")).unwrap_err();
    assert!(matches!(err, LoadError::DanglingValueRank { record: 1, rank: 9, count: 1 }));

    let mut cut = cat_store().bytes();
    cut.truncate(cut.len() - 3);
    std::fs::write(dir.path().join("cut.bin"), &cut).unwrap();
    let err = NgramCompressedCntMap::initialize(&dir.path().join("cut.bin")).unwrap_err();
    assert!(matches!(err, LoadError::Truncated { section: "keys", .. }));

    std::fs::write(dir.path().join("empty.bin"), b"").unwrap();
    assert!(NgramCompressedCntMap::initialize(&dir.path().join("empty.bin")).is_err());

    let err = NgramCompressedCntMap::initialize(&dir.path().join("missing.bin")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
    assert!(!err.to_string().is_empty());
}

#[test]
fn concurrent_readers_see_the_same_counts() {
    let store = NgramStore::Compressed(NgramCompressedCntMap::from_bytes(&cat_store().bytes()).unwrap());
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..1000 {
                    assert_eq!(store.find(b"the cat sat _"), CountPair::new(4, 1));
                    assert_eq!(store.find(b"the _ cat sat"), CountPair::ZERO);
                }
            });
        }
    });
}

#[test]
fn store_kind_selects_the_loader() {
    let dir = tempfile::tempdir().unwrap();
    let bin = cat_store().write(dir.path(), "cat.bin");
    let txt = dir.path().join("cat.txt");
    std::fs::write(&txt, "the cat sat _\t4\t1\n").unwrap();

    let compressed = NgramStore::open(StoreKind::Compressed, &bin).unwrap();
    let plain = NgramStore::open(StoreKind::Plain, &txt).unwrap();
    for query in ["the cat sat _", "the cat dog _", "the cat sat"] {
        assert_eq!(
            compressed.find(query.as_bytes()),
            plain.find(query.as_bytes()),
            "{query}"
        );
    }
}
