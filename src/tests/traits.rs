use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::{HamtBidiMap, HamtMap, HamtSet};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn default_is_empty() {
    let map: HamtMap<i32, i32> = HamtMap::default();
    assert!(map.is_empty());
    let set: HamtSet<i32> = HamtSet::default();
    assert!(set.is_empty());
    let bidi: HamtBidiMap<i32, i32> = HamtBidiMap::default();
    assert!(bidi.is_empty());
}

#[test]
fn debug_format() {
    let map: HamtMap<i32, i32> = HamtMap::new();
    let dbg = format!("{map:?}");
    assert!(dbg.contains("HamtMap"));
    assert!(dbg.contains("len"));
}

#[test]
fn from_iterator() {
    let map: HamtMap<i32, i32> = vec![(1, 10), (2, 20), (3, 30)].into_iter().collect();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&1), Some(&10));
}

#[test]
fn extend_trait() {
    let mut map = HamtMap::new().assoc(1, 10);
    map.extend(vec![(2, 20), (3, 30)]);
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&3), Some(&30));
}

#[test]
fn index_existing() {
    let map = HamtMap::new().assoc("key", 42);
    assert_eq!(map[&"key"], 42);
}

#[test]
#[should_panic(expected = "key not found")]
fn index_missing_panics() {
    let map: HamtMap<i32, i32> = HamtMap::new();
    let _ = map[&999];
}

/// Structural equality ignores insertion order.
#[test]
fn eq_across_insert_orders() {
    let a: HamtMap<i32, i32> = (0..64).map(|i| (i, i)).collect();
    let b: HamtMap<i32, i32> = (0..64).rev().map(|i| (i, i)).collect();
    assert_eq!(a, b);
    assert!(!a.ptr_eq(&b));
}

/// The container hash is order-independent, like its equality.
#[test]
fn hash_order_independent() {
    let a: HamtMap<i32, i32> = (0..64).map(|i| (i, i)).collect();
    let b: HamtMap<i32, i32> = (0..64).rev().map(|i| (i, i)).collect();
    assert_eq!(hash_of(&a), hash_of(&b));

    let c = a.assoc(64, 64);
    assert_ne!(hash_of(&a), hash_of(&c));
}

#[test]
fn set_and_bidi_equality() {
    let s1: HamtSet<i32> = [3, 1, 2].into_iter().collect();
    let s2: HamtSet<i32> = [1, 2, 3].into_iter().collect();
    assert_eq!(s1, s2);
    assert_eq!(hash_of(&s1), hash_of(&s2));

    let b1: HamtBidiMap<i32, i32> = [(1, 10), (2, 20)].into_iter().collect();
    let b2: HamtBidiMap<i32, i32> = [(2, 20), (1, 10)].into_iter().collect();
    assert_eq!(b1, b2);
    assert_eq!(hash_of(&b1), hash_of(&b2));
}

#[test]
fn into_iterator_for_refs() {
    let map: HamtMap<i32, i32> = (0..5).map(|i| (i, i)).collect();
    let mut count = 0;
    for (k, v) in &map {
        assert_eq!(k, v);
        count += 1;
    }
    assert_eq!(count, 5);
}
