use crate::HamtMap;

#[test]
fn empty_map() {
    let map: HamtMap<String, i32> = HamtMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
}

#[test]
fn assoc_one() {
    let map = HamtMap::new().assoc("hello", 42);
    assert_eq!(map.len(), 1);
    assert!(!map.is_empty());
}

#[test]
fn assoc_and_get() {
    let map = HamtMap::new().assoc("key", 100);
    assert_eq!(map.get(&"key"), Some(&100));
}

#[test]
fn get_missing_key() {
    let map = HamtMap::new().assoc("a", 1);
    assert_eq!(map.get(&"b"), None);
}

#[test]
fn assoc_multiple() {
    let map = (0..10).fold(HamtMap::new(), |m, i| m.assoc(i, i * 10));
    assert_eq!(map.len(), 10);
    for i in 0..10 {
        assert_eq!(map.get(&i), Some(&(i * 10)));
    }
}

#[test]
fn overwrite_value() {
    let m1 = HamtMap::new().assoc("k", 1);
    let m2 = m1.assoc("k", 2);
    assert_eq!(m2.len(), 1);
    assert_eq!(m2.get(&"k"), Some(&2));
    assert_eq!(m1.get(&"k"), Some(&1));
}

#[test]
fn contains_key_true() {
    let map = HamtMap::new().assoc(42, "val");
    assert!(map.contains_key(&42));
}

#[test]
fn contains_key_false() {
    let map = HamtMap::new().assoc(1, "a");
    assert!(!map.contains_key(&2));
}

#[test]
fn dissoc_existing() {
    let map = HamtMap::new().assoc("a", 1).assoc("b", 2);
    let out = map.dissoc(&"a");
    assert_eq!(out.len(), 1);
    assert_eq!(out.get(&"a"), None);
    assert_eq!(out.get(&"b"), Some(&2));
    assert_eq!(map.get(&"a"), Some(&1));
}

/// Removing an absent key hands back the same root.
#[test]
fn dissoc_missing() {
    let map = HamtMap::new().assoc("a", 1);
    let out = map.dissoc(&"z");
    assert_eq!(out.len(), 1);
    assert!(out.ptr_eq(&map));
}

#[test]
fn dissoc_all() {
    let map = HamtMap::new().assoc(1, 10).assoc(2, 20).assoc(3, 30);
    let out = map.dissoc(&1).dissoc(&2).dissoc(&3);
    assert!(out.is_empty());
    assert_eq!(out.get(&1), None);
}

#[test]
fn get_or_present() {
    let map = HamtMap::new().assoc("k", 7);
    assert_eq!(map.get_or(&"k", &0), &7);
}

#[test]
fn get_or_absent() {
    let map: HamtMap<&str, i32> = HamtMap::new();
    assert_eq!(map.get_or(&"k", &0), &0);
}

#[test]
fn update_present() {
    let map = HamtMap::new().assoc("n", 5);
    let out = map.update("n", 0, |v| v + 1);
    assert_eq!(out.get(&"n"), Some(&6));
}

#[test]
fn update_absent_uses_default() {
    let map: HamtMap<&str, i32> = HamtMap::new();
    let out = map.update("n", 10, |v| v + 1);
    assert_eq!(out.get(&"n"), Some(&11));
}

#[test]
fn keys_and_values() {
    let map = HamtMap::new().assoc(1, "a").assoc(2, "b");
    let mut keys: Vec<i32> = map.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec![1, 2]);
    let mut values: Vec<&str> = map.values().copied().collect();
    values.sort_unstable();
    assert_eq!(values, vec!["a", "b"]);
}

#[test]
fn iter_covers_all_pairs() {
    let map = (0..50).fold(HamtMap::new(), |m, i| m.assoc(i, i * 2));
    assert_eq!(map.iter().len(), 50);
    let mut seen: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    seen.sort_unstable();
    let expected: Vec<(i32, i32)> = (0..50).map(|i| (i, i * 2)).collect();
    assert_eq!(seen, expected);
}
