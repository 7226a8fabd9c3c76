use std::hash::{Hash, Hasher};

use crate::HamtMap;

/// A key type with a controllable hash value for forcing collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CollidingKey {
    id: u32,
    forced_hash: u64,
}

impl CollidingKey {
    const fn new(id: u32, hash: u64) -> Self {
        Self {
            id,
            forced_hash: hash,
        }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forced_hash.hash(state);
    }
}

/// Two keys with the same 64-bit hash end up in a collision bucket.
#[test]
fn two_colliding_keys() {
    let k1 = CollidingKey::new(1, 0xDEAD_BEEF);
    let k2 = CollidingKey::new(2, 0xDEAD_BEEF);

    let map = HamtMap::new().assoc(k1.clone(), "first").assoc(k2.clone(), "second");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&"first"));
    assert_eq!(map.get(&k2), Some(&"second"));
}

/// Three keys with the same hash.
#[test]
fn three_colliding_keys() {
    let keys: Vec<CollidingKey> = (0..3).map(|i| CollidingKey::new(i, 0xCAFE)).collect();

    let map = keys
        .iter()
        .enumerate()
        .fold(HamtMap::new(), |m, (i, k)| m.assoc(k.clone(), i));

    assert_eq!(map.len(), 3);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(map.get(k), Some(&i));
    }
}

/// Remove from a collision bucket.
#[test]
fn remove_from_collision() {
    let k1 = CollidingKey::new(1, 0xAAAA);
    let k2 = CollidingKey::new(2, 0xAAAA);
    let k3 = CollidingKey::new(3, 0xAAAA);

    let map = HamtMap::new()
        .assoc(k1.clone(), 10)
        .assoc(k2.clone(), 20)
        .assoc(k3.clone(), 30);

    let out = map.dissoc(&k2);
    assert_eq!(out.len(), 2);
    assert_eq!(out.get(&k1), Some(&10));
    assert_eq!(out.get(&k2), None);
    assert_eq!(out.get(&k3), Some(&30));
}

/// Overwrite inside a collision bucket.
#[test]
fn overwrite_in_collision() {
    let k1 = CollidingKey::new(1, 0xBBBB);
    let k2 = CollidingKey::new(2, 0xBBBB);

    let map = HamtMap::new()
        .assoc(k1.clone(), "old")
        .assoc(k2.clone(), "val2")
        .assoc(k1.clone(), "new");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&"new"));
}

/// Draining a collision bucket returns the map to empty.
#[test]
fn collision_remove_all() {
    let k1 = CollidingKey::new(1, 0xCCCC);
    let k2 = CollidingKey::new(2, 0xCCCC);

    let map = HamtMap::new().assoc(k1.clone(), 1).assoc(k2.clone(), 2);
    let out = map.dissoc(&k1).dissoc(&k2);
    assert!(out.is_empty());
}

/// Mixed: some keys collide, some do not.
#[test]
fn mixed_collisions_and_normal() {
    let collide_a = CollidingKey::new(1, 0xDDDD);
    let collide_b = CollidingKey::new(2, 0xDDDD);
    let normal = CollidingKey::new(3, 0xEEEE);

    let map = HamtMap::new()
        .assoc(collide_a.clone(), "a")
        .assoc(collide_b.clone(), "b")
        .assoc(normal.clone(), "c");

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&collide_a), Some(&"a"));
    assert_eq!(map.get(&collide_b), Some(&"b"));
    assert_eq!(map.get(&normal), Some(&"c"));
}

/// Two colliding keys chain all the way to the deepest level; deleting
/// one collapses the whole chain back to a single-item root.
#[test]
fn collision_pair_collapse() {
    let k1 = CollidingKey::new(1, 0x1234);
    let k2 = CollidingKey::new(2, 0x1234);

    let map = HamtMap::new().assoc(k1.clone(), "a").assoc(k2.clone(), "b");
    assert_eq!(map.len(), 2);

    let shrunk = map.dissoc(&k1);
    assert_eq!(shrunk.len(), 1);
    assert_eq!(shrunk.get(&k1), None);
    assert_eq!(shrunk.get(&k2), Some(&"b"));
    assert_eq!(map.get(&k1), Some(&"a"));
}

/// 1000 keys sharing one constant hash: exact lookups, then full drain.
#[test]
fn thousand_colliding_keys() {
    let keys: Vec<CollidingKey> = (0..1000).map(|i| CollidingKey::new(i, 1)).collect();

    let map = keys
        .iter()
        .enumerate()
        .fold(HamtMap::new(), |m, (i, k)| m.assoc(k.clone(), format!("payload-{i}")));

    assert_eq!(map.len(), 1000);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(map.get(k), Some(&format!("payload-{i}")));
    }

    let drained = keys.iter().fold(map.clone(), |m, k| m.dissoc(k));
    assert!(drained.is_empty());
    assert_eq!(map.len(), 1000);
}

/// The same stress through one commit reuses the bucket in place.
#[test]
fn thousand_colliding_keys_in_commit() {
    let keys: Vec<CollidingKey> = (0..1000).map(|i| CollidingKey::new(i, 7)).collect();

    let map = HamtMap::new()
        .transaction(|commit| {
            for (i, k) in keys.iter().enumerate() {
                commit.assoc(k.clone(), i)?;
            }
            Ok::<_, crate::CommitError>(())
        })
        .expect("same-thread commit");

    assert_eq!(map.len(), 1000);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(map.get(k), Some(&i));
    }
}
