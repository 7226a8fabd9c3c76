use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::HamtMap;

/// 1000 entries: insert all, verify all, drain all.
#[test]
fn thousand_entries() {
    let map = (0_u64..1000).fold(HamtMap::new(), |m, i| m.assoc(i, i * 3));
    assert_eq!(map.len(), 1000);

    for i in 0_u64..1000 {
        assert_eq!(map.get(&i), Some(&(i * 3)), "missing key {i}");
    }

    let drained = (0_u64..1000).fold(map.clone(), |m, i| m.dissoc(&i));
    assert!(drained.is_empty());
    assert_eq!(map.len(), 1000);
}

/// 500 sequential keys, every one recoverable.
#[test]
fn deep_shared_prefixes() {
    let map = (0_u64..500).fold(HamtMap::new(), |m, i| m.assoc(i, i));
    assert_eq!(map.len(), 500);
    for i in 0_u64..500 {
        assert_eq!(map.get(&i), Some(&i));
    }
}

/// Insert + overwrite + remove interleaved through one commit.
#[test]
fn interleaved_operations() {
    let map = HamtMap::new()
        .transaction(|commit| {
            for i in 0_u64..200 {
                commit.assoc(i, i)?;
            }
            for i in (0_u64..200).step_by(2) {
                commit.assoc(i, i + 1000)?;
            }
            for i in (1_u64..200).step_by(2) {
                commit.dissoc(&i)?;
            }
            Ok::<_, crate::CommitError>(())
        })
        .expect("same-thread commit");

    assert_eq!(map.len(), 100);
    for i in (0_u64..200).step_by(2) {
        assert_eq!(map.get(&i), Some(&(i + 1000)));
    }
}

/// Randomized churn against a std HashMap mirror.
#[test]
fn randomized_churn() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut map = HamtMap::new();
    let mut mirror: HashMap<u16, u32> = HashMap::new();

    for _ in 0..10_000 {
        let key: u16 = rng.gen_range(0..512);
        if rng.gen_bool(0.3) {
            map = map.dissoc(&key);
            mirror.remove(&key);
        } else {
            let value: u32 = rng.gen();
            map = map.assoc(key, value);
            mirror.insert(key, value);
        }
    }

    assert_eq!(map.len(), mirror.len());
    for (k, v) in &mirror {
        assert_eq!(map.get(k), Some(v));
    }
}

/// Random snapshots taken mid-churn keep their exact contents.
#[test]
fn snapshots_are_stable() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut map: HamtMap<u16, u32> = HamtMap::new();
    let mut snapshots = Vec::new();

    for round in 0..2_000 {
        let key: u16 = rng.gen_range(0..128);
        map = if rng.gen_bool(0.25) {
            map.dissoc(&key)
        } else {
            map.assoc(key, rng.gen())
        };
        if round % 500 == 0 {
            let frozen: Vec<(u16, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
            snapshots.push((map.clone(), frozen));
        }
    }

    for (snapshot, frozen) in &snapshots {
        assert_eq!(snapshot.len(), frozen.len());
        for (k, v) in frozen {
            assert_eq!(snapshot.get(k), Some(v));
        }
    }
}
