#![cfg(test)]

// Property tests for ComparatorMap kept inside the crate so they can reach
// the backing store and the cached strategy hashes.

use crate::collection_comparer::{entry_hash, hash_code, item_hash};
use crate::comparator_map::ComparatorMap;
use crate::comparator_object::Probe;
use crate::strategy::{EqualityStrategy, FnStrategy};
use crate::view_collection::{AddElements, ViewCollection};
use proptest::prelude::*;
use std::collections::HashMap;

// Keys compare by name, case-insensitively; `tag` is payload the strategy
// never looks at, so replaced keys can be told apart from their originals.
#[derive(Clone, Debug)]
struct Key {
    name: String,
    tag: u8,
}

fn folded(k: &Key) -> String {
    k.name.to_ascii_lowercase()
}

fn by_folded_name() -> impl EqualityStrategy<Key> {
    FnStrategy::new(
        |a: &Key, b: &Key| a.name.eq_ignore_ascii_case(&b.name),
        |k: &Key| item_hash(&folded(k)),
    )
}

// Hash only on length to force long probe chains.
fn colliding() -> impl EqualityStrategy<Key> {
    FnStrategy::new(
        |a: &Key, b: &Key| a.name.eq_ignore_ascii_case(&b.name),
        |k: &Key| (k.name.len() % 2) as u64,
    )
}

#[derive(Clone, Debug)]
enum Op {
    Put(usize, u8, i32),
    TryInsert(usize, u8, i32),
    Remove(usize),
    Get(usize),
    Foreign(usize),
    KeySetAdd(usize),
    ValueRemove(i32),
    RetainEven,
    Clear,
}

fn key_from(pool: &[String], i: usize, tag: u8) -> Key {
    Key {
        name: pool[i].clone(),
        tag,
    }
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-cA-C]{0,3}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<u8>(), -4i32..4).prop_map(|(i, t, v)| Op::Put(i, t, v)),
            2 => (idx.clone(), any::<u8>(), -4i32..4).prop_map(|(i, t, v)| Op::TryInsert(i, t, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => idx.clone().prop_map(Op::Foreign),
            1 => idx.clone().prop_map(Op::KeySetAdd),
            1 => (-4i32..4).prop_map(Op::ValueRemove),
            1 => Just(Op::RetainEven),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Model: folded name -> (tag of the first stored key, value).
type Model = HashMap<String, (u8, i32)>;

fn run<C: EqualityStrategy<Key>>(
    mut sut: ComparatorMap<Key, i32, C>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: Model = HashMap::new();
    for op in ops {
        match op {
            Op::Put(i, tag, v) => {
                let k = key_from(&pool, i, tag);
                let prev = sut.put(k.clone(), v);
                let expected = match model.get_mut(&folded(&k)) {
                    Some(slot) => Some(std::mem::replace(&mut slot.1, v)),
                    None => {
                        model.insert(folded(&k), (tag, v));
                        None
                    }
                };
                prop_assert_eq!(prev, expected);
            }
            Op::TryInsert(i, tag, v) => {
                let k = key_from(&pool, i, tag);
                let present = model.contains_key(&folded(&k));
                let ok = sut.try_insert(k.clone(), v).is_ok();
                prop_assert_eq!(ok, !present);
                if ok {
                    model.insert(folded(&k), (tag, v));
                }
            }
            Op::Remove(i) => {
                let k = key_from(&pool, i, 0);
                let got = sut.remove_entry(&k);
                let expected = model.remove(&folded(&k));
                prop_assert_eq!(got.map(|(k, v)| (k.tag, v)), expected);
            }
            Op::Get(i) => {
                let k = key_from(&pool, i, 0);
                let got = sut.get_key_value(&k).map(|(k, v)| (k.tag, *v));
                prop_assert_eq!(got, model.get(&folded(&k)).copied());
                let untyped = sut.try_get(Probe::foreign(&k)).ok().flatten().copied();
                prop_assert_eq!(untyped, got.map(|g| g.1));
            }
            Op::Foreign(i) => {
                let r = sut.try_contains_key(Probe::foreign(&pool[i]));
                if model.is_empty() {
                    prop_assert_eq!(r, Ok(false));
                } else {
                    prop_assert!(r.is_err());
                }
            }
            Op::KeySetAdd(i) => {
                let k = key_from(&pool, i, 1);
                let added = sut.key_set().add(k.clone());
                let present = model.contains_key(&folded(&k));
                prop_assert_eq!(added, Ok(!present));
                model.entry(folded(&k)).or_insert((1, 0));
            }
            Op::ValueRemove(v) => {
                let removed = sut.values_mut().remove(&v);
                let target = model
                    .iter()
                    .find(|(_, (_, mv))| *mv == v)
                    .map(|(name, _)| name.clone());
                prop_assert_eq!(removed, target.is_some());
                // Which duplicate goes is unspecified; resync from the map.
                if removed {
                    model.retain(|name, _| {
                        sut.contains_key(&Key {
                            name: name.clone(),
                            tag: 0,
                        })
                    });
                }
            }
            Op::RetainEven => {
                let changed = sut.retain(|_, v| *v % 2 == 0);
                let before = model.len();
                model.retain(|_, (_, v)| *v % 2 == 0);
                prop_assert_eq!(changed, model.len() != before);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().count(), model.len());
        for (k, v) in sut.iter() {
            prop_assert_eq!(model.get(&folded(k)).copied(), Some((k.tag, *v)));
        }
        // Cached hashes always agree with a fresh strategy hash.
        for (stored, _) in sut.stored() {
            prop_assert_eq!(
                stored.hash_value(),
                EqualityStrategy::hash(&**sut.strategy(), stored.object())
            );
        }
        let expected_hash = hash_code(sut.stored().map(|(k, v)| {
            entry_hash(EqualityStrategy::hash(&**sut.strategy(), k.object()), item_hash(v))
        }));
        prop_assert_eq!(sut.content_hash(), expected_hash);
    }
    Ok(())
}

// Property: state-machine equivalence against a HashMap keyed by the folded
// name. Invariants exercised:
// - `put` returns the previous value and keeps the first stored key.
// - `try_insert` and `KeySet::add` never overwrite.
// - Removal through the map and through the value view agree with the model.
// - Foreign probes fail only once there is something to compare against.
// - Cached strategy hashes never drift; `content_hash` is their entry sum.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(ComparatorMap::new(by_folded_name()), pool, ops)?;
    }

    #[test]
    fn prop_state_machine_colliding((pool, ops) in arb_scenario()) {
        run(ComparatorMap::new(colliding()), pool, ops)?;
    }
}
