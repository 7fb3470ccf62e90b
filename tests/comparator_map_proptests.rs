// ComparatorMap property tests.
//
// Property 1: hash-equality consistency. Keys the strategy calls equal,
//  wrapped under one strategy instance, are equal objects with equal hashes.
// Property 2: strategy-instance symmetry. The same key wrapped under two
//  behaviorally identical but distinct instances is never equal, in either
//  direction.
// Property 3: round-trip and idempotent removal through the public map API.
// Property 4: map equality. Two maps built independently (own strategy
//  instance, own hasher, different insertion order) from the same pairs are
//  equal and have equal content hashes.
use comparator_map::{
    ComparatorMap, ComparatorObject, EqualityStrategy, HashCachingObject, KeyStrategy,
    NativeStrategy,
};
use proptest::prelude::*;
use std::rc::Rc;

fn modulo_strategy() -> impl EqualityStrategy<(u8, u8)> {
    KeyStrategy::new(|p: &(u8, u8)| &p.0)
}

proptest! {
    #[test]
    fn prop_equal_keys_hash_alike(a in any::<u8>(), x in any::<u8>(), y in any::<u8>()) {
        let s = Rc::new(modulo_strategy());
        let k1 = HashCachingObject::new(Rc::clone(&s), (a, x));
        let k2 = HashCachingObject::new(Rc::clone(&s), (a, y));
        prop_assert!(k1 == k2);
        prop_assert_eq!(k1.hash_value(), k2.hash_value());
    }

    #[test]
    fn prop_distinct_instances_never_equal(k in "[a-z]{0,8}") {
        let s1 = Rc::new(NativeStrategy);
        let s2 = Rc::new(NativeStrategy);
        let a = HashCachingObject::<String, _>::new(s1, k.clone());
        let b = HashCachingObject::<String, _>::new(s2, k);
        prop_assert!(!a.equivalent(&b));
        prop_assert!(!b.equivalent(&a));
    }

    #[test]
    fn prop_round_trip_and_idempotent_remove(
        pairs in proptest::collection::vec((any::<u8>(), any::<u8>(), any::<i32>()), 1..40),
    ) {
        let mut m = ComparatorMap::new(modulo_strategy());
        for &(a, b, v) in &pairs {
            m.put((a, b), v);
            prop_assert_eq!(m.get(&(a, b.wrapping_add(1))), Some(&v));
            prop_assert!(m.contains_key(&(a, 0)));
        }
        for &(a, _, _) in &pairs {
            let len = m.len();
            if m.remove(&(a, 0)).is_some() {
                prop_assert_eq!(m.len(), len - 1);
            }
            let len = m.len();
            prop_assert_eq!(m.remove(&(a, 0)), None);
            prop_assert_eq!(m.len(), len);
        }
        prop_assert!(m.is_empty());
    }

    #[test]
    fn prop_independent_maps_equal(
        pairs in proptest::collection::hash_map(any::<u8>(), any::<i16>(), 0..30),
    ) {
        let mut forward = ComparatorMap::new(modulo_strategy());
        let mut backward = ComparatorMap::new(modulo_strategy());
        let entries: Vec<_> = pairs.into_iter().collect();
        for &(k, v) in &entries {
            forward.put((k, 1), v);
        }
        for &(k, v) in entries.iter().rev() {
            backward.put((k, 2), v);
        }
        prop_assert!(forward == backward);
        prop_assert!(backward == forward);
        prop_assert_eq!(forward.content_hash(), backward.content_hash());

        if let Some(&(k, v)) = entries.first() {
            backward.put((k, 3), v.wrapping_add(1));
            prop_assert!(forward != backward);
        }
    }
}
