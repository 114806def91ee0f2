// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Property-Based Tests: ConcurrentRegistry
//!
//! # Coverage
//!
//! - **Model equivalence:** any sequence of store/remove/load operations gives
//!   the same answers as a plain `HashMap`.
//! - **Disjoint concurrent writers:** stores from several threads on
//!   pairwise-disjoint keys are never lost.

#[cfg(test)]
mod tests {
    use levelog::ConcurrentRegistry;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::thread;

    #[derive(Debug, Clone)]
    enum Op {
        Store(u8, u32),
        Remove(u8),
        Load(u8),
        Range,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..16, any::<u32>()).prop_map(|(k, v)| Op::Store(k, v)),
            (0u8..16).prop_map(Op::Remove),
            (0u8..16).prop_map(Op::Load),
            Just(Op::Range),
        ]
    }

    proptest! {
        /// **Property:** the registry behaves like a map under any single-threaded
        /// sequence of operations, whatever tier each key happens to live in.
        #[test]
        fn test_matches_hashmap_model(ops in prop::collection::vec(op(), 0..200)) {
            let registry: ConcurrentRegistry<u8, u32> = ConcurrentRegistry::new();
            let mut model: HashMap<u8, u32> = HashMap::new();

            for op in ops {
                match op {
                    Op::Store(k, v) => {
                        registry.store(k, v);
                        model.insert(k, v);
                    }
                    Op::Remove(k) => {
                        prop_assert_eq!(registry.remove(&k), model.remove(&k));
                    }
                    Op::Load(k) => {
                        prop_assert_eq!(registry.load(&k), model.get(&k).copied());
                    }
                    Op::Range => {
                        let mut seen = HashMap::new();
                        registry.range(|k, v| {
                            seen.insert(*k, v);
                            true
                        });
                        prop_assert_eq!(&seen, &model);
                    }
                }
            }
            prop_assert_eq!(registry.len(), model.len());
        }

        /// **Property:** a store followed by a load of the same key returns the
        /// stored value, for concurrent writers on disjoint keys.
        #[test]
        fn test_disjoint_concurrent_round_trip(
            values in prop::collection::vec(any::<u64>(), 1..64),
            threads in 2usize..6,
        ) {
            let registry: ConcurrentRegistry<usize, u64> = ConcurrentRegistry::new();

            thread::scope(|s| {
                for t in 0..threads {
                    let registry = &registry;
                    let values = &values;
                    s.spawn(move || {
                        for (i, v) in values.iter().enumerate() {
                            let key = i * threads + t;
                            registry.store(key, *v);
                            assert_eq!(registry.load(&key), Some(*v));
                        }
                    });
                }
            });

            for t in 0..threads {
                for (i, v) in values.iter().enumerate() {
                    prop_assert_eq!(registry.load(&(i * threads + t)), Some(*v));
                }
            }
        }
    }
}
