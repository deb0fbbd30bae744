use super::*;
use crate::error::AvlError;

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const CAPACITY: usize = 48;

#[derive(Debug, Clone)]
enum Op {
    Insert(u64),
    Remove(u64),
}

fn op() -> impl Strategy<Value = Op> {
    // a small key space forces duplicates and removals of present keys
    prop_oneof![
        3 => (0u64..64).prop_map(Op::Insert),
        2 => (0u64..64).prop_map(Op::Remove),
    ]
}

fn expected_keys(model: &BTreeMap<u64, usize>) -> Vec<u64> {
    model
        .iter()
        .flat_map(|(key, count)| std::iter::repeat(*key).take(*count))
        .collect()
}

proptest! {
    #[test]
    fn prop_matches_multiset_model(ops in prop::collection::vec(op(), 0..400)) {
        let mut arena = AvlArena::with_capacity(CAPACITY).unwrap();
        let mut model: BTreeMap<u64, usize> = BTreeMap::new();
        let mut live = 0usize;

        for op in ops {
            match op {
                Op::Insert(key) => {
                    let result = arena.insert(key);

                    if live == CAPACITY {
                        prop_assert_eq!(
                            result,
                            Err(AvlError::CapacityExhausted { capacity: CAPACITY as u32 })
                        );
                    } else {
                        let index = result.unwrap();
                        prop_assert_eq!(arena.tree().key_at(index), Some(key));
                        *model.entry(key).or_default() += 1;
                        live += 1;
                    }
                }
                Op::Remove(key) => {
                    let removed = arena.remove(key);
                    prop_assert_eq!(removed, model.contains_key(&key));

                    if removed {
                        live -= 1;
                        let count = model.get_mut(&key).unwrap();
                        *count -= 1;
                        if *count == 0 {
                            model.remove(&key);
                        }
                    }
                }
            }

            prop_assert_eq!(arena.validate(), Ok(()));
            prop_assert_eq!(arena.len(), live);
            prop_assert_eq!(arena.iter().collect::<Vec<_>>(), expected_keys(&model));
        }

        for key in 0u64..64 {
            prop_assert_eq!(arena.contains(key), model.contains_key(&key));
        }
    }

    #[test]
    fn prop_distinct_keys_fill_capacity(keys in prop::collection::btree_set(any::<u64>(), 1..128)) {
        let mut arena = AvlArena::with_capacity(keys.len()).unwrap();

        for key in &keys {
            arena.insert(*key).unwrap();
        }

        prop_assert!(arena.is_full());
        prop_assert!(arena.insert(0).is_err());
        prop_assert_eq!(arena.validate(), Ok(()));
        prop_assert_eq!(arena.iter().collect::<BTreeSet<_>>(), keys.clone());

        // an AVL tree of n nodes is less than 1.45 * log2(n + 2) high
        let bound = 1.45 * ((keys.len() + 2) as f64).log2();
        prop_assert!((arena.height() as f64) < bound);
    }

    #[test]
    fn prop_delete_keeps_other_keys(
        keys in prop::collection::vec(0u64..32, 1..64),
        victim in 0u64..32,
    ) {
        let mut arena = AvlArena::with_capacity(keys.len()).unwrap();

        for key in &keys {
            arena.insert(*key).unwrap();
        }

        let present = keys.iter().filter(|key| **key == victim).count();
        prop_assert_eq!(arena.remove(victim), present > 0);

        let mut expected = keys.clone();
        if let Some(position) = expected.iter().position(|key| *key == victim) {
            expected.remove(position);
        }
        expected.sort_unstable();

        prop_assert_eq!(arena.contains(victim), present > 1);
        prop_assert_eq!(arena.iter().collect::<Vec<_>>(), expected);
        prop_assert_eq!(arena.validate(), Ok(()));

        // removing an absent key changes nothing
        let before = arena.iter().collect::<Vec<_>>();
        prop_assert!(!arena.remove(1_000));
        prop_assert_eq!(arena.iter().collect::<Vec<_>>(), before);
    }
}
