//! Property-based tests for storage key generation.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use docbatch::services::storage_key::StorageKeyGenerator;
use proptest::prelude::*;

static JITTER_NOW: AtomicU64 = AtomicU64::new(0);

fn jitter_clock() -> u64 {
    JITTER_NOW.load(Ordering::SeqCst)
}

fn timestamp_of(key: &str) -> u64 {
    let file = key.rsplit('/').next().unwrap();
    file.split('-').next().unwrap().parse().unwrap()
}

proptest! {
    #[test]
    fn prop_keys_are_distinct(
        category in "[a-z]{1,10}",
        names in proptest::collection::vec("[a-z]{1,5}(\\.[a-z]{1,4})?", 1..50),
    ) {
        let keys = StorageKeyGenerator::new();
        let generated: Vec<String> = names.iter().map(|n| keys.generate(&category, n)).collect();
        let unique: HashSet<&String> = generated.iter().collect();
        prop_assert_eq!(unique.len(), generated.len());
    }

    #[test]
    fn prop_key_shape(
        category in "[a-z]{1,10}",
        stem in "[a-zA-Z0-9_]{1,12}",
        ext in proptest::option::of("[a-z]{1,4}"),
    ) {
        let name = match &ext {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem.clone(),
        };
        let key = StorageKeyGenerator::new().generate(&category, &name);

        let prefix = format!("{}/", category);
        prop_assert!(key.starts_with(&prefix));
        let file = &key[prefix.len()..];
        prop_assert!(!file.contains('/'));
        match &ext {
            Some(ext) => {
                let suffix = format!(".{}", ext);
                prop_assert!(file.ends_with(&suffix));
            }
            None => prop_assert!(!file.contains('.')),
        }
    }

    #[test]
    fn prop_timestamps_never_decrease(clock in proptest::collection::vec(1u64..1_000_000, 1..30)) {
        let keys = StorageKeyGenerator::with_clock(jitter_clock);
        let mut last = 0;
        for now in clock {
            JITTER_NOW.store(now, Ordering::SeqCst);
            let ts = timestamp_of(&keys.generate("c", "a.pdf"));
            prop_assert!(ts >= last);
            prop_assert!(ts >= now);
            last = ts;
        }
    }
}
