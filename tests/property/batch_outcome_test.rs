//! Property-based tests for batch outcomes.
//!
//! For any batch of N items where an arbitrary subset fails, the terminal
//! signal lists exactly those K items, in selection order, with the message
//! their collaborator produced. Only a batch with no failures is a success.

#[path = "../support/fakes.rs"]
mod fakes;

use std::sync::Arc;

use docbatch::managers::selection_store::{SelectionStore, SelectionStoreTrait};
use docbatch::services::result_aggregator::{aggregate, aggregate_entries};
use docbatch::services::upload_orchestrator::UploadOrchestrator;
use docbatch::services::validation_gate;
use docbatch::types::config::HostConfig;
use docbatch::types::file_item::ItemId;
use docbatch::types::outcome::BatchOutcome;
use docbatch::types::progress::{ItemStatus, ProgressEntry};
use proptest::prelude::*;

use fakes::{described_item, FakeMetadata, FakeStorage};

fn run_batch(failures: &[bool], concurrency: usize) -> (Vec<ItemId>, BatchOutcome) {
    let mut storage = FakeStorage::new();
    for (i, fail) in failures.iter().enumerate() {
        if *fail {
            storage = storage.failing_on(format!("f{}.pdf", i).as_bytes(), &format!("error {}", i));
        }
    }
    let orchestrator = UploadOrchestrator::new(Arc::new(storage), Arc::new(FakeMetadata::new()))
        .with_max_concurrency(concurrency);

    let mut store = SelectionStore::new();
    let ids = store
        .add_items(
            (0..failures.len())
                .map(|i| described_item(&format!("f{}.pdf", i), 1, "desc"))
                .collect(),
        )
        .unwrap();
    let batch = validation_gate::validate(store.items()).unwrap();
    let config = HostConfig::new("props", None, true, "tester").unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(orchestrator.run(batch, &mut store, &config));

    let outcome = aggregate(&store);
    (ids, outcome)
}

fn arb_entry() -> impl Strategy<Value = ProgressEntry> {
    prop_oneof![
        Just(ProgressEntry::success()),
        "[a-z ]{1,12}".prop_map(|message: String| ProgressEntry::error(message)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_failed_ids_match_failing_items(
        failures in proptest::collection::vec(any::<bool>(), 1..10),
        concurrency in 1usize..4,
    ) {
        let (ids, outcome) = run_batch(&failures, concurrency);

        let expected_ids: Vec<ItemId> = ids
            .iter()
            .zip(&failures)
            .filter(|(_, f)| **f)
            .map(|(id, _)| *id)
            .collect();
        let expected_messages: Vec<String> = failures
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| format!("error {}", i))
            .collect();

        if expected_ids.is_empty() {
            prop_assert_eq!(outcome, BatchOutcome::BatchSuccess { uploaded: failures.len() });
        } else {
            prop_assert_eq!(
                outcome,
                BatchOutcome::BatchPartialFailure {
                    failed_ids: expected_ids,
                    messages: expected_messages,
                }
            );
        }
    }

    #[test]
    fn prop_aggregate_counts_every_terminal_entry(entries in proptest::collection::vec(arb_entry(), 0..16)) {
        let keyed: Vec<(ItemId, ProgressEntry)> =
            entries.into_iter().map(|e| (ItemId::new(), e)).collect();
        let errors = keyed.iter().filter(|(_, e)| e.status == ItemStatus::Error).count();

        match aggregate_entries(&keyed) {
            BatchOutcome::BatchSuccess { uploaded } => {
                prop_assert_eq!(errors, 0);
                prop_assert_eq!(uploaded, keyed.len());
            }
            BatchOutcome::BatchPartialFailure { failed_ids, messages } => {
                prop_assert_eq!(failed_ids.len(), errors);
                prop_assert_eq!(messages.len(), errors);
                prop_assert!(!failed_ids.is_empty());
            }
        }
    }
}
