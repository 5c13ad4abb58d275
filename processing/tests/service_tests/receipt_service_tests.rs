use std::{collections::HashSet, sync::Arc};
use common::test_helpers::{test_utils, TestError, TestResult};
use processing::{
    scorers::{Rule, RuleBasedScorer, RuleIssue, RuleOutcome},
    service::ReceiptService,
    storage::InMemoryReceiptStorage,
};

use crate::mocks::{receipt_with, simple_receipt, FixedScorer, MockReceiptStorage};

fn in_memory_service() -> ReceiptService {
    ReceiptService::new(
        Arc::new(RuleBasedScorer::default()),
        Arc::new(InMemoryReceiptStorage::new()),
    )
}

#[tokio::test]
async fn test_ingest_then_get_points() {
    let service = in_memory_service();

    let id = service.ingest(simple_receipt()).await.unwrap();
    assert_eq!(service.get_points(&id).await.unwrap(), Some(31));
}

#[tokio::test]
async fn test_ingest_assigns_fresh_ids_for_identical_receipts() {
    let service = in_memory_service();

    let mut ids = HashSet::new();
    for _ in 0..20 {
        let id = service.ingest(simple_receipt()).await.unwrap();
        assert!(ids.insert(id.clone()), "id {} was issued twice", id);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }
}

#[tokio::test]
async fn test_repeated_lookups_are_identical() {
    let service = in_memory_service();
    let id = service.ingest(simple_receipt()).await.unwrap();

    let first = service.get_receipt(&id).await.unwrap();
    let second = service.get_receipt(&id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(service.get_points(&id).await.unwrap(), Some(31));
}

#[tokio::test]
async fn test_unknown_id_is_absent() {
    let service = in_memory_service();
    let missing = "00000000-0000-0000-0000-000000000000".to_string();

    assert_eq!(service.get_points(&missing).await.unwrap(), None);
    assert!(service.get_receipt(&missing).await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_fields_are_stored_with_issues() {
    let service = in_memory_service();
    let id = service
        .ingest(receipt_with("2022-13-45", "15:00", "1.25"))
        .await
        .unwrap();

    let stored = service.get_receipt(&id).await.unwrap().unwrap();
    // 6 retailer + 25 quarter + 10 time window
    assert_eq!(stored.points, 41);
    let degraded: Vec<&RuleOutcome> = stored.degraded_rules().collect();
    assert_eq!(degraded.len(), 1);
    assert_eq!(degraded[0].rule, Rule::OddPurchaseDay);
    assert_eq!(
        degraded[0].issues,
        vec![RuleIssue::InvalidPurchaseDate { value: "2022-13-45".to_string() }]
    );
}

#[tokio::test]
async fn test_points_are_sum_of_rule_outcomes() {
    let scorer = FixedScorer {
        outcomes: vec![
            RuleOutcome::awarded(Rule::RetailerName, 7),
            RuleOutcome::awarded(Rule::ItemCount, 10),
            RuleOutcome::awarded(Rule::PurchaseTimeWindow, 0),
        ],
    };
    let service = ReceiptService::new(Arc::new(scorer), Arc::new(InMemoryReceiptStorage::new()));

    let id = service.ingest(simple_receipt()).await.unwrap();
    let stored = service.get_receipt(&id).await.unwrap().unwrap();
    assert_eq!(stored.points, 17);
    assert_eq!(stored.rules.len(), 3);
}

#[tokio::test]
async fn test_storage_failure_propagates() -> TestResult {
    let mut storage = MockReceiptStorage::new();
    storage
        .expect_save()
        .times(1)
        .returning(|_| Err("disk on fire".into()));

    let service = ReceiptService::new(Arc::new(RuleBasedScorer::default()), Arc::new(storage));

    let Err(err) = service.ingest(simple_receipt()).await else {
        return Err(TestError::assertion_failure("ingest should fail when the store fails"));
    };
    test_utils::check_error_contains(err.as_ref(), "disk on fire")?;

    Ok(())
}

#[tokio::test]
async fn test_ingest_saves_computed_receipt() {
    let mut storage = MockReceiptStorage::new();
    storage
        .expect_save()
        .withf(|receipt| receipt.points == 31 && receipt.rules.len() == 7 && receipt.receipt == simple_receipt())
        .times(1)
        .returning(|_| Ok(()));

    let service = ReceiptService::new(Arc::new(RuleBasedScorer::default()), Arc::new(storage));
    service.ingest(simple_receipt()).await.unwrap();
}

#[tokio::test]
async fn test_lookup_failure_propagates() {
    let mut storage = MockReceiptStorage::new();
    storage
        .expect_get()
        .returning(|_| Err("connection reset".into()));

    let service = ReceiptService::new(Arc::new(RuleBasedScorer::default()), Arc::new(storage));
    assert!(service.get_points(&"anything".to_string()).await.is_err());
}
