use processing::scorers::{total_points, Rule, RuleBasedScorer, RuleOutcome, Scorer};

use crate::mocks::{item, receipt_with, simple_receipt};

#[test]
fn test_default_rules_cover_every_rule_once() {
    let scorer = RuleBasedScorer::default();
    let outcomes = scorer.score(&simple_receipt());

    let rules: Vec<Rule> = outcomes.iter().map(|o| o.rule).collect();
    assert_eq!(
        rules,
        vec![
            Rule::RetailerName,
            Rule::RoundTotal,
            Rule::ItemCount,
            Rule::ItemDescription,
            Rule::LlmGenerated,
            Rule::OddPurchaseDay,
            Rule::PurchaseTimeWindow,
        ]
    );
}

#[test]
fn test_simple_receipt_total() {
    let scorer = RuleBasedScorer::default();
    let outcomes = scorer.score(&simple_receipt());
    assert_eq!(total_points(&outcomes), 31);
}

#[test]
fn test_target_receipt_total() {
    let mut receipt = receipt_with("2022-01-01", "13:01", "35.35");
    receipt.items = vec![
        item("Mountain Dew 12PK", "6.49"),
        item("Emils Cheese Pizza", "12.25"),
        item("Knorr Creamy Chicken", "1.26"),
        item("Doritos Nacho Cheese", "3.35"),
        item("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
    ];

    let outcomes = RuleBasedScorer::default().score(&receipt);
    assert_eq!(total_points(&outcomes), 28);
}

#[test]
fn test_llm_flag_reaches_llm_rule() {
    let receipt = receipt_with("2022-01-02", "13:13", "19.90");

    let without = total_points(&RuleBasedScorer::with_default_rules(false).score(&receipt));
    let with = total_points(&RuleBasedScorer::with_default_rules(true).score(&receipt));
    assert_eq!(with - without, 5);
}

#[test]
fn test_malformed_fields_degrade_without_aborting() {
    let receipt = receipt_with("yesterday", "afternoon", "lots");
    let outcomes = RuleBasedScorer::default().score(&receipt);

    let degraded: Vec<Rule> = outcomes
        .iter()
        .filter(|o| o.is_degraded())
        .map(|o| o.rule)
        .collect();
    assert_eq!(
        degraded,
        vec![Rule::RoundTotal, Rule::OddPurchaseDay, Rule::PurchaseTimeWindow]
    );
    // Retailer "Target" still scores
    assert_eq!(total_points(&outcomes), 6);
}

#[test]
fn test_custom_rules() {
    let mut scorer = RuleBasedScorer::new();
    assert!(scorer.is_empty());

    scorer.add_rule(|receipt| RuleOutcome::awarded(Rule::ItemCount, receipt.items.len() as i64 * 100));
    scorer.add_rule(|_| RuleOutcome::awarded(Rule::RetailerName, 1));
    assert_eq!(scorer.len(), 2);

    let outcomes = scorer.score(&simple_receipt());
    assert_eq!(total_points(&outcomes), 101);
}

#[test]
fn test_total_points_of_nothing_is_zero() {
    assert_eq!(total_points(&[]), 0);
}

#[test]
fn test_total_points_saturates() {
    let outcomes = vec![
        RuleOutcome::awarded(Rule::ItemDescription, i64::MAX),
        RuleOutcome::awarded(Rule::RetailerName, 6),
        RuleOutcome::awarded(Rule::RoundTotal, 25),
    ];
    assert_eq!(total_points(&outcomes), i64::MAX);
}

#[test]
fn test_huge_prices_do_not_panic_scoring() {
    let mut receipt = simple_receipt();
    receipt.items = vec![item("abc", "1e300"), item("xyz", "1e300")];

    let outcomes = RuleBasedScorer::default().score(&receipt);
    assert_eq!(total_points(&outcomes), i64::MAX);
}
