use crate::{
    model::Receipt,
    scorers::{rules, RuleOutcome, Scorer},
};

type BoxedRule = Box<dyn Fn(&Receipt) -> RuleOutcome + Send + Sync>;

/// Runs a list of independent rules over a receipt.
pub struct RuleBasedScorer {
    rules: Vec<BoxedRule>,
}

impl RuleBasedScorer {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The seven receipt rules. `llm_generated` feeds the LLM rule and is
    /// always false on the ingestion path.
    pub fn with_default_rules(llm_generated: bool) -> Self {
        let mut scorer = Self::new();
        scorer.add_rule(|receipt| rules::retailer_name(&receipt.retailer));
        scorer.add_rule(|receipt| rules::round_total(&receipt.total));
        scorer.add_rule(|receipt| rules::item_count(&receipt.items));
        scorer.add_rule(|receipt| rules::item_description(&receipt.items));
        scorer.add_rule(move |receipt| rules::llm_generated(&receipt.total, llm_generated));
        scorer.add_rule(|receipt| rules::odd_purchase_day(&receipt.purchase_date));
        scorer.add_rule(|receipt| rules::purchase_time_window(&receipt.purchase_time));
        scorer
    }

    pub fn add_rule(&mut self, rule: impl Fn(&Receipt) -> RuleOutcome + Send + Sync + 'static) {
        self.rules.push(Box::new(rule));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleBasedScorer {
    fn default() -> Self {
        Self::with_default_rules(false)
    }
}

impl Scorer for RuleBasedScorer {
    fn score(&self, receipt: &Receipt) -> Vec<RuleOutcome> {
        self.rules.iter().map(|rule| rule(receipt)).collect()
    }
}

/// Sums the contributions of all rule outcomes, saturating at `i64::MAX`.
pub fn total_points(outcomes: &[RuleOutcome]) -> i64 {
    outcomes
        .iter()
        .map(|outcome| outcome.points)
        .fold(0, i64::saturating_add)
}
