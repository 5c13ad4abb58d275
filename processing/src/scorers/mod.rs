pub mod rule_based;
pub mod rules;

pub use rule_based::*;
pub use rules::{Rule, RuleIssue, RuleOutcome};

use crate::model::Receipt;

pub trait Scorer: Send + Sync {
    fn score(&self, receipt: &Receipt) -> Vec<RuleOutcome>;
}
