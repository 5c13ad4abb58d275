//! The seven receipt scoring rules.
//!
//! Every rule is a pure function returning a [`RuleOutcome`]. A sub-field that
//! fails to parse never aborts scoring: the rule contributes zero for it and
//! records a [`RuleIssue`] on the outcome.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::Display as EnumDisplay;

use crate::model::Item;

/// Tolerance for comparisons on amounts parsed as `f64`.
pub const MONEY_EPSILON: f64 = 1e-9;

const ROUND_DOLLAR_POINTS: i64 = 50;
const QUARTER_MULTIPLE_POINTS: i64 = 25;
const POINTS_PER_ITEM_PAIR: i64 = 5;
const DESCRIPTION_PRICE_MULTIPLIER: f64 = 0.2;
const LLM_GENERATED_POINTS: i64 = 5;
const LLM_GENERATED_MIN_TOTAL: f64 = 10.00;
const ODD_DAY_POINTS: i64 = 6;
const TIME_WINDOW_POINTS: i64 = 10;
const TIME_WINDOW_HOURS: std::ops::RangeInclusive<i64> = 14..=16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumDisplay)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rule {
    RetailerName,
    RoundTotal,
    ItemCount,
    ItemDescription,
    LlmGenerated,
    OddPurchaseDay,
    PurchaseTimeWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleIssue {
    #[error("cannot parse total {value:?}")]
    InvalidTotal { value: String },

    #[error("cannot parse price {value:?} of item {description:?}")]
    InvalidPrice { description: String, value: String },

    #[error("cannot parse purchase date {value:?}")]
    InvalidPurchaseDate { value: String },

    #[error("cannot parse purchase time {value:?}")]
    InvalidPurchaseTime { value: String },
}

/// Points contributed by one rule, plus any sub-field that could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: Rule,
    pub points: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<RuleIssue>,
}

impl RuleOutcome {
    pub fn awarded(rule: Rule, points: i64) -> Self {
        Self {
            rule,
            points,
            issues: Vec::new(),
        }
    }

    pub fn skipped(rule: Rule, issue: RuleIssue) -> Self {
        Self::with_issues(rule, 0, vec![issue])
    }

    fn with_issues(rule: Rule, points: i64, issues: Vec<RuleIssue>) -> Self {
        for issue in &issues {
            tracing::warn!(rule = %rule, issue = %issue, "Rule degraded");
        }
        Self {
            rule,
            points,
            issues,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.issues.is_empty()
    }
}

fn parse_amount(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

fn is_whole(value: f64) -> bool {
    (value - value.round()).abs() < MONEY_EPSILON
}

fn ceil_points(value: f64) -> i64 {
    ((value - MONEY_EPSILON).ceil() as i64).max(0)
}

/// One point for every ASCII alphanumeric character in the retailer name.
pub fn retailer_name(retailer: &str) -> RuleOutcome {
    let points = retailer
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .count() as i64;
    RuleOutcome::awarded(Rule::RetailerName, points)
}

/// 50 points for a round dollar total, 25 more if it is a multiple of 0.25.
pub fn round_total(total: &str) -> RuleOutcome {
    let Some(value) = parse_amount(total) else {
        return RuleOutcome::skipped(
            Rule::RoundTotal,
            RuleIssue::InvalidTotal {
                value: total.to_string(),
            },
        );
    };

    let mut points = 0;
    if value > 0.0 {
        if is_whole(value) {
            points += ROUND_DOLLAR_POINTS;
        }
        if is_whole(value / 0.25) {
            points += QUARTER_MULTIPLE_POINTS;
        }
    }
    RuleOutcome::awarded(Rule::RoundTotal, points)
}

/// 5 points for every two items.
pub fn item_count(items: &[Item]) -> RuleOutcome {
    let pairs = (items.len() / 2) as i64;
    RuleOutcome::awarded(Rule::ItemCount, pairs * POINTS_PER_ITEM_PAIR)
}

/// For each item whose trimmed description length in bytes is a multiple of 3
/// (including an empty description), `ceil(price * 0.2)` points. Saturates
/// instead of overflowing on absurd prices.
pub fn item_description(items: &[Item]) -> RuleOutcome {
    let mut points = 0;
    let mut issues = Vec::new();

    for item in items {
        let length = item.short_description.trim().len();
        if length % 3 != 0 {
            continue;
        }
        match parse_amount(&item.price) {
            Some(price) => {
                points = i64::saturating_add(points, ceil_points(price * DESCRIPTION_PRICE_MULTIPLIER));
            }
            None => issues.push(RuleIssue::InvalidPrice {
                description: item.short_description.clone(),
                value: item.price.clone(),
            }),
        }
    }

    RuleOutcome::with_issues(Rule::ItemDescription, points, issues)
}

/// 5 points if the program was generated by a large language model and the
/// total is greater than 10.00. The total is not examined when `llm_generated`
/// is false.
pub fn llm_generated(total: &str, llm_generated: bool) -> RuleOutcome {
    if !llm_generated {
        return RuleOutcome::awarded(Rule::LlmGenerated, 0);
    }
    match parse_amount(total) {
        Some(value) if value > LLM_GENERATED_MIN_TOTAL => {
            RuleOutcome::awarded(Rule::LlmGenerated, LLM_GENERATED_POINTS)
        }
        Some(_) => RuleOutcome::awarded(Rule::LlmGenerated, 0),
        None => RuleOutcome::skipped(
            Rule::LlmGenerated,
            RuleIssue::InvalidTotal {
                value: total.to_string(),
            },
        ),
    }
}

/// 6 points if the day in the purchase date (`YYYY-MM-DD`) is odd.
pub fn odd_purchase_day(purchase_date: &str) -> RuleOutcome {
    match NaiveDate::parse_from_str(purchase_date, "%Y-%m-%d") {
        Ok(date) if date.day() % 2 == 1 => RuleOutcome::awarded(Rule::OddPurchaseDay, ODD_DAY_POINTS),
        Ok(_) => RuleOutcome::awarded(Rule::OddPurchaseDay, 0),
        Err(_) => RuleOutcome::skipped(
            Rule::OddPurchaseDay,
            RuleIssue::InvalidPurchaseDate {
                value: purchase_date.to_string(),
            },
        ),
    }
}

/// 10 points if the purchase hour (`HH:MM`, 24-hour) falls in 14, 15 or 16.
/// The whole 16:xx hour counts.
pub fn purchase_time_window(purchase_time: &str) -> RuleOutcome {
    let hour = purchase_time
        .split(':')
        .next()
        .and_then(|hour| hour.parse::<i64>().ok());

    match hour {
        Some(hour) if TIME_WINDOW_HOURS.contains(&hour) => {
            RuleOutcome::awarded(Rule::PurchaseTimeWindow, TIME_WINDOW_POINTS)
        }
        Some(_) => RuleOutcome::awarded(Rule::PurchaseTimeWindow, 0),
        None => RuleOutcome::skipped(
            Rule::PurchaseTimeWindow,
            RuleIssue::InvalidPurchaseTime {
                value: purchase_time.to_string(),
            },
        ),
    }
}
