use serde::{Deserialize, Serialize};

use crate::scorers::RuleOutcome;

/// Opaque identifier assigned to a receipt on ingestion.
pub type ReceiptId = String;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub short_description: String,
    pub price: String,
}

/// A receipt as submitted by a client. Amounts, dates and times are kept as
/// the raw strings the client sent; the rules parse them on their own.
/// Absent fields decode to empty values and simply score nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Receipt {
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub items: Vec<Item>,
    pub total: String,
}

/// A receipt after scoring. Created once on ingestion and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReceipt {
    pub id: ReceiptId,
    #[serde(flatten)]
    pub receipt: Receipt,
    pub points: i64,
    pub rules: Vec<RuleOutcome>,
}

impl ScoredReceipt {
    pub fn degraded_rules(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.rules.iter().filter(|outcome| outcome.is_degraded())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: ReceiptId,
}

/// Points are rendered as a string on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: String,
}

impl From<i64> for PointsResponse {
    fn from(points: i64) -> Self {
        Self {
            points: points.to_string(),
        }
    }
}
