use std::{error::Error, sync::Arc};

use metrics::{counter, histogram};
use uuid::Uuid;

use crate::{
    model::{Receipt, ReceiptId, ScoredReceipt},
    scorers::{total_points, Scorer},
    storage::ReceiptStorage,
};

#[derive(Clone)]
pub struct ReceiptService {
    scorer: Arc<dyn Scorer>,
    storage: Arc<dyn ReceiptStorage>,
}

impl ReceiptService {
    pub fn new(scorer: Arc<dyn Scorer>, storage: Arc<dyn ReceiptStorage>) -> Self {
        tracing::info!("Initializing new ReceiptService");
        Self { scorer, storage }
    }

    /// Scores the receipt, stores it under a freshly generated id and returns
    /// that id. Unparsable fields only zero out the affected rule; the only
    /// failure is the store refusing the write.
    pub async fn ingest(&self, receipt: Receipt) -> Result<ReceiptId, Box<dyn Error + Send + Sync>> {
        let id = Uuid::new_v4().to_string();
        let rules = self.scorer.score(&receipt);
        let points = total_points(&rules);

        for outcome in &rules {
            tracing::debug!(receipt_id = %id, rule = %outcome.rule, points = outcome.points, "Rule evaluated");
            if outcome.is_degraded() {
                counter!("receipts_rule_degraded_total", "rule" => outcome.rule.to_string()).increment(1);
            }
        }

        self.storage
            .save(ScoredReceipt {
                id: id.clone(),
                receipt,
                points,
                rules,
            })
            .await?;

        counter!("receipts_ingested_total").increment(1);
        histogram!("receipts_points").record(points as f64);
        tracing::info!(receipt_id = %id, points, "Processed receipt");

        Ok(id)
    }

    /// `None` when no receipt was ever stored under `id`.
    pub async fn get_points(&self, id: &ReceiptId) -> Result<Option<i64>, Box<dyn Error + Send + Sync>> {
        Ok(self.get_receipt(id).await?.map(|receipt| receipt.points))
    }

    pub async fn get_receipt(
        &self,
        id: &ReceiptId,
    ) -> Result<Option<ScoredReceipt>, Box<dyn Error + Send + Sync>> {
        let receipt = self.storage.get(id).await?;
        let outcome = if receipt.is_some() { "found" } else { "not_found" };
        counter!("receipts_lookup_total", "outcome" => outcome).increment(1);
        if receipt.is_none() {
            tracing::debug!(receipt_id = %id, "No receipt stored under id");
        }
        Ok(receipt)
    }
}
