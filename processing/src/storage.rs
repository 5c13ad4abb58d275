use crate::model::{ReceiptId, ScoredReceipt};
use async_trait::async_trait;
use std::{collections::HashMap, error::Error};
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Receipt {0} is already stored")]
    DuplicateId(ReceiptId),
}

/// Key-value persistence of scored receipts, keyed by receipt id.
#[async_trait]
pub trait ReceiptStorage: Send + Sync {
    async fn save(&self, receipt: ScoredReceipt) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn get(
        &self,
        id: &ReceiptId,
    ) -> Result<Option<ScoredReceipt>, Box<dyn Error + Send + Sync>>;

    async fn count(&self) -> Result<usize, Box<dyn Error + Send + Sync>>;
}

/// Process-lifetime store. Nothing is ever evicted.
#[derive(Default)]
pub struct InMemoryReceiptStorage {
    receipts: RwLock<HashMap<ReceiptId, ScoredReceipt>>,
}

impl InMemoryReceiptStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReceiptStorage for InMemoryReceiptStorage {
    async fn save(&self, receipt: ScoredReceipt) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut receipts = self.receipts.write().await;
        if receipts.contains_key(&receipt.id) {
            return Err(Box::new(StorageError::DuplicateId(receipt.id)));
        }
        tracing::trace!("Storing receipt {}", receipt.id);
        receipts.insert(receipt.id.clone(), receipt);
        Ok(())
    }

    async fn get(
        &self,
        id: &ReceiptId,
    ) -> Result<Option<ScoredReceipt>, Box<dyn Error + Send + Sync>> {
        Ok(self.receipts.read().await.get(id).cloned())
    }

    async fn count(&self) -> Result<usize, Box<dyn Error + Send + Sync>> {
        Ok(self.receipts.read().await.len())
    }
}
