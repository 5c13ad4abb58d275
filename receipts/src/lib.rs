use std::sync::Arc;

use processing::{
    scorers::RuleBasedScorer,
    service::ReceiptService,
    storage::{InMemoryReceiptStorage, ReceiptStorage},
};

/// The ingestion path never claims the receipt came from an LLM-generated program.
pub const LLM_GENERATED: bool = false;

pub fn build_service(storage: Arc<dyn ReceiptStorage>) -> ReceiptService {
    ReceiptService::new(
        Arc::new(RuleBasedScorer::with_default_rules(LLM_GENERATED)),
        storage,
    )
}

pub fn build_in_memory_service() -> ReceiptService {
    build_service(Arc::new(InMemoryReceiptStorage::new()))
}
