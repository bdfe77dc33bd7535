//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::RecordStore;
use crate::types::{OrderRecord, PaymentRecord, ReconResult};

/// In-memory record store for testing and embedding
///
/// Clones share the same underlying datasets, so a test can hold a handle
/// and inspect what the engine wrote back.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    orders: Arc<RwLock<Vec<OrderRecord>>>,
    payments: Arc<RwLock<Vec<PaymentRecord>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with the given ledgers
    pub fn with_records(orders: Vec<OrderRecord>, payments: Vec<PaymentRecord>) -> Self {
        Self {
            orders: Arc::new(RwLock::new(orders)),
            payments: Arc::new(RwLock::new(payments)),
        }
    }

    /// Snapshot the stored order ledger
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.orders.read().unwrap().clone()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.orders.write().unwrap().clear();
        self.payments.write().unwrap().clear();
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load_orders(&self) -> ReconResult<Vec<OrderRecord>> {
        Ok(self.orders.read().unwrap().clone())
    }

    async fn load_payments(&self) -> ReconResult<Vec<PaymentRecord>> {
        Ok(self.payments.read().unwrap().clone())
    }

    async fn write_orders(&mut self, orders: &[OrderRecord]) -> ReconResult<()> {
        *self.orders.write().unwrap() = orders.to_vec();
        Ok(())
    }
}
