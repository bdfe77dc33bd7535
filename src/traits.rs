//! Traits for dataset storage abstraction
//!
//! The engine operates purely on in-memory records; everything touching
//! files lives behind [`RecordStore`] so the core can be driven by CSV
//! files, an in-memory fixture, or any other backend.

use async_trait::async_trait;

use crate::types::{OrderRecord, PaymentRecord, ReconResult};

/// Storage abstraction for the reconciliation system
///
/// A store loads the two ledgers the engine consumes and persists the
/// updated order ledger it produces. Implementations own format concerns
/// entirely; by the time records reach the engine, identifier fields are
/// strings and amounts are decimals.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the order ledger
    async fn load_orders(&self) -> ReconResult<Vec<OrderRecord>>;

    /// Load the payment/refund ledger
    async fn load_payments(&self) -> ReconResult<Vec<PaymentRecord>>;

    /// Persist the updated order ledger
    ///
    /// The written dataset must keep the shape of the loaded one, with the
    /// fee field added when it was not already present.
    async fn write_orders(&mut self, orders: &[OrderRecord]) -> ReconResult<()>;
}
