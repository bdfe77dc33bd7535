//! # Recon Core
//!
//! A reconciliation library that matches an order ledger against a
//! payment/refund ledger and settles the payment fee onto each order.
//!
//! ## Features
//!
//! - **Cascading identity matching**: exact truncated-id matching with
//!   hyphen-suffix and product-code fallbacks, evaluated in strict
//!   precedence order
//! - **Order classification**: charge/refund/zero classification from the
//!   sign of the order amount, with lenient coercion of malformed cells
//! - **Deterministic fee settlement**: first matching payment row in
//!   original sheet order supplies the fee
//! - **Decision tracing**: a structured per-row decision log for audits,
//!   with optional debug logging
//! - **Storage abstraction**: CSV files or in-memory datasets behind a
//!   trait-based store
//!
//! ## Quick Start
//!
//! ```rust
//! use recon_core::{OrderRecord, PaymentRecord, BusinessType, Reconciler};
//! use bigdecimal::BigDecimal;
//!
//! let mut orders = vec![OrderRecord::new(
//!     Some("20240101ABCDEFGH1234".to_string()),
//!     None,
//!     Some(BigDecimal::from(100)),
//! )];
//! let payments = vec![PaymentRecord::new(
//!     Some("20240101ABCDEFGH1234".to_string()),
//!     None,
//!     Some(BusinessType::Charge),
//!     Some(BigDecimal::from(3)),
//!     None,
//! )];
//!
//! let report = Reconciler::new().reconcile(&mut orders, &payments);
//! assert_eq!(report.settled, 1);
//! assert_eq!(orders[0].fee, Some(BigDecimal::from(3)));
//! ```

pub mod engine;
pub mod io;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use engine::*;
pub use io::*;
pub use traits::*;
pub use types::*;
