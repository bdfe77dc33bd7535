//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Business types recognized in the payment ledger
///
/// The payment system reports these as fixed label strings. The labels are
/// domain constants and must be preserved byte-exact for interoperability
/// with upstream exports; they are never localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    /// A charge taken by the payment provider ("收费")
    Charge,
    /// A refund issued by the payment provider ("退费")
    Refund,
}

impl BusinessType {
    /// The external label string used by the payment system for this type
    pub fn label(&self) -> &'static str {
        match self {
            BusinessType::Charge => "收费",
            BusinessType::Refund => "退费",
        }
    }

    /// Parse an external label into a business type
    ///
    /// Labels outside the closed set map to `None`; such rows can never
    /// pass the business-type gate.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "收费" => Some(BusinessType::Charge),
            "退费" => Some(BusinessType::Refund),
            _ => None,
        }
    }
}

/// Classification of an order row derived from the sign of its amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// A charge (amount > 0)
    Regular,
    /// A refund (amount < 0)
    Refund,
    /// Amount is zero, absent, or unparseable; the row settles to a zero fee
    Zero,
}

impl OrderKind {
    /// Classify an order amount
    ///
    /// Absent amounts are treated as zero. The caller is responsible for
    /// having already coerced unparseable cells to `None`.
    pub fn classify(amount: Option<&BigDecimal>) -> Self {
        let zero = BigDecimal::from(0);
        match amount {
            Some(a) if *a > zero => OrderKind::Regular,
            Some(a) if *a < zero => OrderKind::Refund,
            _ => OrderKind::Zero,
        }
    }

    /// The business type a payment row must carry to settle this kind of order
    pub fn required_business_type(&self) -> Option<BusinessType> {
        match self {
            OrderKind::Regular => Some(BusinessType::Charge),
            OrderKind::Refund => Some(BusinessType::Refund),
            OrderKind::Zero => None,
        }
    }
}

/// One row of the order ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Full merchant order identifier
    pub order_id: Option<String>,
    /// Externally supplied reference code
    pub external_id: Option<String>,
    /// Signed order amount; the sign determines the order kind
    pub amount: Option<BigDecimal>,
    /// Settled fee, written by the engine at most once per pass
    pub fee: Option<BigDecimal>,
}

impl OrderRecord {
    /// Create a new order record with no fee
    pub fn new(
        order_id: Option<String>,
        external_id: Option<String>,
        amount: Option<BigDecimal>,
    ) -> Self {
        Self {
            order_id,
            external_id,
            amount,
            fee: None,
        }
    }

    /// Classify this order from its amount
    pub fn kind(&self) -> OrderKind {
        OrderKind::classify(self.amount.as_ref())
    }
}

/// One row of the payment/refund ledger
///
/// Payment rows are read-only inputs; the engine never mutates them, and a
/// single payment row may settle any number of orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// The payment system's merchant order identifier
    pub business_order_id: Option<String>,
    /// Free-text product name; may embed a product code and a
    /// hyphen-delimited reference suffix
    pub product_name: Option<String>,
    /// Business type parsed from the external label set
    pub business_type: Option<BusinessType>,
    /// Paid-out amount, used to settle charges
    pub expenditure_amount: Option<BigDecimal>,
    /// Received amount, used to settle refunds
    pub income_amount: Option<BigDecimal>,
}

impl PaymentRecord {
    /// Create a new payment record
    pub fn new(
        business_order_id: Option<String>,
        product_name: Option<String>,
        business_type: Option<BusinessType>,
        expenditure_amount: Option<BigDecimal>,
        income_amount: Option<BigDecimal>,
    ) -> Self {
        Self {
            business_order_id,
            product_name,
            business_type,
            expenditure_amount,
            income_amount,
        }
    }

    /// The amount field relevant for settling an order of the given kind
    pub fn settlement_amount(&self, kind: OrderKind) -> Option<&BigDecimal> {
        match kind {
            OrderKind::Regular => self.expenditure_amount.as_ref(),
            OrderKind::Refund => self.income_amount.as_ref(),
            OrderKind::Zero => None,
        }
    }
}

/// Errors that can occur in the reconciliation system
///
/// The engine itself never fails: malformed amounts coerce to zero, missing
/// identifiers exclude a row from matching, and match absence is a normal
/// outcome. Every variant here belongs to the I/O collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing column '{column}' in {sheet} sheet")]
    MissingColumn { sheet: String, column: String },
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
