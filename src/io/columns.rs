//! Column names used by the upstream ledger exports
//!
//! These are fixed external identifiers from the merchant and payment
//! systems; they are matched byte-exact and never localized.

/// Merchant order identifier column in the order sheet
pub const ORDER_ID: &str = "订单号";
/// External reference column in the order sheet
pub const EXTERNAL_ID: &str = "外部订单号";
/// Signed order amount column in the order sheet
pub const ORDER_AMOUNT: &str = "订单金额";
/// Settled fee column; appended to the order sheet when absent
pub const FEE: &str = "支付手续费";

/// Merchant order identifier column in the payment sheet
pub const BUSINESS_ORDER_ID: &str = "商户订单号";
/// Product name column in the payment sheet
pub const PRODUCT_NAME: &str = "商品名称";
/// Business type label column in the payment sheet
pub const BUSINESS_TYPE: &str = "业务类型";
/// Paid-out amount column in the payment sheet
pub const EXPENDITURE_AMOUNT: &str = "支出金额（-元）";
/// Received amount column in the payment sheet
pub const INCOME_AMOUNT: &str = "收入金额（+元）";
