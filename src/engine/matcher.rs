//! Cascading identity-match strategies
//!
//! Each strategy compares one identity fragment of an order against one
//! payment row and reports a tri-state outcome, so the engine can
//! distinguish "the sides disagree" from "a side is missing". Strategies
//! are evaluated in a fixed precedence order; the exact-id tier is handled
//! dataset-wide by the engine, while the fallback cascade lives here.

use serde::{Deserialize, Serialize};

use crate::engine::identity;
use crate::types::{OrderRecord, PaymentRecord};

/// Identity signals evaluated against each payment row, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Truncated merchant order id equals the truncated business order id
    ExactId,
    /// The order's external reference equals the product name's last
    /// hyphen-delimited suffix
    HyphenSuffix,
    /// The product code extracted from the external reference equals the
    /// code embedded in the product name
    ProductCode,
}

/// Tri-state outcome of evaluating one strategy against one payment row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Both sides present and equal
    Matched,
    /// Both sides present but different
    NotMatched,
    /// A side of the comparison is absent; the strategy cannot judge the pair
    Inapplicable,
}

impl MatchOutcome {
    fn of(matched: bool) -> Self {
        if matched {
            MatchOutcome::Matched
        } else {
            MatchOutcome::NotMatched
        }
    }

    /// Whether this outcome is a positive match
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched)
    }
}

/// Identity fragments derived once per order row
///
/// Deriving the keys up front keeps the per-payment comparisons cheap and
/// avoids re-extracting the same fragments for every payment row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderKeys {
    /// First 20 characters of the merchant order id, when long enough
    pub truncated_id: Option<String>,
    /// The raw external reference
    pub external_id: Option<String>,
    /// Product code extracted from the external reference
    pub external_code: Option<String>,
}

impl OrderKeys {
    /// Derive the comparable identity fragments of an order
    pub fn from_order(order: &OrderRecord) -> Self {
        let truncated_id = order
            .order_id
            .as_deref()
            .and_then(identity::truncated_id);
        let external_code = order
            .external_id
            .as_deref()
            .and_then(identity::product_code)
            .map(str::to_string);

        Self {
            truncated_id,
            external_id: order.external_id.clone(),
            external_code,
        }
    }

    /// Evaluate one strategy against a payment row
    pub fn evaluate(&self, strategy: MatchStrategy, payment: &PaymentRecord) -> MatchOutcome {
        match strategy {
            MatchStrategy::ExactId => {
                let ours = match &self.truncated_id {
                    Some(id) => id,
                    None => return MatchOutcome::Inapplicable,
                };
                let theirs = match payment
                    .business_order_id
                    .as_deref()
                    .and_then(identity::truncated_id)
                {
                    Some(id) => id,
                    None => return MatchOutcome::Inapplicable,
                };
                MatchOutcome::of(*ours == theirs)
            }
            MatchStrategy::HyphenSuffix => {
                let external = match &self.external_id {
                    Some(id) => id,
                    None => return MatchOutcome::Inapplicable,
                };
                let suffix = match payment
                    .product_name
                    .as_deref()
                    .and_then(identity::hyphen_suffix)
                {
                    Some(suffix) => suffix,
                    None => return MatchOutcome::Inapplicable,
                };
                MatchOutcome::of(external == suffix)
            }
            MatchStrategy::ProductCode => {
                let ours = match &self.external_code {
                    Some(code) => code,
                    None => return MatchOutcome::Inapplicable,
                };
                let theirs = match payment
                    .product_name
                    .as_deref()
                    .and_then(identity::product_code)
                {
                    Some(code) => code,
                    None => return MatchOutcome::Inapplicable,
                };
                MatchOutcome::of(ours == theirs)
            }
        }
    }

    /// Run the fallback cascade against a payment row
    ///
    /// The hyphen-suffix signal is consulted first; the product-code signal
    /// only when the suffix did not match or could not be judged. Returns
    /// the strategy that matched, if any.
    pub fn fallback_match(&self, payment: &PaymentRecord) -> Option<MatchStrategy> {
        if self
            .evaluate(MatchStrategy::HyphenSuffix, payment)
            .is_matched()
        {
            return Some(MatchStrategy::HyphenSuffix);
        }
        if self
            .evaluate(MatchStrategy::ProductCode, payment)
            .is_matched()
        {
            return Some(MatchStrategy::ProductCode);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BusinessType;

    fn order(order_id: Option<&str>, external_id: Option<&str>) -> OrderRecord {
        OrderRecord::new(
            order_id.map(str::to_string),
            external_id.map(str::to_string),
            None,
        )
    }

    fn payment(business_order_id: Option<&str>, product_name: Option<&str>) -> PaymentRecord {
        PaymentRecord::new(
            business_order_id.map(str::to_string),
            product_name.map(str::to_string),
            Some(BusinessType::Charge),
            None,
            None,
        )
    }

    #[test]
    fn exact_id_requires_both_prefixes() {
        let keys = OrderKeys::from_order(&order(Some("ORDER123456789012345XYZ"), None));

        let hit = payment(Some("ORDER123456789012345ABC"), None);
        assert_eq!(
            keys.evaluate(MatchStrategy::ExactId, &hit),
            MatchOutcome::Matched
        );

        let miss = payment(Some("OTHER9876543210987654"), None);
        assert_eq!(
            keys.evaluate(MatchStrategy::ExactId, &miss),
            MatchOutcome::NotMatched
        );

        let short = payment(Some("TOO-SHORT"), None);
        assert_eq!(
            keys.evaluate(MatchStrategy::ExactId, &short),
            MatchOutcome::Inapplicable
        );

        let absent = payment(None, None);
        assert_eq!(
            keys.evaluate(MatchStrategy::ExactId, &absent),
            MatchOutcome::Inapplicable
        );
    }

    #[test]
    fn exact_id_inapplicable_for_short_order_id() {
        let keys = OrderKeys::from_order(&order(Some("SHORT"), None));
        let candidate = payment(Some("ORDER123456789012345"), None);
        assert_eq!(
            keys.evaluate(MatchStrategy::ExactId, &candidate),
            MatchOutcome::Inapplicable
        );
    }

    #[test]
    fn hyphen_suffix_compares_full_external_reference() {
        let keys = OrderKeys::from_order(&order(None, Some("X9")));

        let hit = payment(None, Some("plan-monthly-X9"));
        assert_eq!(
            keys.evaluate(MatchStrategy::HyphenSuffix, &hit),
            MatchOutcome::Matched
        );

        let miss = payment(None, Some("plan-monthly-Y1"));
        assert_eq!(
            keys.evaluate(MatchStrategy::HyphenSuffix, &miss),
            MatchOutcome::NotMatched
        );

        let no_hyphen = payment(None, Some("plan monthly X9"));
        assert_eq!(
            keys.evaluate(MatchStrategy::HyphenSuffix, &no_hyphen),
            MatchOutcome::Inapplicable
        );
    }

    #[test]
    fn product_code_compares_external_reference_to_product() {
        // The code comes from the order's external reference, never from the
        // payment row itself.
        let keys = OrderKeys::from_order(&order(None, Some("ref/P77/2024")));

        let hit = payment(None, Some("套餐P77月付"));
        assert_eq!(
            keys.evaluate(MatchStrategy::ProductCode, &hit),
            MatchOutcome::Matched
        );

        let miss = payment(None, Some("套餐P78月付"));
        assert_eq!(
            keys.evaluate(MatchStrategy::ProductCode, &miss),
            MatchOutcome::NotMatched
        );

        let keys_without_code = OrderKeys::from_order(&order(None, Some("no code")));
        assert_eq!(
            keys_without_code.evaluate(MatchStrategy::ProductCode, &hit),
            MatchOutcome::Inapplicable
        );
    }

    #[test]
    fn fallback_prefers_hyphen_suffix_over_product_code() {
        let keys = OrderKeys::from_order(&order(None, Some("P5")));

        // Suffix and code would both match; the suffix wins.
        let both = payment(None, Some("bundle-P5"));
        assert_eq!(keys.fallback_match(&both), Some(MatchStrategy::HyphenSuffix));

        // Suffix disagrees, code agrees: the code is still consulted.
        let code_only = payment(None, Some("bundle P5-other"));
        assert_eq!(keys.fallback_match(&code_only), Some(MatchStrategy::ProductCode));

        // No hyphen at all: the code decides alone.
        let no_hyphen = payment(None, Some("bundle P5"));
        assert_eq!(keys.fallback_match(&no_hyphen), Some(MatchStrategy::ProductCode));

        let neither = payment(None, Some("bundle P6"));
        assert_eq!(keys.fallback_match(&neither), None);
    }
}
