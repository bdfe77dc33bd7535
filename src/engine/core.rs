//! Reconciliation engine orchestration and per-row decision records

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::matcher::{MatchStrategy, OrderKeys};
use crate::types::{OrderKind, OrderRecord, PaymentRecord};

/// Options controlling engine diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerOptions {
    /// Emit every row decision through the `log` facade at debug level.
    /// Tracing never affects the settled fees.
    pub verbose: bool,
}

/// The reconciliation engine
///
/// Consumes an order ledger and a payment ledger and settles a fee onto
/// each order row that a payment row can be matched to. Rows are processed
/// independently; a payment row may settle any number of orders, and the
/// payment ledger is never mutated.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    options: ReconcilerOptions,
}

impl Reconciler {
    /// Create an engine with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with explicit options
    pub fn with_options(options: ReconcilerOptions) -> Self {
        Self { options }
    }

    /// Reconcile the order ledger against the payment ledger
    ///
    /// Fees are written in place onto the order rows; each row's fee cell
    /// is written at most once per pass and the fee field is never read as
    /// a matching key, so running the pass twice yields identical output.
    pub fn reconcile(
        &self,
        orders: &mut [OrderRecord],
        payments: &[PaymentRecord],
    ) -> ReconcileReport {
        let mut decisions = Vec::with_capacity(orders.len());

        for (index, order) in orders.iter_mut().enumerate() {
            let decision = self.settle_order(index, order, payments);
            if self.options.verbose {
                debug!("order row {}: {:?}", decision.index, decision.outcome);
            }
            decisions.push(decision);
        }

        ReconcileReport::from_decisions(decisions)
    }

    /// Run the per-row pipeline: id-quality gate, classification, identity
    /// matching, business-type gate, fee selection
    fn settle_order(
        &self,
        index: usize,
        order: &mut OrderRecord,
        payments: &[PaymentRecord],
    ) -> RowDecision {
        let keys = OrderKeys::from_order(order);

        // Data-quality gate: rows without a comparable merchant order id
        // never enter matching and keep whatever fee they arrived with.
        if keys.truncated_id.is_none() {
            return RowDecision {
                index,
                outcome: RowOutcome::ExcludedShortId,
            };
        }

        let kind = order.kind();
        if kind == OrderKind::Zero {
            // Terminal outcome, not a skip: the fee is forced to zero.
            order.fee = Some(BigDecimal::from(0));
            return RowDecision {
                index,
                outcome: RowOutcome::ZeroAmount,
            };
        }

        // Exact-id matches are authoritative and exclusive: when any payment
        // row matches on the truncated id, the fallback signals are never
        // consulted for this order, even if every exact hit later fails the
        // business-type gate.
        let exact: Vec<usize> = payments
            .iter()
            .enumerate()
            .filter(|(_, p)| keys.evaluate(MatchStrategy::ExactId, p).is_matched())
            .map(|(row, _)| row)
            .collect();

        let identity_matches: Vec<(usize, MatchStrategy)> = if exact.is_empty() {
            payments
                .iter()
                .enumerate()
                .filter_map(|(row, p)| keys.fallback_match(p).map(|strategy| (row, strategy)))
                .collect()
        } else {
            exact
                .into_iter()
                .map(|row| (row, MatchStrategy::ExactId))
                .collect()
        };

        let required = kind.required_business_type();
        let candidates: Vec<(usize, MatchStrategy)> = identity_matches
            .into_iter()
            .filter(|(row, _)| payments[*row].business_type == required)
            .collect();

        if candidates.is_empty() {
            return RowDecision {
                index,
                outcome: RowOutcome::Unmatched { kind },
            };
        }

        // First candidate, in original payment-row order, with the relevant
        // amount field present supplies the fee.
        for (row, strategy) in &candidates {
            if let Some(amount) = payments[*row].settlement_amount(kind) {
                order.fee = Some(amount.clone());
                return RowDecision {
                    index,
                    outcome: RowOutcome::Settled {
                        kind,
                        strategy: *strategy,
                        payment_row: *row,
                        fee: amount.clone(),
                    },
                };
            }
        }

        RowDecision {
            index,
            outcome: RowOutcome::MatchedWithoutFee {
                kind,
                candidate_rows: candidates.into_iter().map(|(row, _)| row).collect(),
            },
        }
    }
}

/// What happened to one order row during a pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowOutcome {
    /// Merchant order id absent or shorter than the comparable prefix; the
    /// row never entered matching and its fee is untouched
    ExcludedShortId,
    /// Amount was zero, absent, or unparseable; the fee was forced to zero
    ZeroAmount,
    /// A candidate payment supplied the fee
    Settled {
        kind: OrderKind,
        strategy: MatchStrategy,
        payment_row: usize,
        fee: BigDecimal,
    },
    /// Candidates passed both gates but none carried the relevant amount
    /// field; the fee stays absent
    MatchedWithoutFee {
        kind: OrderKind,
        candidate_rows: Vec<usize>,
    },
    /// No payment row matched; the fee stays absent
    Unmatched { kind: OrderKind },
}

/// Decision record for one order row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDecision {
    /// Index of the order row in the input ledger
    pub index: usize,
    /// Outcome of the row's pass
    pub outcome: RowOutcome,
}

/// Summary of a reconciliation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// When the pass finished
    pub generated_at: NaiveDateTime,
    /// Total order rows processed
    pub total_orders: usize,
    /// Rows whose fee was settled from a payment row
    pub settled: usize,
    /// Rows forced to a zero fee by the zero-amount rule
    pub zero_amount: usize,
    /// Rows excluded by the id-quality gate
    pub excluded: usize,
    /// Rows with candidates but no usable amount field
    pub matched_without_fee: usize,
    /// Rows with no matching payment
    pub unmatched: usize,
    /// Per-row decision log, in input order
    pub decisions: Vec<RowDecision>,
}

impl ReconcileReport {
    fn from_decisions(decisions: Vec<RowDecision>) -> Self {
        let mut settled = 0;
        let mut zero_amount = 0;
        let mut excluded = 0;
        let mut matched_without_fee = 0;
        let mut unmatched = 0;

        for decision in &decisions {
            match &decision.outcome {
                RowOutcome::Settled { .. } => settled += 1,
                RowOutcome::ZeroAmount => zero_amount += 1,
                RowOutcome::ExcludedShortId => excluded += 1,
                RowOutcome::MatchedWithoutFee { .. } => matched_without_fee += 1,
                RowOutcome::Unmatched { .. } => unmatched += 1,
            }
        }

        Self {
            generated_at: chrono::Utc::now().naive_utc(),
            total_orders: decisions.len(),
            settled,
            zero_amount,
            excluded,
            matched_without_fee,
            unmatched,
            decisions,
        }
    }
}
