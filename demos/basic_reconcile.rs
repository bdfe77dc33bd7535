//! Basic reconciliation example

use bigdecimal::BigDecimal;
use recon_core::{BusinessType, OrderRecord, PaymentRecord, Reconciler, RowOutcome};
use std::str::FromStr;

fn main() {
    println!("🧾 Recon Core - Basic Reconciliation Example\n");

    // 1. Build a small order ledger
    println!("📋 Order ledger...");
    let mut orders = vec![
        OrderRecord::new(
            Some("20240101ABCDEFGH1234".to_string()),
            None,
            Some(BigDecimal::from(100)),
        ),
        OrderRecord::new(
            Some("20240202HGFEDCBA4321".to_string()),
            Some("X9".to_string()),
            Some(BigDecimal::from(-50)),
        ),
        OrderRecord::new(
            Some("20240303AAAABBBB0000".to_string()),
            None,
            Some(BigDecimal::from(0)),
        ),
        OrderRecord::new(Some("SHORT-ID".to_string()), None, Some(BigDecimal::from(75))),
    ];
    for order in &orders {
        println!(
            "  • id={:?} external={:?} amount={:?}",
            order.order_id, order.external_id, order.amount
        );
    }
    println!();

    // 2. Build the payment ledger it reconciles against
    println!("💳 Payment ledger...");
    let payments = vec![
        PaymentRecord::new(
            Some("20240101ABCDEFGH1234TRAILING".to_string()),
            Some("套餐-P33".to_string()),
            Some(BusinessType::Charge),
            Some(BigDecimal::from_str("2.5").unwrap()),
            None,
        ),
        PaymentRecord::new(
            None,
            Some("plan-monthly-X9".to_string()),
            Some(BusinessType::Refund),
            None,
            Some(BigDecimal::from_str("1.25").unwrap()),
        ),
    ];
    for payment in &payments {
        println!(
            "  • business_id={:?} product={:?} type={:?}",
            payment.business_order_id, payment.product_name, payment.business_type
        );
    }
    println!();

    // 3. Run the engine
    println!("⚙️  Reconciling...\n");
    let report = Reconciler::new().reconcile(&mut orders, &payments);

    for decision in &report.decisions {
        let line = match &decision.outcome {
            RowOutcome::Settled {
                strategy,
                payment_row,
                fee,
                ..
            } => format!("settled fee {fee} from payment row {payment_row} via {strategy:?}"),
            RowOutcome::ZeroAmount => "zero amount, fee forced to 0".to_string(),
            RowOutcome::ExcludedShortId => "excluded: order id too short".to_string(),
            RowOutcome::MatchedWithoutFee { .. } => "matched but no usable fee".to_string(),
            RowOutcome::Unmatched { .. } => "no matching payment".to_string(),
        };
        println!("  row {}: {}", decision.index, line);
    }
    println!();

    // 4. Summarize
    println!("📈 Report:");
    println!("  ✓ total orders:       {}", report.total_orders);
    println!("  ✓ settled:            {}", report.settled);
    println!("  ✓ zero amount:        {}", report.zero_amount);
    println!("  ✓ excluded:           {}", report.excluded);
    println!("  ✓ unmatched:          {}", report.unmatched);
    println!("  ✓ matched, no fee:    {}", report.matched_without_fee);
}
