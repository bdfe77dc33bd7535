//! CSV store example: load two ledger files, reconcile, write the result

use recon_core::{CsvStore, Reconciler, RecordStore};
use std::fs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Recon Core - CSV Round Trip Example\n");

    let dir = std::env::temp_dir().join("recon_core_demo");
    fs::create_dir_all(&dir)?;

    let order_path = dir.join("orders.csv");
    let payment_path = dir.join("payments.csv");
    let output_path = dir.join("orders_settled.csv");

    fs::write(
        &order_path,
        "订单号,外部订单号,订单金额\n\
         20240101ABCDEFGH1234,,100.5\n\
         20240202HGFEDCBA4321,X9,-50\n\
         20240303AAAABBBB0000,,0\n",
    )?;
    fs::write(
        &payment_path,
        "商户订单号,商品名称,业务类型,支出金额（-元）,收入金额（+元）\n\
         20240101ABCDEFGH1234XYZ,套餐-P33,收费,2.5,\n\
         ,plan-X9,退费,,1.25\n",
    )?;

    println!("📂 Order file:   {}", order_path.display());
    println!("📂 Payment file: {}", payment_path.display());
    println!();

    let mut store = CsvStore::new(&order_path, &payment_path).with_output(&output_path);

    let mut orders = store.load_orders().await?;
    let payments = store.load_payments().await?;

    let report = Reconciler::new().reconcile(&mut orders, &payments);
    store.write_orders(&orders).await?;

    println!(
        "⚙️  Settled {} of {} orders\n",
        report.settled, report.total_orders
    );

    println!("📄 Output ({}):", output_path.display());
    for line in fs::read_to_string(&output_path)?.lines() {
        println!("  {line}");
    }

    Ok(())
}
