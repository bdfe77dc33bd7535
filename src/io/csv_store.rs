//! CSV-backed record store
//!
//! Reads both ledgers from plain UTF-8 CSV and writes the updated order
//! ledger back, preserving the sheet's original shape: every input column
//! survives untouched and the fee column is appended once when missing.
//! Format sniffing (encodings, delimiters, comment prefixes) is
//! deliberately out of scope; exports needing that are converted before
//! they reach this store.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use log::debug;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::RwLock;

use crate::io::columns;
use crate::traits::RecordStore;
use crate::types::{BusinessType, OrderRecord, PaymentRecord, ReconError, ReconResult};

/// Parse a decimal cell, treating unparseable content as absent
fn parse_decimal(cell: &str) -> Option<BigDecimal> {
    match BigDecimal::from_str(cell) {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("cell '{cell}' is not a decimal, treating as absent");
            None
        }
    }
}

fn missing(sheet: &str, column: &str) -> ReconError {
    ReconError::MissingColumn {
        sheet: sheet.to_string(),
        column: column.to_string(),
    }
}

/// The order sheet as loaded: headers, raw rows, and resolved column indices
///
/// Raw rows are retained so the written output keeps every column of the
/// input, including ones the engine knows nothing about.
#[derive(Debug, Clone)]
pub(crate) struct OrderSheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    id_col: usize,
    external_col: Option<usize>,
    amount_col: usize,
    fee_col: Option<usize>,
}

impl OrderSheet {
    /// Trimmed, non-empty cell content at a column, if any
    fn cell<'a>(&self, row: &'a [String], col: usize) -> Option<&'a str> {
        row.get(col).map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    /// Extract the typed order records the engine consumes
    pub(crate) fn records(&self) -> Vec<OrderRecord> {
        self.rows
            .iter()
            .map(|row| OrderRecord {
                order_id: self.cell(row, self.id_col).map(str::to_string),
                external_id: self
                    .external_col
                    .and_then(|col| self.cell(row, col))
                    .map(str::to_string),
                amount: self
                    .cell(row, self.amount_col)
                    .and_then(parse_decimal),
                fee: self
                    .fee_col
                    .and_then(|col| self.cell(row, col))
                    .and_then(parse_decimal),
            })
            .collect()
    }
}

/// Read the order sheet from a CSV reader
pub(crate) fn read_order_sheet<R: Read>(reader: R) -> ReconResult<OrderSheet> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    let id_col = find(columns::ORDER_ID).ok_or_else(|| missing("order", columns::ORDER_ID))?;
    let amount_col =
        find(columns::ORDER_AMOUNT).ok_or_else(|| missing("order", columns::ORDER_AMOUNT))?;
    let external_col = find(columns::EXTERNAL_ID);
    let fee_col = find(columns::FEE);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(OrderSheet {
        headers,
        rows,
        id_col,
        external_col,
        amount_col,
        fee_col,
    })
}

/// Read the payment ledger from a CSV reader
pub(crate) fn read_payments<R: Read>(reader: R) -> ReconResult<Vec<PaymentRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    let business_type_col =
        find(columns::BUSINESS_TYPE).ok_or_else(|| missing("payment", columns::BUSINESS_TYPE))?;
    let business_order_col = find(columns::BUSINESS_ORDER_ID);
    let product_col = find(columns::PRODUCT_NAME);
    let expenditure_col = find(columns::EXPENDITURE_AMOUNT);
    let income_col = find(columns::INCOME_AMOUNT);

    let cell = |record: &csv::StringRecord, col: Option<usize>| -> Option<String> {
        col.and_then(|c| record.get(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let mut payments = Vec::new();
    for record in rdr.records() {
        let record = record?;
        payments.push(PaymentRecord {
            business_order_id: cell(&record, business_order_col),
            product_name: cell(&record, product_col),
            business_type: cell(&record, Some(business_type_col))
                .and_then(|label| BusinessType::from_label(&label)),
            expenditure_amount: cell(&record, expenditure_col)
                .and_then(|s| parse_decimal(&s)),
            income_amount: cell(&record, income_col).and_then(|s| parse_decimal(&s)),
        });
    }
    Ok(payments)
}

/// Write the updated order ledger to a CSV writer
///
/// Rows are emitted in input order with their original cells; the fee cell
/// is rewritten from the corresponding record (empty when the fee is
/// absent).
pub(crate) fn write_order_sheet<W: Write>(
    writer: W,
    sheet: &OrderSheet,
    orders: &[OrderRecord],
) -> ReconResult<()> {
    if orders.len() != sheet.rows.len() {
        return Err(ReconError::Storage(format!(
            "order count {} does not match the loaded sheet ({} rows)",
            orders.len(),
            sheet.rows.len()
        )));
    }

    let mut headers = sheet.headers.clone();
    let fee_col = match sheet.fee_col {
        Some(col) => col,
        None => {
            headers.push(columns::FEE.to_string());
            headers.len() - 1
        }
    };

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&headers)?;
    for (row, order) in sheet.rows.iter().zip(orders) {
        let mut cells = row.clone();
        cells.resize(headers.len(), String::new());
        cells[fee_col] = order
            .fee
            .as_ref()
            .map(|fee| fee.to_string())
            .unwrap_or_default();
        wtr.write_record(&cells)?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV-backed [`RecordStore`]
///
/// Loads the order and payment sheets from their paths and writes the
/// updated order sheet to the configured output, defaulting to an in-place
/// update of the order file.
#[derive(Debug)]
pub struct CsvStore {
    order_path: PathBuf,
    payment_path: PathBuf,
    output_path: Option<PathBuf>,
    sheet: RwLock<Option<OrderSheet>>,
}

impl CsvStore {
    /// Create a store over the two ledger files
    pub fn new<P: AsRef<Path>>(order_path: P, payment_path: P) -> Self {
        Self {
            order_path: order_path.as_ref().to_path_buf(),
            payment_path: payment_path.as_ref().to_path_buf(),
            output_path: None,
            sheet: RwLock::new(None),
        }
    }

    /// Write the result to a separate file instead of updating in place
    pub fn with_output<P: AsRef<Path>>(mut self, output_path: P) -> Self {
        self.output_path = Some(output_path.as_ref().to_path_buf());
        self
    }
}

#[async_trait]
impl RecordStore for CsvStore {
    async fn load_orders(&self) -> ReconResult<Vec<OrderRecord>> {
        let file = File::open(&self.order_path)?;
        let sheet = read_order_sheet(file)?;
        let records = sheet.records();
        debug!(
            "loaded {} order rows from {}",
            records.len(),
            self.order_path.display()
        );
        *self.sheet.write().unwrap() = Some(sheet);
        Ok(records)
    }

    async fn load_payments(&self) -> ReconResult<Vec<PaymentRecord>> {
        let file = File::open(&self.payment_path)?;
        let payments = read_payments(file)?;
        debug!(
            "loaded {} payment rows from {}",
            payments.len(),
            self.payment_path.display()
        );
        Ok(payments)
    }

    async fn write_orders(&mut self, orders: &[OrderRecord]) -> ReconResult<()> {
        let mut guard = self.sheet.write().unwrap();
        if guard.is_none() {
            let file = File::open(&self.order_path)?;
            *guard = Some(read_order_sheet(file)?);
        }
        let sheet = guard
            .as_ref()
            .ok_or_else(|| ReconError::Storage("order sheet unavailable".to_string()))?;

        let target = self
            .output_path
            .as_ref()
            .unwrap_or(&self.order_path)
            .clone();
        let file = File::create(&target)?;
        write_order_sheet(file, sheet, orders)?;
        debug!("wrote {} order rows to {}", orders.len(), target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ORDER_CSV: &str = "\
订单号,外部订单号,订单金额,备注
20240101ABCDEFGH1234,X9,100.5,first
SHORT,,-50,second
20240102ABCDEFGH5678,P33,not-a-number,third
";

    const PAYMENT_CSV: &str = "\
商户订单号,商品名称,业务类型,支出金额（-元）,收入金额（+元）
20240101ABCDEFGH1234XYZ,套餐-P33,收费,2.5,
,plan-X9,退费,,1.25
,other,结算,3.0,4.0
";

    #[test]
    fn reads_order_sheet_and_coerces_cells() {
        let sheet = read_order_sheet(Cursor::new(ORDER_CSV)).unwrap();
        let records = sheet.records();

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].order_id.as_deref(),
            Some("20240101ABCDEFGH1234")
        );
        assert_eq!(records[0].external_id.as_deref(), Some("X9"));
        assert_eq!(
            records[0].amount,
            Some(BigDecimal::from_str("100.5").unwrap())
        );
        assert_eq!(records[0].fee, None);

        assert_eq!(records[1].external_id, None);

        // unparseable amount loads as absent
        assert_eq!(records[2].amount, None);
    }

    #[test]
    fn reads_payments_and_gates_unknown_labels() {
        let payments = read_payments(Cursor::new(PAYMENT_CSV)).unwrap();

        assert_eq!(payments.len(), 3);
        assert_eq!(payments[0].business_type, Some(BusinessType::Charge));
        assert_eq!(
            payments[0].expenditure_amount,
            Some(BigDecimal::from_str("2.5").unwrap())
        );
        assert_eq!(payments[0].income_amount, None);

        assert_eq!(payments[1].business_type, Some(BusinessType::Refund));
        assert_eq!(payments[1].business_order_id, None);

        // a label outside the closed set maps to no business type
        assert_eq!(payments[2].business_type, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = read_order_sheet(Cursor::new("a,b\n1,2\n")).unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn { .. }));

        let err = read_payments(Cursor::new("商户订单号\nabc\n")).unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn { .. }));
    }

    #[test]
    fn writes_sheet_with_appended_fee_column() {
        let sheet = read_order_sheet(Cursor::new(ORDER_CSV)).unwrap();
        let mut records = sheet.records();
        records[0].fee = Some(BigDecimal::from_str("2.5").unwrap());

        let mut out = Vec::new();
        write_order_sheet(&mut out, &sheet, &records).unwrap();
        let written = String::from_utf8(out).unwrap();

        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("订单号,外部订单号,订单金额,备注,支付手续费"));
        assert_eq!(
            lines.next(),
            Some("20240101ABCDEFGH1234,X9,100.5,first,2.5")
        );
        // untouched rows keep an empty fee cell and their original columns
        assert_eq!(lines.next(), Some("SHORT,,-50,second,"));
    }

    #[test]
    fn rewrites_existing_fee_column_in_place() {
        let input = "订单号,订单金额,支付手续费\n20240101ABCDEFGH1234,100,9.9\n";
        let sheet = read_order_sheet(Cursor::new(input)).unwrap();
        let mut records = sheet.records();
        assert_eq!(records[0].fee, Some(BigDecimal::from_str("9.9").unwrap()));

        records[0].fee = Some(BigDecimal::from(0));
        let mut out = Vec::new();
        write_order_sheet(&mut out, &sheet, &records).unwrap();
        let written = String::from_utf8(out).unwrap();

        assert_eq!(
            written,
            "订单号,订单金额,支付手续费\n20240101ABCDEFGH1234,100,0\n"
        );
    }

    #[test]
    fn row_count_mismatch_is_a_storage_error() {
        let sheet = read_order_sheet(Cursor::new(ORDER_CSV)).unwrap();
        let err = write_order_sheet(&mut Vec::new(), &sheet, &[]).unwrap_err();
        assert!(matches!(err, ReconError::Storage(_)));
    }
}
