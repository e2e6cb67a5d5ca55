//! Ledger CSV import
//!
//! Expected header (any column order, case-insensitive):
//! `date,description,amount,type,category`. `description` is optional and
//! `kind` is accepted in place of `type`.

use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::db::{Database, TransactionInsertResult};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, TransactionKind, AMOUNT_DP, MAX_AMOUNT};

/// Outcome of importing a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub duplicates: usize,
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    description: Option<usize>,
    amount: usize,
    kind: usize,
    category: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| Error::Import(format!("Missing '{}' column", names[0])))
        };

        Ok(Self {
            date: require(&["date"])?,
            description: find(&["description"]),
            amount: require(&["amount"])?,
            kind: require(&["type", "kind"])?,
            category: require(&["category"])?,
        })
    }
}

/// Parse ledger CSV data into transactions ready for the store
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = index + 2;

        if record.iter().all(|field| field.is_empty()) {
            warn!("Skipping blank row on line {}", line);
            continue;
        }

        let date = parse_date(required(&record, columns.date, "date", line)?)
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;
        let amount = parse_amount(required(&record, columns.amount, "amount", line)?)
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;
        let kind = TransactionKind::from_str(required(&record, columns.kind, "type", line)?)
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;
        let category = required(&record, columns.category, "category", line)?.to_string();
        let description = columns
            .description
            .and_then(|pos| record.get(pos))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        // Identical rows within one file are distinct purchases; number them
        // so they hash apart while a re-import still hashes the same.
        let base = generate_hash(&date, description.as_deref(), amount, kind, &category, 0);
        let occurrence = seen.entry(base.clone()).or_insert(0);
        let import_hash = if *occurrence == 0 {
            base
        } else {
            generate_hash(&date, description.as_deref(), amount, kind, &category, *occurrence)
        };
        *occurrence += 1;

        transactions.push(NewTransaction {
            date,
            description,
            amount,
            kind,
            category,
            import_hash,
        });
    }

    Ok(transactions)
}

/// Parse a CSV and insert every row, skipping rows already imported
pub fn import_csv<R: Read>(db: &Database, reader: R, owner: Option<&str>) -> Result<ImportSummary> {
    let transactions = parse_csv(reader)?;
    let mut summary = ImportSummary::default();

    for tx in &transactions {
        match db.insert_transaction(owner, tx)? {
            TransactionInsertResult::Inserted(_) => summary.imported += 1,
            TransactionInsertResult::Duplicate(_) => summary.duplicates += 1,
        }
    }

    info!(
        imported = summary.imported,
        duplicates = summary.duplicates,
        "Imported ledger CSV"
    );
    Ok(summary)
}

fn required<'a>(record: &'a StringRecord, pos: usize, name: &str, line: usize) -> Result<&'a str> {
    record
        .get(pos)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Import(format!("Line {}: missing {}", line, name)))
}

/// Generate a unique hash for deduplication
fn generate_hash(
    date: &NaiveDate,
    description: Option<&str>,
    amount: Decimal,
    kind: TransactionKind,
    category: &str,
    occurrence: usize,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update(description.unwrap_or_default().as_bytes());
    hasher.update(amount.normalize().to_string().as_bytes());
    hasher.update(kind.as_str().as_bytes());
    hasher.update(category.as_bytes());
    if occurrence > 0 {
        hasher.update(occurrence.to_be_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Parse a date in ISO (YYYY-MM-DD) or US (MM/DD/YYYY) form
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .map_err(|_| Error::Import(format!("Invalid date: {}", s)))
}

/// Parse an amount, tolerating currency symbols and thousands separators
///
/// The sign is dropped; direction comes from the type column. Amounts above
/// [`MAX_AMOUNT`] or with more than two decimal places are rejected.
fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();

    // Accounting style negatives: (12.34)
    let cleaned = cleaned
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(&cleaned);

    let amount = Decimal::from_str(cleaned)
        .map(|amount| amount.abs())
        .map_err(|_| Error::Import(format!("Invalid amount: {}", s)))?;

    if amount > MAX_AMOUNT {
        return Err(Error::Import(format!(
            "Amount {} exceeds the maximum of {}",
            s, MAX_AMOUNT
        )));
    }
    if amount.normalize().scale() > AMOUNT_DP {
        return Err(Error::Import(format!(
            "Amount {} has more than {} decimal places",
            s, AMOUNT_DP
        )));
    }

    Ok(amount)
}
