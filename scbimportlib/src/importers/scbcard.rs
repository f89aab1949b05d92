//! Выписка по кредитной карте Standard Chartered (CSV, `CardTransactions*.csv`).
//!
//! Колонки: `Date,DESCRIPTION,Foreign Currency Amount,SGD Amount`, где сумма
//! записана как `SGD 141.02 CR`. В подвале шесть служебных строк, среди них
//! `Current Balance`, из которой берётся баланс.

use crate::{
    config::ImporterConfig,
    error::{ImportError, Result},
    model::{Balance, DebitCredit, Row},
    reader::{self, ReaderSettings, SourceFile},
    table::Table,
    traits::Importer,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

pub const IMPORTER_NAME: &str = "SCB Card CSV";
pub const DEFAULT_HEADER: &str = "PRIORITY BANKING VISA INFINITE CARD";

const DESCRIPTION: &str = "DESCRIPTION";
const FOREIGN_AMOUNT: &str = "Foreign Currency Amount";
const SGD_AMOUNT: &str = "SGD Amount";

pub struct ScbCard {
    config: ImporterConfig,
    settings: ReaderSettings,
}

impl ScbCard {
    pub fn new(config: ImporterConfig) -> Self {
        let header_identifier = config
            .custom_header
            .clone()
            .unwrap_or_else(|| DEFAULT_HEADER.to_string());
        let header_map = [
            ("Date", "date"),
            (DESCRIPTION, "payee"),
            (FOREIGN_AMOUNT, "foreign_original"),
        ]
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        let settings = ReaderSettings {
            filename_pattern: "CardTransactions[0-9]*".into(),
            header_identifier,
            column_labels_line: "Date,DESCRIPTION,Foreign Currency Amount,SGD Amount".into(),
            date_format: "%d/%m/%Y".into(),
            skip_head_rows: 0,
            skip_tail_rows: 6,
            skip_comments: Some("# ".into()),
            header_map,
        };
        Self { config, settings }
    }
}

fn strip_blanks(s: &str) -> String {
    s.trim_matches(|c: char| c == ' ' || c == '\t').to_string()
}

/// `"SGD 500.00 CR"` -> (валюта, сумма со знаком). Всё, кроме CR, считается долгом.
fn parse_balance_cells(cells: &[String]) -> Result<(String, Decimal)> {
    let joined = cells
        .iter()
        .skip(1)
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let parts: Vec<&str> = joined.split_whitespace().collect();
    let &[currency, units, debitcredit] = parts.as_slice() else {
        return Err(ImportError::Parse(format!("Current Balance row: {joined:?}")));
    };
    let units = reader::parse_amount(units)?;
    let units = if debitcredit == "CR" { units } else { -units };
    Ok((currency.to_string(), units))
}

impl Importer for ScbCard {
    fn name(&self) -> &str {
        IMPORTER_NAME
    }

    fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    fn config(&self) -> &ImporterConfig {
        &self.config
    }

    fn deep_identify(&self, file: &SourceFile) -> bool {
        let head = file.head();
        let header_ok =
            reader::match_at_start(&self.settings.header_identifier, head).unwrap_or_else(|e| {
                warn!(error = %e, "invalid header identifier");
                false
            });
        header_ok && head.contains(self.config.account_number.as_str())
    }

    fn skip_transaction(&self, row: &Row) -> bool {
        row.payee.contains("[UNPOSTED]")
    }

    fn prepare_raw_file(&self, table: Table) -> Table {
        table
            .convert_all(strip_blanks)
            .select(|r| r.cells().iter().any(|c| !c.is_empty()))
    }

    fn prepare_table(&self, table: Table) -> Result<Table> {
        let before = table.len();
        let mut rdr = table.select(|r| !r.get(DESCRIPTION).unwrap_or("").contains("UNPOSTED"));
        debug!(dropped = before - rdr.len(), "unposted rows removed");

        // "YEN 74,000" -> foreign_currency, foreign_amount
        if self.config.convert_currencies {
            rdr = rdr.capture(
                FOREIGN_AMOUNT,
                "(.*) (.*)",
                &["foreign_currency", "foreign_amount"],
                Some(&["", ""][..]),
                true,
            )?;
        } else {
            rdr = rdr.cutout(FOREIGN_AMOUNT);
        }

        // "SGD 141.02 CR" -> currency, amount, crdr
        let rdr = rdr.capture(
            SGD_AMOUNT,
            "(.*) (.*) (.*)",
            &["currency", "amount", "crdr"],
            None,
            false,
        )?;
        let rdr = rdr.convert_with_row("amount", |amount, row| {
            let crdr: DebitCredit = row.get("crdr").unwrap_or("").parse()?;
            Ok(format!("{}{}", crdr.sign_prefix(), amount))
        })?;

        Ok(rdr.add_field("memo", |_| String::new()))
    }

    fn get_balance_statement(
        &self,
        file: &SourceFile,
        rows: &[Row],
    ) -> Result<Box<dyn Iterator<Item = Balance>>> {
        let Some(date) = reader::get_balance_assertion_date(rows) else {
            warn!(file = %file.name, "no transactions, no balance assertion date");
            return Ok(Box::new(std::iter::empty()));
        };
        let balance_row = reader::get_row_by_label(self, file, "Current Balance")?;
        let (currency, amount) = parse_balance_cells(&balance_row)?;
        Ok(Box::new(std::iter::once(Balance {
            date,
            amount,
            currency,
        })))
    }
}
