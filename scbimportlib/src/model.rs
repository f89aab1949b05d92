//! Доменные модели: нормализованная строка выписки, баланс и директивы учёта.

use crate::error::{ImportError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DebitCredit {
    Debit,
    Credit,
}

impl DebitCredit {
    /// Префикс, который ставится перед суммой: "-" для DR, пусто для CR.
    pub fn sign_prefix(self) -> &'static str {
        match self {
            DebitCredit::Debit => "-",
            DebitCredit::Credit => "",
        }
    }
}

impl FromStr for DebitCredit {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DR" => Ok(DebitCredit::Debit),
            "CR" => Ok(DebitCredit::Credit),
            other => Err(ImportError::UnknownCrDr(other.to_string())),
        }
    }
}

/// Строка выписки после всех преобразований таблицы.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub date: NaiveDate,
    pub payee: String,
    pub amount: Decimal,
    pub currency: String,
    pub memo: String,
    pub crdr: DebitCredit,
    pub foreign_currency: Option<String>,
    pub foreign_amount: Option<String>,
    pub foreign_original: Option<String>,
}

impl Row {
    /// Сумма в иностранной валюте без разделителей тысяч, если она есть.
    pub fn foreign_price(&self) -> Result<Option<Amount>> {
        let (Some(code), Some(raw)) = (&self.foreign_currency, &self.foreign_amount) else {
            return Ok(None);
        };
        if code.is_empty() || raw.is_empty() {
            return Ok(None);
        }
        let num: Decimal = raw
            .replace(',', "")
            .parse()
            .map_err(|e| ImportError::Parse(format!("foreign amount {raw:?}: {e}")))?;
        Ok(Some(Amount::new(num.abs(), code.clone())))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Balance {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Amount {
    pub num: Decimal,
    pub currency: String,
}

impl Amount {
    pub fn new(num: Decimal, currency: impl Into<String>) -> Self {
        Self { num, currency: currency.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Posting {
    pub account: String,
    pub units: Option<Amount>,
    /// Полная цена (`@@`), а не цена за единицу.
    pub price: Option<Amount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub flag: char,
    pub payee: Option<String>,
    pub narration: String,
    pub postings: Vec<Posting>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceAssertion {
    pub date: NaiveDate,
    pub account: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Directive {
    Transaction(Transaction),
    Balance(BalanceAssertion),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Statement {
    pub account: String,
    pub directives: Vec<Directive>,
}

impl Statement {
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Transaction(t) => Some(t),
            _ => None,
        })
    }

    pub fn balances(&self) -> impl Iterator<Item = &BalanceAssertion> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Balance(b) => Some(b),
            _ => None,
        })
    }
}
