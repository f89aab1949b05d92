//! Плоский CSV нормализованных директив:
//! kind,date,payee,narration,account,amount,currency,price_amount,price_currency

use crate::{
    error::Result,
    model::{Directive, Statement},
};
use csv::WriterBuilder;
use std::io::Write;

#[derive(serde::Serialize)]
struct CsvOutRow<'a> {
    kind: &'static str,
    date: String,
    payee: Option<&'a str>,
    narration: &'a str,
    account: &'a str,
    amount: Option<String>,
    currency: Option<&'a str>,
    price_amount: Option<String>,
    price_currency: Option<&'a str>,
}

pub struct Csv;

impl crate::traits::WriteFormat for Csv {
    fn write<W: Write>(mut w: W, st: &Statement) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        for d in &st.directives {
            match d {
                Directive::Transaction(t) => {
                    // только проводки с суммой, встречный счёт без суммы не пишем
                    for p in t.postings.iter().filter(|p| p.units.is_some()) {
                        let units = p.units.as_ref();
                        wrt.serialize(CsvOutRow {
                            kind: "transaction",
                            date: t.date.format("%Y-%m-%d").to_string(),
                            payee: t.payee.as_deref(),
                            narration: &t.narration,
                            account: &p.account,
                            amount: units.map(|u| u.num.to_string()),
                            currency: units.map(|u| u.currency.as_str()),
                            price_amount: p.price.as_ref().map(|a| a.num.to_string()),
                            price_currency: p.price.as_ref().map(|a| a.currency.as_str()),
                        })?;
                    }
                }
                Directive::Balance(b) => {
                    wrt.serialize(CsvOutRow {
                        kind: "balance",
                        date: b.date.format("%Y-%m-%d").to_string(),
                        payee: None,
                        narration: "",
                        account: &b.account,
                        amount: Some(b.amount.num.to_string()),
                        currency: Some(b.amount.currency.as_str()),
                        price_amount: None,
                        price_currency: None,
                    })?;
                }
            }
        }
        wrt.flush()?;
        Ok(())
    }
}
