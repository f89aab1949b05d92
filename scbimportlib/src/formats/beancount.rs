//! Вывод в текстовый формат Beancount.
//!
//! ```text
//! 2024-01-12 * "GRAB RIDES" ""
//! 	Liabilities:CreditCard:SCB	-12.40 SGD
//!
//! 2024-01-31 balance Liabilities:CreditCard:SCB	-500.00 SGD
//! ```

use crate::{
    error::Result,
    model::{Amount, BalanceAssertion, Directive, Posting, Statement, Transaction},
};
use std::io::Write;

pub struct Beancount;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn write_amount<W: Write>(w: &mut W, amount: &Amount) -> Result<()> {
    write!(w, "{} {}", amount.num, amount.currency)?;
    Ok(())
}

fn write_posting<W: Write>(w: &mut W, posting: &Posting) -> Result<()> {
    write!(w, "\t{}", posting.account)?;
    if let Some(units) = &posting.units {
        write!(w, "\t")?;
        write_amount(w, units)?;
        if let Some(price) = &posting.price {
            write!(w, " @@ ")?;
            write_amount(w, price)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

fn write_transaction<W: Write>(w: &mut W, txn: &Transaction) -> Result<()> {
    write!(w, "{} {}", txn.date, txn.flag)?;
    if let Some(payee) = &txn.payee {
        write!(w, " {}", quote(payee))?;
    }
    writeln!(w, " {}", quote(&txn.narration))?;
    for posting in &txn.postings {
        write_posting(w, posting)?;
    }
    Ok(())
}

fn write_balance<W: Write>(w: &mut W, bal: &BalanceAssertion) -> Result<()> {
    write!(w, "{} balance {}\t", bal.date, bal.account)?;
    write_amount(w, &bal.amount)?;
    writeln!(w)?;
    Ok(())
}

impl crate::traits::WriteFormat for Beancount {
    fn write<W: Write>(mut w: W, st: &Statement) -> Result<()> {
        for directive in &st.directives {
            match directive {
                Directive::Transaction(t) => write_transaction(&mut w, t)?,
                Directive::Balance(b) => write_balance(&mut w, b)?,
            }
            writeln!(w)?;
        }
        w.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::WriteFormat;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn renders_price_and_elided_posting() {
        let st = Statement {
            account: "Liabilities:CreditCard:SCB".into(),
            directives: vec![Directive::Transaction(Transaction {
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                flag: '*',
                payee: Some("SUSHI \"ZEN\"".into()),
                narration: String::new(),
                postings: vec![
                    Posting {
                        account: "Liabilities:CreditCard:SCB".into(),
                        units: Some(Amount::new(Decimal::new(-64512, 2), "SGD")),
                        price: Some(Amount::new(Decimal::new(74000, 0), "YEN")),
                    },
                    Posting {
                        account: "Expenses:Food".into(),
                        units: None,
                        price: None,
                    },
                ],
            })],
        };
        let mut out = Vec::new();
        Beancount::write(&mut out, &st).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "2024-03-02 * \"SUSHI \\\"ZEN\\\"\" \"\"\n\
             \tLiabilities:CreditCard:SCB\t-645.12 SGD @@ 74000 YEN\n\
             \tExpenses:Food\n\n"
        );
    }
}
