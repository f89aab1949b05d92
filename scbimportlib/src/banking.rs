//! Построитель банковских проводок: строки выписки -> транзакции и баланс.

use crate::{
    error::Result,
    model::{Amount, BalanceAssertion, Directive, Posting, Row, Statement, Transaction},
    reader::{self, SourceFile},
    traits::Importer,
};
use tracing::{debug, info};

pub const FLAG: char = '*';

fn build_transaction<I: Importer + ?Sized>(importer: &I, row: &Row) -> Result<Transaction> {
    let config = importer.config();
    let currency = if row.currency.is_empty() {
        config.currency.clone()
    } else {
        row.currency.clone()
    };

    let mut postings = vec![Posting {
        account: config.main_account.clone(),
        units: Some(Amount::new(row.amount, currency)),
        price: row.foreign_price()?,
    }];
    if let Some(target) = &config.target_account {
        postings.push(Posting {
            account: target.clone(),
            units: None,
            price: None,
        });
    }

    Ok(Transaction {
        date: row.date,
        flag: FLAG,
        payee: Some(row.payee.clone()).filter(|p| !p.is_empty()),
        narration: row.memo.clone(),
        postings,
    })
}

/// Прогоняет файл через импортёр и собирает директивы: сначала операции,
/// затем (если есть дата) баланс по счёту карты.
pub fn extract<I: Importer + ?Sized>(importer: &I, file: &SourceFile) -> Result<Statement> {
    let rows = reader::read_rows(importer, file)?;
    let mut directives = Vec::with_capacity(rows.len() + 1);

    let mut skipped = 0usize;
    for row in &rows {
        if importer.skip_transaction(row) {
            skipped += 1;
            continue;
        }
        directives.push(Directive::Transaction(build_transaction(importer, row)?));
    }

    let main_account = importer.config().main_account.clone();
    let mut balances = 0usize;
    for bal in importer.get_balance_statement(file, &rows)? {
        directives.push(Directive::Balance(BalanceAssertion {
            date: bal.date,
            account: main_account.clone(),
            amount: Amount::new(bal.amount, bal.currency),
        }));
        balances += 1;
    }
    if balances == 0 {
        debug!(file = %file.name, "no balance produced");
    }

    info!(
        file = %file.name,
        importer = importer.name(),
        transactions = directives.len() - balances,
        skipped,
        balances,
        "extracted"
    );
    Ok(Statement {
        account: main_account,
        directives,
    })
}
