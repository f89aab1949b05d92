use chrono::NaiveDate;
use rust_decimal::Decimal;
use scbimportlib::{
    banking,
    config::ImporterConfig,
    error::ImportError,
    importers::scbcard::ScbCard,
    model::{DebitCredit, Directive, Row},
    reader::{self, SourceFile},
    traits::Importer,
};

const STATEMENT: &str = r#"PRIORITY BANKING VISA INFINITE CARD
Card Number,4129-XXXX-XXXX-1234
Statement Date,31/01/2024

Date,DESCRIPTION,Foreign Currency Amount,SGD Amount
# exported from online banking
	12/01/2024 ,GRAB RIDES SINGAPORE 	,,"SGD 12.40 DR"
15/01/2024,PAYMENT - THANK YOU,,"SGD 1,200.00 CR"
20/01/2024,TOKYO HOTEL,"YEN 74,000","SGD 645.12 DR"
28/01/2024,[UNPOSTED] NETFLIX,,"SGD 19.98 DR"
29/01/2024,UNPOSTED SPOTIFY,,"SGD 9.98 DR"
,,,
Current Balance,SGD,500.00 DR
Minimum Payment,SGD,50.00
Payment Due Date,25/02/2024
Credit Limit,SGD,20000.00
Available Credit,SGD,19500.00
Statement Balance,SGD,500.00 DR
"#;

fn config() -> ImporterConfig {
    ImporterConfig {
        account_number: "1234".into(),
        ..ImporterConfig::default()
    }
}

fn file(contents: &str) -> SourceFile {
    SourceFile::new("downloads/CardTransactions3.csv", contents)
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn identify_needs_header_account_and_name() {
    let imp = ScbCard::new(config());
    assert!(imp.identify(&file(STATEMENT)));

    let other_card = ScbCard::new(ImporterConfig {
        account_number: "9999".into(),
        ..ImporterConfig::default()
    });
    assert!(!other_card.identify(&file(STATEMENT)));

    let renamed = STATEMENT.replace("PRIORITY BANKING", "PLATINUM");
    assert!(!imp.identify(&file(&renamed)));

    assert!(!imp.identify(&SourceFile::new("statement.csv", STATEMENT)));

    let custom = ScbCard::new(ImporterConfig {
        custom_header: Some("PLATINUM VISA".into()),
        ..config()
    });
    assert!(custom.identify(&file(&renamed)));
}

#[test]
fn rows_are_stripped_signed_and_unposted_dropped() {
    let imp = ScbCard::new(config());
    let rows = reader::read_rows(&imp, &file(STATEMENT)).expect("read rows");

    let payees: Vec<&str> = rows.iter().map(|r| r.payee.as_str()).collect();
    assert_eq!(payees, vec!["GRAB RIDES SINGAPORE", "PAYMENT - THANK YOU", "TOKYO HOTEL"]);

    assert_eq!(rows[0].date, d(2024, 1, 12));
    assert_eq!(rows[0].amount, Decimal::new(-1240, 2));
    assert_eq!(rows[0].crdr, DebitCredit::Debit);
    assert_eq!(rows[1].amount, Decimal::new(120000, 2));
    assert_eq!(rows[1].crdr, DebitCredit::Credit);
    assert_eq!(rows[2].amount, Decimal::new(-64512, 2));
    assert!(rows.iter().all(|r| r.currency == "SGD" && r.memo.is_empty()));
    assert!(rows.iter().all(|r| r.foreign_currency.is_none()));
}

#[test]
fn foreign_currency_split_keeps_original() {
    let imp = ScbCard::new(ImporterConfig {
        convert_currencies: true,
        ..config()
    });
    let rows = reader::read_rows(&imp, &file(STATEMENT)).expect("read rows");
    let hotel = rows.iter().find(|r| r.payee == "TOKYO HOTEL").unwrap();
    assert_eq!(hotel.foreign_currency.as_deref(), Some("YEN"));
    assert_eq!(hotel.foreign_amount.as_deref(), Some("74,000"));
    assert_eq!(hotel.foreign_original.as_deref(), Some("YEN 74,000"));

    let grab = &rows[0];
    assert_eq!(grab.foreign_currency.as_deref(), Some(""));
    assert_eq!(grab.foreign_price().unwrap(), None);
}

#[test]
fn unknown_crdr_marker_fails_the_file() {
    let broken = STATEMENT.replace("SGD 645.12 DR", "SGD 645.12 XX");
    let imp = ScbCard::new(config());
    match reader::read_rows(&imp, &file(&broken)) {
        Err(ImportError::UnknownCrDr(m)) => assert_eq!(m, "XX"),
        other => panic!("expected UnknownCrDr, got {other:?}"),
    }
}

#[test]
fn bracketed_unposted_payee_is_skipped() {
    let imp = ScbCard::new(config());
    let row = Row {
        date: d(2024, 1, 28),
        payee: "[UNPOSTED] NETFLIX".into(),
        amount: Decimal::new(-1998, 2),
        currency: "SGD".into(),
        memo: String::new(),
        crdr: DebitCredit::Debit,
        foreign_currency: None,
        foreign_amount: None,
        foreign_original: None,
    };
    assert!(imp.skip_transaction(&row));
    assert!(!imp.skip_transaction(&Row {
        payee: "NETFLIX".into(),
        ..row
    }));
}

#[test]
fn balance_from_current_balance_row() {
    let imp = ScbCard::new(config());
    let f = file(STATEMENT);
    let rows = reader::read_rows(&imp, &f).unwrap();
    let balances: Vec<_> = imp.get_balance_statement(&f, &rows).unwrap().collect();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].date, d(2024, 1, 21));
    assert_eq!(balances[0].amount, Decimal::new(-50000, 2));
    assert_eq!(balances[0].currency, "SGD");

    let credit = STATEMENT.replace(
        "Current Balance,SGD,500.00 DR",
        "Current Balance,SGD,500.00 CR",
    );
    let f = file(&credit);
    let balances: Vec<_> = imp.get_balance_statement(&f, &rows).unwrap().collect();
    assert_eq!(balances[0].amount, Decimal::new(50000, 2));
}

#[test]
fn no_transactions_means_no_balance() {
    let imp = ScbCard::new(config());
    let f = file(STATEMENT);
    let balances: Vec<_> = imp.get_balance_statement(&f, &[]).unwrap().collect();
    assert!(balances.is_empty());
}

#[test]
fn extract_builds_transactions_then_balance() {
    let imp = ScbCard::new(ImporterConfig {
        target_account: Some("Expenses:Uncategorized".into()),
        ..config()
    });
    let st = banking::extract(&imp, &file(STATEMENT)).expect("extract");
    assert_eq!(st.account, "Liabilities:CreditCard:SCB");
    assert_eq!(st.transactions().count(), 3);
    assert_eq!(st.balances().count(), 1);
    assert!(matches!(st.directives.last(), Some(Directive::Balance(_))));

    let first = st.transactions().next().unwrap();
    assert_eq!(first.payee.as_deref(), Some("GRAB RIDES SINGAPORE"));
    assert_eq!(first.postings.len(), 2);
    assert_eq!(first.postings[1].account, "Expenses:Uncategorized");
    assert!(first.postings[1].units.is_none());
}

#[test]
fn file_date_is_latest_kept_transaction() {
    let imp = ScbCard::new(config());
    assert_eq!(imp.file_date(&file(STATEMENT)).unwrap(), Some(d(2024, 1, 20)));
    assert_eq!(imp.filing_account(), "Liabilities:CreditCard:SCB");
}

#[test]
fn file_date_reports_broken_marker() {
    let broken = STATEMENT.replace("SGD 645.12 DR", "SGD 645.12 XX");
    let imp = ScbCard::new(config());
    assert!(imp.identify(&file(&broken)));
    assert!(matches!(
        imp.file_date(&file(&broken)),
        Err(ImportError::UnknownCrDr(m)) if m == "XX"
    ));
}
