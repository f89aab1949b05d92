//! Универсальный CSV-ридер: находит строку с названиями колонок, отрезает
//! преамбулу и подвал, прогоняет таблицу через хуки импортёра и приводит
//! колонки к типам (`date`, `amount`).

use crate::{
    error::{ImportError, Result},
    model::{DebitCredit, Row},
    table::{Record, Table},
    traits::Importer,
};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use regex::Regex;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::debug;

/// Сколько байт начала файла используется для распознавания.
pub const HEAD_BYTES: usize = 8192;

/// Входной файл: имя (для сопоставления с шаблоном) и содержимое целиком.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let contents = contents.trim_start_matches('\u{feff}').to_string();
        Ok(Self::new(path.display().to_string(), contents))
    }

    pub fn base_name(&self) -> &str {
        Path::new(&self.name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.name)
    }

    pub fn head(&self) -> &str {
        if self.contents.len() <= HEAD_BYTES {
            return &self.contents;
        }
        let mut end = HEAD_BYTES;
        while !self.contents.is_char_boundary(end) {
            end -= 1;
        }
        &self.contents[..end]
    }
}

#[derive(Debug, Clone)]
pub struct ReaderSettings {
    pub filename_pattern: String,
    pub header_identifier: String,
    /// Строка заголовка таблицы; всё до неё считается преамбулой.
    pub column_labels_line: String,
    pub date_format: String,
    pub skip_head_rows: usize,
    pub skip_tail_rows: usize,
    pub skip_comments: Option<String>,
    pub header_map: Vec<(String, String)>,
}

/// Совпадение регулярки с началом текста (как `re.match`).
pub fn match_at_start(pattern: &str, text: &str) -> Result<bool> {
    Ok(Regex::new(&format!("^(?:{pattern})"))?.is_match(text))
}

fn raw_records(file: &SourceFile) -> Result<Vec<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file.contents.as_bytes());
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        out.push(rec.iter().map(str::to_string).collect());
    }
    Ok(out)
}

/// Таблица данных без обработки: заголовок — строка `column_labels_line`.
pub fn read_raw(file: &SourceFile, settings: &ReaderSettings) -> Result<Table> {
    let mut records = raw_records(file)?.into_iter();
    if settings.column_labels_line.is_empty() {
        let header = records.next().unwrap_or_default();
        return Ok(Table::new(header, records.collect()));
    }

    let labels: Vec<&str> = settings.column_labels_line.split(',').collect();
    let is_labels = |r: &Vec<String>| {
        r.len() >= labels.len()
            && r.iter()
                .zip(&labels)
                .all(|(cell, label)| cell.trim_matches(|c: char| c == ' ' || c == '\t') == *label)
    };
    let mut preamble = 0usize;
    while let Some(header) = records.next() {
        if is_labels(&header) {
            debug!(file = %file.name, preamble, "found column labels");
            return Ok(Table::new(header, records.collect()));
        }
        preamble += 1;
    }
    Err(ImportError::Parse(format!(
        "{}: column labels line {:?} not found",
        file.name, settings.column_labels_line
    )))
}

/// Полный путь от файла до нормализованных строк.
pub fn read_rows<I: Importer + ?Sized>(importer: &I, file: &SourceFile) -> Result<Vec<Row>> {
    let settings = importer.settings();
    let rdr = read_raw(file, settings)?;
    let rdr = importer.prepare_raw_file(rdr);
    let rdr = rdr.skip_head(settings.skip_head_rows);
    let rdr = rdr.drop_tail(settings.skip_tail_rows);
    let rdr = match &settings.skip_comments {
        Some(prefix) => rdr.skip_comments(prefix),
        None => rdr,
    };
    debug!(rows = rdr.len(), "raw table prepared");

    let rdr = importer.prepare_table(rdr)?;
    let rdr = rdr.rename(&settings.header_map);
    let rows = convert_columns(&rdr, &settings.date_format)?;
    debug!(rows = rows.len(), "rows converted");
    Ok(rows)
}

fn required<'a>(rec: &Record<'a>, name: &str) -> Result<&'a str> {
    rec.get(name)
        .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
}

fn optional(rec: &Record<'_>, name: &str) -> Option<String> {
    rec.get(name).map(str::to_string)
}

/// Оставляет в сумме только цифры, точку и минус и разбирает её.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned
        .parse()
        .map_err(|e| ImportError::Parse(format!("amount {raw:?}: {e}")))
}

pub fn parse_date(raw: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, format)
        .map_err(|e| ImportError::Parse(format!("date {raw:?}: {e}")))
}

fn convert_columns(table: &Table, date_format: &str) -> Result<Vec<Row>> {
    table
        .records()
        .map(|rec| {
            Ok(Row {
                date: parse_date(required(&rec, "date")?, date_format)?,
                payee: required(&rec, "payee")?.to_string(),
                amount: parse_amount(required(&rec, "amount")?)?,
                currency: required(&rec, "currency")?.to_string(),
                memo: required(&rec, "memo")?.to_string(),
                crdr: required(&rec, "crdr")?.parse::<DebitCredit>()?,
                foreign_currency: optional(&rec, "foreign_currency"),
                foreign_amount: optional(&rec, "foreign_amount"),
                foreign_original: optional(&rec, "foreign_original"),
            })
        })
        .collect()
}

/// Первая строка файла (после `prepare_raw_file`), у которой первая ячейка равна `label`.
pub fn get_row_by_label<I: Importer + ?Sized>(
    importer: &I,
    file: &SourceFile,
    label: &str,
) -> Result<Vec<String>> {
    let all = importer.prepare_raw_file(Table::new(Vec::new(), raw_records(file)?));
    let row = all
        .records()
        .find(|r| r.cells().first().map(String::as_str) == Some(label))
        .map(|r| r.cells().to_vec());
    row.ok_or_else(|| ImportError::MissingRow(label.to_string()))
}

pub fn get_max_transaction_date(rows: &[Row]) -> Option<NaiveDate> {
    rows.iter().map(|r| r.date).max()
}

/// День после последней операции: баланс в книге проверяется на начало дня.
pub fn get_balance_assertion_date(rows: &[Row]) -> Option<NaiveDate> {
    get_max_transaction_date(rows).map(|d| d + Duration::days(1))
}
