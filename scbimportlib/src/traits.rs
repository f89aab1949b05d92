//! Трэйты импортёра (чтение выписки) и формата вывода.

use crate::{
    config::ImporterConfig,
    error::Result,
    model::{Balance, Row, Statement},
    reader::{self, ReaderSettings, SourceFile},
    table::Table,
};
use chrono::NaiveDate;
use std::io::Write;

/// Импортёр конкретного банка: настройки ридера плюс хуки, которыми он
/// подправляет общий конвейер. У всех хуков есть тождественная реализация.
pub trait Importer {
    fn name(&self) -> &str;

    fn settings(&self) -> &ReaderSettings;

    fn config(&self) -> &ImporterConfig;

    fn identify(&self, file: &SourceFile) -> bool {
        let by_name = reader::match_at_start(&self.settings().filename_pattern, file.base_name())
            .unwrap_or(false);
        by_name && self.deep_identify(file)
    }

    fn deep_identify(&self, file: &SourceFile) -> bool {
        reader::match_at_start(&self.settings().header_identifier, file.head()).unwrap_or(false)
    }

    fn prepare_raw_file(&self, table: Table) -> Table {
        table
    }

    fn prepare_table(&self, table: Table) -> Result<Table> {
        Ok(table)
    }

    fn skip_transaction(&self, _row: &Row) -> bool {
        false
    }

    /// Не более одного баланса на файл; по умолчанию балансов нет.
    fn get_balance_statement(
        &self,
        _file: &SourceFile,
        _rows: &[Row],
    ) -> Result<Box<dyn Iterator<Item = Balance>>> {
        Ok(Box::new(std::iter::empty()))
    }

    fn filing_account(&self) -> &str {
        &self.config().main_account
    }

    /// Дата выписки для раскладки файлов: последняя операция в ней.
    fn file_date(&self, file: &SourceFile) -> Result<Option<NaiveDate>> {
        let rows = reader::read_rows(self, file)?;
        Ok(reader::get_max_transaction_date(&rows))
    }
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, st: &Statement) -> Result<()>;
}
