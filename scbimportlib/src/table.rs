//! Табличный конвейер: строки CSV с заголовком, над которыми импортёр
//! выполняет фильтрацию, разбор колонок регулярками и пересчёт значений.
//!
//! Все операции потребляют таблицу и возвращают новую, так что шаги
//! записываются цепочкой: `t.select(..).capture(..)?.cutout(..)`.

use crate::error::{ImportError, Result};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Строка таблицы с доступом к ячейкам по имени колонки.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    header: &'a [String],
    cells: &'a [String],
}

impl<'a> Record<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let idx = self.header.iter().position(|h| h == name)?;
        self.cells.get(idx).map(String::as_str)
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }
}

impl Table {
    /// Короткие строки дополняются пустыми ячейками до ширины заголовка.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = header.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                if r.len() < width {
                    r.resize(width, String::new());
                }
                r
            })
            .collect();
        Self { header, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record {
            header: &self.header,
            cells,
        })
    }

    /// Применяет `f` к каждой ячейке, включая заголовок.
    pub fn convert_all<F: FnMut(&str) -> String>(mut self, mut f: F) -> Self {
        for h in self.header.iter_mut() {
            *h = f(h);
        }
        for row in self.rows.iter_mut() {
            for cell in row.iter_mut() {
                *cell = f(cell);
            }
        }
        self
    }

    pub fn select<F: FnMut(&Record<'_>) -> bool>(self, mut pred: F) -> Self {
        let Table { header, rows } = self;
        let rows = rows
            .into_iter()
            .filter(|cells| pred(&Record { header: &header, cells }))
            .collect();
        Table { header, rows }
    }

    /// Разбивает колонку `field` регуляркой; группы захвата становятся новыми
    /// колонками в конце таблицы. Несовпавшие значения берутся из `fill`,
    /// а без него дают ошибку.
    pub fn capture(
        self,
        field: &str,
        pattern: &str,
        new_fields: &[&str],
        fill: Option<&[&str]>,
        include_original: bool,
    ) -> Result<Self> {
        let idx = self.require_column(field)?;
        let re = Regex::new(pattern)?;
        let Table { mut header, rows } = self;

        let mut out = Vec::with_capacity(rows.len());
        for mut cells in rows {
            let value = cells.get(idx).cloned().unwrap_or_default();
            let parts: Vec<String> = match re.captures(&value) {
                Some(caps) => (1..=new_fields.len())
                    .map(|i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect(),
                None => match fill {
                    Some(fill) => new_fields
                        .iter()
                        .enumerate()
                        .map(|(i, _)| fill.get(i).copied().unwrap_or_default().to_string())
                        .collect(),
                    None => {
                        return Err(ImportError::Capture {
                            field: field.to_string(),
                            value,
                        })
                    }
                },
            };
            if !include_original && idx < cells.len() {
                cells.remove(idx);
            }
            cells.extend(parts);
            out.push(cells);
        }

        if !include_original {
            header.remove(idx);
        }
        header.extend(new_fields.iter().map(|s| s.to_string()));
        Ok(Table { header, rows: out })
    }

    /// Удаляет колонку; отсутствующая колонка не ошибка.
    pub fn cutout(mut self, field: &str) -> Self {
        if let Some(idx) = self.column_index(field) {
            self.header.remove(idx);
            for row in self.rows.iter_mut() {
                if idx < row.len() {
                    row.remove(idx);
                }
            }
        }
        self
    }

    pub fn convert<F>(self, field: &str, mut f: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<String>,
    {
        self.convert_with_row(field, |value, _| f(value))
    }

    /// Как `convert`, но функция видит всю строку (например, соседний признак CR/DR).
    pub fn convert_with_row<F>(mut self, field: &str, mut f: F) -> Result<Self>
    where
        F: FnMut(&str, &Record<'_>) -> Result<String>,
    {
        let idx = self.require_column(field)?;
        for i in 0..self.rows.len() {
            let new_value = {
                let cells = &self.rows[i];
                let rec = Record {
                    header: &self.header,
                    cells,
                };
                f(cells.get(idx).map(String::as_str).unwrap_or(""), &rec)?
            };
            let row = &mut self.rows[i];
            if row.len() <= idx {
                row.resize(idx + 1, String::new());
            }
            row[idx] = new_value;
        }
        Ok(self)
    }

    pub fn add_field<F: FnMut(&Record<'_>) -> String>(mut self, name: &str, mut f: F) -> Self {
        let width = self.header.len();
        let values: Vec<String> = self.records().map(|r| f(&r)).collect();
        for (row, v) in self.rows.iter_mut().zip(values) {
            row.resize(width, String::new());
            row.push(v);
        }
        self.header.push(name.to_string());
        self
    }

    pub fn rename(mut self, map: &[(String, String)]) -> Self {
        for h in self.header.iter_mut() {
            if let Some((_, to)) = map.iter().find(|(from, _)| from == h) {
                *h = to.clone();
            }
        }
        self
    }

    pub fn skip_head(mut self, n: usize) -> Self {
        self.rows.drain(..n.min(self.rows.len()));
        self
    }

    pub fn drop_tail(mut self, n: usize) -> Self {
        let keep = self.rows.len().saturating_sub(n);
        self.rows.truncate(keep);
        self
    }

    pub fn skip_comments(self, prefix: &str) -> Self {
        self.select(|r| {
            !r.cells()
                .first()
                .map(|c| c.starts_with(prefix))
                .unwrap_or(false)
        })
    }
}
