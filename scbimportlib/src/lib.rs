//! scbimportlib — импорт выписок по карте Standard Chartered (CSV) в проводки Beancount

pub mod banking;
pub mod config;
pub mod error;
pub mod importers;
pub mod model;
pub mod reader;
pub mod table;
pub mod traits;

pub mod formats {
    pub mod beancount;
    pub mod csv;
}
