//! Импортёры конкретных банков.

pub mod scbcard;

use crate::{config::ImporterConfig, reader::SourceFile, traits::Importer};

/// Все известные импортёры с общей конфигурацией.
pub fn registry(config: &ImporterConfig) -> Vec<Box<dyn Importer>> {
    vec![Box::new(scbcard::ScbCard::new(config.clone()))]
}

/// Первый импортёр, который узнаёт файл.
pub fn find_importer<'a>(
    importers: &'a [Box<dyn Importer>],
    file: &SourceFile,
) -> Option<&'a dyn Importer> {
    importers.iter().map(|i| i.as_ref()).find(|i| i.identify(file))
}
