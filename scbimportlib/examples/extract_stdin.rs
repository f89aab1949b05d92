use scbimportlib::{
    banking,
    config::ImporterConfig,
    formats::beancount::Beancount,
    importers::scbcard::ScbCard,
    reader::SourceFile,
    traits::WriteFormat,
};
use std::io::Read;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: выписка SCB из stdin -> Beancount в stdout
    let mut contents = String::new();
    std::io::stdin().read_to_string(&mut contents)?;
    let importer = ScbCard::new(ImporterConfig::default());
    let st = banking::extract(&importer, &SourceFile::new("stdin", contents))?;
    Beancount::write(std::io::stdout(), &st)?;
    Ok(())
}
