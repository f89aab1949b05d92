use clap::{Parser, Subcommand, ValueEnum};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use scbimportlib::{
    banking,
    config::ImporterConfig,
    error::{ImportError, Result},
    formats::{beancount::Beancount, csv::Csv},
    importers,
    reader::SourceFile,
    traits::{Importer, WriteFormat},
};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Fmt {
    Beancount,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "scbimport", version, about = "Импорт выписок по карте SCB в Beancount")]
struct Cli {
    /// TOML с настройками импортёра (main_account, account_number, ...)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Показать, какой импортёр узнаёт каждый файл
    Identify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Извлечь проводки и баланс из файла
    Extract {
        file: PathBuf,

        /// Выходной файл (по умолчанию stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        #[arg(long = "format", value_enum, default_value = "beancount")]
        format: Fmt,
    },
}

fn load_config(path: Option<&Path>) -> Result<ImporterConfig> {
    let mut figment = Figment::from(Serialized::defaults(ImporterConfig::default()));
    if let Some(path) = path {
        // Toml::file молча пропускает отсутствующий файл
        if !path.is_file() {
            return Err(ImportError::Config(format!(
                "config file {} not found",
                path.display()
            )));
        }
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Env::prefixed("SCBIMPORT_"))
        .extract()
        .map_err(|e| ImportError::Config(e.to_string()))
}

/// Строка вывода `identify` для одного файла. Ошибки разбора не прерывают
/// проверку остальных файлов: дата выписки тогда печатается как `-`.
fn identify_line(path: &Path, file: &SourceFile, registry: &[Box<dyn Importer>]) -> String {
    let Some(imp) = importers::find_importer(registry, file) else {
        return format!("{}: no importer", path.display());
    };
    let date = match imp.file_date(file) {
        Ok(Some(d)) => d.to_string(),
        Ok(None) => "-".into(),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "cannot read statement date");
            "-".into()
        }
    };
    format!(
        "{}: {} ({}, {})",
        path.display(),
        imp.name(),
        imp.filing_account(),
        date
    )
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "configuration loaded");
    let registry = importers::registry(&config);

    match cli.command {
        Command::Identify { files } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for path in files {
                let line = match SourceFile::from_path(&path) {
                    Ok(file) => identify_line(&path, &file, &registry),
                    Err(e) => {
                        warn!(file = %path.display(), error = %e, "cannot read file");
                        format!("{}: error: {e}", path.display())
                    }
                };
                writeln!(out, "{line}")?;
            }
            Ok(())
        }
        Command::Extract {
            file,
            output,
            format,
        } => {
            let source = SourceFile::from_path(&file)?;
            let importer = importers::find_importer(&registry, &source)
                .ok_or_else(|| ImportError::Unrecognized(file.display().to_string()))?;
            let st = banking::extract(importer, &source)?;
            info!(account = importer.filing_account(), "writing statement");

            // writer
            let mut writer: Box<dyn Write> = match output {
                Some(path) => Box::new(File::create(path)?),
                None => Box::new(io::stdout()),
            };
            match format {
                Fmt::Beancount => Beancount::write(&mut writer, &st),
                Fmt::Csv => Csv::write(&mut writer, &st),
            }?;
            writer.flush().map_err(ImportError::from)
        }
    }
}
