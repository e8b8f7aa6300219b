pub mod classify;
pub mod cli;
pub mod data;
pub mod datetime;
pub mod generator;
pub mod io_utils;
pub mod locale;
pub mod model;
pub mod table;
pub mod time_guess;
pub mod time_unit;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, debug, info, warn};

use crate::cli::{Cli, Commands};

pub use crate::data::{Document, Value};
pub use crate::generator::{ColumnMappingGenerator, INCOMPATIBLE_DATA_TYPES, generate};
pub use crate::locale::{DateOrder, Locale, LocaleError, LocaleServices};
pub use crate::model::{ColumnDescriptor, ColumnPair, DataType, TimeUnit};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("colmap", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Probe(args) => handle_probe(&args),
    }
}

fn handle_probe(args: &cli::ProbeArgs) -> Result<()> {
    let format = io_utils::resolve_input_format(&args.input, args.format);
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Probing '{}' as {:?} with locale '{}'",
        args.input.display(),
        format,
        args.locale
    );
    let text = io_utils::read_input(&args.input, encoding)
        .with_context(|| format!("Reading documents from {:?}", args.input))?;
    let documents = io_utils::parse_documents(&text, format, delimiter, args.sample_rows)
        .with_context(|| format!("Parsing documents from {:?}", args.input))?;
    debug!("Sampled {} document(s)", documents.len());

    let pairs = generate(&documents, &args.locale);
    let flagged = pairs
        .iter()
        .filter(|pair| pair.warning.is_some())
        .map(|pair| pair.name())
        .join(", ");
    if !flagged.is_empty() {
        warn!("Columns with incompatible data types: {flagged}");
    }

    match &args.output {
        Some(path) => {
            let report = io_utils::ProbeReport {
                locale: args.locale.tag(),
                documents: documents.len(),
                columns: &pairs,
            };
            io_utils::write_report(path, &report)
                .with_context(|| format!("Writing column mapping to {path:?}"))?;
            info!(
                "Inferred {} column(s) from {} document(s) written to {:?}",
                pairs.len(),
                documents.len(),
                path
            );
        }
        None => print!("{}", table::render_columns(&pairs)),
    }
    Ok(())
}
