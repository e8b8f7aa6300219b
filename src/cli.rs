use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::locale::Locale;

#[derive(Debug, Parser)]
#[command(author, version, about = "Infer column schemas from document samples", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sample a JSON, NDJSON or CSV file and infer a column mapping per field
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input file to sample ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Write the column mapping as YAML (.yml/.yaml) or JSON instead of printing a table
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Input format (detected from the file extension when 'auto')
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,
    /// Locale governing number and date parsing, e.g. en-US or de-DE
    #[arg(long, default_value = "en-US", value_parser = parse_locale)]
    pub locale: Locale,
    /// Number of documents to sample (0 means all)
    #[arg(long, default_value_t = 1000)]
    pub sample_rows: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum InputFormat {
    Auto,
    Json,
    Ndjson,
    Csv,
}

pub fn parse_locale(value: &str) -> Result<Locale, String> {
    value.parse::<Locale>().map_err(|err| err.to_string())
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
