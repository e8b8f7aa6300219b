//! Input loading and result writing for the command-line front end.
//!
//! - **Input formats**: JSON (an array of objects or one object), NDJSON (one
//!   object per line) and CSV/TSV (every row becomes a document of strings).
//!   `auto` picks the format from the file extension.
//! - **Encoding**: input bytes are decoded with `encoding_rs`, defaulting to
//!   UTF-8.
//! - **stdin**: the `-` path convention reads standard input.

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::{cli::InputFormat, data::Document, model::ColumnPair};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

pub fn resolve_input_format(path: &Path, provided: InputFormat) -> InputFormat {
    if provided != InputFormat::Auto {
        return provided;
    }
    match extension(path).as_deref() {
        Some("ndjson" | "jsonl") => InputFormat::Ndjson,
        Some("csv" | "tsv") => InputFormat::Csv,
        _ => InputFormat::Json,
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match extension(path).as_deref() {
        Some("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn read_input(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let mut bytes = Vec::new();
    if is_dash(path) {
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("Reading documents from stdin")?;
    } else {
        File::open(path)
            .with_context(|| format!("Opening input file {path:?}"))?
            .read_to_end(&mut bytes)
            .with_context(|| format!("Reading input file {path:?}"))?;
    }
    decode_bytes(&bytes, encoding)
}

/// Parses up to `sample_rows` documents (`0` means all) from decoded text.
pub fn parse_documents(
    text: &str,
    format: InputFormat,
    delimiter: u8,
    sample_rows: usize,
) -> Result<Vec<Document>> {
    let limit = if sample_rows == 0 {
        usize::MAX
    } else {
        sample_rows
    };
    match format {
        InputFormat::Json | InputFormat::Auto => parse_json(text, limit),
        InputFormat::Ndjson => parse_ndjson(text, limit),
        InputFormat::Csv => parse_csv(text, delimiter, limit),
    }
}

fn parse_json(text: &str, limit: usize) -> Result<Vec<Document>> {
    let value: serde_json::Value = serde_json::from_str(text).context("Parsing JSON input")?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(idx, item)| match item {
                serde_json::Value::Object(map) => Ok(Document::from(map)),
                other => Err(anyhow!(
                    "Element {idx} of the JSON array is not an object (found {})",
                    json_kind(&other)
                )),
            })
            .collect(),
        serde_json::Value::Object(map) => Ok(vec![Document::from(map)]),
        other => bail!(
            "JSON input must be an array of objects or an object, found {}",
            json_kind(&other)
        ),
    }
}

fn parse_ndjson(text: &str, limit: usize) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if documents.len() >= limit {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(trimmed)
            .with_context(|| format!("Parsing NDJSON line {}", idx + 1))?;
        match value {
            serde_json::Value::Object(map) => documents.push(Document::from(map)),
            other => bail!(
                "NDJSON line {} is not an object (found {})",
                idx + 1,
                json_kind(&other)
            ),
        }
    }
    Ok(documents)
}

fn parse_csv(text: &str, delimiter: u8, limit: usize) -> Result<Vec<Document>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .context("Reading CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();
    let mut documents = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        if documents.len() >= limit {
            break;
        }
        let record = record.with_context(|| format!("Reading CSV row {}", idx + 1))?;
        let document = headers
            .iter()
            .zip(record.iter())
            .map(|(name, field)| (name.clone(), field.to_string()))
            .collect::<Document>();
        documents.push(document);
    }
    Ok(documents)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[derive(Debug, Serialize)]
pub struct ProbeReport<'a> {
    pub locale: &'a str,
    pub documents: usize,
    pub columns: &'a [ColumnPair],
}

/// Serializes `report` as YAML for `.yml`/`.yaml` paths and JSON otherwise.
pub fn write_report(path: &Path, report: &ProbeReport<'_>) -> Result<()> {
    let yaml = matches!(extension(path).as_deref(), Some("yml" | "yaml"));
    let mut writer: Box<dyn Write> = if is_dash(path) {
        Box::new(io::stdout().lock())
    } else {
        Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Creating output file {path:?}"))?,
        ))
    };
    if yaml {
        serde_yaml::to_writer(&mut writer, report).context("Writing column mapping YAML")?;
    } else {
        serde_json::to_writer_pretty(&mut writer, report).context("Writing column mapping JSON")?;
        writeln!(writer)?;
    }
    writer.flush().context("Flushing column mapping output")
}
