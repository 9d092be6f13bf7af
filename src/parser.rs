//! CSV decoding for the raw survey extract.
//!
//! The GSS extract is published as Windows-1252 text, optionally gzipped.
//! Everything here stays untyped: a [`RawTable`] is just headers and cells.

use std::io::Read;

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::{PipelineError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Windows-1252 code points for bytes 0x80..=0x9F. Undefined slots map to
/// the matching C1 control, as most decoders do.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Header plus string rows, exactly as read from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of `name` in the header row, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `col`); short rows read as absent.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Inflates `bytes` when they carry the gzip magic number.
pub fn maybe_decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes.to_vec());
    }

    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    debug!(compressed = bytes.len(), inflated = out.len(), "Decompressed gzip source");
    Ok(out)
}

/// Decodes UTF-8 when valid, otherwise Windows-1252.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("Source is not UTF-8, decoding as Windows-1252");
            bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
                    _ => b as char,
                })
                .collect()
        }
    }
}

/// Parses raw source bytes into a [`RawTable`].
///
/// # Errors
///
/// Returns [`PipelineError::Schema`] when there is no header row and
/// [`PipelineError::Csv`] when the CSV stream itself is malformed.
pub fn parse_table(bytes: &[u8]) -> Result<RawTable> {
    let inflated = maybe_decompress(bytes)?;
    let text = decode_text(&inflated);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(PipelineError::Schema("source has no header row".into()));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    debug!(columns = headers.len(), rows = rows.len(), "Parsed source table");
    Ok(RawTable { headers, rows })
}
