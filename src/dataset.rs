//! Survey point CSV loading
//!
//! Expected header: `Название, Север, Восток, Отметка, Код` (name, north,
//! east, elevation, note). Rows whose coordinates do not parse are skipped
//! with a warning.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};

use crate::error::Result;
use crate::types::{PlanarPoint, Record};

const NAME: &str = "Название";
const NORTH: &str = "Север";
const EAST: &str = "Восток";
const ELEVATION: &str = "Отметка";
const NOTE: &str = "Код";

const EXPECTED_HEADERS: [&str; 5] = [NAME, NORTH, EAST, ELEVATION, NOTE];

/// Loads records from a CSV file
pub fn load_records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let file = File::open(path.as_ref())?;
    load_records(file)
}

/// Loads records from any CSV source
pub fn load_records<R: Read>(mut reader: R) -> Result<Vec<Record>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_records(&String::from_utf8_lossy(&bytes))
}

/// Parses CSV text into records.
///
/// Blank lines before the header are dropped, so the header is line 1.
/// Record ids use the physical line number, counting interior blank lines.
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    let text = skip_leading_blank_lines(text.trim_start_matches('\u{feff}'));
    let header_line = text.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(header_line);

    let mut csv_reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = csv_reader.headers()?.clone();
    if !EXPECTED_HEADERS.iter().all(|h| headers.iter().any(|found| found == *h)) {
        warn!("Unexpected CSV headers: {:?}", headers.iter().collect::<Vec<_>>());
    }

    let column = |name: &str| headers.iter().position(|h| h == name);
    let columns = Columns {
        name: column(NAME),
        north: column(NORTH),
        east: column(EAST),
        elevation: column(ELEVATION),
        note: column(NOTE),
    };

    let mut records = Vec::new();
    let mut lines = LineCounter::new(text);
    for row in csv_reader.records() {
        let row = row?;
        let line = lines.line_at(row.position().map(|p| p.byte() as usize).unwrap_or(0));

        let north = columns.field(&row, columns.north);
        let east = columns.field(&row, columns.east);
        let (x, y) = match (parse_number(north), parse_number(east)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                warn!("Line {}: skipped, invalid coordinates ({:?}, {:?})", line, north, east);
                continue;
            }
        };

        records.push(Record {
            id: format!("rp_{}", line),
            name: columns.field(&row, columns.name).to_string(),
            planar: PlanarPoint::new(x, y),
            elevation: parse_number(columns.field(&row, columns.elevation)),
            note: columns.field(&row, columns.note).to_string(),
        });
    }

    info!("Loaded {} records", records.len());
    Ok(records)
}

/// Maps byte offsets of successive records to 1-based physical line numbers
struct LineCounter<'a> {
    text: &'a str,
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, offset: 0, line: 1 }
    }

    /// Line on which the record reported at `byte` starts. The csv reader
    /// may report the offset of blank lines preceding the record, so line
    /// terminators are skipped first. Offsets must not decrease between calls.
    fn line_at(&mut self, byte: usize) -> u64 {
        let bytes = self.text.as_bytes();
        let mut byte = byte.min(bytes.len()).max(self.offset);
        while byte < bytes.len() && (bytes[byte] == b'\n' || bytes[byte] == b'\r') {
            byte += 1;
        }
        let newlines = self.text.as_bytes()[self.offset..byte].iter().filter(|&&b| b == b'\n').count();
        self.line += newlines as u64;
        self.offset = byte;
        self.line
    }
}

fn skip_leading_blank_lines(text: &str) -> &str {
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    &text[start..]
}

struct Columns {
    name: Option<usize>,
    north: Option<usize>,
    east: Option<usize>,
    elevation: Option<usize>,
    note: Option<usize>,
}

impl Columns {
    fn field<'a>(&self, row: &'a StringRecord, index: Option<usize>) -> &'a str {
        index.and_then(|i| row.get(i)).unwrap_or("")
    }
}

/// Semicolon when it outnumbers commas in the header, comma otherwise
fn detect_delimiter(header: &str) -> u8 {
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Parses a number that may use a decimal comma
fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.replacen(',', ".", 1).parse::<f64>().ok().filter(|v| v.is_finite())
}
