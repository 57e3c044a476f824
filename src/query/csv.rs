//! Delimited-text parsing for query result artifacts.
//!
//! Athena writes results as comma-separated text with every field wrapped in
//! double quotes. The parser follows RFC 4180 so it also copes with values
//! that contain the delimiter, quotes, or line breaks:
//!
//! - fields are separated by `,` and records by `\n`, `\r\n` or `\r`
//! - a field that starts with `"` is quoted; inside it `""` is a literal quote
//!   and delimiters and line breaks are part of the value
//! - a closing quote must be followed by a delimiter, a line break or the end
//!   of the input
//! - a quote anywhere else in an unquoted field is an ordinary character
//! - blank lines, including trailing ones, are skipped
//!
//! The first record is the header. Every later record must have exactly as
//! many fields as the header; anything else is reported as a parse error
//! rather than padded or truncated.

use super::types::{ResultSet, Row};
use crate::error::{DashboardError, Result};

/// Field separator.
pub const DELIMITER: char = ',';

const QUOTE: char = '"';

/// Byte-order mark some writers put in front of UTF-8 text.
const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing consumed for the current field yet.
    FieldStart,
    /// Inside a field that did not start with a quote.
    Unquoted,
    /// Inside a quoted field.
    Quoted,
    /// Just saw a quote inside a quoted field: either an escape or the close.
    QuoteInQuoted,
}

/// Parses raw result bytes into a result set.
pub fn parse_result_bytes(data: &[u8]) -> Result<ResultSet> {
    let text = std::str::from_utf8(data)
        .map_err(|e| DashboardError::parse(format!("result is not valid UTF-8: {e}")))?;
    parse_result_text(text)
}

/// Parses result text into a header and rows.
pub fn parse_result_text(text: &str) -> Result<ResultSet> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut records = parse_records(text)?.into_iter();

    let header = records
        .next()
        .ok_or_else(|| DashboardError::parse("result is empty: no header line"))?;

    let rows = records
        .enumerate()
        .map(|(i, row)| {
            if row.len() == header.len() {
                Ok(row)
            } else {
                // Header is record 1.
                Err(DashboardError::parse(format!(
                    "record {} has {} fields, expected {} to match the header",
                    i + 2,
                    row.len(),
                    header.len()
                )))
            }
        })
        .collect::<Result<Vec<Row>>>()?;

    Ok(ResultSet::with_data(header, rows))
}

/// Splits text into records of unquoted field values.
fn parse_records(text: &str) -> Result<Vec<Row>> {
    let mut records = Vec::new();
    let mut record: Row = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut record_started = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if state == State::Quoted {
            if c == QUOTE {
                state = State::QuoteInQuoted;
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if !record_started {
                    continue;
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                state = State::FieldStart;
                record_started = false;
            }
            DELIMITER => {
                record.push(std::mem::take(&mut field));
                state = State::FieldStart;
                record_started = true;
            }
            QUOTE if state == State::FieldStart => {
                state = State::Quoted;
                record_started = true;
            }
            QUOTE if state == State::QuoteInQuoted => {
                field.push(QUOTE);
                state = State::Quoted;
            }
            _ if state == State::QuoteInQuoted => {
                return Err(DashboardError::parse(format!(
                    "unexpected character after closing quote in record {}",
                    records.len() + 1
                )));
            }
            _ => {
                field.push(c);
                state = State::Unquoted;
                record_started = true;
            }
        }
    }

    if state == State::Quoted {
        return Err(DashboardError::parse(format!(
            "unterminated quoted field in record {}",
            records.len() + 1
        )));
    }

    if record_started {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}
