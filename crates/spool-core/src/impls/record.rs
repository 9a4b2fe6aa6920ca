//! Line records for the flat-file store.
//!
//! A record is a row of fields separated by `,` and ended by `\n`. A field
//! containing the delimiter, a quote, CR or LF is wrapped in `"` with every
//! embedded quote doubled, so a payload spanning several lines still reads
//! back as one record.

use std::io::{self, Write};
use std::ops::Range;

use thiserror::Error;

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// One parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Line (1-based) the record starts on.
    pub line: usize,
    /// Byte range of the record in the parsed text, terminator excluded.
    pub span: Range<usize>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub reason: &'static str,
}

/// Render one record, terminator included.
pub fn format_row(fields: &[&str]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        push_field(&mut line, field);
    }
    line.push('\n');
    line
}

/// Write one record with a single `write_all`.
pub fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> io::Result<()> {
    out.write_all(format_row(fields).as_bytes())
}

fn push_field(line: &mut String, field: &str) {
    let needs_quotes = field.contains(|c| matches!(c, DELIMITER | QUOTE | '\n' | '\r'));
    if !needs_quotes {
        line.push_str(field);
        return;
    }
    line.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            line.push(QUOTE);
        }
        line.push(c);
    }
    line.push(QUOTE);
}

/// Parse every record in `text`. Blank lines carry no record and are skipped.
pub fn parse_rows(text: &str) -> Result<Vec<Row>, ParseError> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    // `quoted`: the current field opened with a quote.
    // `in_quotes`: we are between that quote and its closing quote.
    let mut quoted = false;
    let mut in_quotes = false;
    let mut start = 0;
    let mut start_line = 1;
    let mut line = 1;
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if in_quotes {
            match c {
                QUOTE if chars.peek().is_some_and(|&(_, next)| next == QUOTE) => {
                    chars.next();
                    field.push(QUOTE);
                }
                QUOTE => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            QUOTE if field.is_empty() && !quoted => {
                quoted = true;
                in_quotes = true;
            }
            QUOTE => {
                return Err(ParseError {
                    line,
                    reason: "unexpected quote inside an unquoted field",
                });
            }
            DELIMITER => {
                fields.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
                    chars.next();
                }
                if !fields.is_empty() || !field.is_empty() || quoted {
                    fields.push(std::mem::take(&mut field));
                    rows.push(Row {
                        line: start_line,
                        span: start..offset,
                        fields: std::mem::take(&mut fields),
                    });
                }
                quoted = false;
                line += 1;
                start = chars.peek().map_or(text.len(), |&(next, _)| next);
                start_line = line;
            }
            _ if quoted => {
                return Err(ParseError {
                    line,
                    reason: "unexpected character after a closing quote",
                });
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ParseError {
            line: start_line,
            reason: "unterminated quoted field",
        });
    }
    if !fields.is_empty() || !field.is_empty() || quoted {
        fields.push(field);
        rows.push(Row {
            line: start_line,
            span: start..text.len(),
            fields,
        });
    }
    Ok(rows)
}
