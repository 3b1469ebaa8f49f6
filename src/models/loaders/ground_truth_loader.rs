use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::GroundTruthError;
use crate::models::benchmark::BenchmarkCase;

const DELIMITER: char = ',';
const COLUMNS: usize = 5;

/// Streams the ground-truth table into benchmark cases
///
/// The first line is a header and is skipped, as are blank lines. Columns are
/// `artworkId, title, artistName, referenceImagePath, queryImagePath`; extra
/// columns are ignored.
pub async fn load_benchmark_cases(path: &Path) -> Result<Vec<BenchmarkCase>, GroundTruthError> {
    let io_error = |source| GroundTruthError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).await.map_err(io_error)?;
    let mut lines = BufReader::new(file).lines();
    let mut cases = Vec::new();
    let mut line_number = 0;
    let mut pending: Option<RecordReader> = None;

    while let Some(line) = lines.next_line().await.map_err(io_error)? {
        line_number += 1;

        let mut record = match pending.take() {
            // a quoted field runs on into this line
            Some(mut record) => {
                record.field.push('\n');
                record
            }
            None if line_number == 1 || line.trim().is_empty() => continue,
            None => RecordReader::new(line_number),
        };

        record.feed(&line);
        if record.in_quotes {
            pending = Some(record);
            continue;
        }

        let first_line = record.first_line;
        let fields = record.finish();
        if fields.len() < COLUMNS {
            return Err(GroundTruthError::MissingColumns {
                line: first_line,
                expected: COLUMNS,
                found: fields.len(),
            });
        }

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        cases.push(BenchmarkCase {
            artwork_id: next(),
            title: next(),
            artist_name: next(),
            reference_image_path: next(),
            query_image_path: next(),
        });
    }

    if let Some(record) = pending {
        return Err(GroundTruthError::UnterminatedQuote {
            line: record.first_line,
        });
    }

    tracing::debug!("loaded {} benchmark case(s) from {}", cases.len(), path.display());
    Ok(cases)
}

/// One delimited record, possibly spread over several physical lines
///
/// Fields may be double-quoted with `""` escapes; a quoted field may hold
/// delimiters and line breaks.
struct RecordReader {
    first_line: usize,
    fields: Vec<String>,
    field: String,
    in_quotes: bool,
    quoted: bool,
}

impl RecordReader {
    fn new(first_line: usize) -> Self {
        Self {
            first_line,
            fields: Vec::new(),
            field: String::new(),
            in_quotes: false,
            quoted: false,
        }
    }

    fn feed(&mut self, line: &str) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '"' if self.in_quotes => {
                    if chars.peek() == Some(&'"') {
                        self.field.push('"');
                        chars.next();
                    } else {
                        self.in_quotes = false;
                    }
                }
                '"' if self.field.is_empty() && !self.quoted => {
                    self.in_quotes = true;
                    self.quoted = true;
                }
                c if c == DELIMITER && !self.in_quotes => {
                    self.fields.push(std::mem::take(&mut self.field));
                    self.quoted = false;
                }
                c => self.field.push(c),
            }
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.fields.push(self.field);
        self.fields
    }
}
