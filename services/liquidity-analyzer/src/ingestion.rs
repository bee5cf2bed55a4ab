//! Snapshot log ingestion
//!
//! Reads a line-oriented snapshot log (one JSON object per line) and decodes
//! each record into an `ExchangeSnapshot`, lazily, one line at a time.
//!
//! Record layout:
//!
//! ```json
//! {"timestamp": 1650000000.25, "exchange": "EX1",
//!  "bids": [["100.5", "2.0"], ...], "asks": [["100.6", "1.5"], ...]}
//! ```
//!
//! Level elements may be decimal strings or JSON numbers; elements past the
//! first two (e.g. order counts) are ignored. Blank lines are skipped.
//! Malformed records are either returned as errors or, with
//! `skip_invalid`, logged and counted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};
use types::book::SideSnapshot;
use types::errors::BookError;
use types::ids::ExchangeId;
use types::snapshot::ExchangeSnapshot;

use crate::error::{AnalyzerError, Result};

/// A level element as it appears on the wire.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Text(String),
    Number(serde_json::Number),
}

impl RawNumber {
    fn as_text(&self) -> String {
        match self {
            RawNumber::Text(s) => s.clone(),
            RawNumber::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    timestamp: f64,
    exchange: String,
    bids: Vec<Vec<RawNumber>>,
    asks: Vec<Vec<RawNumber>>,
}

fn decode_side(raw: &[Vec<RawNumber>]) -> std::result::Result<SideSnapshot, BookError> {
    let pairs = raw
        .iter()
        .enumerate()
        .map(|(index, level)| match level.as_slice() {
            [price, quantity, ..] => Ok((price.as_text(), quantity.as_text())),
            _ => Err(BookError::MalformedLevel {
                index,
                reason: format!("expected [price, quantity], got {} element(s)", level.len()),
            }),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    SideSnapshot::parse(pairs.iter().map(|(p, q)| (p.as_str(), q.as_str())))
}

/// Decode one log line into a snapshot.
///
/// `line_no` is 1-based and only used for error context.
pub fn decode_line(line: &str, line_no: u64) -> Result<ExchangeSnapshot> {
    let raw: RawRecord = serde_json::from_str(line).map_err(|source| AnalyzerError::Decode {
        line: line_no,
        source,
    })?;

    let book_err = |source: BookError| AnalyzerError::Book {
        line: line_no,
        source,
    };

    let exchange = ExchangeId::try_new(raw.exchange).map_err(book_err)?;
    let bids = decode_side(&raw.bids).map_err(book_err)?;
    let asks = decode_side(&raw.asks).map_err(book_err)?;

    ExchangeSnapshot::new(raw.timestamp, exchange, bids, asks).map_err(book_err)
}

/// Counters collected while reading a log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Physical lines consumed, blank ones included.
    pub lines_read: u64,
    /// Records successfully decoded and yielded.
    pub records_decoded: u64,
    /// Malformed records skipped (only with `skip_invalid`).
    pub records_skipped: u64,
    /// Blank lines ignored.
    pub blank_lines: u64,
}

/// Lazy snapshot iterator over a line-oriented log.
///
/// Owns its underlying reader; the file handle is released when the
/// reader is dropped, including when iteration stops early.
pub struct SnapshotReader<R> {
    reader: R,
    buf: String,
    skip_invalid: bool,
    stats: ReaderStats,
    finished: bool,
}

impl SnapshotReader<BufReader<File>> {
    /// Open a snapshot log file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AnalyzerError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "Opened snapshot log");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> SnapshotReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            skip_invalid: false,
            stats: ReaderStats::default(),
            finished: false,
        }
    }

    /// Skip malformed records with a warning instead of yielding an error.
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }
}

impl<R: BufRead> Iterator for SnapshotReader<R> {
    type Item = Result<ExchangeSnapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => {
                    self.finished = true;
                    debug!(
                        lines_read = self.stats.lines_read,
                        records_decoded = self.stats.records_decoded,
                        records_skipped = self.stats.records_skipped,
                        "Reached end of snapshot log"
                    );
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(AnalyzerError::Io(e)));
                }
            }

            self.stats.lines_read += 1;
            let line = self.buf.trim();
            if line.is_empty() {
                self.stats.blank_lines += 1;
                continue;
            }

            match decode_line(line, self.stats.lines_read) {
                Ok(snapshot) => {
                    self.stats.records_decoded += 1;
                    return Some(Ok(snapshot));
                }
                Err(err) if self.skip_invalid => {
                    self.stats.records_skipped += 1;
                    warn!(line = self.stats.lines_read, error = %err, "Skipping malformed record");
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::{Cursor, Write};
    use std::str::FromStr;
    use types::book::BookSide;

    const LINE: &str = r#"{"timestamp": 1650000000.5, "exchange": "EX1", "bids": [["100.5", "2"], ["100.4", "1"]], "asks": [["100.6", "3"]]}"#;

    #[test]
    fn test_decode_line() {
        let snap = decode_line(LINE, 1).unwrap();
        assert_eq!(snap.timestamp, 1650000000.5);
        assert_eq!(snap.exchange.as_str(), "EX1");
        assert_eq!(snap.bids.len(), 2);
        assert_eq!(
            snap.side(BookSide::Bids).best().unwrap().price,
            Decimal::from_str("100.5").unwrap()
        );
        assert_eq!(snap.asks.levels()[0].quantity, Decimal::from(3));
    }

    #[test]
    fn test_decode_numeric_levels_and_extra_fields() {
        let line = r#"{"timestamp": 10, "exchange": "EX2", "bids": [[99.5, 0.25, 4]], "asks": []}"#;
        let snap = decode_line(line, 1).unwrap();
        assert_eq!(snap.timestamp, 10.0);
        assert_eq!(snap.bids.levels()[0].price, Decimal::from_str("99.5").unwrap());
        assert_eq!(snap.bids.levels()[0].quantity, Decimal::from_str("0.25").unwrap());
        assert!(snap.asks.is_empty());
    }

    #[test]
    fn test_decode_rejects_non_numeric_price() {
        let line = r#"{"timestamp": 1, "exchange": "EX1", "bids": [["abc", "1"]], "asks": []}"#;
        let err = decode_line(line, 7).unwrap_err();
        match err {
            AnalyzerError::Book { line, source } => {
                assert_eq!(line, 7);
                assert!(matches!(source, BookError::MalformedLevel { index: 0, .. }));
            }
            other => panic!("Expected Book error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_short_level() {
        let line = r#"{"timestamp": 1, "exchange": "EX1", "bids": [], "asks": [["1"]]}"#;
        assert!(matches!(
            decode_line(line, 1),
            Err(AnalyzerError::Book { source: BookError::MalformedLevel { .. }, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_json_and_missing_fields() {
        assert!(matches!(decode_line("{not json", 3), Err(AnalyzerError::Decode { line: 3, .. })));
        assert!(matches!(
            decode_line(r#"{"timestamp": 1, "exchange": "EX1", "bids": []}"#, 4),
            Err(AnalyzerError::Decode { line: 4, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_overflowing_level() {
        let line = r#"{"timestamp": 1, "exchange": "EX1", "bids": [["1e20", "1e10"], ["1", "1"]], "asks": []}"#;
        match decode_line(line, 5).unwrap_err() {
            AnalyzerError::Book { line, source } => {
                assert_eq!(line, 5);
                assert!(matches!(source, BookError::MalformedLevel { index: 0, .. }));
            }
            other => panic!("Expected Book error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_blank_exchange() {
        let line = r#"{"timestamp": 1, "exchange": " ", "bids": [], "asks": []}"#;
        assert!(matches!(
            decode_line(line, 1),
            Err(AnalyzerError::Book { source: BookError::EmptyExchange, .. })
        ));
    }

    #[test]
    fn test_reader_yields_records_and_skips_blank_lines() {
        let input = format!("{LINE}\n\n{LINE}\n");
        let mut reader = SnapshotReader::new(Cursor::new(input));

        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());

        let stats = reader.stats();
        assert_eq!(stats.lines_read, 3);
        assert_eq!(stats.records_decoded, 2);
        assert_eq!(stats.blank_lines, 1);
    }

    #[test]
    fn test_reader_handles_missing_trailing_newline() {
        let mut reader = SnapshotReader::new(Cursor::new(LINE.to_string()));
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_reader_surfaces_errors_with_line_numbers() {
        let input = format!("{LINE}\ngarbage\n{LINE}\n");
        let results: Vec<_> = SnapshotReader::new(Cursor::new(input)).collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[1].as_ref().unwrap_err().line(), Some(2));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_reader_skip_invalid() {
        let input = format!("{LINE}\ngarbage\n{LINE}\n");
        let mut reader = SnapshotReader::new(Cursor::new(input)).skip_invalid(true);
        let decoded: Vec<_> = reader.by_ref().collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(reader.stats().records_skipped, 1);
    }

    #[test]
    fn test_reader_is_lazy() {
        // The second line is never decoded if iteration stops after one record.
        let input = format!("{LINE}\ngarbage\n");
        let mut reader = SnapshotReader::new(Cursor::new(input));
        assert!(reader.next().unwrap().is_ok());
        assert_eq!(reader.stats().lines_read, 1);
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{LINE}").unwrap();
        let reader = SnapshotReader::open(file.path()).unwrap();
        assert_eq!(reader.count(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            SnapshotReader::open("/nonexistent/orderbook.log"),
            Err(AnalyzerError::Open { .. })
        ));
    }
}
