//! # Listing CSV Parser
//!
//! Decodes the `LISTING_STATUS` payload into [`CompanyListing`] values.
//!
//! ## Payload Shape
//! ```text
//! symbol,name,exchange,assetType,ipoDate,delistingDate,status
//! A,Agilent Technologies Inc,NYSE,Stock,1999-11-18,null,Active
//! AA,Alcoa Corp,NYSE,Stock,2016-10-18,null,Active
//! ...
//! ```
//!
//! ## Leniency Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      What fails, what is skipped                        │
//! │                                                                         │
//! │  Header missing / lacks symbol,name,exchange  ──► Err(ParseError)       │
//! │                                                                         │
//! │  Row with wrong column count                  ──► skipped               │
//! │  Row with empty or invalid symbol             ──► skipped               │
//! │  Row with undecodable bytes                   ──► skipped               │
//! │                                                                         │
//! │  Dirty rows from the provider never abort the listing set.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding is lazy: [`ListingRecords`] pulls one row at a time from the
//! underlying reader, so no intermediate row buffer is built.

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::io::Read;

use crate::error::{ParseError, ParseResult};
use crate::types::CompanyListing;
use crate::REQUIRED_COLUMNS;

// =============================================================================
// Parser
// =============================================================================

/// Builder-style entry point for decoding listing payloads.
#[derive(Debug, Clone, Copy)]
pub struct ListingCsvParser {
    delimiter: u8,
}

impl Default for ListingCsvParser {
    fn default() -> Self {
        ListingCsvParser { delimiter: b',' }
    }
}

impl ListingCsvParser {
    /// Creates a parser for comma-separated payloads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads the header row and returns a lazy iterator over the data rows.
    ///
    /// ## Errors
    /// - [`ParseError::MissingHeader`] if the payload is empty
    /// - [`ParseError::MissingColumns`] if `symbol`, `name` or `exchange` is absent
    /// - [`ParseError::HeaderUnreadable`] if the header bytes cannot be decoded
    pub fn parse<R: Read>(&self, reader: R) -> ParseResult<ListingRecords<R>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| ParseError::HeaderUnreadable(e.to_string()))?
            .clone();

        if headers.iter().all(|h| normalize_header(h).is_empty()) {
            return Err(ParseError::MissingHeader);
        }

        let columns = ColumnMap::locate(&headers)?;

        Ok(ListingRecords {
            records: reader.into_records(),
            columns,
            width: headers.len(),
            skipped: 0,
        })
    }
}

// =============================================================================
// Column Mapping
// =============================================================================

/// Positions of the tracked columns within the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    symbol: usize,
    name: usize,
    exchange: usize,
}

impl ColumnMap {
    fn locate(headers: &StringRecord) -> ParseResult<Self> {
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| normalize_header(h).eq_ignore_ascii_case(column))
        };

        let found: Vec<Option<usize>> = REQUIRED_COLUMNS.iter().map(|&c| position(c)).collect();

        match found.as_slice() {
            [Some(symbol), Some(name), Some(exchange)] => Ok(ColumnMap {
                symbol: *symbol,
                name: *name,
                exchange: *exchange,
            }),
            _ => Err(ParseError::MissingColumns {
                missing: REQUIRED_COLUMNS
                    .iter()
                    .zip(&found)
                    .filter(|(_, pos)| pos.is_none())
                    .map(|(column, _)| column.to_string())
                    .collect(),
            }),
        }
    }

    fn listing(&self, record: &StringRecord) -> Option<CompanyListing> {
        CompanyListing::new(
            record.get(self.symbol)?,
            record.get(self.name)?,
            record.get(self.exchange)?,
        )
        .ok()
    }
}

/// Strips a UTF-8 byte order mark and surrounding whitespace.
fn normalize_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

// =============================================================================
// Record Iterator
// =============================================================================

/// Lazy iterator over the well-formed listings of a payload.
pub struct ListingRecords<R> {
    records: StringRecordsIntoIter<R>,
    columns: ColumnMap,
    width: usize,
    skipped: usize,
}

impl<R> ListingRecords<R> {
    /// Number of rows skipped so far because they were malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: Read> Iterator for ListingRecords<R> {
    type Item = CompanyListing;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                // The reader cannot make progress after an I/O failure.
                Err(e) if e.is_io_error() => return None,
                Err(_) => {
                    self.skipped += 1;
                    continue;
                }
            };

            if record.len() != self.width {
                self.skipped += 1;
                continue;
            }

            match self.columns.listing(&record) {
                Some(listing) => return Some(listing),
                None => self.skipped += 1,
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(payload: &str) -> Vec<CompanyListing> {
        ListingCsvParser::new()
            .parse(payload.as_bytes())
            .unwrap()
            .collect()
    }

    #[test]
    fn test_parses_upstream_payload() {
        let payload = "\
symbol,name,exchange,assetType,ipoDate,delistingDate,status
A,Agilent Technologies Inc,NYSE,Stock,1999-11-18,null,Active
AA,Alcoa Corp,NYSE,Stock,2016-10-18,null,Active
";
        let listings = parse_all(payload);

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].symbol(), "A");
        assert_eq!(listings[0].name(), "Agilent Technologies Inc");
        assert_eq!(listings[1].exchange(), "NYSE");
    }

    #[test]
    fn test_skips_row_missing_a_column() {
        let payload = "\
symbol,name,exchange
AAPL,Apple Inc,NASDAQ
MSFT,Microsoft Corp
";
        let mut records = ListingCsvParser::new().parse(payload.as_bytes()).unwrap();
        let listings: Vec<_> = records.by_ref().collect();

        assert_eq!(listings, vec![CompanyListing::new("AAPL", "Apple Inc", "NASDAQ").unwrap()]);
        assert_eq!(records.skipped(), 1);
    }

    #[test]
    fn test_skips_row_with_empty_symbol() {
        let payload = "symbol,name,exchange\n,Ghost Corp,NYSE\nIBM,International Business Machines,NYSE\n";
        let listings = parse_all(payload);

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].symbol(), "IBM");
    }

    #[test]
    fn test_skips_overlong_or_spaced_symbol() {
        let overlong = "X".repeat(33);
        let payload = format!(
            "symbol,name,exchange\nAB CD,Spaced Corp,NYSE\n{overlong},Long Corp,NYSE\nGE,General Electric,NYSE\n"
        );
        let mut records = ListingCsvParser::new().parse(payload.as_bytes()).unwrap();
        let listings: Vec<_> = records.by_ref().collect();

        assert_eq!(listings, vec![CompanyListing::new("GE", "General Electric", "NYSE").unwrap()]);
        assert_eq!(records.skipped(), 2);
    }

    #[test]
    fn test_header_columns_in_any_order_and_case() {
        let payload = "\u{feff}Exchange, Symbol ,NAME\nNASDAQ,AAPL,Apple Inc\n";
        let listings = parse_all(payload);

        assert_eq!(listings, vec![CompanyListing::new("AAPL", "Apple Inc", "NASDAQ").unwrap()]);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let payload = "symbol,name,exchange\nBRK-A,\"Berkshire Hathaway, Inc\",NYSE\n";
        let listings = parse_all(payload);

        assert_eq!(listings[0].name(), "Berkshire Hathaway, Inc");
    }

    #[test]
    fn test_missing_columns_fail_the_parse() {
        let err = ListingCsvParser::new()
            .parse("symbol,name\nAAPL,Apple Inc\n".as_bytes())
            .err()
            .unwrap();

        assert_eq!(
            err,
            ParseError::MissingColumns {
                missing: vec!["exchange".to_string()]
            }
        );
    }

    #[test]
    fn test_json_notice_is_not_a_header() {
        let payload = "{\n    \"Information\": \"Invalid API call.\"\n}";
        let err = ListingCsvParser::new().parse(payload.as_bytes()).err().unwrap();

        assert!(matches!(err, ParseError::MissingColumns { .. }));
    }

    #[test]
    fn test_empty_payload_has_no_header() {
        let err = ListingCsvParser::new().parse("".as_bytes()).err().unwrap();
        assert_eq!(err, ParseError::MissingHeader);
    }

    #[test]
    fn test_records_are_pulled_lazily() {
        let payload = "symbol,name,exchange\nA,One,NYSE\nB,Two,NYSE\nC,Three,NYSE\n";
        let mut records = ListingCsvParser::new().parse(payload.as_bytes()).unwrap();

        assert_eq!(records.next().map(|l| l.symbol().to_string()), Some("A".to_string()));
        assert_eq!(records.count(), 2);
    }

    #[test]
    fn test_custom_delimiter() {
        let payload = "symbol;name;exchange\nSAP;SAP SE;XETRA\n";
        let listings: Vec<_> = ListingCsvParser::new()
            .with_delimiter(b';')
            .parse(payload.as_bytes())
            .unwrap()
            .collect();

        assert_eq!(listings[0].exchange(), "XETRA");
    }
}
