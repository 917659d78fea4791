//! Hit-level records: the tab-delimited lines of an analytics export and the
//! typed view the attribution engine reads from them.

use serde::Serialize;
use thiserror::Error;

/// Column positions inside a data line.
pub mod columns {
    pub const TIMESTAMP: usize = 0;
    pub const VISITOR_ID: usize = 3;
    pub const EVENT_CODE: usize = 4;
    pub const PRODUCT_LIST: usize = 10;
}

/// Data lines shorter than this cannot carry a referrer after the product list.
pub const MIN_COLUMNS: usize = 12;

const DELIMITER: char = '\t';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HitShapeError {
    #[error("line {line}: expected at least {expected} columns, found {found}")]
    TooFewColumns {
        line: usize,
        found: usize,
        expected: usize,
    },
}

/// One raw data line, kept verbatim so it can be reported if it is diverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitRecord {
    /// 1-based line number in the source body.
    pub line: usize,
    pub columns: Vec<String>,
}

impl HitRecord {
    pub fn new(line: usize, columns: Vec<String>) -> Self {
        Self { line, columns }
    }

    pub fn from_line(line: usize, text: &str) -> Self {
        let columns = text.split(DELIMITER).map(str::to_string).collect();
        Self { line, columns }
    }

    /// The record re-joined into its tab-delimited line.
    pub fn raw(&self) -> String {
        self.columns.join("\t")
    }
}

/// Typed view of the columns the attribution engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    pub timestamp: &'a str,
    pub visitor_id: &'a str,
    pub event_code: &'a str,
    pub product_list: &'a str,
    pub referrer_url: &'a str,
}

impl<'a> Hit<'a> {
    pub fn from_record(record: &'a HitRecord) -> Result<Self, HitShapeError> {
        let cols = &record.columns;
        if cols.len() < MIN_COLUMNS {
            return Err(HitShapeError::TooFewColumns {
                line: record.line,
                found: cols.len(),
                expected: MIN_COLUMNS,
            });
        }

        Ok(Self {
            timestamp: &cols[columns::TIMESTAMP],
            visitor_id: &cols[columns::VISITOR_ID],
            event_code: &cols[columns::EVENT_CODE],
            product_list: &cols[columns::PRODUCT_LIST],
            referrer_url: &cols[cols.len() - 1],
        })
    }
}

/// Split a hit-level export into data records. The header line and blank
/// lines are skipped; shape problems are left for [`Hit::from_record`].
pub fn decode_records(body: &str) -> impl Iterator<Item = HitRecord> + '_ {
    body.split('\n')
        .enumerate()
        .skip(1)
        .map(|(idx, line)| (idx + 1, line.strip_suffix('\r').unwrap_or(line)))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_no, line)| HitRecord::from_line(line_no, line))
}
