//! Catalog records
//!
//! Flat-file record model for the lending catalog.
//!
//! ## File Format
//!
//! Two line shapes, disambiguated by group structure rather than guesswork:
//! a title header opens a group and announces exactly how many copy records
//! follow it.
//!
//! ```text
//! The Trial, 978-0805209990, 2
//! 1, D, 01-01-2025
//! 2, P, 08-01-2025
//! ```
//!
//! `D` marks an available copy, `P` a borrowed one. Due dates are
//! `DD-MM-YYYY`. Isbn is unique per group; records are never created or
//! deleted at runtime, only status and due-date fields mutate.

mod store;

pub use store::{Applied, CatalogStore, Update};

use std::fmt;

use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::error::{LibrisError, Result};

/// Loan period applied to borrows and renewals
pub const LOAN_PERIOD_DAYS: i64 = 7;

// =============================================================================
// Record Types
// =============================================================================

/// Lending status of one physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    /// On the shelf, wire char 'D'
    Available,

    /// Out on loan, wire char 'P'
    Borrowed,
}

impl CopyStatus {
    /// Get the catalog-file character for this status
    pub fn as_char(self) -> char {
        match self {
            CopyStatus::Available => 'D',
            CopyStatus::Borrowed => 'P',
        }
    }

    /// Parse a status from its catalog-file character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'D' => Some(CopyStatus::Available),
            'P' => Some(CopyStatus::Borrowed),
            _ => None,
        }
    }
}

/// Group header line: `Title, ISBN, Count`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleHeader {
    pub title: String,
    pub isbn: String,
    pub copies: u32,
}

/// Copy line: `Number, Status, DD-MM-YYYY`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRecord {
    pub number: u32,
    pub status: CopyStatus,
    /// Stored verbatim; parsed as a date only when a renewal extends it
    pub due: String,
}

/// A title header with its contiguous copy records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub header: TitleHeader,
    pub copies: Vec<CopyRecord>,
}

// =============================================================================
// Line Parsing / Serialization
// =============================================================================

impl TitleHeader {
    /// Parse a header line
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.splitn(3, ',');
        let title = fields.next().unwrap_or("").trim();
        let isbn = fields.next().map(str::trim);
        let copies = fields.next().map(str::trim);

        match (isbn, copies) {
            (Some(isbn), Some(copies)) if !title.is_empty() && !isbn.is_empty() => {
                let copies = copies.parse::<u32>().map_err(|_| {
                    LibrisError::Catalog(format!("bad copy count in header line: {line:?}"))
                })?;
                Ok(Self {
                    title: title.to_string(),
                    isbn: isbn.to_string(),
                    copies,
                })
            }
            _ => Err(LibrisError::Catalog(format!(
                "malformed header line: {line:?}"
            ))),
        }
    }
}

impl fmt::Display for TitleHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.title, self.isbn, self.copies)
    }
}

impl CopyRecord {
    /// Parse a copy line
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.splitn(3, ',');
        let number = fields.next().unwrap_or("").trim();
        let status = fields.next().map(str::trim);
        let due = fields.next().map(str::trim);

        match (status, due) {
            (Some(status), Some(due)) if !due.is_empty() => {
                let number = number.parse::<u32>().map_err(|_| {
                    LibrisError::Catalog(format!("bad copy number in line: {line:?}"))
                })?;
                let status = status
                    .chars()
                    .next()
                    .filter(|_| status.len() == 1)
                    .and_then(CopyStatus::from_char)
                    .ok_or_else(|| {
                        LibrisError::Catalog(format!("bad copy status in line: {line:?}"))
                    })?;
                Ok(Self {
                    number,
                    status,
                    due: due.to_string(),
                })
            }
            _ => Err(LibrisError::Catalog(format!("malformed copy line: {line:?}"))),
        }
    }
}

impl fmt::Display for CopyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.number, self.status.as_char(), self.due)
    }
}

// =============================================================================
// Due-date Helpers
// =============================================================================

/// Today's date (UTC)
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Format a date as `DD-MM-YYYY`
pub fn format_date(date: Date) -> Result<String> {
    let format = format_description!("[day]-[month]-[year]");
    date.format(&format)
        .map_err(|e| LibrisError::Catalog(format!("date formatting failed: {e}")))
}

/// Parse a `DD-MM-YYYY` date
pub fn parse_date(text: &str) -> Result<Date> {
    let format = format_description!("[day]-[month]-[year]");
    Date::parse(text.trim(), &format)
        .map_err(|_| LibrisError::Catalog(format!("bad due date: {text:?}")))
}

/// A date one loan period later
pub fn loan_period_from(date: Date) -> Result<Date> {
    date.checked_add(Duration::days(LOAN_PERIOD_DAYS))
        .ok_or_else(|| LibrisError::Catalog("due date out of range".to_string()))
}
