//! Catalog Store
//!
//! Search, mutate and report over the flat-file catalog.
//!
//! ## Concurrency
//!
//! The dispatcher's inline Borrow path and the queue worker's deferred
//! Return/Renew path both land here. Every public operation takes `&self`,
//! acquires the store's mutex, and runs its full load → scan → mutate →
//! rewrite sequence under it, so no partial state (and no file cursor) is
//! ever visible to another thread. An in-flight rewrite always completes
//! before the lock is released; shutdown never interrupts one.
//!
//! ## Persistence
//!
//! Mutations rewrite the whole file through a temp file created in the same
//! directory, then atomically rename it over the original. A failure before
//! the rename leaves the original untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::error::{LibrisError, Result};

use super::{
    format_date, loan_period_from, parse_date, today, CopyRecord, CopyStatus, Group, TitleHeader,
};

/// Deferred or inline catalog transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Available → Borrowed, due = today + loan period
    Borrow,

    /// Borrowed → Available, date = today
    Return,

    /// Stays Borrowed, due = prior due + loan period
    Renew,
}

impl Update {
    /// Status a copy must be in for this transition to select it
    fn required_status(self) -> CopyStatus {
        match self {
            Update::Borrow => CopyStatus::Available,
            Update::Return | Update::Renew => CopyStatus::Borrowed,
        }
    }
}

/// Outcome of an attempted catalog update
///
/// The two miss cases are ordinary outcomes answered with a normal reply,
/// not errors; nothing is mutated for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The transition was applied to one copy
    Done { copy: u32, due: String },

    /// The group exists but no copy is in the required state
    NoCopyInState,

    /// No group carries the requested isbn
    UnknownIsbn,
}

/// Flat-file catalog store
///
/// All access is serialized by an internal mutex; see the module docs.
pub struct CatalogStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CatalogStore {
    /// Open a catalog file, verifying it exists and parses
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        };

        // Surface a bad catalog at setup time, not on the first request
        {
            let _guard = store.lock.lock();
            store.load()?;
        }

        Ok(store)
    }

    /// Copy count of the group matching `isbn`, 0 if absent
    ///
    /// Absence is not an error, merely nothing to update.
    pub fn search(&self, isbn: &str) -> Result<u32> {
        let _guard = self.lock.lock();
        let groups = self.load()?;
        Ok(groups
            .iter()
            .find(|g| g.header.isbn == isbn)
            .map(|g| g.header.copies)
            .unwrap_or(0))
    }

    /// Apply one transition to the first eligible copy of the isbn's group
    ///
    /// Scans the group's copy records in file order (at most `copies` of
    /// them, a fresh bounded scan per request) for the first record whose
    /// status satisfies the transition's precondition, updates it, and
    /// rewrites the file. Misses mutate nothing.
    pub fn apply(&self, isbn: &str, update: Update) -> Result<Applied> {
        let _guard = self.lock.lock();
        let mut groups = self.load()?;

        let Some(group) = groups.iter_mut().find(|g| g.header.isbn == isbn) else {
            tracing::debug!("isbn {isbn} not in catalog");
            return Ok(Applied::UnknownIsbn);
        };

        let required = update.required_status();
        let Some(record) = group.copies.iter_mut().find(|c| c.status == required) else {
            tracing::debug!("isbn {isbn}: no copy in state {:?}", required);
            return Ok(Applied::NoCopyInState);
        };

        match update {
            Update::Borrow => {
                record.status = CopyStatus::Borrowed;
                record.due = format_date(loan_period_from(today())?)?;
            }
            Update::Return => {
                record.status = CopyStatus::Available;
                record.due = format_date(today())?;
            }
            Update::Renew => {
                // Renewals extend the recorded due date; an unreadable one
                // falls back to extending from today
                let base = match parse_date(&record.due) {
                    Ok(date) => date,
                    Err(_) => {
                        tracing::warn!(
                            "isbn {isbn} copy {}: unreadable due date {:?}, renewing from today",
                            record.number,
                            record.due
                        );
                        today()
                    }
                };
                record.due = format_date(loan_period_from(base)?)?;
            }
        }

        let applied = Applied::Done {
            copy: record.number,
            due: record.due.clone(),
        };

        self.rewrite(&groups)?;
        Ok(applied)
    }

    /// Read-only scan: catalog lines annotated with per-group availability
    ///
    /// Emits the running `Available copies` count at each group boundary.
    /// Two runs over an unmutated catalog yield identical output.
    pub fn report(&self) -> Result<String> {
        let _guard = self.lock.lock();
        let groups = self.load()?;

        let mut out = String::new();
        for group in &groups {
            out.push_str(&group.header.to_string());
            out.push('\n');

            let mut available = 0u32;
            for copy in &group.copies {
                if copy.status == CopyStatus::Available {
                    available += 1;
                }
                out.push_str(&copy.to_string());
                out.push('\n');
            }

            out.push_str(&format!("Available copies: {available}\n"));
        }
        Ok(out)
    }

    /// Write the report to a file (the end-of-run snapshot)
    pub fn write_report(&self, path: &Path) -> Result<()> {
        let report = self.report()?;
        fs::write(path, report)?;
        Ok(())
    }

    /// Path of the underlying catalog file
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Parse the whole file into groups (call with the lock held)
    ///
    /// Each header must be followed by exactly its announced number of copy
    /// lines; anything else is a malformed catalog.
    fn load(&self) -> Result<Vec<Group>> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            LibrisError::Catalog(format!("reading {}: {e}", self.path.display()))
        })?;

        let mut groups = Vec::new();
        let mut lines = text.lines().enumerate();

        while let Some((lineno, line)) = lines.next() {
            if line.trim().is_empty() {
                continue;
            }

            let header = TitleHeader::parse(line).map_err(|e| {
                LibrisError::Catalog(format!("line {}: {e}", lineno + 1))
            })?;

            let mut copies = Vec::with_capacity(header.copies as usize);
            for _ in 0..header.copies {
                let Some((lineno, line)) = lines.next() else {
                    return Err(LibrisError::Catalog(format!(
                        "group {} truncated: expected {} copy lines",
                        header.isbn, header.copies
                    )));
                };
                let copy = CopyRecord::parse(line).map_err(|e| {
                    LibrisError::Catalog(format!("line {}: {e}", lineno + 1))
                })?;
                copies.push(copy);
            }

            groups.push(Group { header, copies });
        }

        Ok(groups)
    }

    /// Serialize all groups through a temp file and swap it in atomically
    /// (call with the lock held)
    fn rewrite(&self, groups: &[Group]) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
            LibrisError::Catalog(format!("creating temp file in {}: {e}", dir.display()))
        })?;

        for group in groups {
            writeln!(tmp, "{}", group.header)?;
            for copy in &group.copies {
                writeln!(tmp, "{copy}")?;
            }
        }
        tmp.flush()?;
        tmp.as_file().sync_all()?;

        tmp.persist(&self.path).map_err(|e| {
            LibrisError::Catalog(format!("swapping {}: {e}", self.path.display()))
        })?;

        Ok(())
    }
}
