//! The visit ledger: sign-in, sign-out, listing and export.
//!
//! Every operation takes the current time from the caller and runs the
//! auto-close policy before it reads or writes, then does one
//! load-mutate-save cycle against the record store. Input is validated before
//! anything is loaded, so a rejected request never writes.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::autoclose::AutoClosePolicy;
use crate::error::{Error, Result};
use crate::export::export_csv;
use crate::normalize::normalize;
use crate::record::{SignInRequest, VisitRecord};
use crate::store::{KeyValueStore, RecordStore};

/// Counts over the whole log, taken after auto-close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerSummary {
    /// Every visit on record.
    pub total: usize,
    /// Visits still open (guests on site).
    pub open: usize,
    /// Visits closed by the auto-close policy.
    pub auto_closed: usize,
}

/// Guest sign-in log over a single key-value store.
#[derive(Debug)]
pub struct VisitLedger<S> {
    store: RecordStore<S>,
    policy: AutoClosePolicy,
}

impl<S: KeyValueStore> VisitLedger<S> {
    /// Create a ledger over `store` using `policy` for stale visits.
    pub fn new(store: RecordStore<S>, policy: AutoClosePolicy) -> Self {
        Self { store, policy }
    }

    /// The underlying record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// The auto-close policy in effect.
    #[must_use]
    pub fn policy(&self) -> AutoClosePolicy {
        self.policy
    }

    /// Record a guest arriving.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for missing fields, or a storage error.
    pub fn sign_in(&self, request: &SignInRequest, now: DateTime<Utc>) -> Result<VisitRecord> {
        request.validate()?;

        let mut records = self.store.load()?;
        self.policy.apply(&mut records, now);

        let record = VisitRecord::new(request, now);
        records.push(record.clone());
        self.store.save(&records)?;

        info!("Signed in {} ({})", record.full_name(), record.id);
        Ok(record)
    }

    /// Close the newest open visit for `full_name`.
    ///
    /// Stale visits are auto-closed first, so a guest who was auto-closed and
    /// signed in again closes the newer visit. Auto-close results are saved
    /// even when no match is found.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank name, [`Error::NotFound`]
    /// when no open visit matches, or a storage error.
    pub fn sign_out(&self, full_name: &str, now: DateTime<Utc>) -> Result<VisitRecord> {
        let key = normalize(full_name);
        if key.is_empty() {
            return Err(Error::validation("please enter your full name"));
        }

        let mut records = self.store.load()?;
        let auto_closed = self.policy.apply(&mut records, now);

        let Some(index) = records
            .iter()
            .rposition(|r| r.is_open() && r.name_key == key)
        else {
            if auto_closed {
                self.store.save(&records)?;
            }
            debug!("No open visit for key '{}'", key);
            return Err(Error::NotFound);
        };

        records[index].close(now, false);
        let closed = records[index].clone();
        self.store.save(&records)?;

        info!("Signed out {} ({})", closed.full_name(), closed.id);
        Ok(closed)
    }

    /// Visits newest first, optionally filtered.
    ///
    /// `filter` is a case-insensitive substring over name, agency, reason and
    /// details; `None` or blank returns everything.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn list_records(
        &self,
        filter: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<VisitRecord>> {
        let records = self.load_current(now)?;
        let needle = filter
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty());

        Ok(records
            .into_iter()
            .rev()
            .filter(|r| needle.as_deref().map_or(true, |n| r.matches_filter(n)))
            .collect())
    }

    /// Guests currently on site, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn open_records(&self, now: DateTime<Utc>) -> Result<Vec<VisitRecord>> {
        let records = self.load_current(now)?;
        Ok(records.into_iter().rev().filter(VisitRecord::is_open).collect())
    }

    /// Counts over the whole log.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn summary(&self, now: DateTime<Utc>) -> Result<LedgerSummary> {
        let records = self.load_current(now)?;
        Ok(LedgerSummary {
            total: records.len(),
            open: records.iter().filter(|r| r.is_open()).count(),
            auto_closed: records.iter().filter(|r| r.auto_signed_out).count(),
        })
    }

    /// The full log as CSV, in creation order.
    ///
    /// # Errors
    ///
    /// Returns a storage or CSV error.
    pub fn export_all(&self, now: DateTime<Utc>) -> Result<String> {
        let records = self.load_current(now)?;
        export_csv(&records)
    }

    /// Render the given records as CSV.
    ///
    /// # Errors
    ///
    /// Returns a CSV error.
    pub fn export_csv(&self, records: &[VisitRecord]) -> Result<String> {
        export_csv(records)
    }

    /// Delete every visit. Irreversible; callers confirm first.
    ///
    /// Works even when the stored log is corrupt.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn clear_all(&self) -> Result<()> {
        if self.store.clear()? {
            info!("Cleared guest log '{}'", self.store.key());
        }
        Ok(())
    }

    /// Load, auto-close, and persist if anything closed.
    fn load_current(&self, now: DateTime<Utc>) -> Result<Vec<VisitRecord>> {
        let mut records = self.store.load()?;
        if self.policy.apply(&mut records, now) {
            self.store.save(&records)?;
        }
        Ok(records)
    }
}
