//! Per-owner data isolation
//!
//! Every booking record belongs to exactly one owner. A record that
//! belongs to someone else is reported with the same error as a record
//! that does not exist, so callers cannot probe for foreign ids.
//! Listing operations filter by owner at the query boundary rather
//! than post-filtering, so pagination metadata never reflects foreign
//! records either.

use aerobook_core::error::AerobookResult;
use aerobook_core::not_found_error;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A record with an immutable owner, set at creation
pub trait Owned {
    fn id(&self) -> &str;
    fn owner_subject(&self) -> &str;
    /// Human-readable resource kind used in error messages
    fn resource_name() -> &'static str;
}

/// Enforce ownership on a looked-up record.
///
/// Absence and ownership mismatch produce the identical error on
/// purpose, down to the message text; do not split these cases.
pub fn guard<T: Owned>(record: Option<T>, caller_subject: &str, id: &str) -> AerobookResult<T> {
    match record {
        Some(record) if record.owner_subject() == caller_subject => Ok(record),
        other => {
            if other.is_some() {
                debug!(
                    resource = T::resource_name(),
                    id, "Ownership mismatch treated as absent"
                );
            }
            Err(not_found_error!(
                format!("{} not found with id: {}", T::resource_name(), id),
                "ownership"
            ))
        }
    }
}

/// One page of an owner-scoped listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// In-memory store for owned records.
///
/// Exposes the same narrow get/save/delete-by-id contract a database
/// repository would; swapping the backend does not change callers.
#[derive(Debug, Clone)]
pub struct OwnedStore<T: Owned + Clone> {
    records: Arc<RwLock<HashMap<String, T>>>,
}

impl<T: Owned + Clone> Default for OwnedStore<T> {
    fn default() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Owned + Clone> OwnedStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly created record. The caller has already stamped
    /// the owner; ownership never changes afterwards.
    pub fn insert(&self, record: T) -> T {
        let mut records = self.records.write().unwrap();
        records.insert(record.id().to_string(), record.clone());
        record
    }

    /// Fetch a record by id, enforcing ownership
    pub fn get(&self, id: &str, caller_subject: &str) -> AerobookResult<T> {
        let records = self.records.read().unwrap();
        guard(records.get(id).cloned(), caller_subject, id)
    }

    /// Mutate a record in place after an ownership check
    pub fn update<F>(&self, id: &str, caller_subject: &str, mutate: F) -> AerobookResult<T>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write().unwrap();
        let existing = guard(records.get(id).cloned(), caller_subject, id)?;

        let mut updated = existing;
        mutate(&mut updated);
        records.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    /// Delete a record by id, enforcing ownership first
    pub fn delete(&self, id: &str, caller_subject: &str) -> AerobookResult<()> {
        let mut records = self.records.write().unwrap();
        guard(records.get(id).cloned(), caller_subject, id)?;
        records.remove(id);
        Ok(())
    }

    /// All records belonging to the caller
    pub fn list_by_owner(&self, caller_subject: &str) -> Vec<T> {
        let records = self.records.read().unwrap();
        let mut owned: Vec<T> = records
            .values()
            .filter(|r| r.owner_subject() == caller_subject)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.id().cmp(b.id()));
        owned
    }

    /// One page of the caller's records. Totals count only the
    /// caller's own records.
    pub fn page_by_owner(&self, caller_subject: &str, page: usize, page_size: usize) -> Page<T> {
        let owned = self.list_by_owner(caller_subject);
        let total_items = owned.len();
        let total_pages = total_items.div_ceil(page_size.max(1));
        let items = owned
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .collect();

        Page {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
