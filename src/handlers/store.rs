use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::{Handler, Outcome, Result, TenantId};

/// A stored flag activation record, scoped to a tenant when one is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlagRecord {
    /// Tenant the record applies to. `None` for a record that applies regardless of tenant.
    pub tenant: Option<TenantId>,
    /// Flag name, unique per tenant.
    pub flag: String,
    /// Whether the flag is on for this tenant.
    pub active: bool,
}

/// Persistence seam for flag records.
///
/// Implementations own their storage, connection handling, and any timeout policy; the evaluator
/// imposes none. A failed lookup should return `Err` (it propagates out of
/// [`check`](crate::Evaluator::check) unchanged), while a clean miss is `Ok(None)`.
pub trait FlagStore {
    /// Look up the record for (tenant, flag). `Ok(None)` when no record exists.
    fn find(&self, tenant: Option<&TenantId>, flag: &str) -> Result<Option<FlagRecord>>;
}

/// Handler backed by a [`FlagStore`].
///
/// Flags with no record are reported as [`Outcome::Unknown`]; otherwise the record's `active`
/// field settles the answer. Every evaluation queries the store, so this handler blocks for as
/// long as the store does.
pub struct StoreHandler {
    store: Arc<dyn FlagStore + Send + Sync>,
}

impl StoreHandler {
    /// Create a handler over the given store.
    pub fn new(store: Arc<dyn FlagStore + Send + Sync>) -> Self {
        Self { store }
    }
}

impl Handler for StoreHandler {
    fn evaluate(&self, tenant: Option<&TenantId>, flag: &str) -> Result<Outcome> {
        match self.store.find(tenant, flag)? {
            Some(record) => Ok(Outcome::from_active(record.active)),
            None => Ok(Outcome::Unknown),
        }
    }
}

/// In-memory [`FlagStore`] allowing concurrent access for readers and writers. Useful for tests
/// and for hosts that load flag records themselves.
pub struct MemoryFlagStore {
    records: RwLock<Vec<FlagRecord>>,
}

impl MemoryFlagStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Insert a record, replacing any existing record for the same (tenant, flag).
    pub fn insert(&self, record: FlagRecord) {
        if let Ok(mut records) = self.records.write() {
            if let Some(existing) = records
                .iter_mut()
                .find(|r| r.tenant == record.tenant && r.flag == record.flag)
            {
                *existing = record;
            } else {
                records.push(record);
            }
        }
    }

    /// Remove the record for (tenant, flag), if any.
    pub fn remove(&self, tenant: Option<&TenantId>, flag: &str) {
        if let Ok(mut records) = self.records.write() {
            records.retain(|r| !(r.tenant.as_ref() == tenant && r.flag == flag));
        }
    }
}

impl Default for MemoryFlagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagStore for MemoryFlagStore {
    fn find(&self, tenant: Option<&TenantId>, flag: &str) -> Result<Option<FlagRecord>> {
        let records = match self.records.read() {
            Ok(records) => records,
            Err(_) => return Ok(None),
        };
        Ok(records
            .iter()
            .find(|r| r.tenant.as_ref() == tenant && r.flag == flag)
            .cloned())
    }
}
