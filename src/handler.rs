use std::sync::Arc;

use crate::{Result, TenantId};

/// Verdict a [`Handler`] returns for a single (tenant, flag) check.
///
/// Control flow through the chain is expressed as explicit variants rather than errors: `Unknown`
/// and `Stop` are continuation instructions, not failures, and are never surfaced to the caller
/// of [`check`](crate::Evaluator::check).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The flag is on. Short-circuits the chain to a `true` verdict.
    Active,
    /// The flag is known to this handler and off. The chain continues, so a later handler may
    /// still turn the flag on, but the flag counts as found and no missing-flag event fires.
    Inactive,
    /// The flag is unknown to this handler. The chain continues.
    Unknown,
    /// Abort the chain immediately with a `false` verdict, regardless of any later handler.
    Stop,
}

impl Outcome {
    /// Map a plain boolean answer to `Active` or `Inactive`.
    pub fn from_active(active: bool) -> Outcome {
        if active {
            Outcome::Active
        } else {
            Outcome::Inactive
        }
    }
}

impl From<bool> for Outcome {
    fn from(active: bool) -> Self {
        Outcome::from_active(active)
    }
}

/// A pluggable flag resolver consulted by the [`Evaluator`](crate::Evaluator) in chain order.
///
/// Implementations must not mutate evaluator state and should not block indefinitely; the
/// evaluator imposes no timeout, so a hung handler hangs the check. Any `Err` returned here
/// propagates out of [`check`](crate::Evaluator::check) unchanged.
pub trait Handler {
    /// Evaluate the flag for the given tenant.
    fn evaluate(&self, tenant: Option<&TenantId>, flag: &str) -> Result<Outcome>;
}

impl<F> Handler for F
where
    F: Fn(Option<&TenantId>, &str) -> Result<Outcome>,
{
    fn evaluate(&self, tenant: Option<&TenantId>, flag: &str) -> Result<Outcome> {
        self(tenant, flag)
    }
}

/// A reference-counted handler as stored in the chain. Removal matches by identity
/// ([`Arc::ptr_eq`]), so keep a clone of this handle around if you intend to remove the handler
/// later.
pub type SharedHandler = Arc<dyn Handler + Send + Sync>;
