use std::sync::Arc;

use crate::{FlagConfig, Handler, Outcome, Result, TenantId};

/// Default prefix for inline per-flag settings keys.
pub const DEFAULT_SETTINGS_PREFIX: &str = "subscription_flags";

/// Looks a flag up under a settings key derived from the flag name (`"{prefix}_{flag}"`), for
/// hosts that keep each toggle as its own configuration entry rather than one flag map.
///
/// With the default prefix, the flag `beta_ui` resolves through the settings key
/// `subscription_flags_beta_ui`. Absent keys are reported as [`Outcome::Unknown`]; the tenant is
/// ignored.
pub struct InlineConfigHandler {
    prefix: String,
    settings: Arc<FlagConfig>,
}

impl InlineConfigHandler {
    /// Create a handler over the given settings map, using [`DEFAULT_SETTINGS_PREFIX`].
    pub fn new(settings: Arc<FlagConfig>) -> Self {
        Self::with_prefix(settings, DEFAULT_SETTINGS_PREFIX)
    }

    /// Create a handler deriving settings keys from a custom prefix.
    pub fn with_prefix(settings: Arc<FlagConfig>, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            settings,
        }
    }
}

impl Handler for InlineConfigHandler {
    fn evaluate(&self, _tenant: Option<&TenantId>, flag: &str) -> Result<Outcome> {
        let key = format!("{}_{}", self.prefix, flag);
        match self.settings.get(&key) {
            Some(active) => Ok(Outcome::from_active(active)),
            None => Ok(Outcome::Unknown),
        }
    }
}
