use std::sync::Arc;

use crate::{FlagConfig, Handler, Outcome, Result, TenantId};

/// The default handler. It checks for subscription flags in the evaluator's flag configuration
/// and ignores the tenant.
///
/// For example, to have `feature_subscription` hidden in production but active in development,
/// build the production evaluator with the flag off and the development one with it on:
///
/// ```
/// # use subscription_flags::EvaluatorConfig;
/// let mut production = EvaluatorConfig::new();
/// production.flag("feature_subscription", false);
///
/// let mut development = EvaluatorConfig::new();
/// development.flag("feature_subscription", true);
/// ```
///
/// Flags absent from the configuration are reported as [`Outcome::Unknown`], so later handlers
/// in the chain get a say.
pub struct AppConfigHandler {
    config: Arc<FlagConfig>,
}

impl AppConfigHandler {
    /// Create a handler backed by the given flag configuration.
    pub fn new(config: Arc<FlagConfig>) -> Self {
        Self { config }
    }
}

impl Handler for AppConfigHandler {
    fn evaluate(&self, _tenant: Option<&TenantId>, flag: &str) -> Result<Outcome> {
        match self.config.get(flag) {
            Some(active) => Ok(Outcome::from_active(active)),
            None => Ok(Outcome::Unknown),
        }
    }
}
