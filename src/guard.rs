use crate::{Evaluator, Result, TenantId};

/// What the host application should do with a guarded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The subscription is active; run the wrapped request handler normally.
    Allow,
    /// The subscription is off and a redirect target is configured; respond with HTTP 302 to
    /// `location`.
    Redirect {
        /// Redirect target URL.
        location: String,
    },
    /// The subscription is off and no redirect target is configured; respond with HTTP 404.
    NotFound,
}

/// Request guard for host web frameworks, wrapping [`Evaluator::check`].
///
/// If a subscription is off, the guarded request is either turned away with a 404 or redirected
/// to a URL if you'd rather. The guard holds an explicit evaluator reference only for the
/// duration of [`decide`](SubscriptionGuard::decide); mapping the decision onto an actual HTTP
/// response is the host's job.
///
/// ```
/// # use subscription_flags::{EvaluatorConfig, GuardDecision, SubscriptionGuard};
/// let evaluator = EvaluatorConfig::new().to_evaluator();
/// let guard = SubscriptionGuard::new("beta_ui")
///     .tenant(42)
///     .redirect_to("/upgrade");
///
/// assert_eq!(
///     guard.decide(&evaluator).unwrap(),
///     GuardDecision::Redirect { location: "/upgrade".to_owned() },
/// );
/// ```
pub struct SubscriptionGuard {
    flag: String,
    tenant: Option<TenantId>,
    redirect_to: Option<String>,
}

impl SubscriptionGuard {
    /// Create a guard for the given flag, with no tenant and no redirect target.
    pub fn new(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            tenant: None,
            redirect_to: None,
        }
    }

    /// Scope the check to a tenant.
    pub fn tenant(mut self, tenant: impl Into<TenantId>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Redirect turned-away requests to a fixed URL instead of responding with 404.
    pub fn redirect_to(mut self, url: impl Into<String>) -> Self {
        self.redirect_to = Some(url.into());
        self
    }

    /// Redirect turned-away requests to a named target, resolved to a URL through the host's
    /// route resolver.
    pub fn redirect_target(self, name: &str, resolve: impl Fn(&str) -> String) -> Self {
        let url = resolve(name);
        self.redirect_to(url)
    }

    /// Run the check and decide what to do with the request.
    pub fn decide(&self, evaluator: &Evaluator) -> Result<GuardDecision> {
        if evaluator.check(self.tenant.as_ref(), &self.flag)? {
            return Ok(GuardDecision::Allow);
        }

        let flag = self.flag.as_str();
        match &self.redirect_to {
            Some(location) => {
                let location = location.as_str();
                log::info!(target: "subscription_flags", flag, location; "subscription is off, redirecting");
                Ok(GuardDecision::Redirect {
                    location: location.to_owned(),
                })
            }
            None => {
                log::info!(target: "subscription_flags", flag; "subscription is off, aborting request");
                Ok(GuardDecision::NotFound)
            }
        }
    }
}
