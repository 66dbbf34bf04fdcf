use std::sync::Arc;

use chrono::Utc;

use crate::{
    chain::HandlerChain,
    handlers::AppConfigHandler,
    notifier::{MissingFlagEvent, MissingFlagNotifier},
    Error, EvaluatorConfig, FlagConfig, Outcome, Result, SharedHandler, SharedListener, TenantId,
};

/// Evaluates subscription flags by running an ordered chain of handlers.
///
/// An evaluator is constructed once at application startup from an [`EvaluatorConfig`] and lives
/// for the process lifetime. It comes with the config-backed
/// [`AppConfigHandler`](crate::handlers::AppConfigHandler) pre-installed; hosts append further
/// handlers with [`add_handler`](Evaluator::add_handler), typically during setup, though the
/// chain may be mutated at runtime.
///
/// # Examples
/// ```
/// # use subscription_flags::{EvaluatorConfig, TenantId};
/// let mut config = EvaluatorConfig::new();
/// config.flag("beta_ui", true);
/// let evaluator = config.to_evaluator();
///
/// let tenant = TenantId::from(42);
/// assert_eq!(evaluator.check(Some(&tenant), "beta_ui").unwrap(), true);
/// ```
pub struct Evaluator {
    chain: HandlerChain,
    notifier: MissingFlagNotifier,
    flag_config: Arc<FlagConfig>,
    strict: bool,
    debug: bool,
    source: String,
}

impl Evaluator {
    /// Create a new `Evaluator` using the specified configuration.
    pub fn new(config: EvaluatorConfig) -> Evaluator {
        let flag_config = Arc::new(FlagConfig::from_flags(config.flags));

        let evaluator = Evaluator {
            chain: HandlerChain::new(),
            notifier: MissingFlagNotifier::new(),
            flag_config: flag_config.clone(),
            strict: config.strict,
            debug: config.debug,
            source: config.source,
        };
        // The default out-of-the-box handler looks subscriptions up in the evaluator's flag
        // configuration.
        evaluator
            .chain
            .push(Arc::new(AppConfigHandler::new(flag_config)));
        evaluator
    }

    /// The flag map backing the default config handler. Replace it through
    /// [`FlagConfig::set_flags`] when the host reloads configuration.
    pub fn flag_config(&self) -> &Arc<FlagConfig> {
        &self.flag_config
    }

    /// Check whether a subscription flag is on for the given tenant.
    ///
    /// Handlers run in registration order and every check re-runs the full chain; nothing is
    /// cached between calls. The first handler answering [`Outcome::Active`] settles the verdict
    /// to `true` and no further handlers run. A handler answering [`Outcome::Stop`] settles it to
    /// `false` immediately, regardless of handlers before or after it.
    ///
    /// When no handler recognizes the flag, the check returns `false` and emits one
    /// [`MissingFlagEvent`] to subscribed listeners — or, with strict and debug mode both
    /// enabled, fails with [`Error::FlagNotFound`] to surface the configuration mistake. A
    /// handler that answers [`Outcome::Inactive`] counts as recognizing the flag, so neither
    /// happens, even though the chain keeps running.
    ///
    /// Handler errors propagate unchanged; they are not retried and not swallowed.
    pub fn check(&self, tenant: Option<&TenantId>, flag: &str) -> Result<bool> {
        let mut found = false;

        for handler in self.chain.snapshot().iter() {
            match handler.evaluate(tenant, flag)? {
                Outcome::Active => {
                    log::trace!(target: "subscription_flags", flag; "subscription flag is active");
                    return Ok(true);
                }
                Outcome::Stop => {
                    log::trace!(target: "subscription_flags", flag; "handler stopped the chain");
                    return Ok(false);
                }
                Outcome::Inactive => {
                    found = true;
                }
                Outcome::Unknown => {}
            }
        }

        if !found {
            if self.debug && self.strict {
                return Err(Error::FlagNotFound {
                    flag: flag.to_owned(),
                });
            }

            log::info!(target: "subscription_flags", flag; "no subscription flag defined");
            self.notifier.notify(&MissingFlagEvent {
                flag: flag.to_owned(),
                source: self.source.clone(),
                timestamp: Utc::now(),
            });
        }

        Ok(false)
    }

    /// Add a handler to the end of the chain (lowest precedence).
    pub fn add_handler(&self, handler: SharedHandler) {
        self.chain.push(handler);
    }

    /// Remove a handler from the chain, matched by identity. Removing a handler that was never
    /// added is a no-op.
    pub fn remove_handler(&self, handler: &SharedHandler) {
        self.chain.remove(handler);
    }

    /// Clear all handlers. This effectively turns every subscription off: every subsequent check
    /// is unresolved.
    pub fn clear_handlers(&self) {
        self.chain.clear();
    }

    /// Register a listener for missing-flag events.
    pub fn subscribe(&self, listener: SharedListener) {
        self.notifier.subscribe(listener);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::{
        Error, EvaluatorConfig, Handler, MissingFlagEvent, Outcome, Result, SharedHandler,
        TenantId,
    };

    use super::Evaluator;

    /// Handler returning a fixed outcome, counting how often it was consulted.
    struct FixedHandler {
        outcome: Outcome,
        calls: AtomicUsize,
    }

    impl FixedHandler {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Handler for FixedHandler {
        fn evaluate(&self, _tenant: Option<&TenantId>, _flag: &str) -> Result<Outcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome)
        }
    }

    fn evaluator() -> Evaluator {
        EvaluatorConfig::new().to_evaluator()
    }

    fn count_notifications(evaluator: &Evaluator) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let count = count.clone();
            evaluator.subscribe(Arc::new(move |_: &MissingFlagEvent| {
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }
        count
    }

    #[test]
    fn unresolved_flag_is_false_and_notifies_exactly_once() {
        let evaluator = evaluator();
        let notifications = count_notifications(&evaluator);

        assert_eq!(evaluator.check(None, "missing").unwrap(), false);
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn active_short_circuits_later_handlers() {
        let evaluator = evaluator();
        let active = FixedHandler::new(Outcome::Active);
        let after = FixedHandler::new(Outcome::Active);
        evaluator.add_handler(active.clone());
        evaluator.add_handler(after.clone());

        assert_eq!(evaluator.check(None, "flag").unwrap(), true);
        assert_eq!(active.calls(), 1);
        assert_eq!(after.calls(), 0);
    }

    #[test]
    fn stop_aborts_chain_without_notification() {
        let evaluator = evaluator();
        let notifications = count_notifications(&evaluator);
        let stop = FixedHandler::new(Outcome::Stop);
        let after = FixedHandler::new(Outcome::Active);
        evaluator.add_handler(stop);
        evaluator.add_handler(after.clone());

        assert_eq!(evaluator.check(None, "flag").unwrap(), false);
        assert_eq!(after.calls(), 0);
        assert_eq!(notifications.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn order_matters_with_stop_involved() {
        // [unknown, active] and [active, unknown] both resolve to true.
        for (first, second) in [
            (Outcome::Unknown, Outcome::Active),
            (Outcome::Active, Outcome::Unknown),
        ] {
            let evaluator = evaluator();
            evaluator.add_handler(FixedHandler::new(first));
            evaluator.add_handler(FixedHandler::new(second));
            assert_eq!(evaluator.check(None, "flag").unwrap(), true);
        }

        // [stop, active] resolves to false, [active, stop] to true.
        let evaluator = self::evaluator();
        evaluator.add_handler(FixedHandler::new(Outcome::Stop));
        evaluator.add_handler(FixedHandler::new(Outcome::Active));
        assert_eq!(evaluator.check(None, "flag").unwrap(), false);

        let evaluator = self::evaluator();
        evaluator.add_handler(FixedHandler::new(Outcome::Active));
        evaluator.add_handler(FixedHandler::new(Outcome::Stop));
        assert_eq!(evaluator.check(None, "flag").unwrap(), true);
    }

    #[test]
    fn inactive_counts_as_found_but_does_not_block_later_handlers() {
        let evaluator = evaluator();
        let notifications = count_notifications(&evaluator);
        evaluator.add_handler(FixedHandler::new(Outcome::Inactive));
        evaluator.add_handler(FixedHandler::new(Outcome::Active));

        assert_eq!(evaluator.check(None, "flag").unwrap(), true);

        // With only the inactive handler answering, the flag counts as found: the verdict is
        // false and no missing-flag event fires.
        let evaluator = self::evaluator();
        let notifications2 = count_notifications(&evaluator);
        evaluator.add_handler(FixedHandler::new(Outcome::Inactive));

        assert_eq!(evaluator.check(None, "flag").unwrap(), false);
        assert_eq!(notifications.load(Ordering::SeqCst), 0);
        assert_eq!(notifications2.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clear_handlers_makes_every_check_unresolved() {
        let mut config = EvaluatorConfig::new();
        config.flag("beta_ui", true);
        let evaluator = config.to_evaluator();
        let notifications = count_notifications(&evaluator);

        evaluator.clear_handlers();

        assert_eq!(evaluator.check(None, "beta_ui").unwrap(), false);
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_handler_never_added_is_noop() {
        let evaluator = evaluator();
        let never_added: SharedHandler = FixedHandler::new(Outcome::Active);

        evaluator.remove_handler(&never_added);

        assert_eq!(evaluator.check(None, "flag").unwrap(), false);
    }

    #[test]
    fn removed_handler_is_no_longer_consulted() {
        let evaluator = evaluator();
        let active: SharedHandler = FixedHandler::new(Outcome::Active);
        evaluator.add_handler(active.clone());

        assert_eq!(evaluator.check(None, "flag").unwrap(), true);

        evaluator.remove_handler(&active);

        assert_eq!(evaluator.check(None, "flag").unwrap(), false);
    }

    #[test]
    fn strict_debug_mode_fails_on_unresolved_flag() {
        let mut config = EvaluatorConfig::new();
        config.strict(true).debug(true);
        let evaluator = config.to_evaluator();

        let result = evaluator.check(None, "missing");

        assert!(matches!(
            result,
            Err(Error::FlagNotFound { flag }) if flag == "missing"
        ));
    }

    #[test]
    fn strict_mode_without_debug_stays_quiet() {
        let mut config = EvaluatorConfig::new();
        config.strict(true);
        let evaluator = config.to_evaluator();
        let notifications = count_notifications(&evaluator);

        assert_eq!(evaluator.check(None, "missing").unwrap(), false);
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handler_errors_propagate_unchanged() {
        let evaluator = evaluator();
        evaluator.add_handler(Arc::new(|_: Option<&TenantId>, _: &str| -> Result<Outcome> {
            Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "query timed out").into())
        }));

        assert!(matches!(
            evaluator.check(None, "flag"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn end_to_end_config_handler_scenario() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut config = EvaluatorConfig::new();
        config.flag("beta_ui", true);
        let evaluator = config.to_evaluator();
        let notifications = count_notifications(&evaluator);
        let flags = Arc::new(std::sync::Mutex::new(Vec::new()));
        {
            let flags = flags.clone();
            evaluator.subscribe(Arc::new(move |event: &MissingFlagEvent| {
                flags.lock().unwrap().push(event.flag.clone());
            }));
        }

        let tenant = TenantId::from(42);
        assert_eq!(evaluator.check(Some(&tenant), "beta_ui").unwrap(), true);
        assert_eq!(evaluator.check(Some(&tenant), "gamma_ui").unwrap(), false);

        assert_eq!(notifications.load(Ordering::SeqCst), 1);
        assert_eq!(*flags.lock().unwrap(), vec!["gamma_ui".to_owned()]);
    }
}
