use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Event emitted when a check ends without any handler recognizing the flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingFlagEvent {
    /// Name of the flag nobody recognized.
    pub flag: String,
    /// The evaluator that ran the check. See [`EvaluatorConfig::source`](crate::EvaluatorConfig::source).
    pub source: String,
    /// When the unresolved check finished.
    pub timestamp: DateTime<Utc>,
}

/// Listener invoked synchronously, on the checking thread, for every unresolved check.
///
/// Implemented automatically for closures:
///
/// ```
/// # use std::sync::Arc;
/// # use subscription_flags::{EvaluatorConfig, MissingFlagEvent};
/// let evaluator = EvaluatorConfig::new().to_evaluator();
/// evaluator.subscribe(Arc::new(|event: &MissingFlagEvent| {
///     println!("unresolved flag: {}", event.flag);
/// }));
/// ```
pub trait MissingFlagListener {
    /// Handle an unresolved-flag event.
    fn on_missing_flag(&self, event: &MissingFlagEvent);
}

impl<F> MissingFlagListener for F
where
    F: Fn(&MissingFlagEvent),
{
    fn on_missing_flag(&self, event: &MissingFlagEvent) {
        self(event)
    }
}

/// A reference-counted listener as registered with [`Evaluator::subscribe`](crate::Evaluator::subscribe).
pub type SharedListener = Arc<dyn MissingFlagListener + Send + Sync>;

/// Observer list that fans an unresolved-check event out to all registered listeners.
///
/// Publishing is fire-and-forget: a listener that panics is logged and skipped, so it can
/// neither abort the check nor starve the listeners after it.
pub(crate) struct MissingFlagNotifier {
    listeners: RwLock<Vec<SharedListener>>,
}

impl MissingFlagNotifier {
    pub(crate) fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn subscribe(&self, listener: SharedListener) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(listener);
        }
    }

    pub(crate) fn notify(&self, event: &MissingFlagEvent) {
        // Snapshot the listener list so a listener that subscribes another listener does not
        // deadlock on the read lock.
        let listeners = match self.listeners.read() {
            Ok(listeners) => listeners.clone(),
            Err(_) => return,
        };

        for listener in &listeners {
            let result = catch_unwind(AssertUnwindSafe(|| listener.on_missing_flag(event)));
            if result.is_err() {
                let flag = event.flag.as_str();
                log::error!(target: "subscription_flags", flag; "missing-flag listener panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use chrono::Utc;

    use super::{MissingFlagEvent, MissingFlagNotifier};

    fn event(flag: &str) -> MissingFlagEvent {
        MissingFlagEvent {
            flag: flag.to_owned(),
            source: "test".to_owned(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn notifies_all_listeners() {
        let notifier = MissingFlagNotifier::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let count = count.clone();
            notifier.subscribe(Arc::new(move |_: &MissingFlagEvent| {
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }

        notifier.notify(&event("beta_ui"));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_listener_does_not_starve_later_listeners() {
        let notifier = MissingFlagNotifier::new();
        let count = Arc::new(AtomicUsize::new(0));

        notifier.subscribe(Arc::new(|_: &MissingFlagEvent| {
            panic!("listener blew up");
        }));
        {
            let count = count.clone();
            notifier.subscribe(Arc::new(move |_: &MissingFlagEvent| {
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }

        notifier.notify(&event("beta_ui"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn event_serializes_to_camel_case() {
        let event = event("beta_ui");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["flag"], "beta_ui");
        assert_eq!(json["source"], "test");
        assert!(json.get("timestamp").is_some());
    }
}
