use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::Evaluator;

/// `FlagConfig` provides a Sync storage for the flag-name-to-activation map backing the default
/// config handler, allowing concurrent access for readers and writers.
///
/// The map is consulted on every evaluation and can be replaced wholesale at runtime, e.g. when
/// the host reloads its configuration. Readers get a snapshot that is not affected by a
/// concurrent replacement.
pub struct FlagConfig {
    flags: RwLock<Arc<HashMap<String, bool>>>,
}

impl FlagConfig {
    /// Create an empty flag configuration.
    pub fn new() -> Self {
        Self::from_flags(HashMap::new())
    }

    /// Create a flag configuration from the given map.
    pub fn from_flags(flags: HashMap<String, bool>) -> Self {
        Self {
            flags: RwLock::new(Arc::new(flags)),
        }
    }

    /// Look up a flag. `None` when the flag is not configured.
    pub fn get(&self, flag: &str) -> Option<bool> {
        self.snapshot().get(flag).copied()
    }

    /// Get the current flag map as a snapshot.
    pub fn snapshot(&self) -> Arc<HashMap<String, bool>> {
        // self.flags.read() should always return Ok(). Err() is possible only if the lock is
        // poisoned (writer panicked while holding the lock), which should never happen. Still,
        // returning an empty map here to not crash the app.
        match self.flags.read() {
            Ok(flags) => flags.clone(),
            Err(_) => Arc::new(HashMap::new()),
        }
    }

    /// Replace the flag map, returning the previous one.
    pub fn set_flags(&self, flags: HashMap<String, bool>) -> Option<Arc<HashMap<String, bool>>> {
        // Constructing new value before requesting the lock to minimize lock span.
        let new_value = Arc::new(flags);

        let mut slot = self.flags.write().ok()?;
        Some(std::mem::replace(&mut slot, new_value))
    }
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`Evaluator`].
///
/// ```
/// # use subscription_flags::EvaluatorConfig;
/// let mut config = EvaluatorConfig::new();
/// config.flag("beta_ui", true).strict(true);
/// let evaluator = config.to_evaluator();
/// ```
pub struct EvaluatorConfig {
    pub(crate) flags: HashMap<String, bool>,
    pub(crate) strict: bool,
    pub(crate) debug: bool,
    pub(crate) source: String,
}

impl EvaluatorConfig {
    /// Default `source` reported in missing-flag events.
    pub const DEFAULT_SOURCE: &'static str = "subscription-flags";

    /// Create a default evaluator configuration: no flags, non-strict, non-debug.
    pub fn new() -> Self {
        EvaluatorConfig {
            flags: HashMap::new(),
            strict: false,
            debug: false,
            source: Self::DEFAULT_SOURCE.to_owned(),
        }
    }

    /// Set the activation of a single flag in the default config handler.
    pub fn flag(&mut self, name: impl Into<String>, active: bool) -> &mut Self {
        self.flags.insert(name.into(), active);
        self
    }

    /// Set the activation of multiple flags in the default config handler.
    pub fn flags(&mut self, flags: impl IntoIterator<Item = (String, bool)>) -> &mut Self {
        self.flags.extend(flags);
        self
    }

    /// Turn unresolved flags into a hard [`Error::FlagNotFound`](crate::Error::FlagNotFound).
    /// Only takes effect together with [`debug`](EvaluatorConfig::debug); in production an
    /// unresolved flag stays a quiet `false`.
    pub fn strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    /// Mark the execution environment as a development one. See
    /// [`strict`](EvaluatorConfig::strict).
    pub fn debug(&mut self, debug: bool) -> &mut Self {
        self.debug = debug;
        self
    }

    /// Override the `source` reported in missing-flag events. Useful when a host runs several
    /// evaluators.
    pub fn source(&mut self, source: impl Into<String>) -> &mut Self {
        self.source = source.into();
        self
    }

    /// Create a new [`Evaluator`] using this configuration.
    ///
    /// ```
    /// # use subscription_flags::{Evaluator, EvaluatorConfig};
    /// let evaluator: Evaluator = EvaluatorConfig::new().to_evaluator();
    /// ```
    pub fn to_evaluator(self) -> Evaluator {
        Evaluator::new(self)
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
