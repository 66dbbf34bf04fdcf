//! Per-tenant subscription flag evaluation with pluggable handler chains.
//!
//! # Overview
//!
//! The crate revolves around an [`Evaluator`] that answers "is this subscription flag on for this
//! tenant?" by consulting an ordered chain of [`Handler`]s. Each handler returns an [`Outcome`]:
//! the first `Active` answer short-circuits the chain to `true`, a `Stop` aborts it to `false`,
//! and `Unknown` falls through to the next handler.
//!
//! An evaluator is constructed from an [`EvaluatorConfig`] and comes with the config-backed
//! [`handlers::AppConfigHandler`] pre-installed, so the flag map supplied at construction works
//! out of the box. Hosts append their own handlers (per-key settings lookups, persistence-backed
//! lookups, anything implementing [`Handler`]) with [`Evaluator::add_handler`].
//!
//! When no handler recognizes a flag, the evaluator emits a [`MissingFlagEvent`] to subscribed
//! [`MissingFlagListener`]s, so missing configuration is visible to telemetry without crashing
//! the request.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum.
//!
//! In the default non-strict mode, an unresolved flag is treated as inactive and never fails the
//! check. With [`EvaluatorConfig::strict`] and [`EvaluatorConfig::debug`] both enabled, an
//! unresolved flag returns [`Error::FlagNotFound`] instead, surfacing configuration mistakes
//! during development.
//!
//! # Logging
//!
//! The crate uses the [`log`](https://docs.rs/log/latest/log/) crate for logging messages under
//! the `subscription_flags` target. Consider integrating a `log`-compatible logger implementation
//! for better visibility into unresolved flags and guard decisions.
//!
//! # Examples
//!
//! ```
//! # use subscription_flags::{EvaluatorConfig, TenantId};
//! let mut config = EvaluatorConfig::new();
//! config.flag("beta_ui", true);
//! let evaluator = config.to_evaluator();
//!
//! let tenant = TenantId::from(42);
//! assert_eq!(evaluator.check(Some(&tenant), "beta_ui").unwrap(), true);
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod chain;
mod config;
mod error;
mod evaluator;
mod guard;
mod handler;
pub mod handlers;
mod notifier;
mod tenant;

pub use config::{EvaluatorConfig, FlagConfig};
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use guard::{GuardDecision, SubscriptionGuard};
pub use handler::{Handler, Outcome, SharedHandler};
pub use notifier::{MissingFlagEvent, MissingFlagListener, SharedListener};
pub use tenant::TenantId;
