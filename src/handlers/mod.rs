//! Reference [`Handler`](crate::Handler) implementations.
//!
//! Three handler variants ship with the crate: [`AppConfigHandler`] (the default, backed by the
//! evaluator's [`FlagConfig`](crate::FlagConfig)), [`InlineConfigHandler`] (per-flag settings
//! keys), and [`StoreHandler`] (tenant-scoped records behind the [`FlagStore`] persistence
//! seam). Anything implementing `Handler` can join the chain alongside them.

mod app_config;
mod inline;
mod store;

pub use app_config::AppConfigHandler;
pub use inline::{InlineConfigHandler, DEFAULT_SETTINGS_PREFIX};
pub use store::{FlagRecord, FlagStore, MemoryFlagStore, StoreHandler};
