//! SignalDesk Runner: configuration, data-source selection, plan requests,
//! autocomplete and persistence.
//!
//! This crate builds on `signaldesk-core` to provide:
//! - TOML configuration with defaults and validation
//! - The mock/live data-source switch
//! - Plan requests with concurrent signal and history lookups
//! - A background autocomplete worker with a stale-reply guard
//! - JSON persistence of recent predictions

pub mod autocomplete;
pub mod config;
pub mod persistence;
pub mod session;
pub mod source;

pub use autocomplete::{Autocomplete, SearchCommand, SearchReply};
pub use config::{AppConfig, ConfigError, SourceKind};
pub use persistence::{load_history, save_history};
pub use session::{load_rates, LoadingGuard, RequestError, Session};
pub use source::{DataSource, LiveSource, Providers, SourceError};
