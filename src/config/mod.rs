//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the engine and
//! phrase capture, `AppPaths` for cross-platform data directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.
//!
//! The configuration is an explicitly constructed value handed to the
//! factory and the session controller — there is no process-wide registry.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ListenConfig, SttConfig};
