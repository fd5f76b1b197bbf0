//! fixtrack store - SQLite binding for the fixture and change-tracking harness
//!
//! Provides:
//! - Connection opening and configuration
//! - The SQLite dialect and session implementations of the core seams
//! - TOML harness configuration

pub mod config;
pub mod db;
pub mod dialect;
pub mod errors;
pub mod session;

// Re-export key types
pub use config::HarnessConfig;
pub use dialect::SqliteDialect;
pub use errors::Result;
pub use session::{SqliteSession, SqliteSource};
