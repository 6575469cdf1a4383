//! Common utilities and shared types for fbarchive.
//!
//! This crate provides foundational components used across all fbarchive crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based surrogate keys via [`IdGenerator`]
//! - **Time helpers**: Elapsed-time formatting and refresh cooldowns in [`time`]
//!
//! # Example
//!
//! ```no_run
//! use fbarchive_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {} for {}", id, config.database.url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod time;

pub use config::{ArchiveConfig, Config, DatabaseConfig, LoggingConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
