//! Core archive logic for fbarchive.

pub mod services;

pub use services::*;
