//! # tinybit-core
//!
//! Core crate for TinyBit. Contains the host-facing traits, configuration
//! schemas, and the unified error system shared by every TinyBit crate.
//!
//! This crate has **no** internal dependencies on other TinyBit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
