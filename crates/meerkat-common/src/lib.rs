//! Common utilities for meerkat
//!
//! This crate provides the shared error type used across all meerkat modules.

pub mod error;

pub use error::{MeerkatError, Result};
