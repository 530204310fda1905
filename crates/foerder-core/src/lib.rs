//! Core types and trait definitions for the Förderdaten application.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend and the web layer both depend on it.

pub mod click;
pub mod error;
pub mod export;
pub mod record;
pub mod store;

pub use error::{Error, Result};
