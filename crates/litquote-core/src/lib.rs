//! # litquote-core
//!
//! A library for quoting byte strings as C-style string literals and back.
//!
//! This crate provides:
//! - A reversible quoting codec (`"..."` with `\xHH`, `\uHHHH`,
//!   `\UHHHHHHHH` and named control escapes)
//! - Executable lookup against a colon-separated search list
//! - Allocation of uniquely named FIFOs in a temp directory
//!
//! ## Architecture
//!
//! - [`quote`](mod@quote): the quoting codec and its escape table
//! - [`lookup`]: executable path resolution
//! - [`fifo`]: temp FIFO allocation
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use litquote_core::{quote, unquote};
//!
//! let raw = b"tab\there \xff \"quoted\"";
//! let literal = quote(raw);
//! assert_eq!(literal, "\"tab\there \\xff \\\"quoted\\\"\"");
//! assert_eq!(&*unquote(&literal)?, &raw[..]);
//! # Ok::<(), litquote_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod fifo;
pub mod lookup;
pub mod quote;

// Re-export primary types for convenience
pub use error::{Error, Result, SyntaxReason};
pub use fifo::{create_temp_fifo, fifo_supported, SuffixGenerator, TempFifo, TempFifoConfig};
pub use lookup::{resolve, resolve_from_env, Resolved};
pub use quote::{is_printable, quote, unquote};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
