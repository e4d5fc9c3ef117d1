//! stashfile - A minimal embedded key-value cache backed by a single YAML file
//!
//! A [`Stash`] keeps a flat key-value mapping fully in memory and mirrors it
//! to one YAML mapping document on disk. Every mutating call rewrites the
//! backing file in full, so on-disk state matches memory after each write.
//!
//! Provides:
//! - get/set/remove/flush operations plus ordered bulk retrieval
//! - compute-on-miss lookup with a caller-supplied loader
//! - file lifecycle helpers (create, strict open, open-or-create, delete)
//!
//! A backing file must be owned by a single [`Stash`] for the lifetime of
//! use. Sharing one file across instances, threads or processes is not
//! coordinated and is unsupported.

mod error;
mod persist;
mod store;

pub use error::{Result, StashError};
pub use serde_yaml::{Mapping, Value};
pub use store::Stash;
