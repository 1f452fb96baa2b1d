//! # flatcoll
//!
//! Two in-memory container engines over raw bytes:
//! - A growable array of fixed-width elements with a doubling/halving
//!   capacity policy
//! - An open-addressing hash set of owned byte blobs with tombstone
//!   deletion, rebuild-based resizing and set algebra
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────┐
//! │      Array<T>        │        │      RecordSet       │
//! │   (typed facade)     │        │  (key/value records) │
//! └──────────┬───────────┘        └──────────┬───────────┘
//!            │                               │
//!            ▼                               ▼
//! ┌──────────────────────┐        ┌──────────────────────┐
//! │      DynArray        │        │       BlobSet        │
//! │ (width-erased bytes) │        │ (linear probing over │
//! │                      │        │  owned blob slots)   │
//! └──────────────────────┘        └──────────────────────┘
//! ```
//!
//! Both containers are single-owner and unsynchronized; wrap them in a
//! lock to share across threads.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod array;
pub mod set;
pub mod record;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FlatError, Result};
pub use config::Config;
pub use array::{Array, DynArray};
pub use set::{hash_blob, BlobSet};
pub use record::RecordSet;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of flatcoll
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
