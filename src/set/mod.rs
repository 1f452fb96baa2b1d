//! Hash Set Module
//!
//! Open-addressing set of owned byte blobs.
//!
//! ## Responsibilities
//! - Linear probing from `hash(blob) mod capacity`
//! - Tombstone-based deletion
//! - Growth and shrink by full rebuild (the only way tombstones are cleared)
//! - Set algebra built on insert/remove/contains
//!
//! ## Slot States
//! ```text
//!            insert                remove
//!   Empty ──────────▶ Occupied ──────────▶ Tombstone
//!                        ▲                     │
//!                        └──────── insert ─────┘
//!
//!   rebuild: Occupied entries are re-placed, everything else becomes Empty
//! ```
//!
//! Two blobs are equal when they have the same length and bytes.

mod algebra;
mod hash;
mod table;

pub use hash::hash_blob;
pub use table::{BlobSet, Iter};
