//! Array Module
//!
//! Growable contiguous arrays of fixed-width elements.
//!
//! ## Responsibilities
//! - Amortized O(1) append through capacity doubling
//! - Eager halving when length drops below half the capacity
//! - Index arithmetic over a type-erased byte buffer
//! - Typed access for plain-old-data element types
//!
//! ## Buffer Layout
//! ```text
//! ┌──────────┬──────────┬─────┬──────────────┬─────────────────────┐
//! │ elem 0   │ elem 1   │ ... │ elem len-1   │ unused (to capacity)│
//! │ (width)  │ (width)  │     │ (width)      │                     │
//! └──────────┴──────────┴─────┴──────────────┴─────────────────────┘
//! ```
//!
//! Any operation that resizes invalidates previously borrowed element
//! slices; the borrow checker enforces this for safe callers.

mod dynamic;
mod typed;

pub use dynamic::{DynArray, Rendered};
pub use typed::Array;
