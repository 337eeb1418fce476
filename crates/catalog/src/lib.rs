//! Catalog registry and lending store.
//!
//! This crate owns the lending workflow: the [`Catalog`] registry that
//! creates and closes loans, its snapshot/restore contract, and the
//! [`CatalogStore`] abstraction with an in-memory implementation that
//! serializes mutations for concurrent callers.

mod catalog;
mod error;
mod memory;
mod snapshot;
mod traits;

pub use catalog::*;
pub use error::*;
pub use memory::*;
pub use snapshot::*;
pub use traits::*;
