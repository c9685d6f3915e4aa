#![warn(missing_docs)]

//! Resource stores for a CDMI endpoint.
//!
//! A [ResourceStore] persists one kind of CDMI resource, keyed both by
//! hierarchical path and by object id. Store misses are always the `None`
//! arm of an `Ok` so that callers can compose fallback probing by ordered
//! short-circuit rather than by catching errors.
//!
//! Two interchangeable backends are provided: [MemoryResourceStore] keeps
//! everything in process memory, [FileSystemResourceStore] lays JSON
//! documents out under a root directory. The per-kind stores of a
//! deployment share a [Membership] child index, bundled behind the
//! [ResourceStores] provider trait as [MemoryStores] or
//! [FileSystemStores].

mod error;
pub use error::*;

mod fs;
pub use fs::*;

mod membership;
pub use membership::*;

mod memory;
pub use memory::*;

mod store;
pub use store::*;
