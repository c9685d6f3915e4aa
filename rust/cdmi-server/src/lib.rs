#![warn(missing_docs)]

//! The request-resolution and partial-representation engine of a CDMI
//! endpoint.
//!
//! Incoming identifiers are ambiguous: the same path string can denote a
//! container, a data object or a domain, and clients are not required to
//! know which. The [ResourceResolver] disambiguates by probing the
//! per-kind stores in a fixed priority order, then shrinks the resolved
//! JSON representation through the byte-range and field/range selectors
//! before it goes out on the wire.
//!
//! The crate also carries the capability bootstrap run once at startup and
//! the axum HTTP surface binding the whole thing to the CDMI wire
//! contract.

mod bootstrap;
pub use bootstrap::*;

mod cli;
pub use cli::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod http;
pub use http::*;

mod media;
pub use media::*;

mod range;
pub use range::*;

mod resolve;
pub use resolve::*;

mod select;
pub use select::*;
