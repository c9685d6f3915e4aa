#![warn(missing_docs)]

//! Resource model for a CDMI endpoint: object identifiers, resource kinds
//! and their media types, and the four addressable resource types
//! (containers, data objects, domains and capability nodes) together with
//! their JSON wire representations.
//!
//! Every resource serializes to the flat JSON mapping that travels over the
//! wire; the [CdmiResource] trait is the seam through which stores and the
//! resolver handle all four kinds uniformly.

mod capability;
pub use capability::*;

mod container;
pub use container::*;

mod domain;
pub use domain::*;

mod error;
pub use error::*;

mod id;
pub use id::*;

mod kind;
pub use kind::*;

mod object;
pub use object::*;

mod path;
pub use path::*;

mod resource;
pub use resource::*;
