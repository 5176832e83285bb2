//! Data models for the report platform
//!
//! Request, artifact, and organization types shared by the catalog, the
//! dispatcher, and the HTTP surface.

mod artifact;
mod org;
mod request;

pub use artifact::*;
pub use org::*;
pub use request::*;
