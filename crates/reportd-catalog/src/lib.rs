//! Report catalog and generator registry.
//!
//! The catalog is built once at startup by scanning the reports directory
//! and extracting each report's display name from its header. The registry
//! is the registration table mapping report ids to generator
//! implementations; the dispatcher resolves through it at request time.

pub mod catalog;
pub mod registry;

pub use catalog::{Catalog, CatalogError, ReportDescriptor};
pub use registry::{GenerateError, GeneratorRegistry, GeneratorRegistryBuilder, ReportGenerator};
