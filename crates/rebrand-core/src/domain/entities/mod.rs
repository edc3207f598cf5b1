//! Domain entities.

pub mod manifest;
pub mod workspace;

pub use manifest::{Author, ManifestFields, MetadataOverrides};
pub use workspace::Workspace;
