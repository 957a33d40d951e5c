//! Core data structures.
//!
//! - Package model and metadata read from sibling files
//! - Extension module descriptors
//! - Host operating system identity

pub mod extension;
pub mod package;
pub mod platform;

pub use extension::ExtensionDescriptor;
pub use package::{Package, PackageMetadata};
pub use platform::HostOs;
