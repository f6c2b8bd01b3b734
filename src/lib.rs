//! ORAS artifact manifest schema
//!
//! This crate defines the `application/vnd.oras.artifact.manifest.v1+json`
//! document: an artifact made of content-addressed blobs and linked to a
//! subject manifest through an OCI content descriptor.
//!
//! The crate is a data contract only. It maps the manifest to and from JSON
//! and leaves digest computation, validation and registry transport to the
//! tools that consume it.

pub mod descriptor;
pub mod digest;
pub mod error;
pub mod manifest;
pub mod media_type;
pub mod schema;

// Re-export main schema types for convenience
pub use descriptor::{Descriptor, Platform};
pub use digest::Digest;
pub use error::{Error, Result};
pub use manifest::Manifest;
pub use schema::{DecodeOptions, FieldSpec, MANIFEST_FIELDS, UnknownFields};
