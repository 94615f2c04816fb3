//! Decode Draco point clouds and meshes into typed attribute storage.
//!
//! This crate provides pure synchronous decoding of Draco blobs into an
//! in-memory geometry store, plus a typed extraction protocol that copies an
//! attribute's values into caller-owned buffers of any numeric element type.
//! All functions can be called from any threading context; a decoded store
//! is immutable and can be shared across threads.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Populate once**: A store is filled by exactly one successful decode
//! - **Reusable buffers**: Extraction grows caller buffers, never shrinks them
//! - **Errors are values**: Corrupt input yields [`DecodeError`], API misuse
//!   yields [`UsageError`]; nothing panics
//!
//! # Supported bitstreams
//!
//! Versions up to 2.2 (meshes) and 2.3 (point clouds) using the sequential
//! encoder method with uncompressed connectivity, and generic or
//! non-predicted integer attribute encodings. Other features are reported
//! with [`Status::UnsupportedFeature`].
//!
//! # Key functions
//!
//! - [`probe_geometry_kind`]: Read the geometry kind a blob declares
//! - [`Decoder::decode_point_cloud`] / [`Decoder::decode_mesh`]: Decode a blob
//! - [`extract`]: Copy one attribute into an [`AttributeBuffer`]
//! - [`Mesh::faces`]: Copy the faces into a reusable buffer

mod attribute;
mod buffer;
mod component;
mod decoder;
mod error;
mod header;
mod mesh;
mod metadata;
mod point_cloud;
mod sequential;
mod types;
mod varint;

pub mod extract;
#[cfg(any(test, feature = "test-tools"))]
pub mod fixture;

pub use attribute::PointAttribute;
pub use component::{Component, Value};
pub use decoder::Decoder;
pub use error::{DecodeError, DecodeResult, Error, Status, UsageError};
pub use extract::{AttributeBuffer, extract};
pub use header::probe_geometry_kind;
pub use mesh::Mesh;
pub use metadata::{GeometryMetadata, Metadata};
pub use point_cloud::PointCloud;
pub use types::{DataType, EncodedGeometryType, Face, GeometryAttributeType, UniqueId};
pub use varint::read_varint;
