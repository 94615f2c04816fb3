//! Error types for reading compressed primitives.

use draco_decode::{DecodeError, EncodedGeometryType, UniqueId, UsageError};

/// Errors that can occur while resolving glTF data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The compressed blob could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The decode API was misused.
    #[error(transparent)]
    Usage(#[from] UsageError),
    /// The extension names a unique id the decoded mesh does not have.
    #[error("draco mesh does not contain attribute {unique_id} for {name}")]
    AttributeNotFound { name: String, unique_id: UniqueId },
    /// The buffer view holds something other than a triangular mesh.
    #[error("unsupported geometry type {0}")]
    UnsupportedGeometry(EncodedGeometryType),
    /// The extension object does not have the expected shape.
    #[error("invalid KHR_draco_mesh_compression extension: {0}")]
    Extension(#[source] serde_json::Error),
    /// Buffer data could not be resolved.
    #[error("buffer error: {0}")]
    Buffer(String),
    /// Accessor data could not be read.
    #[error("accessor error: {0}")]
    Accessor(String),
    /// The glTF document failed to parse or validate.
    #[error("glTF parse error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
