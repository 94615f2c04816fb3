//! Read `KHR_draco_mesh_compression` primitives like uncompressed ones.
//!
//! A compressed glTF primitive still lists its attributes by name, each
//! pointing at an accessor that describes the element type and count. The
//! extension maps some of those names to unique ids inside a Draco mesh
//! stored in a buffer view. This crate decodes that mesh and, per attribute
//! name, either extracts the compressed attribute into a buffer shaped like
//! the accessor or reads the accessor directly, so callers get the same
//! output for both.
//!
//! # Key types
//!
//! - [`Document`]: glTF document with resolved buffers, loaded through
//!   [`parse_gltf`] so compressed accessors without buffer views validate
//! - [`PrimitiveExt`]: the parsed extension object
//! - [`DracoMesh`]: decoded mesh with [`read_indices`](DracoMesh::read_indices)
//!   and [`read_attr`](DracoMesh::read_attr)
//! - [`AttributeSource`]: where a named attribute reads from

mod accessor;
mod buffers;
mod document;
mod error;
mod extension;
mod mesh;
mod resolve;

pub use accessor::{AccessorIndex, element_type, read_accessor};
pub use document::{DecodedPrimitive, Document, parse_gltf};
pub use error::{Error, Result};
pub use extension::{EXTENSION_NAME, PrimitiveExt};
pub use mesh::DracoMesh;
pub use resolve::AttributeSource;

pub use draco_decode;
