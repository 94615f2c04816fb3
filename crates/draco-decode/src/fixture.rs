//! Blob writer for the uncompressed sequential subset.
//!
//! Only used to build test inputs. The writer emits exactly what the
//! decoder reads: a header, optional metadata, the geometry section
//! (point count, or raw connectivity for meshes) and one sequential
//! attributes decoder holding every attribute.

use crate::buffer::Version;
use crate::component::{Value, read_value};
use crate::header::METADATA_FLAG_MASK;
use crate::metadata::{GeometryMetadata, Metadata};
use crate::types::{DataType, EncodedGeometryType, Face, GeometryAttributeType};
use crate::varint::write_varint;

/// How an attribute's values are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributeEncoding {
    /// Raw little-endian values.
    #[default]
    Generic,
    /// Zig-zag symbols without prediction, uncompressed.
    Integer,
}

/// One attribute to write.
#[derive(Debug, Clone)]
pub struct FixtureAttribute {
    pub attribute_type: GeometryAttributeType,
    pub data_type: DataType,
    pub num_components: u8,
    pub normalized: bool,
    /// Defaults to the attribute's position.
    pub unique_id: Option<u32>,
    pub encoding: AttributeEncoding,
    /// Little-endian values, `num_points * num_components` of `data_type`.
    pub values: Vec<u8>,
}

impl FixtureAttribute {
    pub fn new(
        attribute_type: GeometryAttributeType,
        data_type: DataType,
        num_components: u8,
        normalized: bool,
        values: Vec<u8>,
    ) -> Self {
        Self {
            attribute_type,
            data_type,
            num_components,
            normalized,
            unique_id: None,
            encoding: AttributeEncoding::Generic,
            values,
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: AttributeEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_unique_id(mut self, id: u32) -> Self {
        self.unique_id = Some(id);
        self
    }
}

/// Builder for a sequentially encoded point cloud or mesh.
#[derive(Debug, Clone)]
pub struct SequentialBlob {
    geometry_type: EncodedGeometryType,
    version: Version,
    num_points: u32,
    faces: Vec<Face>,
    attributes: Vec<FixtureAttribute>,
    metadata: Option<GeometryMetadata>,
}

impl SequentialBlob {
    pub fn point_cloud(num_points: u32) -> Self {
        Self {
            geometry_type: EncodedGeometryType::PointCloud,
            version: (2, 3),
            num_points,
            faces: Vec::new(),
            attributes: Vec::new(),
            metadata: None,
        }
    }

    pub fn mesh(num_points: u32, faces: Vec<Face>) -> Self {
        Self {
            geometry_type: EncodedGeometryType::TriangularMesh,
            version: (2, 2),
            num_points,
            faces,
            attributes: Vec::new(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn version(mut self, major: u8, minor: u8) -> Self {
        self.version = (major, minor);
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: FixtureAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: GeometryMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = b"DRACO".to_vec();
        let kind = match self.geometry_type {
            EncodedGeometryType::TriangularMesh => 1,
            _ => 0,
        };
        out.extend_from_slice(&[self.version.0, self.version.1, kind, 0]);
        let flags = if self.metadata.is_some() {
            METADATA_FLAG_MASK
        } else {
            0
        };
        out.extend_from_slice(&flags.to_le_bytes());

        if let Some(metadata) = &self.metadata {
            write_geometry_metadata(&mut out, metadata);
        }

        match self.geometry_type {
            EncodedGeometryType::TriangularMesh => self.write_connectivity(&mut out),
            _ => out.extend_from_slice(&self.num_points.to_le_bytes()),
        }

        self.write_attributes(&mut out);
        out
    }

    fn write_count(&self, out: &mut Vec<u8>, switch_version: Version, value: u32) {
        if self.version < switch_version {
            out.extend_from_slice(&value.to_le_bytes());
        } else {
            write_varint(out, u64::from(value));
        }
    }

    fn write_connectivity(&self, out: &mut Vec<u8>) {
        self.write_count(out, (2, 2), self.faces.len() as u32);
        self.write_count(out, (2, 2), self.num_points);
        // Uncompressed connectivity.
        out.push(1);
        for &index in self.faces.iter().flatten() {
            if self.num_points < 1 << 8 {
                out.push(index as u8);
            } else if self.num_points < 1 << 16 {
                out.extend_from_slice(&(index as u16).to_le_bytes());
            } else if self.num_points < 1 << 21 && self.version >= (2, 2) {
                write_varint(out, u64::from(index));
            } else {
                out.extend_from_slice(&index.to_le_bytes());
            }
        }
    }

    fn write_attributes(&self, out: &mut Vec<u8>) {
        if self.attributes.is_empty() {
            out.push(0);
            return;
        }
        out.push(1);
        self.write_count(out, (2, 0), self.attributes.len() as u32);
        for (i, attribute) in self.attributes.iter().enumerate() {
            out.push(attribute.attribute_type.to_u8());
            out.push(attribute.data_type.to_u8());
            out.push(attribute.num_components);
            out.push(u8::from(attribute.normalized));
            let id = attribute.unique_id.unwrap_or(i as u32);
            if self.version < (1, 3) {
                out.extend_from_slice(&(id as u16).to_le_bytes());
            } else {
                write_varint(out, u64::from(id));
            }
        }
        for attribute in &self.attributes {
            out.push(match attribute.encoding {
                AttributeEncoding::Generic => 0,
                AttributeEncoding::Integer => 1,
            });
        }
        for attribute in &self.attributes {
            match attribute.encoding {
                AttributeEncoding::Generic => out.extend_from_slice(&attribute.values),
                AttributeEncoding::Integer => write_integer_values(out, attribute),
            }
        }
    }
}

fn write_integer_values(out: &mut Vec<u8>, attribute: &FixtureAttribute) {
    let size = attribute.data_type.size().unwrap_or(1);
    let symbols: Vec<u32> = attribute
        .values
        .chunks_exact(size)
        .map(|bytes| {
            let value = match read_value(attribute.data_type, bytes) {
                Some(Value::Integer { value, .. }) => value as i32,
                _ => 0,
            };
            ((value << 1) ^ (value >> 31)) as u32
        })
        .collect();
    let max = symbols.iter().copied().max().unwrap_or(0);
    let num_bytes = (32 - max.leading_zeros()).div_ceil(8).max(1) as usize;

    // No prediction, uncompressed.
    out.push((-2i8).to_le_bytes()[0]);
    out.push(0);
    out.push(num_bytes as u8);
    for symbol in symbols {
        out.extend_from_slice(&symbol.to_le_bytes()[..num_bytes]);
    }
}

/// Append the metadata section for `metadata`.
pub fn write_geometry_metadata(out: &mut Vec<u8>, metadata: &GeometryMetadata) {
    let attributes: Vec<_> = metadata.attribute_entries().collect();
    write_varint(out, attributes.len() as u64);
    for (id, attribute) in attributes {
        write_varint(out, u64::from(id.0));
        write_metadata(out, attribute);
    }
    write_metadata(out, metadata.file_metadata());
}

fn write_name(out: &mut Vec<u8>, name: &str) {
    out.push(name.len() as u8);
    out.extend_from_slice(name.as_bytes());
}

fn write_metadata(out: &mut Vec<u8>, metadata: &Metadata) {
    let entries: Vec<_> = metadata.entries().collect();
    write_varint(out, entries.len() as u64);
    for (name, value) in entries {
        write_name(out, name);
        write_varint(out, value.len() as u64);
        out.extend_from_slice(value);
    }
    let subs: Vec<_> = metadata.sub_metadatas().collect();
    write_varint(out, subs.len() as u64);
    for (name, sub) in subs {
        write_name(out, name);
        write_metadata(out, sub);
    }
}
