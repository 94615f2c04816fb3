//! Decode entry points.

use crate::attribute::PointAttribute;
use crate::buffer::DecoderBuffer;
use crate::error::{DecodeError, DecodeResult, Error, UsageError};
use crate::header::{EncoderMethod, check_version, decode_header};
use crate::mesh::Mesh;
use crate::metadata::{GeometryMetadata, decode_geometry_metadata};
use crate::point_cloud::PointCloud;
use crate::sequential;
use crate::types::{EncodedGeometryType, Face};

/// Everything a successful decode produces, before it lands in a store.
struct Decoded {
    num_points: u32,
    attributes: Vec<PointAttribute>,
    metadata: Option<GeometryMetadata>,
    faces: Vec<Face>,
}

/// Decodes whole blobs into [`PointCloud`]s and [`Mesh`]es.
///
/// Stateless; one decoder can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decode a point cloud blob.
    ///
    /// Fails if the blob declares a mesh.
    #[tracing::instrument(skip_all, fields(len = data.len()))]
    pub fn decode_point_cloud(&self, data: &[u8]) -> DecodeResult<PointCloud> {
        let decoded = decode(data, EncodedGeometryType::PointCloud)?;
        let mut pc = PointCloud::new();
        pc.populate(decoded.num_points, decoded.attributes, decoded.metadata);
        Ok(pc)
    }

    /// Decode a triangular mesh blob.
    ///
    /// Fails if the blob declares a point cloud.
    #[tracing::instrument(skip_all, fields(len = data.len()))]
    pub fn decode_mesh(&self, data: &[u8]) -> DecodeResult<Mesh> {
        let mut mesh = Mesh::new();
        fill_mesh(&mut mesh, decode(data, EncodedGeometryType::TriangularMesh)?);
        Ok(mesh)
    }

    /// Decode into an existing, still empty store.
    #[tracing::instrument(skip_all, fields(len = data.len()))]
    pub fn decode_point_cloud_into(&self, data: &[u8], pc: &mut PointCloud) -> Result<(), Error> {
        if pc.is_populated() {
            return Err(UsageError::AlreadyDecoded.into());
        }
        let decoded = decode(data, EncodedGeometryType::PointCloud)?;
        pc.populate(decoded.num_points, decoded.attributes, decoded.metadata);
        Ok(())
    }

    /// Decode into an existing, still empty mesh.
    #[tracing::instrument(skip_all, fields(len = data.len()))]
    pub fn decode_mesh_into(&self, data: &[u8], mesh: &mut Mesh) -> Result<(), Error> {
        if mesh.is_populated() {
            return Err(UsageError::AlreadyDecoded.into());
        }
        fill_mesh(mesh, decode(data, EncodedGeometryType::TriangularMesh)?);
        Ok(())
    }
}

fn fill_mesh(mesh: &mut Mesh, decoded: Decoded) {
    let (pc, faces) = mesh.parts_mut();
    pc.populate(decoded.num_points, decoded.attributes, decoded.metadata);
    *faces = decoded.faces;
}

fn decode(data: &[u8], expected: EncodedGeometryType) -> DecodeResult<Decoded> {
    let mut buffer = DecoderBuffer::new(data);
    let header = decode_header(&mut buffer)?;
    tracing::debug!(
        version = ?header.version,
        geometry = %header.geometry_type,
        method = ?header.method,
        flags = header.flags,
        "parsed header"
    );

    if header.geometry_type != expected {
        return Err(DecodeError::draco(
            "Using incompatible decoder for the input geometry.",
        ));
    }
    check_version(&header)?;
    buffer.set_version(header.version);

    match header.method {
        EncoderMethod::Sequential => {}
        EncoderMethod::Edgebreaker => {
            return Err(DecodeError::unsupported(
                "Edgebreaker connectivity is not supported.",
            ));
        }
        EncoderMethod::Other(method) => {
            tracing::debug!(method, "unknown encoder method");
            return Err(DecodeError::draco("Unsupported encoding method."));
        }
    }

    let metadata = if header.has_metadata() {
        Some(decode_geometry_metadata(&mut buffer)?)
    } else {
        None
    };

    let (num_points, faces) = match expected {
        EncodedGeometryType::TriangularMesh => sequential::decode_connectivity(&mut buffer)?,
        _ => (sequential::decode_point_count(&mut buffer)?, Vec::new()),
    };
    let attributes = sequential::decode_attributes(&mut buffer, num_points)?;

    Ok(Decoded {
        num_points,
        attributes,
        metadata,
        faces,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::Status;
    use crate::fixture::{FixtureAttribute, SequentialBlob};
    use crate::metadata::Metadata;
    use crate::types::{DataType, GeometryAttributeType, UniqueId};

    fn triangle() -> SequentialBlob {
        SequentialBlob::mesh(3, vec![[0, 1, 2]]).attribute(FixtureAttribute::new(
            GeometryAttributeType::Position,
            DataType::Uint8,
            3,
            false,
            vec![0, 0, 0, 1, 0, 0, 0, 1, 0],
        ))
    }

    #[test]
    fn garbage_mesh_blob() {
        let err = Decoder::new().decode_mesh(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.code(), -2);
        assert_eq!(err.message, "Failed to parse Draco header.");
    }

    #[test]
    fn mismatched_geometry_kinds() {
        let mesh = triangle().build();
        let err = Decoder::new().decode_point_cloud(&mesh).unwrap_err();
        assert_eq!(err.status, Status::DracoError);
        assert_eq!(err.message, "Using incompatible decoder for the input geometry.");

        let pc = SequentialBlob::point_cloud(0).build();
        let err = Decoder::new().decode_mesh(&pc).unwrap_err();
        assert_eq!(err.message, "Using incompatible decoder for the input geometry.");
        assert!(Decoder::new().decode_point_cloud(&pc).is_ok());
    }

    #[test]
    fn newer_bitstreams_are_unknown() {
        let blob = triangle().version(2, 3).build();
        let err = Decoder::new().decode_mesh(&blob).unwrap_err();
        assert_eq!(err.status, Status::UnknownVersion);
    }

    #[test]
    fn edgebreaker_is_unsupported() {
        let mut blob = triangle().build();
        blob[8] = 1;
        let err = Decoder::new().decode_mesh(&blob).unwrap_err();
        assert_eq!(err.code(), -6);
    }

    #[test]
    fn decodes_triangle_with_metadata() {
        let mut attribute = Metadata::default();
        attribute.insert_entry("name", b"position".to_vec());
        let metadata =
            GeometryMetadata::from_parts(Metadata::default(), BTreeMap::from([(UniqueId(0), attribute)]));
        let blob = triangle().metadata(metadata.clone()).build();

        let mesh = Decoder::new().decode_mesh(&blob).unwrap();
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.metadata(), Some(&metadata));
        assert_eq!(
            mesh.metadata().and_then(|m| m.find_attribute("name", "position")),
            Some(UniqueId(0))
        );
    }

    #[test]
    fn legacy_mesh_versions() {
        for (major, minor) in [(1, 0), (1, 2), (1, 3), (2, 0), (2, 1)] {
            let blob = triangle().version(major, minor).build();
            let mesh = Decoder::new().decode_mesh(&blob).unwrap();
            assert_eq!(mesh.faces(Vec::new()), vec![[0, 1, 2]], "{major}.{minor}");
            assert_eq!(mesh.attr(0).unwrap().data()[3], 1);
        }
    }

    #[test]
    fn populate_once() {
        let blob = triangle().build();
        let mut mesh = Mesh::new();
        Decoder::new().decode_mesh_into(&blob, &mut mesh).unwrap();
        assert_eq!(
            Decoder::new().decode_mesh_into(&blob, &mut mesh),
            Err(Error::Usage(UsageError::AlreadyDecoded))
        );

        let mut pc = PointCloud::new();
        let err = Decoder::new().decode_point_cloud_into(&[1, 2, 3], &mut pc).unwrap_err();
        assert!(matches!(err, Error::Decode(e) if e.code() == -2));
        assert!(!pc.is_populated());
    }

    #[test]
    fn truncated_attribute_values() {
        let mut blob = triangle().build();
        blob.pop();
        let err = Decoder::new().decode_mesh(&blob).unwrap_err();
        assert_eq!(err.message, "Failed to decode point attributes.");
    }
}
