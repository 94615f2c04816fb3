//! A decoded compressed mesh in the context of its glTF document.

use draco_decode::{AttributeBuffer, Decoder, EncodedGeometryType, Mesh, probe_geometry_kind};

use crate::accessor::{read_accessor, shape_buffer};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::extension::PrimitiveExt;
use crate::resolve::AttributeSource;

/// The compressed mesh behind one primitive.
#[derive(Debug)]
pub struct DracoMesh {
    mesh: Mesh,
}

impl DracoMesh {
    /// Decode the mesh stored in `view`.
    pub fn unmarshal(document: &Document, view: &gltf::buffer::View<'_>) -> Result<Self> {
        Self::decode(document.view_data(view)?)
    }

    /// Decode a blob that must hold a triangular mesh.
    pub fn decode(data: &[u8]) -> Result<Self> {
        match probe_geometry_kind(data) {
            EncodedGeometryType::TriangularMesh => {}
            kind => return Err(Error::UnsupportedGeometry(kind)),
        }
        let mesh = Decoder::new().decode_mesh(data)?;
        Ok(Self { mesh })
    }

    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Flattened triangle indices, reusing `buffer`.
    #[must_use]
    pub fn read_indices(&self, mut buffer: Vec<u32>) -> Vec<u32> {
        buffer.clear();
        buffer.extend(self.mesh.face_slice().iter().flatten());
        buffer
    }

    /// Read the attribute `name` of `primitive`.
    ///
    /// Compressed attributes are extracted from this mesh into a buffer
    /// shaped like the primitive's accessor; others fall back to a plain
    /// accessor read. Returns `None` if the primitive has no such attribute.
    /// `buffer` is reused when its element type matches the accessor's.
    ///
    /// The flag is `false` when compressed values could not all be written:
    /// the attribute disagrees with the accessor's element count, or a value
    /// does not convert to the accessor's type. The buffer still has the
    /// accessor's length but its contents are unspecified.
    pub fn read_attr(
        &self,
        document: &Document,
        primitive: &gltf::Primitive<'_>,
        name: &str,
        buffer: Option<AttributeBuffer>,
    ) -> Result<Option<(AttributeBuffer, bool)>> {
        let ext = PrimitiveExt::from_primitive(primitive);
        let source = AttributeSource::resolve(primitive, ext.as_ref(), name);
        self.read_source(document, source, name, buffer)
    }

    pub(crate) fn read_source(
        &self,
        document: &Document,
        source: AttributeSource,
        name: &str,
        buffer: Option<AttributeBuffer>,
    ) -> Result<Option<(AttributeBuffer, bool)>> {
        let (accessor, unique_id) = match source {
            AttributeSource::Absent => return Ok(None),
            AttributeSource::Accessor(index) => {
                let accessor = document.accessor(index)?;
                let data = read_accessor(&accessor, document.buffers(), buffer)?;
                return Ok(Some((data, true)));
            }
            AttributeSource::Compressed {
                accessor,
                unique_id,
            } => (accessor, unique_id),
        };

        let attribute = self
            .mesh
            .attr_by_unique_id(unique_id)
            .ok_or_else(|| Error::AttributeNotFound {
                name: name.to_owned(),
                unique_id,
            })?;
        let accessor = document.accessor(accessor)?;
        let destination = shape_buffer(&accessor, buffer)?;

        let expected = destination.len();
        let available = self.mesh.num_points() as usize * usize::from(attribute.num_components());
        if available != expected {
            tracing::warn!(
                attribute = name,
                %unique_id,
                expected,
                available,
                "compressed attribute does not match its accessor"
            );
            return Ok(Some((destination, false)));
        }

        let (data, ok) = self.mesh.attribute_data(attribute, Some(destination))?;
        if !ok {
            tracing::warn!(
                attribute = name,
                %unique_id,
                source = %attribute.data_type(),
                target = %data.data_type(),
                "compressed attribute could not be fully converted"
            );
        }
        Ok(Some((data, ok)))
    }
}

#[cfg(test)]
mod tests {
    use draco_decode::fixture::SequentialBlob;

    use super::*;

    #[test]
    fn rejects_point_clouds() {
        let blob = SequentialBlob::point_cloud(3).build();
        assert!(matches!(
            DracoMesh::decode(&blob),
            Err(Error::UnsupportedGeometry(EncodedGeometryType::PointCloud))
        ));
        assert!(matches!(
            DracoMesh::decode(&[1, 2, 3]),
            Err(Error::UnsupportedGeometry(EncodedGeometryType::Invalid))
        ));
    }

    #[test]
    fn indices_are_flattened() {
        let blob = SequentialBlob::mesh(4, vec![[0, 1, 2], [2, 1, 3]]).build();
        let mesh = DracoMesh::decode(&blob).unwrap();
        let indices = mesh.read_indices(vec![9; 10]);
        assert_eq!(indices, vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(mesh.mesh().num_faces(), 2);
    }
}
