//! Decoded point clouds.

use crate::attribute::PointAttribute;
use crate::component::Component;
use crate::error::UsageError;
use crate::extract::{self, AttributeBuffer};
use crate::metadata::GeometryMetadata;
use crate::types::{GeometryAttributeType, UniqueId};

/// A set of points carrying typed attributes.
///
/// Created empty, populated once by a [`Decoder`](crate::Decoder) and
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    num_points: u32,
    attributes: Vec<PointAttribute>,
    metadata: Option<GeometryMetadata>,
    populated: bool,
}

impl PointCloud {
    /// An empty, unpopulated store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn populate(
        &mut self,
        num_points: u32,
        attributes: Vec<PointAttribute>,
        metadata: Option<GeometryMetadata>,
    ) {
        self.num_points = num_points;
        self.attributes = attributes;
        self.metadata = metadata;
        self.populated = true;
    }

    /// Whether a decode has filled this store.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    #[must_use]
    pub fn num_points(&self) -> u32 {
        self.num_points
    }

    #[must_use]
    pub fn num_attrs(&self) -> usize {
        self.attributes.len()
    }

    /// Attribute at position `index`.
    #[must_use]
    pub fn attr(&self, index: usize) -> Option<&PointAttribute> {
        self.attributes.get(index)
    }

    pub fn attrs(&self) -> impl ExactSizeIterator<Item = &PointAttribute> {
        self.attributes.iter()
    }

    /// Attribute carrying `id`. `None` is an ordinary outcome.
    #[must_use]
    pub fn attr_by_unique_id(&self, id: UniqueId) -> Option<&PointAttribute> {
        self.attributes.iter().find(|a| a.unique_id() == id)
    }

    /// Position of the first attribute with semantic `attribute_type`.
    #[must_use]
    pub fn named_attribute_id(&self, attribute_type: GeometryAttributeType) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.attribute_type() == attribute_type)
    }

    /// Metadata decoded with the geometry, if the blob carried any.
    #[must_use]
    pub fn metadata(&self) -> Option<&GeometryMetadata> {
        self.metadata.as_ref()
    }

    /// Extract `attribute` into `buffer`, or a new buffer of its own type.
    ///
    /// See [`extract::extract`].
    pub fn attribute_data(
        &self,
        attribute: &PointAttribute,
        buffer: Option<AttributeBuffer>,
    ) -> Result<(AttributeBuffer, bool), UsageError> {
        extract::extract(self, attribute, buffer)
    }

    /// Extract `attribute` into a vector of a statically known element type.
    pub fn attribute_data_into<T: Component>(
        &self,
        attribute: &PointAttribute,
        buffer: &mut Vec<T>,
    ) -> bool {
        extract::fill(self.num_points as usize, attribute, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Decoder;
    use crate::fixture::{FixtureAttribute, SequentialBlob};
    use crate::types::DataType;

    fn two_attributes() -> PointCloud {
        let blob = SequentialBlob::point_cloud(2)
            .attribute(FixtureAttribute::new(
                GeometryAttributeType::Position,
                DataType::Float32,
                3,
                false,
                [0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0]
                    .iter()
                    .flat_map(|v| v.to_le_bytes())
                    .collect(),
            ))
            .attribute(
                FixtureAttribute::new(
                    GeometryAttributeType::TexCoord,
                    DataType::Uint16,
                    2,
                    true,
                    vec![0, 0, 255, 255, 0, 128, 0, 0],
                )
                .with_unique_id(9),
            )
            .build();
        Decoder::new().decode_point_cloud(&blob).unwrap()
    }

    #[test]
    fn lookup_by_unique_id_and_semantic() {
        let pc = two_attributes();
        assert_eq!(pc.num_points(), 2);
        assert_eq!(pc.num_attrs(), 2);
        assert_eq!(
            pc.attr_by_unique_id(UniqueId(9)).map(PointAttribute::attribute_type),
            Some(GeometryAttributeType::TexCoord)
        );
        assert!(pc.attr_by_unique_id(UniqueId(1)).is_none());
        assert_eq!(pc.named_attribute_id(GeometryAttributeType::TexCoord), Some(1));
        assert_eq!(pc.named_attribute_id(GeometryAttributeType::Normal), None);
        assert!(pc.metadata().is_none());
    }

    #[test]
    fn typed_extraction_into_vec() {
        let pc = two_attributes();
        let mut positions = Vec::<f64>::new();
        assert!(pc.attribute_data_into(pc.attr(0).unwrap(), &mut positions));
        assert_eq!(positions, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        let mut uv = vec![7u32; 1];
        assert!(pc.attribute_data_into(pc.attr(1).unwrap(), &mut uv));
        assert_eq!(uv, vec![0, 65535, 32768, 0]);
    }

    #[test]
    fn unpopulated_store_drops_cleanly() {
        let pc = PointCloud::new();
        assert!(!pc.is_populated());
        assert_eq!(pc.num_attrs(), 0);
        drop(pc);
    }
}
