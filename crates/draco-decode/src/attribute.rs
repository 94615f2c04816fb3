//! Point attribute descriptors and their decoded storage.

use crate::types::{DataType, GeometryAttributeType, UniqueId};

/// One typed per-point attribute of a decoded geometry.
///
/// The descriptor fields are fixed at decode time. The value storage is a
/// little-endian byte buffer laid out with [`byte_stride`](Self::byte_stride)
/// and [`byte_offset`](Self::byte_offset), one entry per point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointAttribute {
    attribute_type: GeometryAttributeType,
    data_type: DataType,
    num_components: u8,
    normalized: bool,
    byte_stride: usize,
    byte_offset: usize,
    unique_id: UniqueId,
    data: Vec<u8>,
}

impl PointAttribute {
    /// Descriptor with tightly packed, not yet filled storage.
    pub(crate) fn new(
        attribute_type: GeometryAttributeType,
        data_type: DataType,
        num_components: u8,
        normalized: bool,
        unique_id: UniqueId,
    ) -> Self {
        let byte_stride = data_type.size().unwrap_or(0) * usize::from(num_components);
        Self {
            attribute_type,
            data_type,
            num_components,
            normalized,
            byte_stride,
            byte_offset: 0,
            unique_id,
            data: Vec::new(),
        }
    }

    pub(crate) fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    #[must_use]
    pub fn attribute_type(&self) -> GeometryAttributeType {
        self.attribute_type
    }

    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    #[must_use]
    pub fn num_components(&self) -> u8 {
        self.num_components
    }

    /// Whether integer values map to `[0, 1]` (or `[-1, 1]`) when read as floats.
    #[must_use]
    pub fn normalized(&self) -> bool {
        self.normalized
    }

    /// Distance in bytes between the entries of consecutive points.
    #[must_use]
    pub fn byte_stride(&self) -> usize {
        self.byte_stride
    }

    /// Offset in bytes of the first entry.
    #[must_use]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    #[must_use]
    pub fn unique_id(&self) -> UniqueId {
        self.unique_id
    }

    /// Raw storage.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of the entry belonging to `point`, `None` past the storage.
    pub(crate) fn entry(&self, point: usize) -> Option<&[u8]> {
        let size = self.data_type.size()? * usize::from(self.num_components);
        let start = point
            .checked_mul(self.byte_stride)?
            .checked_add(self.byte_offset)?;
        self.data.get(start..start.checked_add(size)?)
    }
}
