//! Where a named primitive attribute reads its data from.

use draco_decode::UniqueId;

use crate::accessor::AccessorIndex;
use crate::extension::PrimitiveExt;

/// Source of one named attribute of a primitive.
///
/// Compression metadata is per attribute: a primitive can mix compressed
/// and plain attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSource {
    /// The primitive has no attribute with that name.
    Absent,
    /// Read the accessor directly.
    Accessor(AccessorIndex),
    /// Extract from the compressed mesh. The accessor still describes the
    /// element type and count of the result.
    Compressed {
        accessor: AccessorIndex,
        unique_id: UniqueId,
    },
}

impl AttributeSource {
    /// Resolve `name` on `primitive`, given its compression metadata.
    #[must_use]
    pub fn resolve(primitive: &gltf::Primitive<'_>, ext: Option<&PrimitiveExt>, name: &str) -> Self {
        let accessor = primitive
            .attributes()
            .find(|(semantic, _)| semantic.to_string() == name)
            .map(|(_, accessor)| AccessorIndex(accessor.index()));
        Self::from_parts(accessor, ext, name)
    }

    /// Resolve from an already looked-up accessor index.
    #[must_use]
    pub fn from_parts(accessor: Option<AccessorIndex>, ext: Option<&PrimitiveExt>, name: &str) -> Self {
        let Some(accessor) = accessor else {
            return Self::Absent;
        };
        match ext.and_then(|ext| ext.unique_id(name)) {
            Some(unique_id) => Self::Compressed {
                accessor,
                unique_id,
            },
            None => Self::Accessor(accessor),
        }
    }
}
