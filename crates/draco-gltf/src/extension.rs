//! The `KHR_draco_mesh_compression` primitive extension.

use std::collections::BTreeMap;

use draco_decode::UniqueId;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Extension key on mesh primitives.
pub const EXTENSION_NAME: &str = "KHR_draco_mesh_compression";

/// Compression metadata attached to one primitive.
///
/// ```json
/// "KHR_draco_mesh_compression": {
///     "bufferView": 5,
///     "attributes": { "POSITION": 0, "NORMAL": 1 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveExt {
    /// Buffer view holding the compressed mesh.
    pub buffer_view: usize,
    /// Attribute name to unique id inside the compressed mesh.
    #[serde(default)]
    pub attributes: BTreeMap<String, u32>,
}

impl PrimitiveExt {
    /// Parse an extension object.
    pub fn parse(value: &serde_json::Value) -> Result<Self> {
        Self::deserialize(value).map_err(Error::Extension)
    }

    /// The extension of `primitive`, `None` if absent or malformed.
    #[must_use]
    pub fn from_primitive(primitive: &gltf::Primitive<'_>) -> Option<Self> {
        let value = primitive.extension_value(EXTENSION_NAME)?;
        match Self::parse(value) {
            Ok(ext) => Some(ext),
            Err(err) => {
                tracing::debug!(primitive = primitive.index(), %err, "ignoring malformed extension");
                None
            }
        }
    }

    /// Unique id of the compressed attribute called `name`.
    #[must_use]
    pub fn unique_id(&self, name: &str) -> Option<UniqueId> {
        self.attributes.get(name).copied().map(UniqueId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_extension_object() {
        let ext = PrimitiveExt::parse(&json!({
            "bufferView": 5,
            "attributes": {
                "POSITION": 0,
                "NORMAL": 1,
                "TEXCOORD_0": 2,
                "WEIGHTS_0": 3,
                "JOINTS_0": 4
            }
        }))
        .unwrap();
        assert_eq!(ext.buffer_view, 5);
        assert_eq!(ext.attributes.len(), 5);
        assert_eq!(ext.unique_id("JOINTS_0"), Some(UniqueId(4)));
        assert_eq!(ext.unique_id("COLOR_0"), None);
    }

    #[test]
    fn ignores_unknown_fields() {
        let ext = PrimitiveExt::parse(&json!({
            "bufferView": 1,
            "attributes": {},
            "extras": { "note": true }
        }))
        .unwrap();
        assert_eq!(ext, PrimitiveExt { buffer_view: 1, attributes: BTreeMap::new() });
    }

    #[test]
    fn rejects_malformed_objects() {
        assert!(matches!(PrimitiveExt::parse(&json!(null)), Err(Error::Extension(_))));
        assert!(PrimitiveExt::parse(&json!({ "attributes": {} })).is_err());
        assert!(PrimitiveExt::parse(&json!({ "bufferView": -1 })).is_err());
    }
}
