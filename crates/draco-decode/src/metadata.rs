//! Geometry metadata.
//!
//! Blobs whose header sets the metadata flag carry a metadata section
//! between the header and the geometry payload: a list of per-attribute
//! metadata keyed by unique id, followed by the file-level metadata. Each
//! metadata is a set of named byte entries plus named nested metadata.

use std::collections::BTreeMap;

use crate::buffer::DecoderBuffer;
use crate::error::{DecodeError, DecodeResult};
use crate::types::UniqueId;

/// Nesting bound for sub-metadata.
const MAX_DEPTH: usize = 32;

/// Named entries and nested metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: BTreeMap<String, Vec<u8>>,
    sub_metadatas: BTreeMap<String, Metadata>,
}

impl Metadata {
    /// Raw bytes of an entry.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// An entry interpreted as UTF-8 text.
    #[must_use]
    pub fn entry_str(&self, name: &str) -> Option<&str> {
        std::str::from_utf8(self.entry(name)?).ok()
    }

    /// An entry interpreted as a little-endian `i32`.
    #[must_use]
    pub fn entry_i32(&self, name: &str) -> Option<i32> {
        let bytes: [u8; 4] = self.entry(name)?.try_into().ok()?;
        Some(i32::from_le_bytes(bytes))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn sub_metadata(&self, name: &str) -> Option<&Metadata> {
        self.sub_metadatas.get(name)
    }

    #[cfg(any(test, feature = "test-tools"))]
    pub fn insert_entry(&mut self, name: impl Into<String>, value: Vec<u8>) {
        self.entries.insert(name.into(), value);
    }

    #[cfg(any(test, feature = "test-tools"))]
    pub(crate) fn sub_metadatas(&self) -> impl Iterator<Item = (&str, &Metadata)> {
        self.sub_metadatas.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// File-level metadata plus metadata attached to individual attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryMetadata {
    file: Metadata,
    attributes: BTreeMap<UniqueId, Metadata>,
}

impl GeometryMetadata {
    #[must_use]
    pub fn file_metadata(&self) -> &Metadata {
        &self.file
    }

    #[must_use]
    pub fn attribute_metadata(&self, id: UniqueId) -> Option<&Metadata> {
        self.attributes.get(&id)
    }

    /// Find the attribute whose metadata has entry `name` equal to `value`.
    ///
    /// Encoders commonly tag attributes with a `"name"` entry.
    #[must_use]
    pub fn find_attribute(&self, name: &str, value: &str) -> Option<UniqueId> {
        self.attributes
            .iter()
            .find(|(_, m)| m.entry_str(name) == Some(value))
            .map(|(id, _)| *id)
    }

    #[cfg(any(test, feature = "test-tools"))]
    pub fn from_parts(file: Metadata, attributes: BTreeMap<UniqueId, Metadata>) -> Self {
        Self { file, attributes }
    }

    #[cfg(any(test, feature = "test-tools"))]
    pub(crate) fn attribute_entries(&self) -> impl Iterator<Item = (UniqueId, &Metadata)> {
        self.attributes.iter().map(|(id, m)| (*id, m))
    }
}

fn metadata_error() -> DecodeError {
    DecodeError::draco("Failed to decode metadata.")
}

pub(crate) fn decode_geometry_metadata(
    buffer: &mut DecoderBuffer<'_>,
) -> DecodeResult<GeometryMetadata> {
    let num_attribute_metadata = buffer.varint_u32().ok_or_else(metadata_error)?;
    let mut attributes = BTreeMap::new();
    for _ in 0..num_attribute_metadata {
        let id = UniqueId(buffer.varint_u32().ok_or_else(metadata_error)?);
        let metadata = decode_metadata(buffer, 0)?;
        attributes.insert(id, metadata);
    }
    let file = decode_metadata(buffer, 0)?;
    Ok(GeometryMetadata { file, attributes })
}

fn decode_name(buffer: &mut DecoderBuffer<'_>) -> DecodeResult<String> {
    let len = buffer.u8().ok_or_else(metadata_error)?;
    let bytes = buffer.bytes(usize::from(len)).ok_or_else(metadata_error)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| metadata_error())
}

fn decode_metadata(buffer: &mut DecoderBuffer<'_>, depth: usize) -> DecodeResult<Metadata> {
    if depth > MAX_DEPTH {
        tracing::debug!(depth, "metadata nesting too deep");
        return Err(metadata_error());
    }
    let mut metadata = Metadata::default();

    let num_entries = buffer.varint_u32().ok_or_else(metadata_error)?;
    for _ in 0..num_entries {
        let name = decode_name(buffer)?;
        let size = buffer.varint_u32().ok_or_else(metadata_error)? as usize;
        if size == 0 || size > buffer.remaining() {
            return Err(metadata_error());
        }
        let value = buffer.bytes(size).ok_or_else(metadata_error)?;
        metadata.entries.insert(name, value.to_vec());
    }

    let num_sub_metadata = buffer.varint_u32().ok_or_else(metadata_error)?;
    if num_sub_metadata as usize > buffer.remaining() {
        return Err(metadata_error());
    }
    for _ in 0..num_sub_metadata {
        let name = decode_name(buffer)?;
        let sub = decode_metadata(buffer, depth + 1)?;
        metadata.sub_metadatas.insert(name, sub);
    }

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::write_geometry_metadata;

    #[test]
    fn decodes_entries_and_nested_metadata() {
        let mut inner = Metadata::default();
        inner.insert_entry("unit", b"m".to_vec());
        let mut file = Metadata::default();
        file.insert_entry("scale", 7i32.to_le_bytes().to_vec());
        file.sub_metadatas.insert("space".into(), inner);
        let mut attribute = Metadata::default();
        attribute.insert_entry("name", b"uv_main".to_vec());
        let expected =
            GeometryMetadata::from_parts(file, BTreeMap::from([(UniqueId(1), attribute)]));

        let mut bytes = Vec::new();
        write_geometry_metadata(&mut bytes, &expected);
        let mut buffer = DecoderBuffer::new(&bytes);
        let decoded = decode_geometry_metadata(&mut buffer).unwrap();

        assert_eq!(decoded, expected);
        assert_eq!(buffer.remaining(), 0);
        assert_eq!(decoded.file_metadata().entry_i32("scale"), Some(7));
        assert_eq!(
            decoded
                .file_metadata()
                .sub_metadata("space")
                .and_then(|m| m.entry_str("unit")),
            Some("m")
        );
        assert_eq!(decoded.find_attribute("name", "uv_main"), Some(UniqueId(1)));
        assert_eq!(decoded.find_attribute("name", "missing"), None);
    }

    #[test]
    fn rejects_empty_entry() {
        // One attribute-less file metadata with one entry of size zero.
        let bytes = [0x00, 0x01, 0x01, b'a', 0x00, 0x00];
        let err = decode_geometry_metadata(&mut DecoderBuffer::new(&bytes)).unwrap_err();
        assert_eq!(err.message, "Failed to decode metadata.");
    }

    #[test]
    fn rejects_truncated_section() {
        let bytes = [0x01, 0x03];
        assert!(decode_geometry_metadata(&mut DecoderBuffer::new(&bytes)).is_err());
    }
}
