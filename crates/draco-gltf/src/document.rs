//! A glTF document with resolved buffer data.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use draco_decode::AttributeBuffer;

use crate::accessor::AccessorIndex;
use crate::buffers::{resolve_buffers, view_data};
use crate::error::{Error, Result};
use crate::extension::{EXTENSION_NAME, PrimitiveExt};
use crate::mesh::DracoMesh;
use crate::resolve::AttributeSource;

/// Parsed glTF plus the bytes of every buffer.
#[derive(Debug)]
pub struct Document {
    document: gltf::Document,
    buffers: Vec<Vec<u8>>,
}

/// Everything read from one compressed primitive.
#[derive(Debug)]
pub struct DecodedPrimitive {
    /// Flattened triangle indices.
    pub indices: Vec<u32>,
    /// One entry per attribute name of the primitive, with the same
    /// completeness flag as [`DracoMesh::read_attr`]. A failed attribute does
    /// not affect the others.
    pub attributes: BTreeMap<String, Result<(AttributeBuffer, bool)>>,
}

/// Accessors read through a compressed primitive. They carry no buffer view.
///
/// A malformed extension leaves it unknown which attributes it covers, so
/// every accessor of that primitive counts.
fn compressed_accessors(root: &gltf::json::Root) -> BTreeSet<usize> {
    let mut accessors = BTreeSet::new();
    for primitive in root.meshes.iter().flat_map(|mesh| &mesh.primitives) {
        let Some(value) = primitive
            .extensions
            .as_ref()
            .and_then(|ext| ext.others.get(EXTENSION_NAME))
        else {
            continue;
        };
        let ext = PrimitiveExt::parse(value).ok();
        accessors.extend(primitive.indices.map(|index| index.value()));
        accessors.extend(
            primitive
                .attributes
                .iter()
                .filter(|(semantic, _)| {
                    ext.as_ref()
                        .is_none_or(|ext| ext.attributes.contains_key(&semantic.to_string()))
                })
                .map(|(_, index)| index.value()),
        );
    }
    accessors
}

/// Validate `root` like `gltf` does, except that the compression extension
/// may be required and compressed accessors may lack a buffer view.
fn validate(root: &gltf::json::Root) -> Result<()> {
    use gltf::json::validation::{Error as Invalid, Validate};

    let compressed = compressed_accessors(root);
    let exempt_views: BTreeSet<String> = compressed
        .iter()
        .map(|index| format!("accessors[{index}].bufferView"))
        .collect();

    let mut errors = Vec::new();
    root.validate(root, gltf::json::Path::new, &mut |path, error| {
        let path = path();
        let exempt = match error {
            Invalid::Missing => exempt_views.contains(path.as_str()),
            Invalid::Unsupported => path.as_str().starts_with("extensionsRequired[")
                && path.as_str().ends_with(&format!("= \"{EXTENSION_NAME}\"")),
            _ => false,
        };
        if !exempt {
            errors.push((path, error));
        }
    });

    if errors.is_empty() {
        Ok(())
    } else {
        Err(gltf::Error::Validation(errors).into())
    }
}

/// Parse and validate glTF or GLB data that may use the compression
/// extension.
pub fn parse_gltf(data: &[u8]) -> Result<gltf::Gltf> {
    let gltf = gltf::Gltf::from_slice_without_validation(data)?;
    validate(gltf.document.as_json())?;
    Ok(gltf)
}

impl Document {
    /// Load a `.gltf` or `.glb` whose buffers are embedded.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let gltf::Gltf { document, blob } = parse_gltf(data)?;
        let buffers = resolve_buffers(&document, blob, None)?;
        Ok(Self { document, buffers })
    }

    /// Load a file, reading external buffers relative to it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let gltf::Gltf { document, blob } = parse_gltf(&data)?;
        let buffers = resolve_buffers(&document, blob, path.parent())?;
        tracing::debug!(path = %path.display(), buffers = buffers.len(), "loaded document");
        Ok(Self { document, buffers })
    }

    /// Pair a document with buffer data the caller resolved.
    #[must_use]
    pub fn from_parts(document: gltf::Document, buffers: Vec<Vec<u8>>) -> Self {
        Self { document, buffers }
    }

    #[must_use]
    pub fn gltf(&self) -> &gltf::Document {
        &self.document
    }

    #[must_use]
    pub fn buffers(&self) -> &[Vec<u8>] {
        &self.buffers
    }

    pub fn accessor(&self, index: AccessorIndex) -> Result<gltf::Accessor<'_>> {
        self.document
            .accessors()
            .nth(index.0)
            .ok_or_else(|| Error::Accessor(format!("{index} out of range")))
    }

    pub fn view(&self, index: usize) -> Result<gltf::buffer::View<'_>> {
        self.document
            .views()
            .nth(index)
            .ok_or_else(|| Error::Buffer(format!("buffer view {index} out of range")))
    }

    /// Bytes covered by `view`.
    pub fn view_data(&self, view: &gltf::buffer::View<'_>) -> Result<&[u8]> {
        view_data(&self.buffers, view)
    }

    /// Decode a compressed primitive and read all of its attributes.
    ///
    /// Returns `None` for primitives without a usable compression extension.
    pub fn read_primitive(&self, primitive: &gltf::Primitive<'_>) -> Result<Option<DecodedPrimitive>> {
        let Some(ext) = PrimitiveExt::from_primitive(primitive) else {
            return Ok(None);
        };
        let mesh = DracoMesh::unmarshal(self, &self.view(ext.buffer_view)?)?;
        let indices = mesh.read_indices(Vec::new());

        let attributes = primitive
            .attributes()
            .filter_map(|(semantic, accessor)| {
                let name = semantic.to_string();
                let source = AttributeSource::from_parts(
                    Some(AccessorIndex(accessor.index())),
                    Some(&ext),
                    &name,
                );
                let data = mesh.read_source(self, source, &name, None).transpose()?;
                Some((name, data))
            })
            .collect();

        Ok(Some(DecodedPrimitive {
            indices,
            attributes,
        }))
    }
}
