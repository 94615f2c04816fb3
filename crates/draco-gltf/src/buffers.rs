//! Buffer data resolution.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};

/// Decode a `data:` URI with a base64 payload.
pub(crate) fn parse_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(";base64,")?;
    STANDARD.decode(payload).ok()
}

/// Resolve the data of every buffer in `document`.
///
/// The binary chunk of a `.glb` serves buffers without a URI. Relative URIs
/// are read from `base` when given.
pub(crate) fn resolve_buffers(
    document: &gltf::Document,
    mut blob: Option<Vec<u8>>,
    base: Option<&Path>,
) -> Result<Vec<Vec<u8>>> {
    let mut buffers = Vec::with_capacity(document.buffers().len());

    for buffer in document.buffers() {
        let mut data = match buffer.source() {
            gltf::buffer::Source::Bin => blob.take().ok_or_else(|| {
                Error::Buffer(format!(
                    "buffer {} references the binary chunk but none is present",
                    buffer.index()
                ))
            })?,
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => parse_data_uri(uri)
                .ok_or_else(|| Error::Buffer(format!("buffer {} has an invalid data URI", buffer.index())))?,
            gltf::buffer::Source::Uri(uri) => {
                let base = base.ok_or_else(|| {
                    Error::Buffer(format!("external buffer URIs need a base path: {uri}"))
                })?;
                std::fs::read(base.join(uri))?
            }
        };

        if data.len() < buffer.length() {
            return Err(Error::Buffer(format!(
                "buffer {} holds {} bytes, expected {}",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        // The binary chunk is padded to four bytes.
        data.truncate(buffer.length());
        buffers.push(data);
    }

    Ok(buffers)
}

/// Bytes covered by `view`.
pub(crate) fn view_data<'a>(buffers: &'a [Vec<u8>], view: &gltf::buffer::View<'_>) -> Result<&'a [u8]> {
    let index = view.buffer().index();
    let buffer = buffers
        .get(index)
        .ok_or_else(|| Error::Buffer(format!("buffer index {index} out of range")))?;
    let start = view.offset();
    start
        .checked_add(view.length())
        .and_then(|end| buffer.get(start..end))
        .ok_or_else(|| {
            Error::Buffer(format!(
                "buffer view {} exceeds buffer {index} ({} bytes)",
                view.index(),
                buffer.len()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri() {
        let data = parse_data_uri("data:application/octet-stream;base64,AQID").unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn not_a_data_uri() {
        assert!(parse_data_uri("file://some/path").is_none());
        assert!(parse_data_uri("data:text/plain,hello").is_none());
    }
}
