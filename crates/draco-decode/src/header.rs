//! Blob header parsing.
//!
//! # Format
//!
//! - Bytes 0-4: magic `DRACO`
//! - Byte 5: major version
//! - Byte 6: minor version
//! - Byte 7: encoder type (0 = point cloud, 1 = triangular mesh)
//! - Byte 8: encoder method (0 = sequential, 1 = edgebreaker)
//! - Bytes 9-10: flags (`u16`)

use crate::buffer::{DecoderBuffer, Version};
use crate::error::{DecodeError, DecodeResult, Status};
use crate::types::EncodedGeometryType;

const MAGIC: &[u8; 5] = b"DRACO";

pub(crate) const HEADER_PARSE_ERROR: &str = "Failed to parse Draco header.";

/// Header flag announcing geometry metadata after the header.
pub(crate) const METADATA_FLAG_MASK: u16 = 0x8000;

/// Newest point cloud bitstream this crate reads.
pub(crate) const POINT_CLOUD_VERSION: Version = (2, 3);
/// Newest mesh bitstream this crate reads.
pub(crate) const MESH_VERSION: Version = (2, 2);

/// Encoder method used for the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EncoderMethod {
    Sequential,
    Edgebreaker,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub version: Version,
    pub geometry_type: EncodedGeometryType,
    pub method: EncoderMethod,
    pub flags: u16,
}

impl Header {
    pub fn has_metadata(&self) -> bool {
        self.flags & METADATA_FLAG_MASK != 0
    }
}

pub(crate) fn decode_header(buffer: &mut DecoderBuffer<'_>) -> DecodeResult<Header> {
    let parse_error = || DecodeError::io(HEADER_PARSE_ERROR);

    let magic = buffer.bytes(MAGIC.len()).ok_or_else(parse_error)?;
    if magic != MAGIC {
        return Err(DecodeError::draco("Not a Draco file."));
    }
    let major = buffer.u8().ok_or_else(parse_error)?;
    let minor = buffer.u8().ok_or_else(parse_error)?;
    let encoder_type = buffer.u8().ok_or_else(parse_error)?;
    let geometry_type = EncodedGeometryType::from_u8(encoder_type);
    if geometry_type == EncodedGeometryType::Invalid {
        return Err(DecodeError::draco("Invalid encoder type."));
    }
    let method = match buffer.u8().ok_or_else(parse_error)? {
        0 => EncoderMethod::Sequential,
        1 => EncoderMethod::Edgebreaker,
        other => EncoderMethod::Other(other),
    };
    let flags = buffer.u16().ok_or_else(parse_error)?;

    Ok(Header {
        version: (major, minor),
        geometry_type,
        method,
        flags,
    })
}

/// Check that `header` carries a version this crate can read for its kind.
pub(crate) fn check_version(header: &Header) -> DecodeResult<()> {
    let newest = match header.geometry_type {
        EncodedGeometryType::TriangularMesh => MESH_VERSION,
        _ => POINT_CLOUD_VERSION,
    };
    let (major, minor) = header.version;
    if major < 1 || major > newest.0 {
        return Err(DecodeError::new(
            Status::UnknownVersion,
            "Unknown major version.",
        ));
    }
    if major == newest.0 && minor > newest.1 {
        return Err(DecodeError::new(
            Status::UnknownVersion,
            "Unknown minor version.",
        ));
    }
    Ok(())
}

/// Determine the geometry kind a blob declares without decoding it.
///
/// Returns [`EncodedGeometryType::Invalid`] for anything whose header does
/// not parse.
#[must_use]
pub fn probe_geometry_kind(data: &[u8]) -> EncodedGeometryType {
    let mut buffer = DecoderBuffer::new(data);
    decode_header(&mut buffer).map_or(EncodedGeometryType::Invalid, |h| h.geometry_type)
}
