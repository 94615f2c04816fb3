//! Sequential encoder method.
//!
//! # Format
//!
//! Point clouds store their point count as a fixed `u32`. Meshes store
//! connectivity instead:
//!
//! - face count and point count (`u32` before 2.2, varint after)
//! - connectivity method (`u8`, 1 = raw indices)
//! - `3 * num_faces` indices whose width depends on the point count
//!
//! The attributes section that follows is shared by both geometry kinds:
//!
//! - number of attribute decoders (`u8`)
//! - per decoder: attribute count (`u32` before 2.0, varint after), one
//!   descriptor per attribute, then one decoder type byte per attribute
//! - the values of every attribute, in declaration order

use std::collections::HashSet;

use crate::attribute::PointAttribute;
use crate::buffer::DecoderBuffer;
use crate::error::{DecodeError, DecodeResult};
use crate::types::{DataType, Face, GeometryAttributeType, UniqueId};

const GEOMETRY_ERROR: &str = "Failed to decode geometry data.";
const ATTRIBUTES_ERROR: &str = "Failed to decode point attributes.";

/// Prediction method byte meaning "no prediction".
const PREDICTION_NONE: i8 = -2;

fn geometry_error() -> DecodeError {
    DecodeError::draco(GEOMETRY_ERROR)
}

fn attributes_error() -> DecodeError {
    DecodeError::draco(ATTRIBUTES_ERROR)
}

/// Point count of a sequentially encoded point cloud.
pub(crate) fn decode_point_count(buffer: &mut DecoderBuffer<'_>) -> DecodeResult<u32> {
    let num_points = buffer.u32().ok_or_else(geometry_error)?;
    if i32::try_from(num_points).is_err() {
        tracing::debug!(num_points, "negative point count");
        return Err(geometry_error());
    }
    Ok(num_points)
}

/// Width of one stored point index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexWidth {
    U8,
    U16,
    Varint,
    U32,
}

impl IndexWidth {
    fn for_points(num_points: u32, version: (u8, u8)) -> Self {
        if num_points < 1 << 8 {
            Self::U8
        } else if num_points < 1 << 16 {
            Self::U16
        } else if num_points < 1 << 21 && version >= (2, 2) {
            Self::Varint
        } else {
            Self::U32
        }
    }

    fn read(self, buffer: &mut DecoderBuffer<'_>) -> Option<u32> {
        match self {
            Self::U8 => buffer.u8().map(u32::from),
            Self::U16 => buffer.u16().map(u32::from),
            Self::Varint => buffer.varint_u32(),
            Self::U32 => buffer.u32(),
        }
    }
}

/// Point count and faces of a sequentially encoded mesh.
pub(crate) fn decode_connectivity(buffer: &mut DecoderBuffer<'_>) -> DecodeResult<(u32, Vec<Face>)> {
    let num_faces = buffer.count((2, 2)).ok_or_else(geometry_error)?;
    let num_points = buffer.count((2, 2)).ok_or_else(geometry_error)?;

    match buffer.u8().ok_or_else(geometry_error)? {
        0 => {
            return Err(DecodeError::unsupported(
                "Compressed sequential connectivity is not supported.",
            ));
        }
        1 => {}
        method => {
            tracing::debug!(method, "unknown connectivity method");
            return Err(geometry_error());
        }
    }

    // Every index takes at least one byte.
    if u64::from(num_faces) * 3 > buffer.remaining() as u64 {
        tracing::debug!(num_faces, remaining = buffer.remaining(), "face count exceeds input");
        return Err(geometry_error());
    }

    let width = IndexWidth::for_points(num_points, buffer.version());
    let mut faces = Vec::with_capacity(num_faces as usize);
    for _ in 0..num_faces {
        let mut face = [0u32; 3];
        for index in &mut face {
            *index = width.read(buffer).ok_or_else(geometry_error)?;
            if *index >= num_points {
                tracing::debug!(index = *index, num_points, "point index out of range");
                return Err(geometry_error());
            }
        }
        faces.push(face);
    }
    Ok((num_points, faces))
}

/// How one attribute's values are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeDecoder {
    Generic,
    Integer,
}

fn decode_descriptor(
    buffer: &mut DecoderBuffer<'_>,
    seen: &mut HashSet<UniqueId>,
) -> DecodeResult<PointAttribute> {
    let raw_type = buffer.u8().ok_or_else(attributes_error)?;
    let attribute_type = GeometryAttributeType::from_u8(raw_type).ok_or_else(|| {
        tracing::debug!(raw_type, "unknown attribute type");
        attributes_error()
    })?;
    let raw_data_type = buffer.u8().ok_or_else(attributes_error)?;
    let data_type = DataType::from_u8(raw_data_type);
    if data_type == DataType::Invalid {
        tracing::debug!(raw_data_type, "invalid data type");
        return Err(attributes_error());
    }
    let num_components = buffer.u8().ok_or_else(attributes_error)?;
    if num_components == 0 {
        tracing::debug!("attribute without components");
        return Err(attributes_error());
    }
    let normalized = buffer.u8().ok_or_else(attributes_error)? != 0;
    let unique_id = if buffer.version() < (1, 3) {
        buffer.u16().map(u32::from)
    } else {
        buffer.varint_u32()
    }
    .map(UniqueId)
    .ok_or_else(attributes_error)?;
    if !seen.insert(unique_id) {
        tracing::debug!(%unique_id, "duplicate unique id");
        return Err(attributes_error());
    }

    Ok(PointAttribute::new(
        attribute_type,
        data_type,
        num_components,
        normalized,
        unique_id,
    ))
}

fn decode_decoder_type(buffer: &mut DecoderBuffer<'_>) -> DecodeResult<AttributeDecoder> {
    match buffer.u8().ok_or_else(attributes_error)? {
        0 => Ok(AttributeDecoder::Generic),
        1 => Ok(AttributeDecoder::Integer),
        2 => Err(DecodeError::unsupported(
            "Quantized attributes are not supported.",
        )),
        3 => Err(DecodeError::unsupported(
            "Octahedral normal attributes are not supported.",
        )),
        other => {
            tracing::debug!(decoder_type = other, "unknown attribute decoder");
            Err(attributes_error())
        }
    }
}

/// Raw little-endian values, one packed entry per point.
fn decode_generic_values(
    buffer: &mut DecoderBuffer<'_>,
    attribute: &PointAttribute,
    num_points: u32,
) -> DecodeResult<Vec<u8>> {
    let len = attribute
        .byte_stride()
        .checked_mul(num_points as usize)
        .ok_or_else(attributes_error)?;
    let bytes = buffer.bytes(len).ok_or_else(|| {
        tracing::debug!(len, remaining = buffer.remaining(), "attribute values truncated");
        attributes_error()
    })?;
    Ok(bytes.to_vec())
}

/// Zig-zag symbols without prediction, stored uncompressed.
fn decode_integer_values(
    buffer: &mut DecoderBuffer<'_>,
    attribute: &PointAttribute,
    num_points: u32,
) -> DecodeResult<Vec<u8>> {
    let data_type = attribute.data_type();
    let size = match data_type.size() {
        Some(size) if data_type.is_integral() => size,
        _ => {
            tracing::debug!(%data_type, "integer decoder on non-integral attribute");
            return Err(attributes_error());
        }
    };

    let prediction = buffer.i8().ok_or_else(attributes_error)?;
    if prediction != PREDICTION_NONE {
        return Err(DecodeError::unsupported(
            "Attribute prediction schemes are not supported.",
        ));
    }
    if buffer.u8().ok_or_else(attributes_error)? != 0 {
        return Err(DecodeError::unsupported(
            "Entropy coded attribute values are not supported.",
        ));
    }
    let num_bytes = usize::from(buffer.u8().ok_or_else(attributes_error)?);
    if !(1..=4).contains(&num_bytes) {
        tracing::debug!(num_bytes, "invalid symbol width");
        return Err(attributes_error());
    }

    let num_values = (num_points as usize)
        .checked_mul(usize::from(attribute.num_components()))
        .ok_or_else(attributes_error)?;
    let raw = num_values
        .checked_mul(num_bytes)
        .and_then(|len| buffer.bytes(len))
        .ok_or_else(attributes_error)?;

    let mut data = Vec::with_capacity(num_values * size);
    for chunk in raw.chunks_exact(num_bytes) {
        let mut word = [0u8; 4];
        word[..num_bytes].copy_from_slice(chunk);
        let symbol = u32::from_le_bytes(word);
        let value = ((symbol >> 1) as i32) ^ -((symbol & 1) as i32);
        data.extend_from_slice(&i64::from(value).to_le_bytes()[..size]);
    }
    Ok(data)
}

/// Descriptors and values of every attribute.
pub(crate) fn decode_attributes(
    buffer: &mut DecoderBuffer<'_>,
    num_points: u32,
) -> DecodeResult<Vec<PointAttribute>> {
    let num_decoders = buffer.u8().ok_or_else(attributes_error)?;

    let mut seen = HashSet::new();
    let mut attributes = Vec::new();
    let mut decoders = Vec::new();
    for _ in 0..num_decoders {
        let num_attributes = buffer.count((2, 0)).ok_or_else(attributes_error)?;
        // Every descriptor takes at least five bytes.
        if num_attributes == 0 || num_attributes as usize > buffer.remaining() / 5 {
            tracing::debug!(num_attributes, "invalid attribute count");
            return Err(attributes_error());
        }
        for _ in 0..num_attributes {
            attributes.push(decode_descriptor(buffer, &mut seen)?);
        }
        for _ in 0..num_attributes {
            decoders.push(decode_decoder_type(buffer)?);
        }
    }

    for (attribute, decoder) in attributes.iter_mut().zip(decoders) {
        let data = match decoder {
            AttributeDecoder::Generic => decode_generic_values(buffer, attribute, num_points)?,
            AttributeDecoder::Integer => decode_integer_values(buffer, attribute, num_points)?,
        };
        attribute.set_data(data);
    }

    tracing::debug!(count = attributes.len(), "decoded attributes");
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;

    fn buffer(data: &[u8], version: (u8, u8)) -> DecoderBuffer<'_> {
        let mut buffer = DecoderBuffer::new(data);
        buffer.set_version(version);
        buffer
    }

    #[test]
    fn index_width_by_point_count() {
        assert_eq!(IndexWidth::for_points(255, (2, 2)), IndexWidth::U8);
        assert_eq!(IndexWidth::for_points(256, (2, 2)), IndexWidth::U16);
        assert_eq!(IndexWidth::for_points(70_000, (2, 2)), IndexWidth::Varint);
        assert_eq!(IndexWidth::for_points(70_000, (2, 1)), IndexWidth::U32);
        assert_eq!(IndexWidth::for_points(1 << 21, (2, 2)), IndexWidth::U32);
    }

    #[test]
    fn legacy_connectivity_uses_fixed_counts() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&[1, 2, 1, 0]);
        let (num_points, faces) = decode_connectivity(&mut buffer(&data, (2, 1))).unwrap();
        assert_eq!(num_points, 3);
        assert_eq!(faces, vec![[2, 1, 0]]);
    }

    #[test]
    fn compressed_connectivity_is_unsupported() {
        let data = [1, 3, 0];
        let err = decode_connectivity(&mut buffer(&data, (2, 2))).unwrap_err();
        assert_eq!(err.status, Status::UnsupportedFeature);
    }

    #[test]
    fn index_out_of_range() {
        let data = [1, 3, 1, 0, 1, 3];
        let err = decode_connectivity(&mut buffer(&data, (2, 2))).unwrap_err();
        assert_eq!(err.message, GEOMETRY_ERROR);
    }

    #[test]
    fn huge_face_count_fails_before_allocating() {
        let data = [0xff, 0xff, 0xff, 0xff, 0x0f, 3, 1];
        assert!(decode_connectivity(&mut buffer(&data, (2, 2))).is_err());
    }

    #[test]
    fn duplicate_unique_ids() {
        // One decoder, two u8 scalars both claiming id 0.
        let data = [1, 2, 4, 2, 1, 0, 0, 4, 2, 1, 0, 0, 0, 0, 7, 8];
        let err = decode_attributes(&mut buffer(&data, (2, 2)), 1).unwrap_err();
        assert_eq!(err.message, ATTRIBUTES_ERROR);
    }

    #[test]
    fn legacy_descriptor_widths() {
        // Before 1.3 unique ids are u16, before 2.0 counts are u32.
        let data = [1, 1, 0, 0, 0, 4, 2, 1, 0, 5, 0, 0, 42, 43];
        let attributes = decode_attributes(&mut buffer(&data, (1, 2)), 2).unwrap();
        assert_eq!(attributes[0].unique_id(), UniqueId(5));
        assert_eq!(attributes[0].data(), &[42, 43]);
    }

    #[test]
    fn quantized_attributes_are_unsupported() {
        let data = [1, 1, 0, 9, 3, 0, 0, 2];
        let err = decode_attributes(&mut buffer(&data, (2, 2)), 1).unwrap_err();
        assert_eq!(err.code(), -6);
    }

    #[test]
    fn integer_values_zigzag() {
        // i32 scalars, symbols 0, 1, 2, 3 -> 0, -1, 1, -2.
        let data = [1, 1, 4, 5, 1, 0, 0, 1, 0xfe, 0, 1, 0, 1, 2, 3];
        let attributes = decode_attributes(&mut buffer(&data, (2, 2)), 4).unwrap();
        let values: Vec<i32> = attributes[0]
            .data()
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(values, vec![0, -1, 1, -2]);
    }

    #[test]
    fn integer_prediction_is_unsupported() {
        let data = [1, 1, 4, 5, 1, 0, 0, 1, 0x00, 0];
        let err = decode_attributes(&mut buffer(&data, (2, 2)), 1).unwrap_err();
        assert_eq!(err.status, Status::UnsupportedFeature);
    }
}
