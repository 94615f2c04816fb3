//! Plain accessor reads and accessor-shaped destination buffers.

use std::fmt;

use draco_decode::{AttributeBuffer, DataType};
use gltf::accessor::DataType as ComponentType;

use crate::buffers::view_data;
use crate::error::{Error, Result};

/// Index of an accessor in a glTF document.
///
/// Never interchangeable with a compressed attribute's
/// [`UniqueId`](draco_decode::UniqueId).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessorIndex(pub usize);

impl fmt::Display for AccessorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "accessor {}", self.0)
    }
}

/// Element type of an accessor component.
#[must_use]
pub fn element_type(component_type: ComponentType) -> DataType {
    match component_type {
        ComponentType::I8 => DataType::Int8,
        ComponentType::U8 => DataType::Uint8,
        ComponentType::I16 => DataType::Int16,
        ComponentType::U16 => DataType::Uint16,
        ComponentType::U32 => DataType::Uint32,
        ComponentType::F32 => DataType::Float32,
    }
}

/// Number of scalar elements `accessor` describes.
fn element_count(accessor: &gltf::Accessor<'_>) -> Result<usize> {
    accessor
        .count()
        .checked_mul(accessor.dimensions().multiplicity())
        .ok_or_else(|| Error::Accessor(format!("accessor {} is too large", accessor.index())))
}

/// A buffer of `accessor`'s element type holding exactly its element count.
///
/// `buffer` is reused when it already has that element type.
pub(crate) fn shape_buffer(
    accessor: &gltf::Accessor<'_>,
    buffer: Option<AttributeBuffer>,
) -> Result<AttributeBuffer> {
    let data_type = element_type(accessor.data_type());
    let len = element_count(accessor)?;
    match buffer {
        Some(mut buffer) if buffer.data_type() == data_type => {
            buffer.resize(len);
            Ok(buffer)
        }
        _ => Ok(AttributeBuffer::new(data_type, len)?),
    }
}

/// Read `accessor` from resolved buffer data.
///
/// Handles interleaved views. Accessors without a view read as zeros.
/// Sparse accessors are rejected.
pub fn read_accessor(
    accessor: &gltf::Accessor<'_>,
    buffers: &[Vec<u8>],
    buffer: Option<AttributeBuffer>,
) -> Result<AttributeBuffer> {
    if accessor.sparse().is_some() {
        return Err(Error::Accessor(format!(
            "accessor {} is sparse, which is not supported",
            accessor.index()
        )));
    }

    let mut out = shape_buffer(accessor, buffer)?;
    let Some(view) = accessor.view() else {
        out.zero_fill(out.len());
        return Ok(out);
    };

    let data = view_data(buffers, &view)?;
    let element_size = accessor.size();
    let stride = view.stride().unwrap_or(element_size);
    let count = accessor.count();
    let start = accessor.offset();

    let out_of_range = || {
        Error::Accessor(format!(
            "accessor {} exceeds buffer view {}",
            accessor.index(),
            view.index()
        ))
    };
    if count == 0 {
        return Ok(out);
    }
    let end = (count - 1)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(start))
        .and_then(|n| n.checked_add(element_size))
        .ok_or_else(out_of_range)?;
    if end > data.len() {
        return Err(out_of_range());
    }

    let written = if stride == element_size {
        out.write_le_bytes(&data[start..start + count * element_size])
    } else {
        let mut packed = Vec::with_capacity(count * element_size);
        for i in 0..count {
            let offset = start + i * stride;
            packed.extend_from_slice(&data[offset..offset + element_size]);
        }
        out.write_le_bytes(&packed)
    };
    if !written {
        return Err(Error::Accessor(format!(
            "accessor {} data does not match its element type",
            accessor.index()
        )));
    }
    Ok(out)
}
