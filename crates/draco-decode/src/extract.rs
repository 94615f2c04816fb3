//! Typed extraction of attribute values.
//!
//! Extraction copies one attribute's values for every point into a flat
//! destination of `num_points * num_components` elements. Destinations are
//! reusable: a short destination grows by exactly the missing elements, a
//! long one keeps its length and its trailing elements untouched.

use crate::attribute::PointAttribute;
use crate::component::{Component, read_value};
use crate::error::UsageError;
use crate::point_cloud::PointCloud;
use crate::types::DataType;

/// A flat destination buffer of one of the supported element types.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeBuffer {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Int64(Vec<i64>),
    Uint64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
}

/// Evaluate `$body` with `$values` bound to the inner vector, whatever its type.
macro_rules! dispatch {
    ($buffer:expr, $values:ident => $body:expr) => {
        match $buffer {
            AttributeBuffer::Int8($values) => $body,
            AttributeBuffer::Uint8($values) => $body,
            AttributeBuffer::Int16($values) => $body,
            AttributeBuffer::Uint16($values) => $body,
            AttributeBuffer::Int32($values) => $body,
            AttributeBuffer::Uint32($values) => $body,
            AttributeBuffer::Int64($values) => $body,
            AttributeBuffer::Uint64($values) => $body,
            AttributeBuffer::Float32($values) => $body,
            AttributeBuffer::Float64($values) => $body,
            AttributeBuffer::Bool($values) => $body,
        }
    };
}

impl AttributeBuffer {
    /// A zero-filled buffer of `len` elements of `data_type`.
    pub fn new(data_type: DataType, len: usize) -> Result<Self, UsageError> {
        Ok(match data_type {
            DataType::Invalid => return Err(UsageError::UnsupportedElementType(data_type)),
            DataType::Int8 => Self::Int8(vec![0; len]),
            DataType::Uint8 => Self::Uint8(vec![0; len]),
            DataType::Int16 => Self::Int16(vec![0; len]),
            DataType::Uint16 => Self::Uint16(vec![0; len]),
            DataType::Int32 => Self::Int32(vec![0; len]),
            DataType::Uint32 => Self::Uint32(vec![0; len]),
            DataType::Int64 => Self::Int64(vec![0; len]),
            DataType::Uint64 => Self::Uint64(vec![0; len]),
            DataType::Float32 => Self::Float32(vec![0.0; len]),
            DataType::Float64 => Self::Float64(vec![0.0; len]),
            DataType::Bool => Self::Bool(vec![false; len]),
        })
    }

    /// Element type tag of this buffer.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int8(_) => DataType::Int8,
            Self::Uint8(_) => DataType::Uint8,
            Self::Int16(_) => DataType::Int16,
            Self::Uint16(_) => DataType::Uint16,
            Self::Int32(_) => DataType::Int32,
            Self::Uint32(_) => DataType::Uint32,
            Self::Int64(_) => DataType::Int64,
            Self::Uint64(_) => DataType::Uint64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::Bool(_) => DataType::Bool,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        dispatch!(self, values => values.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The elements, if this buffer holds `T`.
    #[must_use]
    pub fn as_slice<T: Component>(&self) -> Option<&[T]> {
        T::unwrap_ref(self).map(Vec::as_slice)
    }

    /// The inner vector, if this buffer holds `T`.
    pub fn as_vec_mut<T: Component>(&mut self) -> Option<&mut Vec<T>> {
        T::unwrap_mut(self)
    }

    /// Take the inner vector, or get the buffer back if it holds another type.
    pub fn into_vec<T: Component>(mut self) -> Result<Vec<T>, Self> {
        match T::unwrap_mut(&mut self) {
            Some(values) => Ok(std::mem::take(values)),
            None => Err(self),
        }
    }

    /// Resize to `len` elements, zero-filling new ones.
    pub fn resize(&mut self, len: usize) {
        dispatch!(self, values => values.resize(len, Default::default()));
    }

    /// Make the buffer exactly `len` zeros, keeping its allocation.
    pub fn zero_fill(&mut self, len: usize) {
        dispatch!(self, values => {
            values.clear();
            values.resize(len, Default::default());
        });
    }

    /// Overwrite the leading elements with values read from little-endian `bytes`.
    ///
    /// Returns `false` if `bytes` is not a whole number of elements, holds
    /// more elements than the buffer, or contains a byte that is not a valid
    /// `bool`.
    pub fn write_le_bytes(&mut self, bytes: &[u8]) -> bool {
        fn write<T: Component>(values: &mut [T], bytes: &[u8]) -> bool {
            let size = size_of::<T>();
            if bytes.len() % size != 0 || bytes.len() / size > values.len() {
                return false;
            }
            for (slot, chunk) in values.iter_mut().zip(bytes.chunks_exact(size)) {
                match T::from_le(chunk) {
                    Some(value) => *slot = value,
                    None => return false,
                }
            }
            true
        }

        dispatch!(self, values => write(values, bytes))
    }

    /// Elements serialized little-endian, `bool` as one byte each.
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        fn bytes<T: Copy, const N: usize>(values: &[T], f: impl Fn(T) -> [u8; N]) -> Vec<u8> {
            values.iter().flat_map(|&v| f(v)).collect()
        }

        match self {
            Self::Int8(v) => bytes(v, i8::to_le_bytes),
            Self::Uint8(v) => v.clone(),
            Self::Int16(v) => bytes(v, i16::to_le_bytes),
            Self::Uint16(v) => bytes(v, u16::to_le_bytes),
            Self::Int32(v) => bytes(v, i32::to_le_bytes),
            Self::Uint32(v) => bytes(v, u32::to_le_bytes),
            Self::Int64(v) => bytes(v, i64::to_le_bytes),
            Self::Uint64(v) => bytes(v, u64::to_le_bytes),
            Self::Float32(v) => bytes(v, f32::to_le_bytes),
            Self::Float64(v) => bytes(v, f64::to_le_bytes),
            Self::Bool(v) => v.iter().map(|&b| u8::from(b)).collect(),
        }
    }
}

impl<T: Component> From<Vec<T>> for AttributeBuffer {
    fn from(values: Vec<T>) -> Self {
        T::wrap(values)
    }
}

/// Copy the values of `attribute` for `num_points` points into `buffer`.
///
/// Grows `buffer` to `num_points * num_components` if shorter. Returns
/// `false` if the storage does not cover every point or a value cannot be
/// represented as `T`; the buffer contents are unspecified in that case.
pub(crate) fn fill<T: Component>(
    num_points: usize,
    attribute: &PointAttribute,
    buffer: &mut Vec<T>,
) -> bool {
    let components = usize::from(attribute.num_components());
    let Some(required) = num_points.checked_mul(components) else {
        return false;
    };
    if buffer.len() < required {
        buffer.resize(required, T::default());
    }
    if required == 0 {
        return true;
    }
    let data_type = attribute.data_type();
    let Some(size) = data_type.size() else {
        return false;
    };
    let direct = T::DATA_TYPE == data_type;
    let normalized = attribute.normalized();

    for (point, out) in buffer[..required].chunks_exact_mut(components).enumerate() {
        let Some(entry) = attribute.entry(point) else {
            return false;
        };
        for (slot, bytes) in out.iter_mut().zip(entry.chunks_exact(size)) {
            let value = if direct {
                T::from_le(bytes)
            } else {
                read_value(data_type, bytes).and_then(|v| T::from_value(v, normalized))
            };
            match value {
                Some(value) => *slot = value,
                None => return false,
            }
        }
    }
    true
}

/// Extract `attribute` of `store` into `destination`.
///
/// Without a destination, a buffer of the attribute's own type is allocated.
/// A destination's element type is taken from its variant. Returns the
/// buffer and whether every value was copied; on `false` the buffer is
/// still returned but its contents are unspecified.
pub fn extract(
    store: &PointCloud,
    attribute: &PointAttribute,
    destination: Option<AttributeBuffer>,
) -> Result<(AttributeBuffer, bool), UsageError> {
    let mut buffer = match destination {
        Some(buffer) => buffer,
        None => AttributeBuffer::new(attribute.data_type(), 0)?,
    };
    let num_points = store.num_points() as usize;
    let ok = dispatch!(&mut buffer, values => fill(num_points, attribute, values));
    Ok((buffer, ok))
}
