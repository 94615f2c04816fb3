//! Element types that attribute values can be extracted into.
//!
//! [`Component`] is implemented for the ten numeric primitives and `bool`,
//! and for nothing else. Each implementation knows its [`DataType`] tag,
//! how to read itself from little-endian storage, and how to convert a value
//! stored with any other type.
//!
//! # Conversion rules
//!
//! - Integer to integer: exact, fails if the value is out of range.
//! - Float to integer: fails on NaN, infinity, or out of range. When the
//!   attribute is normalized the value must lie in `[0, 1]`, the target must
//!   be an unsigned type of at most 32 bits, and the result is
//!   `floor(v * MAX + 0.5)`. Otherwise the value is truncated toward zero.
//! - Integer to float: a normalized attribute divides by the maximum of the
//!   stored integer type.
//! - Float to float: plain cast.
//! - `bool` behaves as an integer restricted to `[0, 1]`.

use std::fmt;

use crate::extract::AttributeBuffer;
use crate::types::DataType;

/// One stored component, widened so every supported type fits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// `max` is the largest value of the stored type.
    Integer { value: i128, max: i128 },
    Float(f64),
}

/// Read one component of type `data_type` from exactly its bytes.
pub(crate) fn read_value(data_type: DataType, bytes: &[u8]) -> Option<Value> {
    macro_rules! integer {
        ($ty:ty) => {
            Value::Integer {
                value: i128::from(<$ty>::from_le_bytes(bytes.try_into().ok()?)),
                max: i128::from(<$ty>::MAX),
            }
        };
    }

    Some(match data_type {
        DataType::Invalid => return None,
        DataType::Int8 => integer!(i8),
        DataType::Uint8 => integer!(u8),
        DataType::Int16 => integer!(i16),
        DataType::Uint16 => integer!(u16),
        DataType::Int32 => integer!(i32),
        DataType::Uint32 => integer!(u32),
        DataType::Int64 => integer!(i64),
        DataType::Uint64 => integer!(u64),
        DataType::Float32 => Value::Float(f64::from(f32::from_le_bytes(bytes.try_into().ok()?))),
        DataType::Float64 => Value::Float(f64::from_le_bytes(bytes.try_into().ok()?)),
        DataType::Bool => {
            let [byte]: [u8; 1] = bytes.try_into().ok()?;
            Value::Integer {
                value: i128::from(byte != 0),
                max: 1,
            }
        }
    })
}

fn float_to_integer(
    value: f64,
    normalized: bool,
    min: i128,
    max: i128,
    signed: bool,
    size: usize,
) -> Option<i128> {
    if !value.is_finite() {
        return None;
    }
    if normalized {
        // `[0, 1]` maps onto `[0, MAX]`, both ends included.
        if !(0.0..=1.0).contains(&value) || signed || size > 4 {
            return None;
        }
        return Some((value * max as f64 + 0.5).floor() as i128);
    }
    if value < min as f64 || value >= max as f64 {
        return None;
    }
    Some(value as i128)
}

pub(crate) mod sealed {
    use super::{AttributeBuffer, Value};

    pub trait Sealed: Sized {
        fn from_le(bytes: &[u8]) -> Option<Self>;
        fn from_value(value: Value, normalized: bool) -> Option<Self>;
        fn wrap(values: Vec<Self>) -> AttributeBuffer;
        fn unwrap_ref(buffer: &AttributeBuffer) -> Option<&Vec<Self>>;
        fn unwrap_mut(buffer: &mut AttributeBuffer) -> Option<&mut Vec<Self>>;
    }
}

/// An element type attribute data can be extracted into.
///
/// Sealed: implemented for `i8`, `u8`, `i16`, `u16`, `i32`, `u32`, `i64`,
/// `u64`, `f32`, `f64` and `bool`.
pub trait Component:
    sealed::Sealed + Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static
{
    const DATA_TYPE: DataType;
}

macro_rules! buffer_access {
    ($variant:ident) => {
        fn wrap(values: Vec<Self>) -> AttributeBuffer {
            AttributeBuffer::$variant(values)
        }

        fn unwrap_ref(buffer: &AttributeBuffer) -> Option<&Vec<Self>> {
            match buffer {
                AttributeBuffer::$variant(values) => Some(values),
                _ => None,
            }
        }

        fn unwrap_mut(buffer: &mut AttributeBuffer) -> Option<&mut Vec<Self>> {
            match buffer {
                AttributeBuffer::$variant(values) => Some(values),
                _ => None,
            }
        }
    };
}

macro_rules! integer_component {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Component for $ty {
            const DATA_TYPE: DataType = DataType::$variant;
        }

        impl sealed::Sealed for $ty {
            fn from_le(bytes: &[u8]) -> Option<Self> {
                Some(<$ty>::from_le_bytes(bytes.try_into().ok()?))
            }

            fn from_value(value: Value, normalized: bool) -> Option<Self> {
                let wide = match value {
                    Value::Integer { value, .. } => value,
                    Value::Float(v) => float_to_integer(
                        v,
                        normalized,
                        i128::from(<$ty>::MIN),
                        i128::from(<$ty>::MAX),
                        <$ty>::MIN != 0,
                        size_of::<$ty>(),
                    )?,
                };
                <$ty>::try_from(wide).ok()
            }

            buffer_access!($variant);
        }
    )*};
}

integer_component! {
    i8 => Int8,
    u8 => Uint8,
    i16 => Int16,
    u16 => Uint16,
    i32 => Int32,
    u32 => Uint32,
    i64 => Int64,
    u64 => Uint64,
}

macro_rules! float_component {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Component for $ty {
            const DATA_TYPE: DataType = DataType::$variant;
        }

        impl sealed::Sealed for $ty {
            fn from_le(bytes: &[u8]) -> Option<Self> {
                Some(<$ty>::from_le_bytes(bytes.try_into().ok()?))
            }

            fn from_value(value: Value, normalized: bool) -> Option<Self> {
                Some(match value {
                    Value::Integer { value, max } if normalized => value as $ty / max as $ty,
                    Value::Integer { value, .. } => value as $ty,
                    Value::Float(v) => v as $ty,
                })
            }

            buffer_access!($variant);
        }
    )*};
}

float_component! {
    f32 => Float32,
    f64 => Float64,
}

impl Component for bool {
    const DATA_TYPE: DataType = DataType::Bool;
}

impl sealed::Sealed for bool {
    fn from_le(bytes: &[u8]) -> Option<Self> {
        let [byte]: [u8; 1] = bytes.try_into().ok()?;
        Some(byte != 0)
    }

    fn from_value(value: Value, normalized: bool) -> Option<Self> {
        let wide = match value {
            Value::Integer { value, .. } => value,
            Value::Float(v) => float_to_integer(v, normalized, 0, 1, false, 1)?,
        };
        match wide {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }

    buffer_access!(Bool);
}
