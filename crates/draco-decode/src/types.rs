//! Enumerations shared by the decoder and the geometry store.

use std::fmt;

/// Geometry kind declared by a blob header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodedGeometryType {
    /// The header could not be parsed or names an unknown kind.
    Invalid,
    PointCloud,
    TriangularMesh,
}

impl EncodedGeometryType {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::PointCloud,
            1 => Self::TriangularMesh,
            _ => Self::Invalid,
        }
    }
}

impl fmt::Display for EncodedGeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "invalid",
            Self::PointCloud => "point cloud",
            Self::TriangularMesh => "triangular mesh",
        })
    }
}

/// Semantic role of a point attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryAttributeType {
    Position,
    Normal,
    Color,
    TexCoord,
    Generic,
    Tangent,
    Material,
    Joints,
    Weights,
}

impl GeometryAttributeType {
    pub(crate) fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Position,
            1 => Self::Normal,
            2 => Self::Color,
            3 => Self::TexCoord,
            4 => Self::Generic,
            5 => Self::Tangent,
            6 => Self::Material,
            7 => Self::Joints,
            8 => Self::Weights,
            _ => return None,
        })
    }

    /// Wire value of this attribute type.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Position => 0,
            Self::Normal => 1,
            Self::Color => 2,
            Self::TexCoord => 3,
            Self::Generic => 4,
            Self::Tangent => 5,
            Self::Material => 6,
            Self::Joints => 7,
            Self::Weights => 8,
        }
    }
}

/// Element type of attribute components.
///
/// `Invalid` only appears when a caller constructs it; the decoder rejects
/// blobs that declare it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Invalid,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    Bool,
}

impl DataType {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Int8,
            2 => Self::Uint8,
            3 => Self::Int16,
            4 => Self::Uint16,
            5 => Self::Int32,
            6 => Self::Uint32,
            7 => Self::Int64,
            8 => Self::Uint64,
            9 => Self::Float32,
            10 => Self::Float64,
            11 => Self::Bool,
            _ => Self::Invalid,
        }
    }

    /// Wire value of this data type.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Invalid => 0,
            Self::Int8 => 1,
            Self::Uint8 => 2,
            Self::Int16 => 3,
            Self::Uint16 => 4,
            Self::Int32 => 5,
            Self::Uint32 => 6,
            Self::Int64 => 7,
            Self::Uint64 => 8,
            Self::Float32 => 9,
            Self::Float64 => 10,
            Self::Bool => 11,
        }
    }

    /// Size of one component in bytes, `None` for `Invalid`.
    #[must_use]
    pub fn size(self) -> Option<usize> {
        match self {
            Self::Invalid => None,
            Self::Int8 | Self::Uint8 | Self::Bool => Some(1),
            Self::Int16 | Self::Uint16 => Some(2),
            Self::Int32 | Self::Uint32 | Self::Float32 => Some(4),
            Self::Int64 | Self::Uint64 | Self::Float64 => Some(8),
        }
    }

    #[must_use]
    pub fn is_integral(self) -> bool {
        !matches!(self, Self::Invalid | Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "invalid",
            Self::Int8 => "i8",
            Self::Uint8 => "u8",
            Self::Int16 => "i16",
            Self::Uint16 => "u16",
            Self::Int32 => "i32",
            Self::Uint32 => "u32",
            Self::Int64 => "i64",
            Self::Uint64 => "u64",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
            Self::Bool => "bool",
        })
    }
}

/// Decode-time identifier of an attribute, stable within one store.
///
/// Distinct from the attribute's position in the store and from any
/// scene-level accessor index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniqueId(pub u32);

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Triangle as three point indices.
pub type Face = [u32; 3];
