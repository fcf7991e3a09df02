//! AttrValue: runtime instances of the attribute types the engine blends.
//! Storage precision is part of the kind; arithmetic always runs at f64.

use serde::{Deserialize, Serialize};

/// Lightweight kind enum used for dispatch and working-type resolution.
/// Declared storage precision is kept distinct (Float vs Double, Int vs Long)
/// because it decides how results are narrowed on the final write.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrKind {
    Bool,
    Int,
    Long,
    Float,
    Double,
    Vec2,
    Vec3,
    Vec4,
    Quat,
    Rotator,
    Transform,
    Text,
    Name,
}

impl AttrKind {
    /// Broadness rating used when inferring an output type from two operands.
    /// Higher means the type can represent more; comparison is strict `>` so
    /// equal ratings keep the first operand's kind.
    #[inline]
    pub fn rating(self) -> i32 {
        match self {
            AttrKind::Bool
            | AttrKind::Int
            | AttrKind::Long
            | AttrKind::Float
            | AttrKind::Double => 1,
            AttrKind::Vec2 => 2,
            AttrKind::Vec3 | AttrKind::Rotator => 3,
            AttrKind::Vec4 | AttrKind::Quat => 4,
            AttrKind::Transform => 5,
            AttrKind::Text | AttrKind::Name => 6,
        }
    }

    /// True for kinds whose components are plain numbers.
    #[inline]
    pub fn is_numeric(self) -> bool {
        !matches!(self, AttrKind::Text | AttrKind::Name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum AttrValue {
    /// Boolean (blends as 0/1 where arithmetic applies)
    Bool(bool),

    /// 32-bit integer
    Int(i32),

    /// 64-bit integer
    Long(i64),

    /// Scalar float (f32 storage)
    Float(f32),

    /// Scalar double
    Double(f64),

    /// 2D vector
    Vec2([f64; 2]),

    /// 3D vector
    Vec3([f64; 3]),

    /// 4D vector
    Vec4([f64; 4]),

    /// Quaternion (x, y, z, w)
    Quat([f64; 4]),

    /// Euler rotation (pitch, yaw, roll) in degrees
    Rotator([f64; 3]),

    /// Transform with translation, rotation (quat), scale
    Transform {
        pos: [f64; 3],
        rot: [f64; 4],
        scale: [f64; 3],
    },

    /// Text / string
    Text(String),

    /// Interned-name string (distinct declared kind, same payload)
    Name(String),
}

impl AttrValue {
    /// Return the kind of this value.
    #[inline]
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrValue::Bool(_) => AttrKind::Bool,
            AttrValue::Int(_) => AttrKind::Int,
            AttrValue::Long(_) => AttrKind::Long,
            AttrValue::Float(_) => AttrKind::Float,
            AttrValue::Double(_) => AttrKind::Double,
            AttrValue::Vec2(_) => AttrKind::Vec2,
            AttrValue::Vec3(_) => AttrKind::Vec3,
            AttrValue::Vec4(_) => AttrKind::Vec4,
            AttrValue::Quat(_) => AttrKind::Quat,
            AttrValue::Rotator(_) => AttrKind::Rotator,
            AttrValue::Transform { .. } => AttrKind::Transform,
            AttrValue::Text(_) => AttrKind::Text,
            AttrValue::Name(_) => AttrKind::Name,
        }
    }

    /// Zero/identity default for a kind.
    pub fn default_of(kind: AttrKind) -> AttrValue {
        match kind {
            AttrKind::Bool => AttrValue::Bool(false),
            AttrKind::Int => AttrValue::Int(0),
            AttrKind::Long => AttrValue::Long(0),
            AttrKind::Float => AttrValue::Float(0.0),
            AttrKind::Double => AttrValue::Double(0.0),
            AttrKind::Vec2 => AttrValue::Vec2([0.0; 2]),
            AttrKind::Vec3 => AttrValue::Vec3([0.0; 3]),
            AttrKind::Vec4 => AttrValue::Vec4([0.0; 4]),
            AttrKind::Quat => AttrValue::Quat([0.0, 0.0, 0.0, 1.0]),
            AttrKind::Rotator => AttrValue::Rotator([0.0; 3]),
            AttrKind::Transform => AttrValue::Transform {
                pos: [0.0; 3],
                rot: [0.0, 0.0, 0.0, 1.0],
                scale: [1.0; 3],
            },
            AttrKind::Text => AttrValue::Text(String::new()),
            AttrKind::Name => AttrValue::Name(String::new()),
        }
    }

    /// Convenience constructors
    pub fn d(v: f64) -> Self {
        AttrValue::Double(v)
    }

    pub fn vec2(x: f64, y: f64) -> Self {
        AttrValue::Vec2([x, y])
    }

    pub fn vec3(x: f64, y: f64, z: f64) -> Self {
        AttrValue::Vec3([x, y, z])
    }

    pub fn quat(x: f64, y: f64, z: f64, w: f64) -> Self {
        AttrValue::Quat([x, y, z, w])
    }

    pub fn transform(pos: [f64; 3], rot: [f64; 4], scale: [f64; 3]) -> Self {
        AttrValue::Transform { pos, rot, scale }
    }

    pub fn text(s: impl Into<String>) -> Self {
        AttrValue::Text(s.into())
    }
}

impl Default for AttrValue {
    fn default() -> Self {
        AttrValue::Double(0.0)
    }
}
