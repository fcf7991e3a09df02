//! Selector parsing and formatting.
//!
//! Grammar (string-based, host-agnostic):
//!   $Property[.Sub]      point property, e.g. "$Position.X"
//!   Name[.Sub]           named attribute, e.g. "Mass", "Velocity.Z"
//!   #Previous | #N       sibling operation reference (only valid inside an
//!                        operation stack; rewritten before any data access)
//!
//! Sub is one of X, Y, Z, W. A selector with a sub-field always reads and
//! writes through the Double working kind.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::value::{AttrKind, AttrValue};

/// Component selection on a multi-component value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubField {
    X,
    Y,
    Z,
    W,
}

impl SubField {
    fn parse(s: &str) -> Option<SubField> {
        match s {
            "X" => Some(SubField::X),
            "Y" => Some(SubField::Y),
            "Z" => Some(SubField::Z),
            "W" => Some(SubField::W),
            _ => None,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            SubField::X => 0,
            SubField::Y => 1,
            SubField::Z => 2,
            SubField::W => 3,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SubField::X => "X",
            SubField::Y => "Y",
            SubField::Z => "Z",
            SubField::W => "W",
        }
    }

    /// Read this component out of a value, at double precision.
    /// Missing components read as 0; transforms expose their translation.
    pub fn extract(self, v: &AttrValue) -> f64 {
        let i = self.index();
        match v {
            AttrValue::Bool(b) => {
                if i == 0 && *b {
                    1.0
                } else {
                    0.0
                }
            }
            AttrValue::Int(n) => {
                if i == 0 {
                    *n as f64
                } else {
                    0.0
                }
            }
            AttrValue::Long(n) => {
                if i == 0 {
                    *n as f64
                } else {
                    0.0
                }
            }
            AttrValue::Float(f) => {
                if i == 0 {
                    *f as f64
                } else {
                    0.0
                }
            }
            AttrValue::Double(f) => {
                if i == 0 {
                    *f
                } else {
                    0.0
                }
            }
            AttrValue::Vec2(a) => a.get(i).copied().unwrap_or(0.0),
            AttrValue::Vec3(a) | AttrValue::Rotator(a) => a.get(i).copied().unwrap_or(0.0),
            AttrValue::Vec4(a) | AttrValue::Quat(a) => a[i],
            AttrValue::Transform { pos, .. } => pos.get(i).copied().unwrap_or(0.0),
            AttrValue::Text(_) | AttrValue::Name(_) => 0.0,
        }
    }

    /// Write this component into a value, leaving the others untouched.
    /// Out-of-range components are dropped silently.
    pub fn inject(self, target: &mut AttrValue, x: f64) {
        let i = self.index();
        match target {
            AttrValue::Bool(b) => {
                if i == 0 {
                    *b = x != 0.0;
                }
            }
            AttrValue::Int(n) => {
                if i == 0 {
                    *n = x as i32;
                }
            }
            AttrValue::Long(n) => {
                if i == 0 {
                    *n = x as i64;
                }
            }
            AttrValue::Float(f) => {
                if i == 0 {
                    *f = x as f32;
                }
            }
            AttrValue::Double(f) => {
                if i == 0 {
                    *f = x;
                }
            }
            AttrValue::Vec2(a) => {
                if let Some(c) = a.get_mut(i) {
                    *c = x;
                }
            }
            AttrValue::Vec3(a) | AttrValue::Rotator(a) => {
                if let Some(c) = a.get_mut(i) {
                    *c = x;
                }
            }
            AttrValue::Vec4(a) | AttrValue::Quat(a) => a[i] = x,
            AttrValue::Transform { pos, .. } => {
                if let Some(c) = pos.get_mut(i) {
                    *c = x;
                }
            }
            AttrValue::Text(_) | AttrValue::Name(_) => {}
        }
    }
}

/// The fixed per-point properties every table carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointProperty {
    Density,
    Position,
    Rotation,
    Scale,
    BoundsMin,
    BoundsMax,
    Color,
    Steepness,
    Seed,
}

impl PointProperty {
    pub const ALL: [PointProperty; 9] = [
        PointProperty::Density,
        PointProperty::Position,
        PointProperty::Rotation,
        PointProperty::Scale,
        PointProperty::BoundsMin,
        PointProperty::BoundsMax,
        PointProperty::Color,
        PointProperty::Steepness,
        PointProperty::Seed,
    ];

    /// Storage kind of the property.
    pub fn kind(self) -> AttrKind {
        match self {
            PointProperty::Density | PointProperty::Steepness => AttrKind::Float,
            PointProperty::Position
            | PointProperty::Scale
            | PointProperty::BoundsMin
            | PointProperty::BoundsMax => AttrKind::Vec3,
            PointProperty::Rotation => AttrKind::Quat,
            PointProperty::Color => AttrKind::Vec4,
            PointProperty::Seed => AttrKind::Int,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PointProperty::Density => "Density",
            PointProperty::Position => "Position",
            PointProperty::Rotation => "Rotation",
            PointProperty::Scale => "Scale",
            PointProperty::BoundsMin => "BoundsMin",
            PointProperty::BoundsMax => "BoundsMax",
            PointProperty::Color => "Color",
            PointProperty::Steepness => "Steepness",
            PointProperty::Seed => "Seed",
        }
    }

    fn parse(s: &str) -> Option<PointProperty> {
        PointProperty::ALL.into_iter().find(|p| p.name() == s)
    }
}

/// Reference to a sibling operation's output, by position in the stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SiblingRef {
    Previous,
    Index(usize),
}

/// What a selector points at before sub-field selection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Property(PointProperty),
    Attribute(String),
    Sibling(SiblingRef),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Selector {
    pub target: Target,
    pub sub: Option<SubField>,
}

impl Selector {
    pub fn attribute(name: impl Into<String>) -> Self {
        Selector {
            target: Target::Attribute(name.into()),
            sub: None,
        }
    }

    pub fn property(p: PointProperty) -> Self {
        Selector {
            target: Target::Property(p),
            sub: None,
        }
    }

    pub fn with_sub(mut self, sub: SubField) -> Self {
        self.sub = Some(sub);
        self
    }

    /// Parse a selector string according to the grammar above.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("empty selector".to_string());
        }
        if s.chars().any(char::is_whitespace) {
            return Err(format!("invalid selector {s:?}: contains whitespace"));
        }
        if let Some(rest) = s.strip_prefix('#') {
            let target = if rest == "Previous" {
                Target::Sibling(SiblingRef::Previous)
            } else {
                let idx: usize = rest
                    .parse()
                    .map_err(|_| format!("invalid sibling reference {s:?}"))?;
                Target::Sibling(SiblingRef::Index(idx))
            };
            return Ok(Selector { target, sub: None });
        }
        let (head, sub) = match s.rsplit_once('.') {
            Some((head, tail)) if !head.is_empty() => match SubField::parse(tail) {
                Some(sub) => (head, Some(sub)),
                None => (s, None),
            },
            _ => (s, None),
        };
        let target = if let Some(prop) = head.strip_prefix('$') {
            Target::Property(
                PointProperty::parse(prop)
                    .ok_or_else(|| format!("unknown point property {head:?}"))?,
            )
        } else {
            Target::Attribute(head.to_string())
        };
        Ok(Selector { target, sub })
    }

    /// True when the selector still names a sibling operation and cannot be
    /// bound to data yet.
    #[inline]
    pub fn is_sibling_reference(&self) -> bool {
        matches!(self.target, Target::Sibling(_))
    }

    /// The kind arithmetic runs at when reading through this selector from a
    /// stream whose declared kind is `real`. Sub-field selection always works
    /// at double precision.
    #[inline]
    pub fn working_kind(&self, real: AttrKind) -> AttrKind {
        if self.sub.is_some() {
            AttrKind::Double
        } else {
            real
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Property(p) => write!(f, "${}", p.name())?,
            Target::Attribute(name) => f.write_str(name)?,
            Target::Sibling(SiblingRef::Previous) => f.write_str("#Previous")?,
            Target::Sibling(SiblingRef::Index(i)) => write!(f, "#{i}")?,
        }
        if let Some(sub) = self.sub {
            write!(f, ".{}", sub.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for Selector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D>(deserializer: D) -> Result<Selector, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Selector::parse(&s).map_err(de::Error::custom)
    }
}
