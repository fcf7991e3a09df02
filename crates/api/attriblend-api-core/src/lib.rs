//! attriblend-api-core: value model and stream addressing (engine-agnostic)

pub mod coercion;
pub mod selector;
pub mod value;

pub use selector::{PointProperty, Selector, SiblingRef, SubField};
pub use value::{AttrKind, AttrValue};
