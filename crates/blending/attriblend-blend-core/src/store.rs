//! In-memory point store. A `PointTable` is a fixed-length struct-of-arrays:
//! the nine built-in point properties plus named attribute columns. A
//! `Dataset` pairs an immutable input table with a mutable output table
//! behind a shared lock, which is what the proxies bind against.
//!
//! Threading contract: preparation happens single-threaded; during execution
//! hosts partition point indices into disjoint ranges, so writers never
//! contend on the same rows.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use attriblend_api_core::coercion::cast;
use attriblend_api_core::{AttrKind, AttrValue, PointProperty};

/// Which side of a dataset a stream reads from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IoSide {
    In,
    Out,
}

#[derive(Clone, Debug)]
pub struct AttributeColumn {
    pub kind: AttrKind,
    pub values: Vec<AttrValue>,
    pub enabled: bool,
}

#[derive(Clone, Debug)]
pub struct PointTable {
    len: usize,
    density: Vec<f32>,
    position: Vec<[f64; 3]>,
    rotation: Vec<[f64; 4]>,
    scale: Vec<[f64; 3]>,
    bounds_min: Vec<[f64; 3]>,
    bounds_max: Vec<[f64; 3]>,
    color: Vec<[f64; 4]>,
    steepness: Vec<f32>,
    seed: Vec<i32>,
    attributes: HashMap<String, AttributeColumn>,
    // declaration order, drives deterministic attribute scans
    order: Vec<String>,
}

impl PointTable {
    pub fn new(len: usize) -> PointTable {
        PointTable {
            len,
            density: vec![1.0; len],
            position: vec![[0.0; 3]; len],
            rotation: vec![[0.0, 0.0, 0.0, 1.0]; len],
            scale: vec![[1.0; 3]; len],
            bounds_min: vec![[0.0; 3]; len],
            bounds_max: vec![[0.0; 3]; len],
            color: vec![[1.0; 4]; len],
            steepness: vec![1.0; len],
            seed: vec![0; len],
            attributes: HashMap::new(),
            order: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn read_property(&self, p: PointProperty, idx: usize) -> AttrValue {
        match p {
            PointProperty::Density => AttrValue::Float(self.density[idx]),
            PointProperty::Position => AttrValue::Vec3(self.position[idx]),
            PointProperty::Rotation => AttrValue::Quat(self.rotation[idx]),
            PointProperty::Scale => AttrValue::Vec3(self.scale[idx]),
            PointProperty::BoundsMin => AttrValue::Vec3(self.bounds_min[idx]),
            PointProperty::BoundsMax => AttrValue::Vec3(self.bounds_max[idx]),
            PointProperty::Color => AttrValue::Vec4(self.color[idx]),
            PointProperty::Steepness => AttrValue::Float(self.steepness[idx]),
            PointProperty::Seed => AttrValue::Int(self.seed[idx]),
        }
    }

    pub fn write_property(&mut self, p: PointProperty, idx: usize, v: &AttrValue) {
        let v = cast(v, p.kind());
        match (p, v) {
            (PointProperty::Density, AttrValue::Float(f)) => self.density[idx] = f,
            (PointProperty::Position, AttrValue::Vec3(a)) => self.position[idx] = a,
            (PointProperty::Rotation, AttrValue::Quat(q)) => self.rotation[idx] = q,
            (PointProperty::Scale, AttrValue::Vec3(a)) => self.scale[idx] = a,
            (PointProperty::BoundsMin, AttrValue::Vec3(a)) => self.bounds_min[idx] = a,
            (PointProperty::BoundsMax, AttrValue::Vec3(a)) => self.bounds_max[idx] = a,
            (PointProperty::Color, AttrValue::Vec4(a)) => self.color[idx] = a,
            (PointProperty::Steepness, AttrValue::Float(f)) => self.steepness[idx] = f,
            (PointProperty::Seed, AttrValue::Int(n)) => self.seed[idx] = n,
            _ => unreachable!("cast returned the wrong kind"),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attribute_kind(&self, name: &str) -> Option<AttrKind> {
        self.attributes.get(name).map(|c| c.kind)
    }

    /// Create the attribute if missing, or re-declare it when the kind
    /// changed. Existing same-kind columns are left untouched.
    pub fn ensure_attribute(&mut self, name: &str, kind: AttrKind) {
        match self.attributes.get(name) {
            Some(col) if col.kind == kind => {}
            Some(_) => {
                let col = AttributeColumn {
                    kind,
                    values: vec![AttrValue::default_of(kind); self.len],
                    enabled: true,
                };
                self.attributes.insert(name.to_string(), col);
            }
            None => {
                self.order.push(name.to_string());
                let col = AttributeColumn {
                    kind,
                    values: vec![AttrValue::default_of(kind); self.len],
                    enabled: true,
                };
                self.attributes.insert(name.to_string(), col);
            }
        }
    }

    pub fn read_attribute(&self, name: &str, idx: usize) -> Option<AttrValue> {
        self.attributes.get(name).map(|c| c.values[idx].clone())
    }

    /// Write through a cast to the declared kind. Missing attributes are a
    /// preparation bug; the write is dropped.
    pub fn write_attribute(&mut self, name: &str, idx: usize, v: &AttrValue) {
        if let Some(col) = self.attributes.get_mut(name) {
            col.values[idx] = cast(v, col.kind);
        }
    }

    pub fn fill_attribute(&mut self, name: &str, v: &AttrValue) {
        if let Some(col) = self.attributes.get_mut(name) {
            let v = cast(v, col.kind);
            for slot in col.values.iter_mut() {
                *slot = v.clone();
            }
        }
    }

    pub fn set_attribute_enabled(&mut self, name: &str, enabled: bool) {
        if let Some(col) = self.attributes.get_mut(name) {
            col.enabled = enabled;
        }
    }

    pub fn attribute_enabled(&self, name: &str) -> bool {
        self.attributes.get(name).is_some_and(|c| c.enabled)
    }

    pub fn remove_attribute(&mut self, name: &str) {
        if self.attributes.remove(name).is_some() {
            self.order.retain(|n| n != name);
        }
    }

    /// Attribute identities in declaration order.
    pub fn attribute_identities(&self) -> Vec<(String, AttrKind)> {
        self.order
            .iter()
            .filter_map(|n| self.attributes.get(n).map(|c| (n.clone(), c.kind)))
            .collect()
    }
}

/// Shared handle over an input table (source data, never written during a
/// blend pass) and an output table (where results land).
#[derive(Clone)]
pub struct Dataset {
    inner: Arc<RwLock<DatasetInner>>,
}

struct DatasetInner {
    input: PointTable,
    output: PointTable,
}

impl Dataset {
    /// Output starts as a copy of the input.
    pub fn new(input: PointTable) -> Dataset {
        let output = input.clone();
        Dataset {
            inner: Arc::new(RwLock::new(DatasetInner { input, output })),
        }
    }

    pub fn from_parts(input: PointTable, output: PointTable) -> Dataset {
        Dataset {
            inner: Arc::new(RwLock::new(DatasetInner { input, output })),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn with_side<R>(&self, side: IoSide, f: impl FnOnce(&PointTable) -> R) -> R {
        let guard = self.inner.read();
        match side {
            IoSide::In => f(&guard.input),
            IoSide::Out => f(&guard.output),
        }
    }

    pub fn with_output_mut<R>(&self, f: impl FnOnce(&mut PointTable) -> R) -> R {
        f(&mut self.inner.write().output)
    }

    pub fn attr_kind(&self, side: IoSide, name: &str) -> Option<AttrKind> {
        self.with_side(side, |t| t.attribute_kind(name))
    }

    pub fn read_attr(&self, side: IoSide, name: &str, idx: usize) -> Option<AttrValue> {
        self.with_side(side, |t| t.read_attribute(name, idx))
    }

    pub fn write_attr(&self, name: &str, idx: usize, v: &AttrValue) {
        self.with_output_mut(|t| t.write_attribute(name, idx, v));
    }

    pub fn read_prop(&self, side: IoSide, p: PointProperty, idx: usize) -> AttrValue {
        self.with_side(side, |t| t.read_property(p, idx))
    }

    pub fn write_prop(&self, p: PointProperty, idx: usize, v: &AttrValue) {
        self.with_output_mut(|t| t.write_property(p, idx, v));
    }

    /// Take the output table out, leaving an empty one. Hosts call this once
    /// the blend pass is over.
    pub fn into_output(self) -> PointTable {
        let mut guard = self.inner.write();
        std::mem::replace(&mut guard.output, PointTable::new(0))
    }
}
