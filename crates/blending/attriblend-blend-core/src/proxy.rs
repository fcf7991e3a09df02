//! Stream proxies: uniform indexed read/write access over attributes, point
//! properties and constants, with sub-field selection and working-kind casts
//! applied at the boundary.

use attriblend_api_core::coercion::cast;
use attriblend_api_core::selector::Target;
use attriblend_api_core::{AttrKind, AttrValue, PointProperty, Selector, SubField};

use crate::error::PrepareError;
use crate::store::{Dataset, IoSide};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProxyRole {
    Read,
    Write,
}

/// A selector bound to a dataset side, with both the stream's declared kind
/// and the kind arithmetic will run at.
#[derive(Clone)]
pub struct ProxyDescriptor {
    pub dataset: Dataset,
    pub side: IoSide,
    pub role: ProxyRole,
    pub selector: Selector,
    pub real_kind: AttrKind,
    pub working_kind: AttrKind,
}

impl ProxyDescriptor {
    /// Resolve a selector against a dataset. Read captures require the
    /// attribute to exist; write captures are made after the output column
    /// has been declared.
    pub fn capture(
        dataset: &Dataset,
        selector: &Selector,
        side: IoSide,
        role: ProxyRole,
    ) -> Result<ProxyDescriptor, PrepareError> {
        let real_kind = match &selector.target {
            Target::Property(p) => p.kind(),
            Target::Attribute(name) => match dataset.attr_kind(side, name) {
                Some(kind) => kind,
                None => {
                    return Err(PrepareError::MissingAttribute {
                        name: name.clone(),
                    })
                }
            },
            Target::Sibling(_) => return Err(PrepareError::OnlyAttributesAndPropertiesSupported),
        };
        Ok(ProxyDescriptor {
            dataset: dataset.clone(),
            side,
            role,
            selector: selector.clone(),
            real_kind,
            working_kind: selector.working_kind(real_kind),
        })
    }
}

impl std::fmt::Debug for ProxyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyDescriptor")
            .field("side", &self.side)
            .field("role", &self.role)
            .field("selector", &self.selector)
            .field("real_kind", &self.real_kind)
            .field("working_kind", &self.working_kind)
            .finish()
    }
}

enum StreamSource {
    Attribute(String),
    Property(PointProperty),
    Constant(AttrValue),
}

/// One value stream, readable and (for attribute/property streams) writable
/// by point index. Reads produce the working kind; writes narrow back to the
/// stream's declared kind, injecting sub-field components in place.
pub struct StreamProxy {
    dataset: Option<Dataset>,
    side: IoSide,
    source: StreamSource,
    sub: Option<SubField>,
    real_kind: AttrKind,
    working_kind: AttrKind,
}

impl StreamProxy {
    pub fn from_descriptor(d: &ProxyDescriptor) -> StreamProxy {
        let source = match &d.selector.target {
            Target::Attribute(name) => StreamSource::Attribute(name.clone()),
            Target::Property(p) => StreamSource::Property(*p),
            Target::Sibling(_) => unreachable!("sibling selectors are resolved before capture"),
        };
        StreamProxy {
            dataset: Some(d.dataset.clone()),
            side: d.side,
            source,
            sub: d.selector.sub,
            real_kind: d.real_kind,
            working_kind: d.working_kind,
        }
    }

    pub fn constant(value: AttrValue, working_kind: AttrKind) -> StreamProxy {
        let real_kind = value.kind();
        StreamProxy {
            dataset: None,
            side: IoSide::In,
            source: StreamSource::Constant(cast(&value, working_kind)),
            sub: None,
            real_kind,
            working_kind,
        }
    }

    #[inline]
    pub fn working_kind(&self) -> AttrKind {
        self.working_kind
    }

    /// Name of the attribute this proxy writes, if it writes one.
    pub fn buffer_name(&self) -> Option<&str> {
        match &self.source {
            StreamSource::Attribute(name) => Some(name),
            _ => None,
        }
    }

    fn read_raw(&self, idx: usize) -> AttrValue {
        match (&self.source, &self.dataset) {
            (StreamSource::Constant(v), _) => return v.clone(),
            (StreamSource::Attribute(name), Some(ds)) => ds
                .read_attr(self.side, name, idx)
                .unwrap_or_else(|| AttrValue::default_of(self.real_kind)),
            (StreamSource::Property(p), Some(ds)) => ds.read_prop(self.side, *p, idx),
            (_, None) => AttrValue::default_of(self.real_kind),
        }
    }

    pub fn read(&self, idx: usize) -> AttrValue {
        let raw = self.read_raw(idx);
        match self.sub {
            Some(sub) => {
                let component = AttrValue::Double(sub.extract(&raw));
                if self.working_kind == AttrKind::Double {
                    component
                } else {
                    cast(&component, self.working_kind)
                }
            }
            None => {
                if raw.kind() == self.working_kind {
                    raw
                } else {
                    cast(&raw, self.working_kind)
                }
            }
        }
    }

    /// Writes always land on the output side.
    pub fn write(&self, idx: usize, v: &AttrValue) {
        let Some(ds) = &self.dataset else { return };
        match self.sub {
            Some(sub) => {
                let component = attriblend_api_core::coercion::to_double(v);
                let mut full = match &self.source {
                    StreamSource::Attribute(name) => ds
                        .read_attr(IoSide::Out, name, idx)
                        .unwrap_or_else(|| AttrValue::default_of(self.real_kind)),
                    StreamSource::Property(p) => ds.read_prop(IoSide::Out, *p, idx),
                    StreamSource::Constant(_) => return,
                };
                sub.inject(&mut full, component);
                self.write_full(idx, &full, ds);
            }
            None => self.write_full(idx, v, ds),
        }
    }

    fn write_full(&self, idx: usize, v: &AttrValue, ds: &Dataset) {
        match &self.source {
            StreamSource::Attribute(name) => ds.write_attr(name, idx, v),
            StreamSource::Property(p) => ds.write_prop(*p, idx, v),
            StreamSource::Constant(_) => {}
        }
    }
}
