//! attriblend-blend-core: type-erased attribute blending engine.
//!
//! The crate is organized as:
//! - `modes`: the blend-mode enums (extended + legacy) and their predicates
//! - `ops`: per-kind arithmetic kernels (pairwise / accumulate / finalize)
//! - `store`: the in-memory point table and shared dataset handle
//! - `proxy` / `blender`: stream descriptors and the bound per-attribute blender
//! - `curve`: weight remap curves baked to lookup tables
//! - `operation`: a configured blend step (operands, output, weighting)
//! - `manager`: ordered operation stacks with multi-source trackers
//! - `union`: N-source merge driving one manager per source
//! - `details`: legacy monolithic reconciliation of two attribute sets

pub mod blender;
pub mod curve;
pub mod details;
pub mod error;
pub mod manager;
pub mod modes;
pub mod operation;
pub mod ops;
pub mod proxy;
pub mod store;
pub mod union;

pub use blender::{OpStats, ProxyBlender};
pub use curve::{FloatLut, WeightCurve};
pub use details::{
    BlendingDetails, BlendingFilter, BlendingParam, PropertiesBlendingDetails, TypeDefaults,
};
pub use error::PrepareError;
pub use manager::{BlendOpsManager, ScopedTrackers};
pub use modes::{BlendMode, LegacyBlendMode};
pub use operation::{
    BlendOpConfig, BlendOperation, OutputMode, OutputTypeAuthority, WeightInput, WeightSettings,
};
pub use store::{Dataset, IoSide, PointTable};
pub use union::{UnionContributor, UnionData, UnionOpsManager, UnionWeighting};
