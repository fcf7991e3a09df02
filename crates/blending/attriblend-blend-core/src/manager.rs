//! Ordered stacks of blend operations over shared datasets.
//!
//! Lifecycle: `init` (single-threaded, fail-fast), then any number of
//! pairwise or multi-source passes over disjoint index ranges, then
//! `cleanup`. Trackers are caller-owned arrays indexed by operation slot so
//! parallel hosts can keep one private array per scope.

use std::ops::Range;

use hashbrown::HashSet;

use crate::blender::OpStats;
use crate::error::PrepareError;
use crate::operation::{resolve_sibling_selectors, BlendOpConfig, BlendOperation};
use crate::store::{Dataset, IoSide};

pub struct BlendOpsManager {
    ops: Vec<BlendOperation>,
    target: Dataset,
}

/// Per-scope tracker arrays for partitioned execution. Each scope gets its
/// own slots; nothing is shared across scopes.
pub struct ScopedTrackers {
    per_scope: Vec<Vec<OpStats>>,
}

impl ScopedTrackers {
    pub fn scope_mut(&mut self, scope: usize) -> &mut [OpStats] {
        &mut self.per_scope[scope]
    }

    pub fn len(&self) -> usize {
        self.per_scope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_scope.is_empty()
    }
}

impl BlendOpsManager {
    pub fn new(target: &Dataset) -> BlendOpsManager {
        BlendOpsManager {
            ops: Vec::new(),
            target: target.clone(),
        }
    }

    /// Resolve sibling references over the whole config list, then prepare
    /// every operation in order. The first failure aborts: no operation of a
    /// partially-failed stack is ever active.
    pub fn init(
        &mut self,
        mut configs: Vec<BlendOpConfig>,
        source_a: &Dataset,
        source_b: Option<&Dataset>,
    ) -> Result<(), PrepareError> {
        resolve_sibling_selectors(&mut configs)?;
        let mut ops = Vec::with_capacity(configs.len());
        for (i, cfg) in configs.iter().enumerate() {
            ops.push(BlendOperation::prepare(
                cfg, i, source_a, source_b, &self.target,
            )?);
        }
        self.ops = ops;
        Ok(())
    }

    pub fn target(&self) -> &Dataset {
        &self.target
    }

    pub fn ops(&self) -> &[BlendOperation] {
        &self.ops
    }

    pub fn ops_mut(&mut self) -> &mut [BlendOperation] {
        &mut self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// One past the highest operation slot, the required tracker array size.
    pub fn tracker_len(&self) -> usize {
        self.ops.iter().map(|op| op.op_idx + 1).max().unwrap_or(0)
    }

    pub fn blend(&self, source: usize, target: usize, weight: f64) {
        for op in &self.ops {
            op.blend(source, target, weight);
        }
    }

    pub fn blend_auto_weight(&self, source: usize, target: usize) {
        for op in &self.ops {
            op.blend_auto_weight(source, target);
        }
    }

    pub fn init_trackers(&self, trackers: &mut Vec<OpStats>) {
        trackers.clear();
        trackers.resize(self.tracker_len(), OpStats::default());
    }

    /// One private tracker array per scope; scopes carry disjoint target
    /// ranges so no tracker is ever shared.
    pub fn init_scoped_trackers(&self, scopes: &[Range<usize>]) -> ScopedTrackers {
        ScopedTrackers {
            per_scope: scopes
                .iter()
                .map(|_| vec![OpStats::default(); self.tracker_len()])
                .collect(),
        }
    }

    pub fn begin_multi_blend(&self, target: usize, trackers: &mut [OpStats]) {
        for op in &self.ops {
            trackers[op.op_idx] = op.begin_multi(target);
        }
    }

    pub fn multi_blend(&self, source: usize, target: usize, weight: f64, trackers: &mut [OpStats]) {
        for op in &self.ops {
            op.multi_blend(source, target, weight, &mut trackers[op.op_idx]);
        }
    }

    pub fn end_multi_blend(&self, target: usize, trackers: &mut [OpStats]) {
        for op in &self.ops {
            op.end_multi(target, &mut trackers[op.op_idx]);
        }
    }

    /// Settle output buffers and drop transient scratch attributes. A
    /// transient buffer that already existed on the input is kept (and
    /// re-enabled) with a warning.
    pub fn cleanup(&mut self) {
        let mut disabled: HashSet<String> = HashSet::new();
        for op in &self.ops {
            op.complete_work(&self.target, &mut disabled);
        }
        for name in disabled {
            let on_input = self.target.with_side(IoSide::In, |t| t.has_attribute(&name));
            if on_input {
                log::warn!("transient blend buffer {name:?} exists on the input; keeping it");
                self.target
                    .with_output_mut(|t| t.set_attribute_enabled(&name, true));
            } else {
                self.target.with_output_mut(|t| t.remove_attribute(&name));
            }
        }
        self.ops.clear();
    }
}
