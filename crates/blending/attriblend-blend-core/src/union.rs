//! Union blending: folding contributors from several source datasets into
//! each target point through one shared accumulation per output.
//!
//! Each source gets its own prepared operation stack against the common
//! target. Operations that land on the same output selector share a tracker
//! slot, so Begin and End run exactly once per output no matter how many
//! sources contribute.

use hashbrown::HashMap;

use crate::blender::OpStats;
use crate::error::PrepareError;
use crate::operation::BlendOpConfig;
use crate::manager::BlendOpsManager;
use crate::store::Dataset;

/// One contributor to a target point: which source dataset, which point in
/// it, and how far it sits from the target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnionContributor {
    pub io_idx: usize,
    pub point_idx: usize,
    pub distance: f64,
}

/// Per-target contributor lists, built by whatever spatial pass matched
/// source points to target points.
#[derive(Clone, Debug, Default)]
pub struct UnionData {
    per_target: Vec<Vec<UnionContributor>>,
}

impl UnionData {
    pub fn new(num_targets: usize) -> UnionData {
        UnionData {
            per_target: vec![Vec::new(); num_targets],
        }
    }

    pub fn add(&mut self, target_idx: usize, io_idx: usize, point_idx: usize, distance: f64) {
        self.per_target[target_idx].push(UnionContributor {
            io_idx,
            point_idx,
            distance,
        });
    }

    pub fn contributors(&self, target_idx: usize) -> &[UnionContributor] {
        &self.per_target[target_idx]
    }

    pub fn len(&self) -> usize {
        self.per_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_target.is_empty()
    }
}

/// How contributor distances turn into blend weights.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UnionWeighting {
    Constant(f64),
    /// Linear falloff: weight 1 at distance 0, fading to 0 at `radius`.
    InverseDistance { radius: f64 },
}

impl Default for UnionWeighting {
    fn default() -> Self {
        UnionWeighting::Constant(1.0)
    }
}

impl UnionWeighting {
    fn weight(&self, distance: f64) -> f64 {
        match *self {
            UnionWeighting::Constant(w) => w,
            UnionWeighting::InverseDistance { radius } => {
                if radius <= 0.0 {
                    1.0
                } else {
                    (1.0 - distance / radius).clamp(0.0, 1.0)
                }
            }
        }
    }
}

pub struct UnionOpsManager {
    managers: Vec<BlendOpsManager>,
    // slot -> (manager index, op position) of the representative operation
    representatives: Vec<(usize, usize)>,
    weighting: UnionWeighting,
}

impl UnionOpsManager {
    /// Prepare one operation stack per source against the shared target,
    /// then fold operations with the same output selector into shared
    /// tracker slots. Fail-fast: any preparation error aborts the whole
    /// union with nothing active.
    pub fn init(
        per_source_configs: Vec<Vec<BlendOpConfig>>,
        sources: &[Dataset],
        target: &Dataset,
        weighting: UnionWeighting,
    ) -> Result<UnionOpsManager, PrepareError> {
        debug_assert_eq!(per_source_configs.len(), sources.len());
        let mut managers = Vec::with_capacity(sources.len());
        for (configs, source) in per_source_configs.into_iter().zip(sources) {
            let mut mgr = BlendOpsManager::new(target);
            mgr.init(configs, source, None)?;
            managers.push(mgr);
        }

        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut representatives = Vec::new();
        for (m, mgr) in managers.iter_mut().enumerate() {
            for (p, op) in mgr.ops_mut().iter_mut().enumerate() {
                let key = op.output_selector.to_string();
                let slot = *slots.entry(key).or_insert_with(|| {
                    representatives.push((m, p));
                    representatives.len() - 1
                });
                op.op_idx = slot;
            }
        }

        Ok(UnionOpsManager {
            managers,
            representatives,
            weighting,
        })
    }

    pub fn tracker_len(&self) -> usize {
        self.representatives.len()
    }

    pub fn init_trackers(&self, trackers: &mut Vec<OpStats>) {
        trackers.clear();
        trackers.resize(self.tracker_len(), OpStats::default());
    }

    /// Contributor weights for one target point, in contributor order.
    /// Returns the contributor count.
    pub fn compute_weights(
        &self,
        target_idx: usize,
        union_data: &UnionData,
        out: &mut Vec<f64>,
    ) -> usize {
        out.clear();
        for c in union_data.contributors(target_idx) {
            out.push(self.weighting.weight(c.distance));
        }
        out.len()
    }

    pub fn begin(&self, target_idx: usize, trackers: &mut [OpStats]) {
        for (slot, &(m, p)) in self.representatives.iter().enumerate() {
            trackers[slot] = self.managers[m].ops()[p].begin_multi(target_idx);
        }
    }

    /// Fold one contributor through its source's operation stack.
    pub fn blend_contributor(
        &self,
        io_idx: usize,
        point_idx: usize,
        target_idx: usize,
        weight: f64,
        trackers: &mut [OpStats],
    ) {
        self.managers[io_idx].multi_blend(point_idx, target_idx, weight, trackers);
    }

    pub fn end(&self, target_idx: usize, trackers: &mut [OpStats]) {
        for (slot, &(m, p)) in self.representatives.iter().enumerate() {
            self.managers[m].ops()[p].end_multi(target_idx, &mut trackers[slot]);
        }
    }

    /// Full merge of one target point: Begin once per output, one
    /// accumulation per pre-weighted contributor, End once per output.
    pub fn blend_weighted(
        &self,
        target_idx: usize,
        contributors: &[(usize, usize, f64)],
        trackers: &mut [OpStats],
    ) {
        self.begin(target_idx, trackers);
        for &(io_idx, point_idx, weight) in contributors {
            self.blend_contributor(io_idx, point_idx, target_idx, weight, trackers);
        }
        self.end(target_idx, trackers);
    }

    /// Merge one target point from spatial union data, deriving weights from
    /// contributor distances.
    pub fn merge(&self, target_idx: usize, union_data: &UnionData, trackers: &mut [OpStats]) {
        self.begin(target_idx, trackers);
        for c in union_data.contributors(target_idx) {
            let w = self.weighting.weight(c.distance);
            self.blend_contributor(c.io_idx, c.point_idx, target_idx, w, trackers);
        }
        self.end(target_idx, trackers);
    }

    /// Degenerate merge with exactly one contributor.
    pub fn merge_single(
        &self,
        io_idx: usize,
        point_idx: usize,
        target_idx: usize,
        weight: f64,
        trackers: &mut [OpStats],
    ) {
        self.blend_weighted(target_idx, &[(io_idx, point_idx, weight)], trackers);
    }

    pub fn cleanup(&mut self) {
        for mgr in &mut self.managers {
            mgr.cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::BlendMode;
    use crate::store::{IoSide, PointTable};
    use attriblend_api_core::{AttrKind, AttrValue, Selector};

    fn source(values: &[f64]) -> Dataset {
        let mut t = PointTable::new(values.len());
        t.ensure_attribute("V", AttrKind::Double);
        for (i, v) in values.iter().enumerate() {
            t.write_attribute("V", i, &AttrValue::Double(*v));
        }
        Dataset::new(t)
    }

    fn out(ds: &Dataset, idx: usize) -> f64 {
        match ds.read_attr(IoSide::Out, "V", idx) {
            Some(AttrValue::Double(v)) => v,
            other => panic!("{other:?}"),
        }
    }

    fn union_of(mode: BlendMode, sources: &[Dataset], target: &Dataset) -> UnionOpsManager {
        let configs: Vec<Vec<BlendOpConfig>> = sources
            .iter()
            .map(|_| vec![BlendOpConfig::new(mode, Selector::parse("V").unwrap())])
            .collect();
        UnionOpsManager::init(configs, sources, target, UnionWeighting::default()).unwrap()
    }

    #[test]
    fn same_output_shares_one_slot() {
        let sources = [source(&[10.0]), source(&[20.0])];
        let target = source(&[0.0]);
        let union = union_of(BlendMode::Add, &sources, &target);
        assert_eq!(union.tracker_len(), 1);
    }

    #[test]
    fn weighted_add_across_sources() {
        let sources = [source(&[10.0]), source(&[20.0])];
        let target = source(&[0.0]);
        let union = union_of(BlendMode::Add, &sources, &target);
        let mut trackers = Vec::new();
        union.init_trackers(&mut trackers);
        union.blend_weighted(0, &[(0, 0, 0.4), (1, 0, 0.6)], &mut trackers);
        assert!((out(&target, 0) - 16.0).abs() < 1e-12);
        assert_eq!(trackers[0].count, 2);
    }

    #[test]
    fn min_seeds_across_sources() {
        // seeding from the first contributor has to survive the source switch
        let sources = [source(&[5.0]), source(&[-2.0])];
        let target = source(&[100.0]);
        let union = union_of(BlendMode::Min, &sources, &target);
        let mut trackers = Vec::new();
        union.init_trackers(&mut trackers);
        union.blend_weighted(0, &[(0, 0, 1.0), (1, 0, 1.0)], &mut trackers);
        assert_eq!(out(&target, 0), -2.0);
    }

    #[test]
    fn inverse_distance_weights() {
        let w = UnionWeighting::InverseDistance { radius: 10.0 };
        assert_eq!(w.weight(0.0), 1.0);
        assert_eq!(w.weight(5.0), 0.5);
        assert_eq!(w.weight(10.0), 0.0);
        assert_eq!(w.weight(25.0), 0.0);
        // degenerate radius keeps every contributor at full weight
        assert_eq!(UnionWeighting::InverseDistance { radius: 0.0 }.weight(3.0), 1.0);
    }

    #[test]
    fn merge_uses_union_distances() {
        let sources = [source(&[0.0]), source(&[10.0])];
        let target = source(&[0.0]);
        let configs: Vec<Vec<BlendOpConfig>> = sources
            .iter()
            .map(|_| vec![BlendOpConfig::new(BlendMode::Weight, Selector::parse("V").unwrap())])
            .collect();
        let union = UnionOpsManager::init(
            configs,
            &sources,
            &target,
            UnionWeighting::InverseDistance { radius: 10.0 },
        )
        .unwrap();
        let mut data = UnionData::new(1);
        data.add(0, 0, 0, 5.0); // weight 0.5
        data.add(0, 1, 0, 5.0); // weight 0.5
        let mut trackers = Vec::new();
        union.init_trackers(&mut trackers);
        union.merge(0, &data, &mut trackers);
        // total weight 1.0, no normalization kicks in: 0*0.5 + 10*0.5
        assert_eq!(out(&target, 0), 5.0);
    }

    #[test]
    fn untouched_targets_stay_put() {
        let sources = [source(&[1.0])];
        let target = source(&[42.0]);
        let union = union_of(BlendMode::Max, &sources, &target);
        let mut trackers = Vec::new();
        union.init_trackers(&mut trackers);
        union.blend_weighted(0, &[], &mut trackers);
        assert_eq!(out(&target, 0), 42.0);
    }
}
