//! The bound per-attribute blender: a kernel plus its A/B/C streams, and the
//! Begin / Accumulate / End protocol for multi-source blending.

use attriblend_api_core::AttrValue;

use crate::error::PrepareError;
use crate::modes::BlendMode;
use crate::ops::Kernel;
use crate::proxy::StreamProxy;

/// Per-target accumulation tracker. `count` starts at -1 for modes that seed
/// from their first contributor.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OpStats {
    pub count: i64,
    pub total_weight: f64,
}

pub struct ProxyBlender {
    kernel: Kernel,
    a: StreamProxy,
    b: Option<StreamProxy>,
    c: StreamProxy,
    reset_before_multi: bool,
}

impl ProxyBlender {
    /// Bind a kernel to its streams. All streams must agree on the working
    /// kind; nothing is partially constructed on failure.
    pub fn new(
        mode: BlendMode,
        a: StreamProxy,
        b: Option<StreamProxy>,
        c: StreamProxy,
        reset_before_multi: bool,
    ) -> Result<ProxyBlender, PrepareError> {
        let working = a.working_kind();
        if c.working_kind() != working {
            return Err(PrepareError::WorkingKindMismatch);
        }
        if let Some(b) = &b {
            if b.working_kind() != working {
                return Err(PrepareError::WorkingKindMismatch);
            }
        }
        let kernel = Kernel::new(mode, working)?;
        Ok(ProxyBlender {
            kernel,
            a,
            b,
            c,
            reset_before_multi,
        })
    }

    #[inline]
    pub fn mode(&self) -> BlendMode {
        self.kernel.mode
    }

    /// Pairwise blend: C[ti] = op(A[ai], B[bi]). With no B stream the second
    /// operand is the A value itself.
    pub fn blend(&self, ai: usize, bi: usize, ti: usize, weight: f64) {
        let av = self.a.read(ai);
        let bv = match &self.b {
            Some(b) => b.read(bi),
            None => av.clone(),
        };
        let out = self.kernel.blend(&av, &bv, weight);
        self.c.write(ti, &out);
    }

    /// Degenerate pairwise form where B and C share the target index.
    pub fn blend_pair(&self, source: usize, target: usize, weight: f64) {
        self.blend(source, target, target, weight);
    }

    /// Start a multi-source accumulation on the target index.
    pub fn begin_multi(&self, ti: usize) -> OpStats {
        let mut stats = OpStats::default();
        let mode = self.kernel.mode;
        if mode.init_with_source() {
            // first contributor replaces the value wholesale
            stats.count = -1;
        } else if mode.consider_original() {
            if self.reset_before_multi {
                self.c
                    .write(ti, &AttrValue::default_of(self.c.working_kind()));
            } else {
                stats.count = 1;
                stats.total_weight = 1.0;
            }
        }
        stats
    }

    /// Fold one contributor into the target.
    pub fn multi_blend(&self, si: usize, ti: usize, weight: f64, stats: &mut OpStats) {
        let src = self.a.read(si);
        if stats.count < 0 {
            stats.count = 0;
            self.c.write(ti, &src);
        } else {
            let acc = self.c.read(ti);
            let folded = self.kernel.accumulate(&acc, &src, weight);
            self.c.write(ti, &folded);
        }
        stats.count += 1;
        stats.total_weight += weight;
    }

    /// Finalize the accumulation. A target no contributor touched is left
    /// exactly as it was.
    pub fn end_multi(&self, ti: usize, stats: &mut OpStats) {
        // untouched targets: 0 contributors, or -1 when the mode seeds from
        // its first contributor and none arrived
        if stats.count <= 0 {
            return;
        }
        let acc = self.c.read(ti);
        let out = self.kernel.finalize(&acc, stats.total_weight, stats.count);
        self.c.write(ti, &out);
    }

    pub fn div(&self, ti: usize, divisor: f64) {
        let v = self.c.read(ti);
        self.c.write(ti, &Kernel::div(&v, divisor));
    }

    /// Name of the output attribute buffer, when the output is an attribute.
    pub fn output_buffer(&self) -> Option<&str> {
        self.c.buffer_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::{ProxyDescriptor, ProxyRole};
    use crate::store::{Dataset, IoSide, PointTable};
    use attriblend_api_core::{AttrKind, Selector};

    fn blender(mode: BlendMode, values: &[f64], reset: bool) -> (ProxyBlender, Dataset) {
        let mut t = PointTable::new(values.len().max(1));
        t.ensure_attribute("Src", AttrKind::Double);
        t.ensure_attribute("Dst", AttrKind::Double);
        for (i, v) in values.iter().enumerate() {
            t.write_attribute("Src", i, &AttrValue::Double(*v));
        }
        let ds = Dataset::new(t);
        let a = StreamProxy::from_descriptor(
            &ProxyDescriptor::capture(&ds, &Selector::parse("Src").unwrap(), IoSide::In, ProxyRole::Read)
                .unwrap(),
        );
        let c = StreamProxy::from_descriptor(
            &ProxyDescriptor::capture(&ds, &Selector::parse("Dst").unwrap(), IoSide::Out, ProxyRole::Write)
                .unwrap(),
        );
        (ProxyBlender::new(mode, a, None, c, reset).unwrap(), ds)
    }

    fn dst(ds: &Dataset, idx: usize) -> f64 {
        match ds.read_attr(IoSide::Out, "Dst", idx) {
            Some(AttrValue::Double(v)) => v,
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn weight_multi_blend_averages_unit_weights() {
        let (b, ds) = blender(BlendMode::Weight, &[1.0, 2.0, 3.0], true);
        let mut stats = b.begin_multi(0);
        for i in 0..3 {
            b.multi_blend(i, 0, 1.0, &mut stats);
        }
        b.end_multi(0, &mut stats);
        assert_eq!(dst(&ds, 0), 2.0);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_weight, 3.0);
    }

    #[test]
    fn min_seeds_from_first_contributor() {
        let (b, ds) = blender(BlendMode::Min, &[5.0, -2.0, 7.0], true);
        // pre-existing garbage on the target must not leak in
        ds.write_attr("Dst", 0, &AttrValue::Double(-100.0));
        let mut stats = b.begin_multi(0);
        assert_eq!(stats.count, -1);
        for i in 0..3 {
            b.multi_blend(i, 0, 1.0, &mut stats);
        }
        b.end_multi(0, &mut stats);
        assert_eq!(dst(&ds, 0), -2.0);
    }

    #[test]
    fn untouched_target_is_left_alone() {
        let (b, ds) = blender(BlendMode::Max, &[1.0], true);
        ds.write_attr("Dst", 0, &AttrValue::Double(42.0));
        let mut stats = b.begin_multi(0);
        b.end_multi(0, &mut stats);
        assert_eq!(dst(&ds, 0), 42.0);
    }

    #[test]
    fn no_reset_counts_original_value() {
        let (b, ds) = blender(BlendMode::Add, &[10.0], false);
        ds.write_attr("Dst", 0, &AttrValue::Double(5.0));
        let mut stats = b.begin_multi(0);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.total_weight, 1.0);
        b.multi_blend(0, 0, 1.0, &mut stats);
        b.end_multi(0, &mut stats);
        assert_eq!(dst(&ds, 0), 15.0);
    }

    #[test]
    fn weighted_add_accumulation() {
        let (b, ds) = blender(BlendMode::Add, &[10.0, 20.0], true);
        let mut stats = b.begin_multi(0);
        b.multi_blend(0, 0, 0.4, &mut stats);
        b.multi_blend(1, 0, 0.6, &mut stats);
        b.end_multi(0, &mut stats);
        assert!((dst(&ds, 0) - 16.0).abs() < 1e-12);
    }

    #[test]
    fn pairwise_without_b_duplicates_a() {
        let (b, ds) = blender(BlendMode::Add, &[3.0], true);
        b.blend(0, 0, 0, 1.0);
        assert_eq!(dst(&ds, 0), 6.0);
    }
}
