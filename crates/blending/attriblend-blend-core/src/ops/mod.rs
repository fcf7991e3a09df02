//! Blend kernels: one (pairwise, accumulate, finalize) function triple per
//! blend mode, resolved once at preparation time and called through plain
//! function pointers on the hot path.
//!
//! Argument convention: `blend(a, b, w)` takes operand A (incoming source)
//! first and operand B (target side) second; `accumulate(acc, src, w)` takes
//! the running accumulator first.

pub mod rotation;
pub mod scalar;
pub mod text;
pub mod vector;

use attriblend_api_core::coercion::to_double;
use attriblend_api_core::{AttrKind, AttrValue};

use crate::error::PrepareError;
use crate::modes::BlendMode;

pub type BlendFn = fn(&AttrValue, &AttrValue, f64) -> AttrValue;
pub type FinalizeFn = fn(&AttrValue, f64, i64) -> AttrValue;

/// A blend mode bound to a working kind.
#[derive(Clone)]
pub struct Kernel {
    pub mode: BlendMode,
    pub kind: AttrKind,
    blend: BlendFn,
    accumulate: BlendFn,
    finalize: FinalizeFn,
}

impl Kernel {
    pub fn new(mode: BlendMode, kind: AttrKind) -> Result<Kernel, PrepareError> {
        if !supports(mode, kind) {
            return Err(PrepareError::UnsupportedModeForKind { mode, kind });
        }
        Ok(Kernel {
            mode,
            kind,
            blend: blend_fn(mode),
            accumulate: accumulate_fn(mode),
            finalize: finalize_fn(mode),
        })
    }

    #[inline]
    pub fn blend(&self, a: &AttrValue, b: &AttrValue, w: f64) -> AttrValue {
        (self.blend)(a, b, w)
    }

    #[inline]
    pub fn accumulate(&self, acc: &AttrValue, src: &AttrValue, w: f64) -> AttrValue {
        (self.accumulate)(acc, src, w)
    }

    #[inline]
    pub fn finalize(&self, acc: &AttrValue, total_weight: f64, count: i64) -> AttrValue {
        (self.finalize)(acc, total_weight, count)
    }

    /// Divide a value, guarding a zero divisor.
    pub fn div(v: &AttrValue, divisor: f64) -> AttrValue {
        if divisor == 0.0 {
            return v.clone();
        }
        match v {
            AttrValue::Quat(q) => AttrValue::Quat(rotation::div(*q, divisor)),
            _ => vector::map1(v, |x| x / divisor),
        }
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("mode", &self.mode)
            .field("kind", &self.kind)
            .finish()
    }
}

/// The statistical accumulators only make sense over plain numeric
/// components, and the modulo family has no string form; everything else
/// supports every mode.
pub fn supports(mode: BlendMode, kind: AttrKind) -> bool {
    match mode {
        BlendMode::Mod | BlendMode::ModCW => {
            !matches!(kind, AttrKind::Text | AttrKind::Name)
        }
        BlendMode::GeometricMean | BlendMode::HarmonicMean | BlendMode::Rms => matches!(
            kind,
            AttrKind::Int
                | AttrKind::Long
                | AttrKind::Float
                | AttrKind::Double
                | AttrKind::Vec2
                | AttrKind::Vec3
                | AttrKind::Vec4
                | AttrKind::Rotator
        ),
        _ => true,
    }
}

fn blend_fn(mode: BlendMode) -> BlendFn {
    match mode {
        BlendMode::None | BlendMode::CopySource => copy_a,
        BlendMode::CopyTarget => copy_b,
        BlendMode::Average => average,
        BlendMode::Weight | BlendMode::WeightNormalize | BlendMode::WeightedAdd => weighted_add,
        BlendMode::WeightedSubtract => weighted_sub,
        BlendMode::Multiply => multiply,
        BlendMode::Divide => divide,
        BlendMode::Min => min,
        BlendMode::Max => max,
        BlendMode::Add => add,
        BlendMode::Subtract => subtract,
        BlendMode::Lerp => lerp,
        BlendMode::UnsignedMin => unsigned_min,
        BlendMode::UnsignedMax => unsigned_max,
        BlendMode::AbsoluteMin => absolute_min,
        BlendMode::AbsoluteMax => absolute_max,
        BlendMode::Hash => hash,
        BlendMode::UnsignedHash => unsigned_hash,
        BlendMode::Mod => mod_simple,
        BlendMode::ModCW => mod_cw,
        BlendMode::GeometricMean => geometric_pair,
        BlendMode::HarmonicMean => harmonic_pair,
        BlendMode::Rms => rms_pair,
        BlendMode::Step => step,
    }
}

fn accumulate_fn(mode: BlendMode) -> BlendFn {
    match mode {
        // Average folds a raw sum and divides once at finalize
        BlendMode::Average => add_raw,
        // weighted folds so partial contributions land proportionally
        BlendMode::Add => weighted_add,
        BlendMode::Subtract => weighted_sub,
        // the accumulator must be kept / replaced, not re-copied positionally
        BlendMode::None | BlendMode::CopyTarget => copy_a,
        BlendMode::CopySource => copy_b,
        BlendMode::GeometricMean => geometric_acc,
        BlendMode::HarmonicMean => harmonic_acc,
        BlendMode::Rms => rms_acc,
        other => blend_fn(other),
    }
}

fn finalize_fn(mode: BlendMode) -> FinalizeFn {
    match mode {
        BlendMode::Average => finalize_average,
        BlendMode::Weight => finalize_weight,
        BlendMode::WeightNormalize => finalize_weight_normalize,
        BlendMode::GeometricMean => finalize_geometric,
        BlendMode::HarmonicMean => finalize_harmonic,
        BlendMode::Rms => finalize_rms,
        _ => finalize_noop,
    }
}

// Pairwise functions

fn copy_a(a: &AttrValue, _b: &AttrValue, _w: f64) -> AttrValue {
    a.clone()
}

fn copy_b(_a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    b.clone()
}

fn text_pair<'a>(a: &'a AttrValue, b: &'a AttrValue) -> Option<(&'a str, &'a str)> {
    match (a, b) {
        (
            AttrValue::Text(x) | AttrValue::Name(x),
            AttrValue::Text(y) | AttrValue::Name(y),
        ) => Some((x, y)),
        _ => None,
    }
}

fn retext(template: &AttrValue, s: String) -> AttrValue {
    match template {
        AttrValue::Name(_) => AttrValue::Name(s),
        _ => AttrValue::Text(s),
    }
}

fn average(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    if let Some((x, y)) = text_pair(a, b) {
        let sep = if matches!(a, AttrValue::Name(_)) { '_' } else { '|' };
        return retext(a, text::average(x, y, sep));
    }
    match (a, b) {
        (AttrValue::Quat(qa), AttrValue::Quat(qb)) => {
            AttrValue::Quat(rotation::slerp(*qa, *qb, 0.5))
        }
        _ => vector::transform_split(a, b, |x, y| (x + y) * 0.5, |qa, qb| {
            rotation::slerp(qa, qb, 0.5)
        }),
    }
}

fn add(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    add_raw(a, b, 0.0)
}

fn add_raw(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    if let Some((x, y)) = text_pair(a, b) {
        return retext(a, text::add(x, y));
    }
    vector::map2(a, b, |x, y| x + y)
}

fn subtract(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    if let Some((x, y)) = text_pair(a, b) {
        return retext(a, text::sub(x, y));
    }
    vector::map2(a, b, |x, y| x - y)
}

fn multiply(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    if let Some((x, y)) = text_pair(a, b) {
        return retext(a, text::add(x, y));
    }
    match (a, b) {
        (AttrValue::Quat(qa), AttrValue::Quat(qb)) => {
            AttrValue::Quat(rotation::normalize(rotation::mul(*qa, *qb)))
        }
        _ => vector::map2(a, b, |x, y| x * y),
    }
}

fn divide(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    if text_pair(a, b).is_some() {
        return a.clone();
    }
    vector::map2(a, b, scalar::div_guarded)
}

fn weighted_add(a: &AttrValue, b: &AttrValue, w: f64) -> AttrValue {
    if let Some((x, y)) = text_pair(a, b) {
        return if w > 0.5 { retext(a, text::add(x, y)) } else { a.clone() };
    }
    match (a, b) {
        (AttrValue::Quat(qa), AttrValue::Quat(qb)) => {
            AttrValue::Quat(rotation::weighted_add(*qa, *qb, w))
        }
        _ => vector::transform_split(a, b, |x, y| x + y * w, |qa, qb| {
            rotation::weighted_add(qa, qb, w)
        }),
    }
}

fn weighted_sub(a: &AttrValue, b: &AttrValue, w: f64) -> AttrValue {
    if let Some((x, y)) = text_pair(a, b) {
        return if w > 0.5 { retext(a, text::sub(x, y)) } else { a.clone() };
    }
    match (a, b) {
        (AttrValue::Quat(qa), AttrValue::Quat(qb)) => {
            AttrValue::Quat(rotation::weighted_sub(*qa, *qb, w))
        }
        _ => vector::transform_split(a, b, |x, y| x - y * w, |qa, qb| {
            rotation::weighted_sub(qa, qb, w)
        }),
    }
}

fn lerp(a: &AttrValue, b: &AttrValue, w: f64) -> AttrValue {
    if text_pair(a, b).is_some() {
        return step(a, b, w);
    }
    match (a, b) {
        (AttrValue::Quat(qa), AttrValue::Quat(qb)) => {
            AttrValue::Quat(rotation::slerp(*qa, *qb, w))
        }
        _ => vector::transform_split(
            a,
            b,
            |x, y| scalar::lerp(x, y, w),
            |qa, qb| rotation::slerp(qa, qb, w),
        ),
    }
}

fn min(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    ordered(a, b, true, f64::min)
}

fn max(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    ordered(a, b, false, f64::max)
}

fn unsigned_min(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    ordered(a, b, true, scalar::unsigned_min)
}

fn unsigned_max(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    ordered(a, b, false, scalar::unsigned_max)
}

fn absolute_min(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    ordered(a, b, true, scalar::abs_min)
}

fn absolute_max(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    ordered(a, b, false, scalar::abs_max)
}

/// Shared shape of the min/max family: strings compare by length, quats by
/// rotation angle (whole-value winner), everything else component-wise.
fn ordered(
    a: &AttrValue,
    b: &AttrValue,
    want_min: bool,
    comp: impl Fn(f64, f64) -> f64,
) -> AttrValue {
    if let Some((x, y)) = text_pair(a, b) {
        let pick = if want_min { text::min(x, y) } else { text::max(x, y) };
        return retext(a, pick.to_string());
    }
    match (a, b) {
        (AttrValue::Quat(qa), AttrValue::Quat(qb)) => {
            let a_wins = if want_min {
                rotation::angle(*qa) <= rotation::angle(*qb)
            } else {
                rotation::angle(*qa) >= rotation::angle(*qb)
            };
            AttrValue::Quat(if a_wins { *qa } else { *qb })
        }
        _ => vector::transform_split(a, b, &comp, |qa, qb| {
            let a_wins = if want_min {
                rotation::angle(qa) <= rotation::angle(qb)
            } else {
                rotation::angle(qa) >= rotation::angle(qb)
            };
            if a_wins {
                qa
            } else {
                qb
            }
        }),
    }
}

fn hash(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    if let Some((x, y)) = text_pair(a, b) {
        return retext(a, text::hash(x, y));
    }
    match (a, b) {
        (AttrValue::Quat(qa), AttrValue::Quat(qb)) => AttrValue::Quat(rotation::hash(*qa, *qb)),
        _ => vector::map2(a, b, scalar::hash),
    }
}

fn unsigned_hash(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    if let Some((x, y)) = text_pair(a, b) {
        return retext(a, text::unsigned_hash(x, y));
    }
    match (a, b) {
        (AttrValue::Quat(qa), AttrValue::Quat(qb)) => AttrValue::Quat(rotation::hash(*qa, *qb)),
        _ => vector::map2(a, b, scalar::unsigned_hash),
    }
}

fn mod_simple(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    if text_pair(a, b).is_some() {
        return a.clone();
    }
    let m = to_double(b);
    vector::map1(a, |x| scalar::fmod_guarded(x, m))
}

fn mod_cw(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    if text_pair(a, b).is_some() {
        return a.clone();
    }
    vector::map2(a, b, scalar::fmod_guarded)
}

fn step(a: &AttrValue, b: &AttrValue, w: f64) -> AttrValue {
    if w < 0.5 {
        a.clone()
    } else {
        b.clone()
    }
}

fn geometric_pair(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    vector::map2(a, b, scalar::geometric_pair)
}

fn harmonic_pair(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    vector::map2(a, b, scalar::harmonic_pair)
}

fn rms_pair(a: &AttrValue, b: &AttrValue, _w: f64) -> AttrValue {
    vector::map2(a, b, scalar::rms_pair)
}

// Statistical accumulators (numeric kinds only, enforced at kernel build)

fn geometric_acc(acc: &AttrValue, src: &AttrValue, _w: f64) -> AttrValue {
    vector::map2(acc, src, |x, y| x + scalar::ln_term(y))
}

fn harmonic_acc(acc: &AttrValue, src: &AttrValue, _w: f64) -> AttrValue {
    vector::map2(acc, src, |x, y| x + scalar::reciprocal_term(y))
}

fn rms_acc(acc: &AttrValue, src: &AttrValue, _w: f64) -> AttrValue {
    vector::map2(acc, src, |x, y| x + y * y)
}

// Finalize functions

fn normalize_weight(v: &AttrValue, total_weight: f64) -> AttrValue {
    match v {
        AttrValue::Quat(q) => AttrValue::Quat(rotation::normalize(*q)),
        AttrValue::Transform { pos, rot, scale } => {
            let scaled = vector::map1(
                &AttrValue::Transform {
                    pos: *pos,
                    rot: [0.0, 0.0, 0.0, 1.0],
                    scale: *scale,
                },
                |x| scalar::div_guarded(x, total_weight),
            );
            match scaled {
                AttrValue::Transform { pos, scale, .. } => AttrValue::Transform {
                    pos,
                    rot: rotation::normalize(*rot),
                    scale,
                },
                other => other,
            }
        }
        AttrValue::Text(_) | AttrValue::Name(_) => v.clone(),
        _ => vector::map1(v, |x| scalar::div_guarded(x, total_weight)),
    }
}

fn finalize_average(acc: &AttrValue, _total_weight: f64, count: i64) -> AttrValue {
    if count > 0 {
        Kernel::div(acc, count as f64)
    } else {
        acc.clone()
    }
}

fn finalize_weight(acc: &AttrValue, total_weight: f64, _count: i64) -> AttrValue {
    if total_weight > 1.0 {
        normalize_weight(acc, total_weight)
    } else {
        acc.clone()
    }
}

fn finalize_weight_normalize(acc: &AttrValue, total_weight: f64, _count: i64) -> AttrValue {
    normalize_weight(acc, total_weight.max(1.0))
}

fn finalize_geometric(acc: &AttrValue, _total_weight: f64, count: i64) -> AttrValue {
    if count > 0 {
        vector::map1(acc, |x| (x / count as f64).exp())
    } else {
        acc.clone()
    }
}

fn finalize_harmonic(acc: &AttrValue, _total_weight: f64, count: i64) -> AttrValue {
    if count > 0 {
        vector::map1(acc, |x| if x != 0.0 { count as f64 / x } else { x })
    } else {
        acc.clone()
    }
}

fn finalize_rms(acc: &AttrValue, _total_weight: f64, count: i64) -> AttrValue {
    if count > 0 {
        vector::map1(acc, |x| (x / count as f64).sqrt())
    } else {
        acc.clone()
    }
}

fn finalize_noop(acc: &AttrValue, _total_weight: f64, _count: i64) -> AttrValue {
    acc.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(mode: BlendMode) -> Kernel {
        Kernel::new(mode, AttrKind::Double).unwrap()
    }

    #[test]
    fn pairwise_scalar_table() {
        let a = AttrValue::Double(0.2);
        let b = AttrValue::Double(0.8);
        assert_eq!(k(BlendMode::Average).blend(&a, &b, 1.0), AttrValue::Double(0.5));
        assert_eq!(k(BlendMode::Add).blend(&a, &b, 1.0), AttrValue::Double(1.0));
        assert_eq!(
            k(BlendMode::Subtract).blend(&a, &b, 1.0),
            AttrValue::Double(0.2 - 0.8)
        );
        assert_eq!(k(BlendMode::Min).blend(&a, &b, 1.0), AttrValue::Double(0.2));
        assert_eq!(k(BlendMode::Max).blend(&a, &b, 1.0), AttrValue::Double(0.8));
        assert_eq!(k(BlendMode::CopySource).blend(&a, &b, 1.0), a);
        assert_eq!(k(BlendMode::CopyTarget).blend(&a, &b, 1.0), b);
        assert_eq!(k(BlendMode::None).blend(&a, &b, 1.0), a);
    }

    #[test]
    fn weighted_forms() {
        let a = AttrValue::Double(1.0);
        let b = AttrValue::Double(4.0);
        assert_eq!(k(BlendMode::WeightedAdd).blend(&a, &b, 0.5), AttrValue::Double(3.0));
        assert_eq!(
            k(BlendMode::WeightedSubtract).blend(&a, &b, 0.5),
            AttrValue::Double(-1.0)
        );
        assert_eq!(k(BlendMode::Lerp).blend(&a, &b, 0.25), AttrValue::Double(1.75));
        assert_eq!(k(BlendMode::Step).blend(&a, &b, 0.2), a);
        assert_eq!(k(BlendMode::Step).blend(&a, &b, 0.7), b);
    }

    #[test]
    fn unsigned_family_keeps_signs() {
        let a = AttrValue::Double(-5.0);
        let b = AttrValue::Double(3.0);
        assert_eq!(k(BlendMode::UnsignedMin).blend(&a, &b, 1.0), AttrValue::Double(3.0));
        assert_eq!(k(BlendMode::UnsignedMax).blend(&a, &b, 1.0), AttrValue::Double(-5.0));
        assert_eq!(k(BlendMode::AbsoluteMin).blend(&a, &b, 1.0), AttrValue::Double(3.0));
        assert_eq!(k(BlendMode::AbsoluteMax).blend(&a, &b, 1.0), AttrValue::Double(5.0));
    }

    #[test]
    fn mod_family_guards_zero() {
        let a = AttrValue::Double(7.0);
        assert_eq!(
            k(BlendMode::Mod).blend(&a, &AttrValue::Double(4.0), 1.0),
            AttrValue::Double(3.0)
        );
        assert_eq!(
            k(BlendMode::Mod).blend(&a, &AttrValue::Double(0.0), 1.0),
            AttrValue::Double(7.0)
        );
        assert_eq!(
            k(BlendMode::Divide).blend(&a, &AttrValue::Double(0.0), 1.0),
            AttrValue::Double(7.0)
        );
    }

    #[test]
    fn statistical_modes_reject_non_numeric() {
        assert!(Kernel::new(BlendMode::GeometricMean, AttrKind::Text).is_err());
        assert!(Kernel::new(BlendMode::Rms, AttrKind::Quat).is_err());
        assert!(Kernel::new(BlendMode::HarmonicMean, AttrKind::Transform).is_err());
        assert!(Kernel::new(BlendMode::GeometricMean, AttrKind::Vec3).is_ok());
    }

    #[test]
    fn mod_family_rejects_strings() {
        assert!(Kernel::new(BlendMode::Mod, AttrKind::Text).is_err());
        assert!(Kernel::new(BlendMode::Mod, AttrKind::Name).is_err());
        assert!(Kernel::new(BlendMode::ModCW, AttrKind::Text).is_err());
        assert!(Kernel::new(BlendMode::Mod, AttrKind::Vec3).is_ok());
        assert!(Kernel::new(BlendMode::ModCW, AttrKind::Int).is_ok());
    }

    #[test]
    fn statistical_accumulate_finalize() {
        let geo = k(BlendMode::GeometricMean);
        let mut acc = AttrValue::Double(0.0);
        for x in [4.0, 9.0] {
            acc = geo.accumulate(&acc, &AttrValue::Double(x), 1.0);
        }
        match geo.finalize(&acc, 2.0, 2) {
            AttrValue::Double(v) => assert!((v - 6.0).abs() < 1e-9),
            other => panic!("{other:?}"),
        }

        let rms = k(BlendMode::Rms);
        let mut acc = AttrValue::Double(0.0);
        for x in [3.0, 4.0] {
            acc = rms.accumulate(&acc, &AttrValue::Double(x), 1.0);
        }
        match rms.finalize(&acc, 2.0, 2) {
            AttrValue::Double(v) => assert!((v - (12.5f64).sqrt()).abs() < 1e-9),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn weight_mode_normalizes_only_above_one() {
        let w = k(BlendMode::Weight);
        // three contributors at weight 1 each: acc = 6, tw = 3
        assert_eq!(w.finalize(&AttrValue::Double(6.0), 3.0, 3), AttrValue::Double(2.0));
        // total weight below 1 is left alone
        assert_eq!(w.finalize(&AttrValue::Double(0.6), 0.6, 1), AttrValue::Double(0.6));
    }

    #[test]
    fn weight_normalize_divides_by_at_least_one() {
        let wn = k(BlendMode::WeightNormalize);
        assert_eq!(wn.finalize(&AttrValue::Double(6.0), 3.0, 3), AttrValue::Double(2.0));
        assert_eq!(wn.finalize(&AttrValue::Double(0.6), 0.5, 1), AttrValue::Double(0.6));
    }

    #[test]
    fn zero_total_weight_never_panics() {
        for mode in [
            BlendMode::Average,
            BlendMode::Weight,
            BlendMode::WeightNormalize,
            BlendMode::Add,
        ] {
            let kern = k(mode);
            let out = kern.finalize(&AttrValue::Double(1.5), 0.0, 0);
            assert_eq!(out, AttrValue::Double(1.5), "{mode:?}");
        }
    }

    #[test]
    fn text_rules() {
        let a = AttrValue::text("banana");
        let b = AttrValue::text("an");
        let kt = |m| Kernel::new(m, AttrKind::Text).unwrap();
        assert_eq!(kt(BlendMode::Add).blend(&a, &b, 1.0), AttrValue::text("bananaan"));
        assert_eq!(kt(BlendMode::Subtract).blend(&a, &b, 1.0), AttrValue::text("ba"));
        assert_eq!(kt(BlendMode::Min).blend(&a, &b, 1.0), AttrValue::text("an"));
        assert_eq!(kt(BlendMode::Average).blend(&a, &b, 1.0), AttrValue::text("banana|an"));
        assert_eq!(kt(BlendMode::Lerp).blend(&a, &b, 0.2), a);
        assert_eq!(kt(BlendMode::Lerp).blend(&a, &b, 0.9), b);
    }

    #[test]
    fn quat_lerp_is_slerp() {
        use attriblend_api_core::coercion::euler_to_quat;
        let a = AttrValue::Quat(euler_to_quat([0.0, 0.0, 0.0]));
        let b = AttrValue::Quat(euler_to_quat([90.0, 0.0, 0.0]));
        let kq = Kernel::new(BlendMode::Lerp, AttrKind::Quat).unwrap();
        match kq.blend(&a, &b, 0.5) {
            AttrValue::Quat(q) => {
                let e = attriblend_api_core::coercion::quat_to_euler(q);
                assert!((e[0] - 45.0).abs() < 1e-6, "{e:?}");
            }
            other => panic!("{other:?}"),
        }
    }
}
