//! Component-wise lifts over AttrValue. Scalars are one-component vectors;
//! quats and the rotation part of transforms route through Euler space so a
//! plain numeric op still yields a valid rotation.

use attriblend_api_core::coercion::{cast, euler_to_quat, quat_to_euler};
use attriblend_api_core::AttrValue;

use super::rotation;

fn zip2<const N: usize>(a: &[f64; N], b: &[f64; N], f: impl Fn(f64, f64) -> f64) -> [f64; N] {
    let mut out = [0.0; N];
    for i in 0..N {
        out[i] = f(a[i], b[i]);
    }
    out
}

fn apply<const N: usize>(a: &[f64; N], f: impl Fn(f64) -> f64) -> [f64; N] {
    let mut out = [0.0; N];
    for i in 0..N {
        out[i] = f(a[i]);
    }
    out
}

/// Apply `f` per component. The result keeps the input's kind; integers are
/// narrowed with an `as` cast like every final write.
pub fn map1(v: &AttrValue, f: impl Fn(f64) -> f64) -> AttrValue {
    match v {
        AttrValue::Bool(x) => AttrValue::Bool(f(if *x { 1.0 } else { 0.0 }) != 0.0),
        AttrValue::Int(x) => AttrValue::Int(f(*x as f64) as i32),
        AttrValue::Long(x) => AttrValue::Long(f(*x as f64) as i64),
        AttrValue::Float(x) => AttrValue::Float(f(*x as f64) as f32),
        AttrValue::Double(x) => AttrValue::Double(f(*x)),
        AttrValue::Vec2(a) => AttrValue::Vec2(apply(a, f)),
        AttrValue::Vec3(a) => AttrValue::Vec3(apply(a, f)),
        AttrValue::Vec4(a) => AttrValue::Vec4(apply(a, f)),
        AttrValue::Rotator(a) => AttrValue::Rotator(apply(a, f)),
        AttrValue::Quat(q) => AttrValue::Quat(euler_to_quat(apply(&quat_to_euler(*q), f))),
        AttrValue::Transform { pos, rot, scale } => AttrValue::Transform {
            pos: apply(pos, &f),
            rot: euler_to_quat(apply(&quat_to_euler(*rot), &f)),
            scale: apply(scale, &f),
        },
        AttrValue::Text(_) | AttrValue::Name(_) => v.clone(),
    }
}

/// Apply `f` pairwise per component. Both operands are expected to share a
/// kind (the working kind); a mismatch casts `b` into `a`'s kind first.
pub fn map2(a: &AttrValue, b: &AttrValue, f: impl Fn(f64, f64) -> f64) -> AttrValue {
    match (a, b) {
        (AttrValue::Bool(x), AttrValue::Bool(y)) => {
            let xf = if *x { 1.0 } else { 0.0 };
            let yf = if *y { 1.0 } else { 0.0 };
            AttrValue::Bool(f(xf, yf) != 0.0)
        }
        (AttrValue::Int(x), AttrValue::Int(y)) => AttrValue::Int(f(*x as f64, *y as f64) as i32),
        (AttrValue::Long(x), AttrValue::Long(y)) => {
            AttrValue::Long(f(*x as f64, *y as f64) as i64)
        }
        (AttrValue::Float(x), AttrValue::Float(y)) => {
            AttrValue::Float(f(*x as f64, *y as f64) as f32)
        }
        (AttrValue::Double(x), AttrValue::Double(y)) => AttrValue::Double(f(*x, *y)),
        (AttrValue::Vec2(x), AttrValue::Vec2(y)) => AttrValue::Vec2(zip2(x, y, f)),
        (AttrValue::Vec3(x), AttrValue::Vec3(y)) => AttrValue::Vec3(zip2(x, y, f)),
        (AttrValue::Vec4(x), AttrValue::Vec4(y)) => AttrValue::Vec4(zip2(x, y, f)),
        (AttrValue::Rotator(x), AttrValue::Rotator(y)) => AttrValue::Rotator(zip2(x, y, f)),
        (AttrValue::Quat(x), AttrValue::Quat(y)) => AttrValue::Quat(rotation::eulerwise(*x, *y, f)),
        (
            AttrValue::Transform { pos, rot, scale },
            AttrValue::Transform {
                pos: bp,
                rot: br,
                scale: bs,
            },
        ) => AttrValue::Transform {
            pos: zip2(pos, bp, &f),
            rot: rotation::eulerwise(*rot, *br, &f),
            scale: zip2(scale, bs, &f),
        },
        (AttrValue::Text(_) | AttrValue::Name(_), _) => a.clone(),
        _ => map2(a, &cast(b, a.kind()), f),
    }
}

/// Transform blend with distinct vector and rotation rules (TRS split).
pub fn transform_split(
    a: &AttrValue,
    b: &AttrValue,
    vec_f: impl Fn(f64, f64) -> f64,
    quat_f: impl Fn([f64; 4], [f64; 4]) -> [f64; 4],
) -> AttrValue {
    match (a, b) {
        (
            AttrValue::Transform { pos, rot, scale },
            AttrValue::Transform {
                pos: bp,
                rot: br,
                scale: bs,
            },
        ) => AttrValue::Transform {
            pos: zip2(pos, bp, &vec_f),
            rot: quat_f(*rot, *br),
            scale: zip2(scale, bs, &vec_f),
        },
        _ => map2(a, b, vec_f),
    }
}
