//! Coercion between attribute kinds.
//! Every (value, kind) pair converts; narrowing happens here and nowhere
//! else, so arithmetic can stay at f64 until the final write.

use crate::value::{AttrKind, AttrValue};

/// Flatten a value to a single f64.
/// Rules: scalars to their value, bool to 0/1, vectors/quats/rotators to their
/// first component, transforms to pos.x, text to a parse attempt (0 on
/// failure).
pub fn to_double(v: &AttrValue) -> f64 {
    match v {
        AttrValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        AttrValue::Int(n) => *n as f64,
        AttrValue::Long(n) => *n as f64,
        AttrValue::Float(f) => *f as f64,
        AttrValue::Double(f) => *f,
        AttrValue::Vec2(a) => a[0],
        AttrValue::Vec3(a) | AttrValue::Rotator(a) => a[0],
        AttrValue::Vec4(a) | AttrValue::Quat(a) => a[0],
        AttrValue::Transform { pos, .. } => pos[0],
        AttrValue::Text(s) | AttrValue::Name(s) => s.parse().unwrap_or(0.0),
    }
}

/// Expand a value into up to four f64 components (missing ones are 0, the
/// quat default keeps w = 1 only through `AttrValue::default_of`).
pub fn to_components(v: &AttrValue) -> [f64; 4] {
    match v {
        AttrValue::Vec2(a) => [a[0], a[1], 0.0, 0.0],
        AttrValue::Vec3(a) | AttrValue::Rotator(a) => [a[0], a[1], a[2], 0.0],
        AttrValue::Vec4(a) | AttrValue::Quat(a) => *a,
        AttrValue::Transform { pos, .. } => [pos[0], pos[1], pos[2], 0.0],
        scalar => {
            let s = to_double(scalar);
            [s, s, s, s]
        }
    }
}

/// Quat (x, y, z, w) to Euler (pitch, yaw, roll) in degrees, XYZ intrinsic.
pub fn quat_to_euler(q: [f64; 4]) -> [f64; 3] {
    let [x, y, z, w] = q;
    let sinp = 2.0 * (w * x + y * z);
    let cosp = 1.0 - 2.0 * (x * x + y * y);
    let pitch = sinp.atan2(cosp);

    let siny = 2.0 * (w * y - z * x);
    let yaw = if siny.abs() >= 1.0 {
        std::f64::consts::FRAC_PI_2.copysign(siny)
    } else {
        siny.asin()
    };

    let sinr = 2.0 * (w * z + x * y);
    let cosr = 1.0 - 2.0 * (y * y + z * z);
    let roll = sinr.atan2(cosr);

    [pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees()]
}

/// Euler (pitch, yaw, roll) in degrees to quat (x, y, z, w).
pub fn euler_to_quat(e: [f64; 3]) -> [f64; 4] {
    let (p, y, r) = (
        e[0].to_radians() * 0.5,
        e[1].to_radians() * 0.5,
        e[2].to_radians() * 0.5,
    );
    let (sp, cp) = p.sin_cos();
    let (sy, cy) = y.sin_cos();
    let (sr, cr) = r.sin_cos();
    [
        sp * cy * cr - cp * sy * sr,
        cp * sy * cr + sp * cy * sr,
        cp * cy * sr - sp * sy * cr,
        cp * cy * cr + sp * sy * sr,
    ]
}

/// Convert a value to the requested kind. Total: every pair yields a value of
/// `kind`. Scalars broadcast into vectors; vectors truncate or zero-extend;
/// quat/rotator convert through Euler angles; numeric-to-text formats,
/// text-to-numeric parses (0 on failure).
pub fn cast(v: &AttrValue, kind: AttrKind) -> AttrValue {
    if v.kind() == kind {
        return v.clone();
    }
    match kind {
        AttrKind::Bool => AttrValue::Bool(to_double(v) != 0.0),
        AttrKind::Int => AttrValue::Int(to_double(v) as i32),
        AttrKind::Long => AttrValue::Long(to_double(v) as i64),
        AttrKind::Float => AttrValue::Float(to_double(v) as f32),
        AttrKind::Double => AttrValue::Double(to_double(v)),
        AttrKind::Vec2 => {
            let c = to_components(v);
            AttrValue::Vec2([c[0], c[1]])
        }
        AttrKind::Vec3 => {
            let c = to_components(v);
            AttrValue::Vec3([c[0], c[1], c[2]])
        }
        AttrKind::Vec4 => AttrValue::Vec4(to_components(v)),
        AttrKind::Rotator => match v {
            AttrValue::Quat(q) => AttrValue::Rotator(quat_to_euler(*q)),
            AttrValue::Transform { rot, .. } => AttrValue::Rotator(quat_to_euler(*rot)),
            other => {
                let c = to_components(other);
                AttrValue::Rotator([c[0], c[1], c[2]])
            }
        },
        AttrKind::Quat => match v {
            AttrValue::Rotator(e) => AttrValue::Quat(euler_to_quat(*e)),
            AttrValue::Transform { rot, .. } => AttrValue::Quat(*rot),
            AttrValue::Vec4(a) => AttrValue::Quat(*a),
            _ => AttrValue::Quat([0.0, 0.0, 0.0, 1.0]),
        },
        AttrKind::Transform => match v {
            AttrValue::Quat(q) => AttrValue::Transform {
                pos: [0.0; 3],
                rot: *q,
                scale: [1.0; 3],
            },
            AttrValue::Rotator(e) => AttrValue::Transform {
                pos: [0.0; 3],
                rot: euler_to_quat(*e),
                scale: [1.0; 3],
            },
            other => {
                let c = to_components(other);
                AttrValue::Transform {
                    pos: [c[0], c[1], c[2]],
                    rot: [0.0, 0.0, 0.0, 1.0],
                    scale: [1.0; 3],
                }
            }
        },
        AttrKind::Text => AttrValue::Text(format_value(v)),
        AttrKind::Name => AttrValue::Name(format_value(v)),
    }
}

fn format_value(v: &AttrValue) -> String {
    match v {
        AttrValue::Text(s) | AttrValue::Name(s) => s.clone(),
        AttrValue::Bool(b) => b.to_string(),
        AttrValue::Int(n) => n.to_string(),
        AttrValue::Long(n) => n.to_string(),
        AttrValue::Float(f) => f.to_string(),
        AttrValue::Double(f) => f.to_string(),
        AttrValue::Vec2(a) => format!("{},{}", a[0], a[1]),
        AttrValue::Vec3(a) | AttrValue::Rotator(a) => format!("{},{},{}", a[0], a[1], a[2]),
        AttrValue::Vec4(a) | AttrValue::Quat(a) => {
            format!("{},{},{},{}", a[0], a[1], a[2], a[3])
        }
        AttrValue::Transform { pos, rot, scale } => format!(
            "{},{},{}|{},{},{},{}|{},{},{}",
            pos[0], pos[1], pos[2], rot[0], rot[1], rot[2], rot[3], scale[0], scale[1], scale[2]
        ),
    }
}
