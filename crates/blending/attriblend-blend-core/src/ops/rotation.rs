//! Quaternion arithmetic. Quats are [x, y, z, w]; everything that has no
//! rotational meaning routes through Euler angles so the result stays a
//! sensible rotation.

use attriblend_api_core::coercion::{euler_to_quat, quat_to_euler};

use super::scalar;

pub fn normalize(q: [f64; 4]) -> [f64; 4] {
    let mag = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    if mag == 0.0 {
        [0.0, 0.0, 0.0, 1.0]
    } else {
        [q[0] / mag, q[1] / mag, q[2] / mag, q[3] / mag]
    }
}

pub fn mul(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

#[inline]
pub fn inverse(q: [f64; 4]) -> [f64; 4] {
    [-q[0], -q[1], -q[2], q[3]]
}

/// Total rotation angle in radians, used for ordering comparisons.
pub fn angle(q: [f64; 4]) -> f64 {
    let n = normalize(q);
    2.0 * n[3].clamp(-1.0, 1.0).acos()
}

/// Shortest-arc slerp with an nlerp fallback for nearly-parallel inputs.
pub fn slerp(q1: [f64; 4], q2: [f64; 4], t: f64) -> [f64; 4] {
    let qa = normalize(q1);
    let mut qb = normalize(q2);

    let mut dot = qa[0] * qb[0] + qa[1] * qb[1] + qa[2] * qb[2] + qa[3] * qb[3];
    if dot < 0.0 {
        qb = [-qb[0], -qb[1], -qb[2], -qb[3]];
        dot = -dot;
    }

    const DOT_THRESHOLD: f64 = 0.9995;
    if dot > DOT_THRESHOLD {
        let res = [
            scalar::lerp(qa[0], qb[0], t),
            scalar::lerp(qa[1], qb[1], t),
            scalar::lerp(qa[2], qb[2], t),
            scalar::lerp(qa[3], qb[3], t),
        ];
        return normalize(res);
    }

    let theta_0 = dot.clamp(-1.0, 1.0).acos();
    let theta = theta_0 * t;
    let sin_theta_0 = theta_0.sin();
    let s0 = (theta_0 - theta).sin() / sin_theta_0;
    let s1 = theta.sin() / sin_theta_0;

    [
        s0 * qa[0] + s1 * qb[0],
        s0 * qa[1] + s1 * qb[1],
        s0 * qa[2] + s1 * qb[2],
        s0 * qa[3] + s1 * qb[3],
    ]
}

/// Component-wise op applied in Euler space, converted back to a quat.
pub fn eulerwise(a: [f64; 4], b: [f64; 4], f: impl Fn(f64, f64) -> f64) -> [f64; 4] {
    let ea = quat_to_euler(a);
    let eb = quat_to_euler(b);
    euler_to_quat([f(ea[0], eb[0]), f(ea[1], eb[1]), f(ea[2], eb[2])])
}

/// Divide through Euler space, guarding a zero divisor.
pub fn div(q: [f64; 4], d: f64) -> [f64; 4] {
    if d == 0.0 {
        return q;
    }
    let e = quat_to_euler(q);
    euler_to_quat([e[0] / d, e[1] / d, e[2] / d])
}

pub fn weighted_add(a: [f64; 4], b: [f64; 4], w: f64) -> [f64; 4] {
    slerp(a, mul(a, b), w)
}

pub fn weighted_sub(a: [f64; 4], b: [f64; 4], w: f64) -> [f64; 4] {
    slerp(a, mul(a, inverse(b)), w)
}

/// Degenerate hash rotation: the combined hash broadcast and normalized.
pub fn hash(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    let ea = quat_to_euler(a);
    let eb = quat_to_euler(b);
    let mut h = 0u32;
    for i in 0..3 {
        h = scalar::hash_combine(h, scalar::hash(ea[i], eb[i]) as u32);
    }
    normalize([h as f64, h as f64, h as f64, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: [f64; 4], b: [f64; 4]) {
        let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        assert!(dot.abs() > 1.0 - 1e-9, "{a:?} vs {b:?}");
    }

    #[test]
    fn slerp_endpoints() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = normalize([0.0, 0.7, 0.0, 0.7]);
        assert_close(slerp(a, b, 0.0), a);
        assert_close(slerp(a, b, 1.0), b);
    }

    #[test]
    fn slerp_takes_shortest_arc() {
        let a = normalize([0.0, 0.0, 0.0, 1.0]);
        let b = [-0.0, -0.0, -0.0, -1.0];
        // antipodal representation of the same rotation
        assert_close(slerp(a, b, 0.5), a);
    }

    #[test]
    fn angle_orders_rotations() {
        let small = euler_to_quat([10.0, 0.0, 0.0]);
        let large = euler_to_quat([90.0, 0.0, 0.0]);
        assert!(angle(small) < angle(large));
    }

    #[test]
    fn mul_inverse_is_identity() {
        let q = normalize([0.1, 0.2, 0.3, 0.9]);
        assert_close(mul(q, inverse(q)), [0.0, 0.0, 0.0, 1.0]);
    }
}
