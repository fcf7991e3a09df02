//! Scalar (f64) building blocks shared by every numeric kind.

#[inline]
pub fn lerp(a: f64, b: f64, w: f64) -> f64 {
    a + (b - a) * w
}

#[inline]
pub fn unsigned_min(a: f64, b: f64) -> f64 {
    if a.abs() <= b.abs() {
        a
    } else {
        b
    }
}

#[inline]
pub fn unsigned_max(a: f64, b: f64) -> f64 {
    if a.abs() >= b.abs() {
        a
    } else {
        b
    }
}

#[inline]
pub fn abs_min(a: f64, b: f64) -> f64 {
    a.abs().min(b.abs())
}

#[inline]
pub fn abs_max(a: f64, b: f64) -> f64 {
    a.abs().max(b.abs())
}

/// fmod with the zero-divisor guard: a modulo of 0 leaves the value alone.
#[inline]
pub fn fmod_guarded(a: f64, m: f64) -> f64 {
    if m != 0.0 {
        a % m
    } else {
        a
    }
}

#[inline]
pub fn div_guarded(a: f64, d: f64) -> f64 {
    if d != 0.0 {
        a / d
    } else {
        a
    }
}

#[inline]
fn hash_f64(x: f64) -> u32 {
    // +0.0 and -0.0 must hash alike
    let b = if x == 0.0 { 0 } else { x.to_bits() };
    ((b >> 32) as u32) ^ (b as u32)
}

#[inline]
pub fn hash_combine(a: u32, b: u32) -> u32 {
    a ^ b
        .wrapping_add(0x9e37_79b9)
        .wrapping_add(a << 6)
        .wrapping_add(a >> 2)
}

#[inline]
pub fn hash(a: f64, b: f64) -> f64 {
    hash_combine(hash_f64(a), hash_f64(b)) as f64
}

/// Order-independent hash: operands are sorted before combining.
#[inline]
pub fn unsigned_hash(a: f64, b: f64) -> f64 {
    hash_combine(hash_f64(a.min(b)), hash_f64(a.max(b))) as f64
}

// Statistical pairs (the two-element mean of each family)

#[inline]
pub fn geometric_pair(a: f64, b: f64) -> f64 {
    (a * b).abs().sqrt()
}

#[inline]
pub fn harmonic_pair(a: f64, b: f64) -> f64 {
    let s = a + b;
    if s != 0.0 {
        2.0 * a * b / s
    } else {
        0.0
    }
}

#[inline]
pub fn rms_pair(a: f64, b: f64) -> f64 {
    ((a * a + b * b) * 0.5).sqrt()
}

// Statistical accumulator terms

#[inline]
pub fn ln_term(x: f64) -> f64 {
    let m = x.abs();
    if m > 0.0 {
        m.ln()
    } else {
        f64::MIN_POSITIVE.ln()
    }
}

#[inline]
pub fn reciprocal_term(x: f64) -> f64 {
    if x != 0.0 {
        1.0 / x
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_min_keeps_sign_of_winner() {
        assert_eq!(unsigned_min(-5.0, 3.0), 3.0);
        assert_eq!(unsigned_min(-2.0, 3.0), -2.0);
        assert_eq!(unsigned_max(-5.0, 3.0), -5.0);
        assert_eq!(abs_min(-5.0, 3.0), 3.0);
        assert_eq!(abs_max(-5.0, 3.0), 5.0);
    }

    #[test]
    fn unsigned_hash_is_commutative() {
        for (a, b) in [(1.0, 2.0), (-3.5, 7.25), (0.0, -0.0), (100.0, 1e-9)] {
            assert_eq!(unsigned_hash(a, b), unsigned_hash(b, a));
        }
    }

    #[test]
    fn guards_return_lhs() {
        assert_eq!(fmod_guarded(7.0, 0.0), 7.0);
        assert_eq!(div_guarded(7.0, 0.0), 7.0);
        assert_eq!(fmod_guarded(7.0, 4.0), 3.0);
    }

    #[test]
    fn statistical_pairs() {
        assert!((geometric_pair(4.0, 9.0) - 6.0).abs() < 1e-12);
        assert!((harmonic_pair(2.0, 6.0) - 3.0).abs() < 1e-12);
        assert!((rms_pair(3.0, 4.0) - (12.5f64).sqrt()).abs() < 1e-12);
    }
}
