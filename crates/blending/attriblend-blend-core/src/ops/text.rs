//! String blending rules. Text and Name share them except for the join
//! separator used by Average.

use super::scalar;

pub fn add(a: &str, b: &str) -> String {
    let mut out = String::with_capacity(a.len() + b.len());
    out.push_str(a);
    out.push_str(b);
    out
}

/// Subtraction removes every occurrence of B from A.
pub fn sub(a: &str, b: &str) -> String {
    if b.is_empty() {
        a.to_string()
    } else {
        a.replace(b, "")
    }
}

pub fn min<'a>(a: &'a str, b: &'a str) -> &'a str {
    if a.len() <= b.len() {
        a
    } else {
        b
    }
}

pub fn max<'a>(a: &'a str, b: &'a str) -> &'a str {
    if a.len() >= b.len() {
        a
    } else {
        b
    }
}

pub fn average(a: &str, b: &str, separator: char) -> String {
    let mut out = String::with_capacity(a.len() + b.len() + 1);
    out.push_str(a);
    out.push(separator);
    out.push_str(b);
    out
}

fn hash_str(s: &str) -> u32 {
    let mut h = 0u32;
    for byte in s.bytes() {
        h = scalar::hash_combine(h, byte as u32);
    }
    h
}

pub fn hash(a: &str, b: &str) -> String {
    scalar::hash_combine(hash_str(a), hash_str(b)).to_string()
}

pub fn unsigned_hash(a: &str, b: &str) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    hash(lo, hi)
}
