//! Weight remap curves. A curve is a sorted set of keyframes over [0, 1];
//! operations bake it once into a fixed-resolution lookup table and sample
//! that on the hot path.

use serde::{Deserialize, Serialize};

/// Piecewise-linear keyframed curve. Keys are (t, value) pairs; evaluation
/// clamps outside the key range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightCurve {
    pub keys: Vec<(f64, f64)>,
}

impl Default for WeightCurve {
    fn default() -> Self {
        WeightCurve {
            keys: vec![(0.0, 0.0), (1.0, 1.0)],
        }
    }
}

impl WeightCurve {
    pub fn new(mut keys: Vec<(f64, f64)>) -> Self {
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        if keys.is_empty() {
            return WeightCurve::default();
        }
        WeightCurve { keys }
    }

    pub fn eval(&self, t: f64) -> f64 {
        let first = self.keys[0];
        if t <= first.0 {
            return first.1;
        }
        let last = self.keys[self.keys.len() - 1];
        if t >= last.0 {
            return last.1;
        }
        for pair in self.keys.windows(2) {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span == 0.0 {
                    return v1;
                }
                let f = (t - t0) / span;
                return v0 + (v1 - v0) * f;
            }
        }
        last.1
    }

    /// Bake into a sampled table. Each operation owns its own table; nothing
    /// is cached process-wide.
    pub fn bake(&self, resolution: usize) -> FloatLut {
        let n = resolution.max(2);
        let mut samples = Vec::with_capacity(n);
        for i in 0..n {
            let t = i as f64 / (n - 1) as f64;
            samples.push(self.eval(t));
        }
        FloatLut { samples }
    }
}

/// Baked curve samples over [0, 1] with linear interpolation between entries.
#[derive(Clone, Debug)]
pub struct FloatLut {
    samples: Vec<f64>,
}

impl FloatLut {
    pub const DEFAULT_RESOLUTION: usize = 64;

    pub fn linear() -> FloatLut {
        WeightCurve::default().bake(Self::DEFAULT_RESOLUTION)
    }

    pub fn eval(&self, t: f64) -> f64 {
        let n = self.samples.len();
        let clamped = t.clamp(0.0, 1.0);
        let pos = clamped * (n - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(n - 1);
        let f = pos - lo as f64;
        self.samples[lo] + (self.samples[hi] - self.samples[lo]) * f
    }
}
