//! Easing curves and keyframe interpolation.

/// Solve a CSS-style cubic Bezier timing curve at `t`.
///
/// The curve runs from `(0, 0)` to `(1, 1)` with control points
/// `(x1, y1)` and `(x2, y2)`. The parametric `s` with `bezier_x(s) == t` is
/// found by Newton-Raphson, falling back to bisection when Newton stalls.
/// Input and output are both clamped to `[0, 1]`.
pub fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t == 0.0 || t == 1.0 {
        return t;
    }

    let sample = |s: f32, p1: f32, p2: f32| -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    };
    let sample_dx = |s: f32| -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * x1 + 6.0 * inv * s * (x2 - x1) + 3.0 * s * s * (1.0 - x2)
    };

    let mut s = t;
    let mut solved = false;
    for _ in 0..8 {
        let x = sample(s, x1, x2) - t;
        if x.abs() < 1e-6 {
            solved = true;
            break;
        }
        let dx = sample_dx(s);
        if dx.abs() < 1e-7 {
            break;
        }
        s = (s - x / dx).clamp(0.0, 1.0);
    }

    if !solved && (sample(s, x1, x2) - t).abs() >= 1e-5 {
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        s = t;
        for _ in 0..32 {
            let x = sample(s, x1, x2);
            if (x - t).abs() < 1e-6 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
    }

    sample(s, y1, y2).clamp(0.0, 1.0)
}

/// `steps(n, end)`: a staircase with `n` equal jumps.
pub fn steps(t: f32, n: u32) -> f32 {
    if n == 0 || t >= 1.0 {
        return t.clamp(0.0, 1.0);
    }
    let n = n as f32;
    (t.max(0.0) * n).floor() / n
}

/// Cubic Bezier control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    /// Slow start, fast front-loaded finish. Used for per-row reveal progress.
    pub const REVEAL: CubicBezier = CubicBezier::new(0.32, 0.12, 0.68, 0.93);
    /// Ease-in curve used by the jitter flicker.
    pub const FLICKER: CubicBezier = CubicBezier::new(0.5, 0.0, 0.75, 0.0);
    pub const LINEAR: CubicBezier = CubicBezier::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Evaluate the curve at `t`.
    pub fn ease(&self, t: f32) -> f32 {
        cubic_bezier(t, self.x1, self.y1, self.x2, self.y2)
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::REVEAL
    }
}

/// Timing function applied to each keyframe segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    Bezier(CubicBezier),
    /// `steps(n, end)`
    Steps(u32),
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::Bezier(curve) => curve.ease(t),
            Easing::Steps(n) => steps(t, *n),
        }
    }
}

/// Value of evenly spaced keyframes at position `t` in `[0, 1]`.
///
/// The easing is applied within each segment, not across the whole track.
pub fn interpolate_keyframes(keyframes: &[f32], t: f32, easing: Easing) -> f32 {
    match keyframes {
        [] => 0.0,
        [only] => *only,
        _ => {
            let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
            let segments = keyframes.len() - 1;
            let scaled = t * segments as f32;
            let index = (scaled.floor() as usize).min(segments - 1);
            let local = easing.apply(scaled - index as f32);
            let (from, to) = (keyframes[index], keyframes[index + 1]);
            from + (to - from) * local
        }
    }
}
