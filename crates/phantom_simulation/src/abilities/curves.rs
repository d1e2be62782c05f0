//! Spin curves — easing on the unit interval for the bash animation.
//!
//! Стандартные формы — closed-form easing (in/out); `Keyframes` —
//! кусочно-линейная кривая из конфига (аналог authored animation curve).

use std::f32::consts::PI;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpinCurve {
    Linear,
    QuadraticInOut,
    CubicInOut,
    CubicOut,
    SineInOut,
    /// Piecewise-linear keys `(t, value)`, `t` ascending in `[0, 1]`
    Keyframes { points: Vec<Vec2> },
}

impl Default for SpinCurve {
    fn default() -> Self {
        // wind-up: медленный старт, разгон, мягкая остановка
        Self::QuadraticInOut
    }
}

impl SpinCurve {
    /// Samples the curve with `t` clamped to `[0, 1]`.
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            SpinCurve::Linear => t,
            SpinCurve::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(2) / 2.0
                }
            }
            SpinCurve::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(3) / 2.0
                }
            }
            SpinCurve::CubicOut => 1.0 - (1.0 - t).powi(3),
            SpinCurve::SineInOut => (1.0 - (PI * t).cos()) / 2.0,
            SpinCurve::Keyframes { points } => sample_keyframes(points, t),
        }
    }

    /// Checks keyframe ordering; named curves are always valid.
    pub fn validate(&self) -> Result<(), String> {
        let SpinCurve::Keyframes { points } = self else {
            return Ok(());
        };

        if points.is_empty() {
            return Err("spin curve needs at least one keyframe".to_string());
        }
        if points.iter().any(|p| !(0.0..=1.0).contains(&p.x)) {
            return Err("spin curve keyframe times must lie in [0, 1]".to_string());
        }
        if points.iter().any(|p| !p.y.is_finite()) {
            return Err("spin curve keyframe values must be finite".to_string());
        }
        if points.windows(2).any(|pair| pair[1].x < pair[0].x) {
            return Err("spin curve keyframes must be sorted by time".to_string());
        }
        Ok(())
    }
}

fn sample_keyframes(points: &[Vec2], t: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return t;
    };
    if t <= first.x {
        return first.y;
    }
    if t >= last.x {
        return last.y;
    }

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.x {
            let span = b.x - a.x;
            if span <= f32::EPSILON {
                return b.y;
            }
            return a.y + (b.y - a.y) * ((t - a.x) / span);
        }
    }
    last.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_curves_hit_endpoints() {
        let curves = [
            SpinCurve::Linear,
            SpinCurve::QuadraticInOut,
            SpinCurve::CubicInOut,
            SpinCurve::CubicOut,
            SpinCurve::SineInOut,
        ];
        for curve in curves {
            assert!(curve.sample(0.0).abs() < 1e-5, "{:?} at 0", curve);
            assert!((curve.sample(1.0) - 1.0).abs() < 1e-5, "{:?} at 1", curve);
        }
    }

    #[test]
    fn test_sample_clamps_input() {
        assert_eq!(SpinCurve::Linear.sample(-3.0), 0.0);
        assert_eq!(SpinCurve::Linear.sample(7.0), 1.0);
    }

    #[test]
    fn test_quadratic_in_out_is_slow_at_start() {
        assert!(SpinCurve::QuadraticInOut.sample(0.25) < 0.25);
        assert!((SpinCurve::QuadraticInOut.sample(0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_keyframes_interpolate_linearly() {
        let curve = SpinCurve::Keyframes {
            points: vec![Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.8), Vec2::new(1.0, 1.0)],
        };
        assert!((curve.sample(0.25) - 0.4).abs() < 1e-6);
        assert!((curve.sample(0.75) - 0.9).abs() < 1e-6);
        assert_eq!(curve.sample(1.0), 1.0);
    }

    #[test]
    fn test_keyframes_hold_outside_range() {
        let curve = SpinCurve::Keyframes {
            points: vec![Vec2::new(0.2, 0.1), Vec2::new(0.6, 0.9)],
        };
        assert_eq!(curve.sample(0.0), 0.1);
        assert_eq!(curve.sample(1.0), 0.9);
    }

    #[test]
    fn test_keyframe_validation() {
        assert!(SpinCurve::Linear.validate().is_ok());
        assert!(SpinCurve::Keyframes { points: vec![] }.validate().is_err());
        assert!(SpinCurve::Keyframes {
            points: vec![Vec2::new(0.6, 0.0), Vec2::new(0.2, 1.0)]
        }
        .validate()
        .is_err());
        assert!(SpinCurve::Keyframes {
            points: vec![Vec2::new(0.0, 0.0), Vec2::new(1.5, 1.0)]
        }
        .validate()
        .is_err());

        let err = SpinCurve::Keyframes {
            points: vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, f32::NAN)],
        }
        .validate()
        .unwrap_err();
        assert!(err.contains("finite"), "{}", err);
    }
}
