//! Easing curves
//!
//! The named curves are the CSS timing functions, so configuration can be
//! written the way a stylesheet would write it (`"ease-out"`,
//! `"cubic-bezier(0.4, 0, 0.2, 1)"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A timing function mapping linear progress `t ∈ [0, 1]` to eased progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Control points `(x1, y1, x2, y2)`, with `x1` and `x2` in `[0, 1]`
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the curve to linear progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

/// Error returned when a timing function string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EasingParseError {
    #[error("unknown timing function: {0}")]
    Unknown(String),

    #[error("cubic-bezier expects 4 numbers, got {0}")]
    Arity(usize),

    #[error("invalid number in cubic-bezier: {0}")]
    Number(String),

    #[error("cubic-bezier x coordinates must be within [0, 1]")]
    OutOfRange,
}

impl FromStr for Easing {
    type Err = EasingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "linear" => return Ok(Easing::Linear),
            "ease" => return Ok(Easing::Ease),
            "ease-in" => return Ok(Easing::EaseIn),
            "ease-out" => return Ok(Easing::EaseOut),
            "ease-in-out" => return Ok(Easing::EaseInOut),
            _ => {}
        }

        let args = name
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| EasingParseError::Unknown(s.trim().to_string()))?;

        let numbers = args
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f32>()
                    .map_err(|_| EasingParseError::Number(part.to_string()))
            })
            .collect::<Result<Vec<f32>, _>>()?;

        let [x1, y1, x2, y2] = numbers[..] else {
            return Err(EasingParseError::Arity(numbers.len()));
        };
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(EasingParseError::OutOfRange);
        }
        Ok(Easing::CubicBezier(x1, y1, x2, y2))
    }
}

impl TryFrom<String> for Easing {
    type Error = EasingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::Ease => f.write_str("ease"),
            Easing::EaseIn => f.write_str("ease-in"),
            Easing::EaseOut => f.write_str("ease-out"),
            Easing::EaseInOut => f.write_str("ease-in-out"),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

/// Evaluate a CSS cubic bezier at linear progress `x`
///
/// Solves `bx(t) = x` for the curve parameter (Newton, falling back to
/// bisection) and returns `by(t)`.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |t: f32| ((ax * t + bx) * t + cx) * t;
    let sample_y = |t: f32| ((ay * t + by) * t + cy) * t;
    let slope_x = |t: f32| (3.0 * ax * t + 2.0 * bx) * t + cx;

    const EPSILON: f32 = 1e-6;

    let mut t = x;
    for _ in 0..8 {
        let err = sample_x(t) - x;
        if err.abs() < EPSILON {
            return sample_y(t);
        }
        let d = slope_x(t);
        if d.abs() < EPSILON {
            break;
        }
        t -= err / d;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    t = x;
    for _ in 0..32 {
        let value = sample_x(t);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    sample_y(t)
}
