//! Colors are stored as linear RGB triples. The lighting model works
//! on them channel by channel.

// std
use std::ops::{Add, AddAssign, Div, Index, Mul};
// others
use num::Zero;
// sqtrace
use crate::core::sqtrace::Float;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RGBSpectrum {
    pub c: [Float; 3],
}

impl RGBSpectrum {
    pub fn new(v: Float) -> Self {
        RGBSpectrum { c: [v, v, v] }
    }
    pub fn rgb(r: Float, g: Float, b: Float) -> RGBSpectrum {
        RGBSpectrum { c: [r, g, b] }
    }
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0 as Float)
    }
    /// Component-wise minimum with a scalar, the lighting model caps
    /// every channel at one this way.
    pub fn min(&self, high: Float) -> RGBSpectrum {
        RGBSpectrum::rgb(
            self.c[0].min(high),
            self.c[1].min(high),
            self.c[2].min(high),
        )
    }
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }
    pub fn is_finite(&self) -> bool {
        self.c.iter().all(|v| v.is_finite())
    }
}

impl Add for RGBSpectrum {
    type Output = RGBSpectrum;
    fn add(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::rgb(
            self.c[0] + rhs.c[0],
            self.c[1] + rhs.c[1],
            self.c[2] + rhs.c[2],
        )
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, rhs: RGBSpectrum) {
        for i in 0..3 {
            self.c[i] += rhs.c[i];
        }
    }
}

impl Mul for RGBSpectrum {
    type Output = RGBSpectrum;
    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::rgb(
            self.c[0] * rhs.c[0],
            self.c[1] * rhs.c[1],
            self.c[2] * rhs.c[2],
        )
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;
    fn mul(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum::rgb(self.c[0] * rhs, self.c[1] * rhs, self.c[2] * rhs)
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = RGBSpectrum;
    fn div(self, rhs: Float) -> RGBSpectrum {
        let inv: Float = 1.0 as Float / rhs;
        self * inv
    }
}

impl Zero for RGBSpectrum {
    fn zero() -> RGBSpectrum {
        RGBSpectrum::new(0.0 as Float)
    }
    fn is_zero(&self) -> bool {
        self.is_black()
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;
    fn index(&self, index: usize) -> &Float {
        &self.c[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_is_black() {
        let black = RGBSpectrum::zero();
        assert!(black.is_zero());
        assert!(!(black + RGBSpectrum::rgb(0.0, 0.1, 0.0)).is_zero());
        assert_eq!(RGBSpectrum::rgb(2.0, 0.5, 1.0).min(1.0), RGBSpectrum::rgb(1.0, 0.5, 1.0));
    }
}
