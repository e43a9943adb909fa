//! Type definitions of Float and Spectrum, otherwise constants and
//! functions which can be used almost everywhere else in the code.

// std
use std::f64::consts::PI;
// sqtrace
use crate::core::spectrum::RGBSpectrum;

pub type Spectrum = RGBSpectrum;

/// All geometry and shading happens in double precision. Only the
/// film narrows values down to `f32`.
pub type Float = f64;

/// Radius of the sphere bounding the unit superquadric (which itself
/// fits into the cube [-1, 1]^3).
pub const BOUNDING_RADIUS_SQUARED: Float = 3.0;

/// Clamp the given value *val* to lie between the values *low* and
/// *high*.
pub fn clamp_t<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Convert from angles expressed in degrees to radians.
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

/// Raise the magnitude of *x* to the power *p* but keep the sign of
/// *x*. Used by the parametric superquadric surface.
pub fn signed_pow(x: Float, p: Float) -> Float {
    if x == 0.0 {
        0.0
    } else {
        x.signum() * x.abs().powf(p)
    }
}

/// Find solution(s) of the quadratic equation at<sup>2</sup> + bt + c = 0.
///
/// Uses the numerically stable form which avoids subtracting two
/// nearly equal values. On success *t0* <= *t1*.
pub fn quadratic(a: Float, b: Float, c: Float, t0: &mut Float, t1: &mut Float) -> bool {
    if a == 0.0 {
        return false;
    }
    // find quadratic discriminant
    let discrim: Float = b * b - 4.0 * a * c;
    if discrim < 0.0 {
        false
    } else {
        let root_discrim: Float = discrim.sqrt();
        // compute quadratic _t_ values
        let q = if b < 0.0 {
            -0.5 * (b - root_discrim)
        } else {
            -0.5 * (b + root_discrim)
        };
        if q == 0.0 {
            // b == 0 and c == 0, double root at the origin
            *t0 = 0.0;
            *t1 = 0.0;
            return true;
        }
        *t0 = q / a;
        *t1 = c / q;
        if *t0 > *t1 {
            std::mem::swap(&mut (*t0), &mut (*t1))
        }
        true
    }
}
