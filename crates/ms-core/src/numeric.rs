use crate::MsError;

/// Floating point type used throughout the tooling.
pub type Real = f64;

#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, MsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(MsError::NonFinite { what, value: v })
    }
}

/// Hagen-Poiseuille conductance weight of a circular pipe: `r^4`.
///
/// Lengths and viscosity cancel when splitting one junction's flow, so only
/// the radius term is kept. Any common scale of the radii cancels as well, so
/// callers pass radii relative to the widest branch to keep `r^4` in range.
#[inline]
pub fn poiseuille_weight(radius: Real) -> Real {
    radius.powi(4)
}
