use crate::DzError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, DzError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DzError::NonFinite { what, value: v })
    }
}

/// Reject values outside `[min, max]` (inclusive).
pub fn ensure_within(v: Real, min: Real, max: Real, what: &'static str) -> Result<Real, DzError> {
    let v = ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(DzError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

/// Snap `v` to the nearest point of the grid `origin + k * step`.
///
/// The result is rounded to 6 decimals so that steps like `0.1` do not leak
/// representation noise into comparisons and persisted values.
pub fn quantize_to_step(v: Real, origin: Real, step: Real) -> Real {
    if step <= 0.0 || !step.is_finite() {
        return v;
    }
    let k = ((v - origin) / step).round();
    let snapped = origin + k * step;
    (snapped * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_within_bounds() {
        assert_eq!(ensure_within(20.0, 16.0, 30.0, "target").unwrap(), 20.0);
        assert_eq!(ensure_within(16.0, 16.0, 30.0, "target").unwrap(), 16.0);
        assert!(matches!(
            ensure_within(31.0, 16.0, 30.0, "target"),
            Err(DzError::OutOfRange { .. })
        ));
        assert!(ensure_within(Real::INFINITY, 16.0, 30.0, "target").is_err());
    }

    #[test]
    fn quantize_snaps_to_grid() {
        assert_eq!(quantize_to_step(22.3, 16.0, 0.5), 22.5);
        assert_eq!(quantize_to_step(22.2, 16.0, 0.5), 22.0);
        assert_eq!(quantize_to_step(21.0, 16.0, 0.5), 21.0);
        assert_eq!(quantize_to_step(20.14, 16.0, 0.1), 20.1);
        // Degenerate step leaves the value alone
        assert_eq!(quantize_to_step(20.14, 16.0, 0.0), 20.14);
    }
}
