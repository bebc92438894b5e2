use crate::RkError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, RkError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RkError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, RkError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(RkError::InvalidArg { what })
    }
}

/// Scaled RMS norm of a local error estimate.
///
/// Component i is weighted by `atol + rtol·max(|x0[i]|, |x1[i]|)`; an empty
/// state has norm zero.
pub fn error_norm(err: &[f64], x0: &[f64], x1: &[f64], rtol: f64, atol: f64) -> f64 {
    if err.is_empty() {
        return 0.0;
    }
    let sum: f64 = err
        .iter()
        .zip(x0.iter().zip(x1))
        .map(|(e, (a, b))| {
            let r = e / (atol + rtol * a.abs().max(b.abs()));
            r * r
        })
        .sum();
    (sum / err.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(1e-9, "x").is_ok());
        assert!(matches!(
            ensure_positive(0.0, "x"),
            Err(RkError::InvalidArg { what: "x" })
        ));
        assert!(ensure_positive(-2.0, "x").is_err());
    }

    #[test]
    fn error_norm_weights_by_magnitude() {
        assert_eq!(error_norm(&[], &[], &[], 1e-6, 1e-9), 0.0);
        // |e| equal to the tolerance in every component gives 1
        let n = error_norm(&[1.5, 0.5], &[10.0, 0.0], &[-10.0, 0.0], 0.1, 0.5);
        assert!((n - 1.0).abs() < 1e-12);
        let n = error_norm(&[1.0, 0.5], &[10.0, 0.0], &[-10.0, 0.0], 0.1, 0.5);
        assert!((n - (0.5 * (1.0 / 2.25 + 1.0_f64)).sqrt()).abs() < 1e-12);
        assert!(error_norm(&[2.0], &[0.0], &[0.0], 0.0, 1.0) > 1.0);
    }
}
