use crate::CoreError;

/// Scalar literal type of expression trees.
pub type Real = f64;

/// Reject NaN and infinite literals before they reach a solver.
pub fn ensure_finite(value: Real, what: &'static str) -> Result<Real, CoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::NonFinite { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_literal_is_rejected() {
        let err = ensure_finite(1.0 / 0.0, "scalar").unwrap_err();
        assert!(err.to_string().contains("Non-finite numeric value for scalar"));
    }

    #[test]
    fn finite_literal_passes_through() {
        assert_eq!(ensure_finite(-0.5, "scalar").unwrap(), -0.5);
    }
}
