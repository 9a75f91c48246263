use crate::f;

/// Extends primitives with the number formats used on input cards
pub trait ValueExt {
    /// Canonical card formatting
    ///
    /// Numbers are written in the shortest form that parses back to the same
    /// value. Plain decimal notation is used for magnitudes in `[1e-4, 1e6)`
    /// and exponent notation otherwise, so there are never trailing zeros.
    ///
    /// ```rust
    /// # use mcdeck_utils::ValueExt;
    /// assert_eq!(1.0_f64.canonical(), "1");
    /// assert_eq!((-7.85_f64).canonical(), "-7.85");
    /// assert_eq!(0.0001_f64.canonical(), "0.0001");
    /// assert_eq!(2.5e-7_f64.canonical(), "2.5e-7");
    /// assert_eq!(6.02e23_f64.canonical(), "6.02e23");
    /// assert_eq!((-0.0_f64).canonical(), "0");
    /// ```
    fn canonical(&self) -> String;
}

impl<T: Into<f64> + Copy> ValueExt for T {
    fn canonical(&self) -> String {
        let value: f64 = (*self).into();
        if value == 0.0 {
            return "0".to_string();
        }

        let magnitude = value.abs();
        if (1e-4..1e6).contains(&magnitude) {
            f!("{value}")
        } else {
            f!("{value:e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_round_trips() {
        for value in [1.0_f64, -1.0, 0.5, 1.0e-12, 123456.789, 9.999e5, 1.0e6, -2.35e-5] {
            let text = value.canonical();
            assert_eq!(text.parse::<f64>().unwrap(), value, "{text}");
        }
    }

    #[test]
    fn canonical_has_no_trailing_zeros() {
        assert_eq!(10.0_f64.canonical(), "10");
        assert_eq!(0.25_f64.canonical(), "0.25");
        assert_eq!(1.0e6_f64.canonical(), "1e6");
    }

    #[test]
    fn integers_widen() {
        assert_eq!(3_u32.canonical(), "3");
        assert_eq!((-4_i32).canonical(), "-4");
    }
}
