//! Unit constants and output rounding.

pub const MM_PER_INCH: f64 = 25.4;
pub const MM_TO_INCH: f64 = 1.0 / MM_PER_INCH;

#[inline]
pub fn mm_to_inch(mm: f64) -> f64 {
    mm * MM_TO_INCH
}

/// Output series are persisted at four decimal places.
#[inline]
pub fn round4(v: f64) -> f64 {
    (v * 1.0e4).round() / 1.0e4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_inch_of_rain() {
        assert!((mm_to_inch(25.4) - 1.0).abs() < 1e-12);
        assert!((mm_to_inch(12.7) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn round4_storage_precision() {
        assert_eq!(round4(0.123_449), 0.1234);
        assert_eq!(round4(0.123_45), 0.1235);
        assert_eq!(round4(-0.000_04), -0.0);
        assert_eq!(round4(3.0), 3.0);
    }
}
