//! Statistics used to fill missing values.
//!
//! All functions return `None` for empty input.

/// Lower median: for an even count, the smaller of the two middle values.
///
/// The result is always one of the observed values, so an integer column
/// stays integral.
pub fn integer_median(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    Some(sorted[(sorted.len() - 1) / 2])
}

/// Median of finite reals; an even count averages the two middle values.
///
/// Each half is taken before adding, so two values near `f64::MAX` still
/// average to a finite result.
pub fn real_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(sorted[mid - 1] / 2.0 + sorted[mid] / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent boolean. Ties go to `false`.
pub fn boolean_mode(values: &[bool]) -> Option<bool> {
    if values.is_empty() {
        return None;
    }
    let trues = values.iter().filter(|v| **v).count();
    Some(trues > values.len() - trues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_median() {
        assert_eq!(integer_median(&[3, 1, 2]), Some(2));
        assert_eq!(integer_median(&[4, 1, 3, 2]), Some(2));
        assert_eq!(integer_median(&[7]), Some(7));
        assert_eq!(integer_median(&[]), None);
    }

    #[test]
    fn test_real_median() {
        assert_eq!(real_median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(real_median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(real_median(&[-0.5]), Some(-0.5));
        assert_eq!(real_median(&[]), None);
    }

    #[test]
    fn test_real_median_of_huge_values_stays_finite() {
        assert_eq!(real_median(&[f64::MAX, f64::MAX]), Some(f64::MAX));
        assert_eq!(real_median(&[-f64::MAX, f64::MAX]), Some(0.0));

        let median = real_median(&[1e308, 1.7e308, 1.5e308, 1.6e308]).unwrap();
        assert!(median.is_finite());
        assert!((1.5e308..=1.6e308).contains(&median));
    }

    #[test]
    fn test_boolean_mode_ties_to_false() {
        assert_eq!(boolean_mode(&[true, true, false]), Some(true));
        assert_eq!(boolean_mode(&[true, false]), Some(false));
        assert_eq!(boolean_mode(&[false]), Some(false));
        assert_eq!(boolean_mode(&[]), None);
    }
}
