// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Drop chance math.
//!
//! P(at least one drop in n attempts) = 1 - (1 - rate)^n

/// Probability of at least one success in `attempts` tries at `drop_rate`.
pub fn chance(drop_rate: f64, attempts: u32) -> f64 {
    if attempts == 0 || drop_rate <= 0.0 {
        return 0.0;
    }
    if drop_rate >= 1.0 {
        return 1.0;
    }
    // 1 - rate rounds to 1.0 for rates below ~1e-16; stay in log space.
    -(f64::from(attempts) * (-drop_rate).ln_1p()).exp_m1()
}

/// Fewest attempts for which the cumulative chance reaches `target`.
///
/// The result always satisfies `chance(rate, result) >= target`. `None`
/// unless both arguments lie strictly between 0 and 1, or if the answer
/// does not fit in a `u32`.
pub fn attempts_for_chance(drop_rate: f64, target: f64) -> Option<u32> {
    let in_range = |x: f64| x > 0.0 && x < 1.0;
    if !in_range(drop_rate) || !in_range(target) {
        return None;
    }

    let estimate = ((-target).ln_1p() / (-drop_rate).ln_1p()).ceil();
    if !estimate.is_finite() || estimate > f64::from(u32::MAX) {
        return None;
    }

    // The closed form can land one step off either way after rounding;
    // settle on the value `chance` itself agrees with.
    let mut attempts = (estimate as u32).max(1);
    while attempts > 1 && chance(drop_rate, attempts - 1) >= target {
        attempts -= 1;
    }
    while chance(drop_rate, attempts) < target {
        attempts = attempts.checked_add(1)?;
    }
    Some(attempts)
}

/// Expected attempts per drop (1 / rate, rounded).
pub fn expected_attempts(drop_rate: f64) -> Option<u32> {
    if drop_rate <= 0.0 || drop_rate.is_nan() {
        return None;
    }
    let expected = (1.0 / drop_rate).round();
    (expected <= f64::from(u32::MAX)).then_some(expected as u32)
}

/// How probabilities are clamped and rounded when shown as percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentPolicy {
    /// Non-zero chances below this render as "<floor%"
    pub floor: f64,
    /// Chances at or above this render as the ceiling label
    pub ceiling: f64,
    /// Label shown at or above `ceiling` (e.g., "100%")
    pub ceiling_label: &'static str,
    /// Decimal places for everything in between
    pub decimals: usize,
}

impl Default for PercentPolicy {
    /// "<1%" below one percent, "100%" from 99.5% up, one decimal.
    fn default() -> Self {
        Self {
            floor: 0.01,
            ceiling: 0.995,
            ceiling_label: "100%",
            decimals: 1,
        }
    }
}

impl PercentPolicy {
    /// "<0.01%" floor, "99.99%" cap, two decimals.
    pub fn precise() -> Self {
        Self {
            floor: 0.0001,
            ceiling: 1.0,
            ceiling_label: "99.99%",
            decimals: 2,
        }
    }
}

impl std::str::FromStr for PercentPolicy {
    type Err = String;

    /// "default" or "precise", case-insensitive.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "precise" => Ok(Self::precise()),
            other => Err(format!("unknown percent policy {:?}", other)),
        }
    }
}

/// Format a probability (0.0 to 1.0) as a percentage string.
pub fn format_percent(probability: f64, policy: &PercentPolicy) -> String {
    if probability <= 0.0 || probability.is_nan() {
        return format!("{:.*}%", policy.decimals, 0.0);
    }
    if probability >= policy.ceiling {
        return policy.ceiling_label.to_string();
    }
    if probability < policy.floor {
        return format!("<{}%", trim_float(policy.floor * 100.0));
    }
    format!("{:.*}%", policy.decimals, probability * 100.0)
}

/// Format a drop rate as a fraction ("1/512", "1/1,024").
pub fn format_drop_rate(drop_rate: f64) -> String {
    if drop_rate >= 1.0 {
        return "Always".to_string();
    }
    match expected_attempts(drop_rate) {
        Some(denominator) => format!("1/{}", format_count(denominator)),
        None => "N/A".to_string(),
    }
}

/// Format the expected attempts for a drop ("512 kc").
pub fn format_expected(drop_rate: f64) -> String {
    match expected_attempts(drop_rate) {
        Some(expected) => format!("{} kc", format_count(expected)),
        None => "N/A".to_string(),
    }
}

/// Format a count with thousands separators ("1,234").
pub fn format_count(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a percentage bound without trailing zeros ("1", "0.01").
fn trim_float(value: f64) -> String {
    let text = format!("{:.4}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chance_one_in_512_at_512() {
        let p = chance(1.0 / 512.0, 512);
        assert!((p - 0.6253).abs() < 1e-4, "got {}", p);
    }

    #[test]
    fn test_chance_guards() {
        assert_eq!(chance(0.5, 0), 0.0);
        assert_eq!(chance(0.0, 100), 0.0);
        assert_eq!(chance(-0.1, 100), 0.0);
        assert_eq!(chance(1.0, 1), 1.0);
        assert_eq!(chance(2.0, 1), 1.0);
    }

    #[test]
    fn test_attempts_for_chance_exact_log_ratio() {
        // ln(0.8) / ln(0.8) is exactly 1, but 1 - 0.8 falls just short of 0.2
        let n = attempts_for_chance(0.2, 0.2).unwrap();
        assert!(chance(0.2, n) >= 0.2, "n = {}", n);
        assert!(n == 1 || chance(0.2, n - 1) < 0.2);
    }

    #[test]
    fn test_tiny_drop_rates() {
        assert!(chance(1e-17, 1_000_000) > 0.0);
        assert!((chance(1e-17, 1_000_000) - 1e-11).abs() < 1e-15);

        let n = attempts_for_chance(1e-17, 1e-9).expect("fits in u32");
        assert!(chance(1e-17, n) >= 1e-9);
        assert!((99_000_000..=101_000_000).contains(&n), "n = {}", n);

        // Needs ~6.9e16 attempts
        assert_eq!(attempts_for_chance(1e-17, 0.5), None);
    }

    proptest! {
        #[test]
        fn prop_attempts_for_chance_is_smallest_sufficient(
            rate in 1e-6f64..0.999,
            target in 1e-6f64..0.999,
        ) {
            let n = attempts_for_chance(rate, target).unwrap();
            prop_assert!(chance(rate, n) >= target, "rate {} target {} n {}", rate, target, n);
            prop_assert!(n == 1 || chance(rate, n - 1) < target);
        }

        #[test]
        fn prop_attempts_for_chance_unit_fractions(
            denominator in 2u32..5000,
            percent in 1u32..100,
        ) {
            let rate = 1.0 / f64::from(denominator);
            let target = f64::from(percent) / 100.0;
            let n = attempts_for_chance(rate, target).unwrap();
            prop_assert!(chance(rate, n) >= target);
        }
    }

    #[test]
    fn test_attempts_for_chance_rejects_out_of_range() {
        assert_eq!(attempts_for_chance(0.0, 0.5), None);
        assert_eq!(attempts_for_chance(1.0, 0.5), None);
        assert_eq!(attempts_for_chance(0.1, 0.0), None);
        assert_eq!(attempts_for_chance(0.1, 1.0), None);
    }

    #[test]
    fn test_expected_attempts() {
        assert_eq!(expected_attempts(1.0 / 512.0), Some(512));
        assert_eq!(expected_attempts(2.0 / 1024.0), Some(512));
        assert_eq!(expected_attempts(0.0), None);
    }

    #[test]
    fn test_format_percent_default_policy() {
        let policy = PercentPolicy::default();
        assert_eq!(format_percent(0.0, &policy), "0.0%");
        assert_eq!(format_percent(0.004, &policy), "<1%");
        assert_eq!(format_percent(0.6253, &policy), "62.5%");
        assert_eq!(format_percent(0.995, &policy), "100%");
        assert_eq!(format_percent(1.0, &policy), "100%");
    }

    #[test]
    fn test_format_percent_precise_policy() {
        let policy = PercentPolicy::precise();
        assert_eq!(format_percent(0.0, &policy), "0.00%");
        assert_eq!(format_percent(0.00005, &policy), "<0.01%");
        assert_eq!(format_percent(0.8523, &policy), "85.23%");
        assert_eq!(format_percent(1.0, &policy), "99.99%");
    }

    #[test]
    fn test_percent_policy_from_name() {
        assert_eq!("default".parse::<PercentPolicy>(), Ok(PercentPolicy::default()));
        assert_eq!("Precise".parse::<PercentPolicy>(), Ok(PercentPolicy::precise()));
        assert!("exact".parse::<PercentPolicy>().is_err());
    }

    #[test]
    fn test_format_drop_rate() {
        assert_eq!(format_drop_rate(1.0 / 512.0), "1/512");
        assert_eq!(format_drop_rate(1.0 / 5000.0), "1/5,000");
        assert_eq!(format_drop_rate(1.0), "Always");
        assert_eq!(format_drop_rate(0.0), "N/A");
    }

    #[test]
    fn test_format_expected_and_count() {
        assert_eq!(format_expected(1.0 / 1024.0), "1,024 kc");
        assert_eq!(format_expected(0.0), "N/A");
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
