//! Decimal rounding for calculator results.
//!
//! Rounding works on the shortest decimal representation of the value, so
//! `1.005` rounds to `1.01` even though the nearest binary double is slightly
//! below it. Ties round away from zero.

/// Round `value` to `decimals` places, half-up on its decimal representation
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // f64's Display is the shortest round-tripping form and never uses exponents
    let repr = format!("{}", value.abs());
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let decimals = decimals as usize;
    if frac_part.len() <= decimals {
        return value;
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes()[decimals] >= b'5' {
        carry_increment(&mut digits);
    }

    let split = digits.len() - decimals;
    let mut rounded = String::with_capacity(digits.len() + 1);
    rounded.extend(digits[..split].iter().map(|d| char::from(b'0' + d)));
    if decimals > 0 {
        rounded.push('.');
        rounded.extend(digits[split..].iter().map(|d| char::from(b'0' + d)));
    }

    let magnitude: f64 = rounded.parse().unwrap_or(value.abs());
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Round to the nearest whole number, for unit counts and minutes
pub fn round_to_whole(value: f64) -> u64 {
    round_half_up(value, 0).max(0.0) as u64
}

fn carry_increment(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_requested_places() {
        assert_eq!(round_half_up(22.857142857, 2), 22.86);
        assert_eq!(round_half_up(20.8333333, 1), 20.8);
        assert_eq!(round_half_up(1.8446, 2), 1.84);
    }

    #[test]
    fn test_ties_round_up_on_decimal_form() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(round_half_up(1.005, 2), 1.01);
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(0.125, 2), 0.13);
    }

    #[test]
    fn test_carry_propagates_through_nines() {
        assert_eq!(round_half_up(9.995, 2), 10.0);
        assert_eq!(round_half_up(99.96, 1), 100.0);
        assert_eq!(round_half_up(0.999, 0), 1.0);
    }

    #[test]
    fn test_short_values_unchanged() {
        assert_eq!(round_half_up(7.5, 2), 7.5);
        assert_eq!(round_half_up(5600.0, 2), 5600.0);
        assert_eq!(round_half_up(0.07, 2), 0.07);
    }

    #[test]
    fn test_negative_values_mirror_positive() {
        assert_eq!(round_half_up(-1.005, 2), -1.01);
        assert_eq!(round_half_up(-3.14159, 3), -3.142);
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert!(round_half_up(f64::NAN, 2).is_nan());
        assert_eq!(round_half_up(f64::INFINITY, 2), f64::INFINITY);
    }

    #[test]
    fn test_round_to_whole() {
        assert_eq!(round_to_whole(5599.5), 5600);
        assert_eq!(round_to_whole(1259.4), 1259);
        assert_eq!(round_to_whole(-3.0), 0);
    }
}
