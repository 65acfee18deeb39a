//! Numeric helpers shared by the graph builder and the chart assembler.

/// Significant digits kept for BTC-denominated values.
pub const VALUE_PRECISION: usize = 4;

/// Satoshis per bitcoin.
pub const SATS_PER_BTC: f64 = 1e8;

/// Enough fraction digits to print any finite `f64` exactly.
const EXACT_DIGITS: usize = 767;

/// Significant digits that identify any `f64`.
const MAX_SIGNIFICANT_DIGITS: usize = 17;

/// Round `value` to `precision` significant digits, ties away from zero.
///
/// Rounding works on the exact decimal expansion of the double, so `0.015625`
/// (an exact binary tie) becomes `0.01563`. Non-finite values and zero are
/// returned untouched. A `precision` of zero is treated as one; anything above
/// 17 digits keeps the value as is.
pub fn truncate_precision(value: f64, precision: usize) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let precision = precision.clamp(1, MAX_SIGNIFICANT_DIGITS);

    let exact = format!("{:.*e}", EXACT_DIGITS, value.abs());
    let Some((mantissa, exponent)) = exact.split_once('e') else {
        return value;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value;
    };

    let digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    let Some(kept) = digits.get(..precision) else {
        return value;
    };
    let mut kept = kept.to_vec();
    if digits.get(precision).is_some_and(|&d| d >= b'5') {
        round_up(&mut kept);
    }

    // `kept` is an integer mantissa whose last digit sits at
    // 10^(exponent - precision + 1); a carry out of the top digit adds one.
    let scale = exponent - precision as i32 + 1 + (kept.len() - precision) as i32;
    let sign = if value < 0.0 { "-" } else { "" };
    let kept = String::from_utf8_lossy(&kept[..precision]);
    format!("{sign}{kept}e{scale}").parse::<f64>().unwrap_or(value)
}

/// Add one to a big-endian decimal digit string. A carry out of the top digit
/// prepends `1` (so `999` becomes `1000`).
fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Convert a satoshi amount to BTC, rounded to [`VALUE_PRECISION`] digits.
pub fn sats_to_btc(capacity: u64) -> f64 {
    truncate_precision(capacity as f64 / SATS_PER_BTC, VALUE_PRECISION)
}

/// Render a number the way a JavaScript engine prints it: shortest
/// round-trip digits, exponent notation below `1e-6` and from `1e21` up.
pub fn display_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }
    let scientific = format!("{:e}", value);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => scientific,
    }
}

/// Format an integer with a thousands separator, e.g. `1234567` -> `1,234,567`.
pub fn group_digits(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_precision_keeps_four_digits() {
        assert_eq!(truncate_precision(1.23456789, 4), 1.235);
        assert_eq!(truncate_precision(0.05, 4), 0.05);
        assert_eq!(truncate_precision(123456.0, 4), 123500.0);
        assert_eq!(truncate_precision(0.000123456, 4), 0.0001235);
    }

    #[test]
    fn test_truncate_precision_rounds_ties_up() {
        assert_eq!(truncate_precision(2.5, 1), 3.0);
        assert_eq!(truncate_precision(-2.5, 1), -3.0);
        assert_eq!(truncate_precision(0.015625, 4), 0.01563);
        assert_eq!(truncate_precision(1.0625, 4), 1.063);
        // 0.1 + 0.2 is slightly above 0.3 but far below a tie.
        assert_eq!(truncate_precision(0.1 + 0.2, 4), 0.3);
    }

    #[test]
    fn test_truncate_precision_carries_into_new_digit() {
        assert_eq!(truncate_precision(9.9996, 4), 10.0);
        assert_eq!(truncate_precision(0.099996, 4), 0.1);
        assert_eq!(truncate_precision(999.95, 4), 1000.0);
    }

    #[test]
    fn test_truncate_precision_passes_through_specials() {
        assert_eq!(truncate_precision(0.0, 4), 0.0);
        assert!(truncate_precision(f64::NAN, 4).is_nan());
        assert_eq!(truncate_precision(f64::INFINITY, 4), f64::INFINITY);
        assert_eq!(truncate_precision(0.1, 100), 0.1);
    }

    #[test]
    fn test_sats_to_btc() {
        assert_eq!(sats_to_btc(123_456_789), 1.235);
        assert_eq!(sats_to_btc(5_000_000), 0.05);
        assert_eq!(sats_to_btc(0), 0.0);
    }

    #[test]
    fn test_sats_to_btc_exact_ties() {
        assert_eq!(sats_to_btc(1_562_500), 0.01563);
        assert_eq!(sats_to_btc(106_250_000), 1.063);
        assert_eq!(sats_to_btc(1), 0.00000001);
    }

    #[test]
    fn test_display_number() {
        assert_eq!(display_number(0.05), "0.05");
        assert_eq!(display_number(1.285), "1.285");
        assert_eq!(display_number(2.0), "2");
        assert_eq!(display_number(0.000001), "0.000001");
        assert_eq!(display_number(0.00000001), "1e-8");
        assert_eq!(display_number(0.0000001234), "1.234e-7");
        assert_eq!(display_number(123_400_000_000_000_000_000.0), "1.234e+21");
        assert_eq!(display_number(-0.0), "0");
        assert_eq!(display_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0, ","), "0");
        assert_eq!(group_digits(999, ","), "999");
        assert_eq!(group_digits(1_000, ","), "1,000");
        assert_eq!(group_digits(200_000_000, ","), "200,000,000");
        assert_eq!(group_digits(1_234_567, "."), "1.234.567");
    }
}
