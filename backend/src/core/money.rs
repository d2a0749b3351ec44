//! Money units and exact rounding
//!
//! Money of record is i64 cents. Derived tax amounts are i64 micro-dollars
//! (1e-6 USD): a cent amount multiplied by a rate in basis points is exactly
//! a micro-dollar amount, so the mocked tax formulas never lose precision.

/// Micro-dollars in one dollar
pub const MICROS_PER_DOLLAR: i64 = 1_000_000;

/// Micro-dollars in one cent
pub const MICROS_PER_CENT: i64 = 10_000;

/// Basis points in 100%
pub const BPS_DENOMINATOR: i64 = 10_000;

/// Divide and round half up (towards +∞), like `Math.round(n / d)`
///
/// # Panics
/// Panics if `d <= 0`
///
/// # Example
/// ```
/// use orcatax_core_rs::core::money::round_div;
///
/// assert_eq!(round_div(7075, 100), 71);  // 70.75 → 71
/// assert_eq!(round_div(250, 100), 3);    // 2.5 → 3
/// assert_eq!(round_div(-250, 100), -2);  // -2.5 → -2
/// ```
pub fn round_div(n: i64, d: i64) -> i64 {
    assert!(d > 0, "divisor must be positive");

    let n = i128::from(n);
    let d = i128::from(d);
    (2 * n + d).div_euclid(2 * d) as i64
}

/// Apply a basis-point rate to a cent amount, yielding micro-dollars
pub fn cents_times_bps(cents: i64, bps: i64) -> i64 {
    cents * bps
}

/// Round micro-dollars to the nearest cent
pub fn micros_to_cents(micros: i64) -> i64 {
    round_div(micros, MICROS_PER_CENT)
}

/// Round micro-dollars to the nearest whole dollar
pub fn micros_to_dollars(micros: i64) -> i64 {
    round_div(micros, MICROS_PER_DOLLAR)
}

/// Convert cents to micro-dollars
pub fn cents_to_micros(cents: i64) -> i64 {
    cents * MICROS_PER_CENT
}

/// Format cents as US dollars with thousands separators
///
/// Whole-dollar amounts drop the cents (`$1,075`); others keep two decimals
/// (`$1,086.27`).
///
/// # Example
/// ```
/// use orcatax_core_rs::core::money::format_usd;
///
/// assert_eq!(format_usd(107_500), "$1,075");
/// assert_eq!(format_usd(108_627), "$1,086.27");
/// assert_eq!(format_usd(-5_000_050), "-$50,000.50");
/// assert_eq!(format_usd(0), "$0");
/// ```
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = group_thousands(abs / 100);
    let frac = abs % 100;

    if frac == 0 {
        format!("{}${}", sign, dollars)
    } else {
        format!("{}${}.{:02}", sign, dollars, frac)
    }
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        let group = value % 1_000;
        value /= 1_000;
        if value == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{:03}", group));
    }
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_div_half_up() {
        assert_eq!(round_div(5, 10), 1);
        assert_eq!(round_div(4, 10), 0);
        assert_eq!(round_div(-5, 10), 0);
        assert_eq!(round_div(-6, 10), -1);
    }

    #[test]
    #[should_panic(expected = "divisor must be positive")]
    fn test_round_div_zero_divisor() {
        round_div(1, 0);
    }

    #[test]
    fn test_micro_conversions() {
        // $100,000 at 2.25% is $2,250
        let local = cents_times_bps(10_000_000, 225);
        assert_eq!(micros_to_dollars(local), 2_250);
        assert_eq!(micros_to_cents(local), 225_000);
        assert_eq!(cents_to_micros(1), MICROS_PER_CENT);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(207_605), "207,605");
        assert_eq!(group_thousands(1_000_001), "1,000,001");
    }
}
