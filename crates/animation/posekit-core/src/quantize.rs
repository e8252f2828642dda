//! Angle quantizer: snap radians to a symbolic fraction of pi, else keep a fixed-point decimal.

use std::f64::consts::PI;
use std::fmt;

use crate::config::Config;

/// Reference magnitudes, tested in this order. The first match wins.
pub const FRACTIONS: [(&str, f64); 12] = [
    ("Math.PI", PI),
    ("Math.PI/2", PI / 2.0),
    ("Math.PI/3", PI / 3.0),
    ("Math.PI/4", PI / 4.0),
    ("Math.PI/6", PI / 6.0),
    ("Math.PI/8", PI / 8.0),
    ("Math.PI/9", PI / 9.0),
    ("Math.PI/10", PI / 10.0),
    ("Math.PI/12", PI / 12.0),
    ("Math.PI/18", PI / 18.0),
    ("Math.PI/36", PI / 36.0),
    ("Math.PI/72", PI / 72.0),
];

/// Token emitted for angles inside the zero band.
pub const ZERO_TOKEN: &str = "0";

/// Result of quantizing one angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum QuantizedAngle {
    /// Inside the zero band (or not finite); carries no rotation.
    Zero,
    /// Matched a table entry.
    Fraction { label: &'static str, negative: bool },
    /// No table match; rendered with `places` fractional digits.
    Decimal { value: f64, places: usize },
}

impl QuantizedAngle {
    pub fn is_zero(&self) -> bool {
        matches!(self, QuantizedAngle::Zero)
    }
}

impl fmt::Display for QuantizedAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            QuantizedAngle::Zero => f.write_str(ZERO_TOKEN),
            QuantizedAngle::Fraction { label, negative } => {
                if negative {
                    f.write_str("-")?;
                }
                f.write_str(label)
            }
            QuantizedAngle::Decimal { value, places } => f.write_str(&to_fixed(value, places)),
        }
    }
}

/// Extra digits rendered past `places` before rounding. A finite double can
/// never sit this close to a rounding tie without being exactly on it.
const GUARD_DIGITS: usize = 25;

/// Fixed-point text with exact ties rounded away from zero, the way the
/// playback runtime's `toFixed` does (`1.03125` -> `1.0313`). Rust's own
/// formatting rounds ties to even.
fn to_fixed(value: f64, places: usize) -> String {
    let text = format!("{:.*}", places + GUARD_DIGITS, value.abs());
    let cut = text.len() - GUARD_DIGITS;
    let round_up = text.as_bytes()[cut] >= b'5';

    let mut digits: Vec<u8> = text[..cut].bytes().filter(|b| *b != b'.').collect();
    if round_up {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let int_len = digits.len() - places;
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(digits[..int_len].iter().map(|&d| char::from(d)));
    if places > 0 {
        out.push('.');
        out.extend(digits[int_len..].iter().map(|&d| char::from(d)));
    }
    out
}

/// Quantizer bound to a set of tolerances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantizer {
    pub zero_epsilon: f64,
    pub tolerance: f64,
    pub places: usize,
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Quantizer {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            zero_epsilon: cfg.zero_epsilon,
            tolerance: cfg.fraction_tolerance,
            places: cfg.decimal_places,
        }
    }

    #[inline]
    pub fn is_zero(&self, radian: f64) -> bool {
        !radian.is_finite() || radian.abs() < self.zero_epsilon
    }

    pub fn quantize_angle(&self, radian: f64) -> QuantizedAngle {
        if self.is_zero(radian) {
            return QuantizedAngle::Zero;
        }
        let negative = radian < 0.0;
        let magnitude = radian.abs();
        for (label, reference) in FRACTIONS {
            if (magnitude - reference).abs() < self.tolerance {
                return QuantizedAngle::Fraction { label, negative };
            }
        }
        QuantizedAngle::Decimal {
            value: radian,
            places: self.places,
        }
    }
}

/// Quantize with the default tolerances and render to text.
pub fn quantize(radian: f64) -> String {
    Quantizer::default().quantize_angle(radian).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fractions_map_to_labels() {
        for (label, value) in FRACTIONS {
            assert_eq!(quantize(value), label);
            assert_eq!(quantize(-value), format!("-{label}"));
        }
    }

    #[test]
    fn near_fractions_within_tolerance() {
        assert_eq!(quantize(1.5708), "Math.PI/2");
        assert_eq!(quantize(-0.7850), "-Math.PI/4");
        assert_eq!(quantize(PI / 72.0 + 0.0009), "Math.PI/72");
    }

    #[test]
    fn zero_band() {
        for r in [0.0, 5e-5, -5e-5, 9.99e-5, -0.0] {
            assert_eq!(quantize(r), ZERO_TOKEN, "r={r}");
        }
        assert_ne!(quantize(1e-4), ZERO_TOKEN);
    }

    #[test]
    fn decimal_fallback_is_fixed_point() {
        assert_eq!(quantize(0.3), "0.3000");
        assert_eq!(quantize(-2.0), "-2.0000");
        assert_eq!(quantize(1e-4), "0.0001");
        assert_eq!(quantize(12.345678), "12.3457");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(quantize(1.03125), "1.0313");
        assert_eq!(quantize(-1.03125), "-1.0313");
        assert_eq!(quantize(0.15625), "0.1563");
        // Not exactly representable: the stored double is below the tie.
        assert_eq!(quantize(0.30005), "0.3000");
        assert_eq!(quantize(9.99996), "10.0000");
    }

    #[test]
    fn decimal_fallback_round_trips_within_precision() {
        let mut r = -6.0_f64;
        while r < 6.0 {
            let far = FRACTIONS
                .iter()
                .all(|(_, f)| (r.abs() - f).abs() >= 1e-2);
            if far && r.abs() >= 1e-4 {
                let parsed: f64 = quantize(r).parse().unwrap();
                assert!((parsed - r).abs() <= 5e-5, "r={r} parsed={parsed}");
            }
            r += 0.0137;
        }
    }

    #[test]
    fn table_entries_never_overlap() {
        // Order only matters if two entries fall inside one tolerance window.
        let q = Quantizer::default();
        for (i, (_, a)) in FRACTIONS.iter().enumerate() {
            for (_, b) in FRACTIONS.iter().skip(i + 1) {
                assert!((a - b).abs() > 2.0 * q.tolerance);
            }
        }
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(quantize(f64::NAN), ZERO_TOKEN);
        assert_eq!(quantize(f64::INFINITY), ZERO_TOKEN);
        assert_eq!(quantize(f64::NEG_INFINITY), ZERO_TOKEN);
    }

    #[test]
    fn custom_places() {
        let q = Quantizer {
            places: 2,
            ..Quantizer::default()
        };
        assert_eq!(q.quantize_angle(0.3).to_string(), "0.30");
        let whole = Quantizer {
            places: 0,
            ..Quantizer::default()
        };
        assert_eq!(whole.quantize_angle(2.5).to_string(), "3");
        assert_eq!(whole.quantize_angle(-2.5).to_string(), "-3");
    }
}
