//! Kubernetes resource quantities reduced to spreadsheet-friendly scalars.
//!
//! A quantity is held exactly as a signed count of nano-units, which is the
//! finest precision Kubernetes keeps. Anything finer is rounded up on parse,
//! and both the scalar and the canonical string are derived from that value.

use std::fmt;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use podsheet_base::consts::k8s::resources;
use snafu::{OptionExt, Snafu, ensure};

const NANOS_PER_UNIT: u128 = 1_000_000_000;
const NANOS_PER_MILLI: u128 = 1_000_000;

/// Decimal exponents of the SI suffixes, smallest first.
const DECIMAL_SUFFIXES: [(i32, &str); 10] = [
    (-9, "n"),
    (-6, "u"),
    (-3, "m"),
    (0, ""),
    (3, "k"),
    (6, "M"),
    (9, "G"),
    (12, "T"),
    (15, "P"),
    (18, "E"),
];

/// Binary suffixes indexed by power of 1024.
const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

/// The resource a quantity measures. It decides the unit of the scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    /// Scalar in milli-cores.
    Cpu,
    /// Scalar in bytes.
    Memory,
}

impl ResourceKind {
    /// Key of this resource in container requests and limits.
    #[must_use]
    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::Cpu => resources::CPU,
            Self::Memory => resources::MEMORY,
        }
    }

    const fn nanos_per_scalar(self) -> u128 {
        match self {
            Self::Cpu => NANOS_PER_MILLI,
            Self::Memory => NANOS_PER_UNIT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SuffixFamily {
    BinarySi,
    DecimalSi,
    DecimalExponent,
}

/// A parsed resource quantity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceQuantity {
    kind: ResourceKind,
    raw: String,
    nanos: i128,
    family: SuffixFamily,
}

impl ResourceQuantity {
    /// Reads an optional quantity from a container spec. A missing quantity
    /// is zero.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] when the quantity string is malformed or
    /// exceeds the representable range.
    pub fn from_quantity(
        kind: ResourceKind,
        quantity: Option<&Quantity>,
    ) -> Result<Self, QuantityError> {
        match quantity {
            Some(Quantity(raw)) => Self::parse(kind, raw),
            None => Ok(Self {
                kind,
                raw: String::new(),
                nanos: 0,
                family: SuffixFamily::DecimalSi,
            }),
        }
    }

    /// Parses a quantity in the Kubernetes grammar: an optional sign, digits
    /// with at most one decimal point, then one of `n u m k M G T P E`,
    /// `Ki Mi Gi Ti Pi Ei`, or an exponent such as `e3`.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] when the string does not follow that
    /// grammar or its value exceeds the representable range.
    pub fn parse(kind: ResourceKind, input: &str) -> Result<Self, QuantityError> {
        let raw = input.trim();
        let (negative, unsigned) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };

        let number_len = unsigned
            .char_indices()
            .scan(false, |seen_point, (index, ch)| match ch {
                '0'..='9' => Some(index + 1),
                '.' if !*seen_point => {
                    *seen_point = true;
                    Some(index + 1)
                }
                _ => None,
            })
            .last()
            .unwrap_or(0);
        let (number, suffix) = unsigned.split_at(number_len);
        let (integer, fraction) = number.split_once('.').unwrap_or((number, ""));
        ensure!(
            !integer.is_empty() || !fraction.is_empty(),
            InvalidFormatSnafu { input: raw.to_string() }
        );

        let (family, exponent, binary_shift) = parse_suffix(suffix)
            .with_context(|| InvalidSuffixSnafu { input: raw, suffix })?;

        let mantissa = integer
            .bytes()
            .chain(fraction.bytes())
            .skip_while(|digit| *digit == b'0')
            .try_fold(0_u128, |acc, digit| {
                acc.checked_mul(10)?.checked_add(u128::from(digit - b'0'))
            })
            .context(PrecisionSnafu { input: raw })?;
        let fraction_digits =
            i32::try_from(fraction.len()).ok().context(PrecisionSnafu { input: raw })?;

        let magnitude = exponent
            .checked_sub(fraction_digits)
            .and_then(|exponent| to_nanos(mantissa, exponent, binary_shift))
            .context(PrecisionSnafu { input: raw })?;
        let nanos = i128::try_from(magnitude).ok().context(PrecisionSnafu { input: raw })?;

        Ok(Self {
            kind,
            raw: raw.to_string(),
            nanos: if negative { -nanos } else { nanos },
            family,
        })
    }

    /// Returns the scalar placed in the numeric column: milli-cores for CPU,
    /// bytes for memory. Partial units are rounded away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Precision`] when the scalar does not fit an
    /// `i64`.
    pub fn scalar(&self) -> Result<i64, QuantityError> {
        let scaled = self.nanos.unsigned_abs().div_ceil(self.kind.nanos_per_scalar());
        let scaled = i64::try_from(scaled).ok().context(PrecisionSnafu { input: &self.raw })?;
        Ok(if self.nanos < 0 { -scaled } else { scaled })
    }

    /// Returns the canonical textual form, e.g. `500m` or `1Gi`.
    #[must_use]
    pub fn canonical(&self) -> String {
        if self.nanos == 0 {
            return "0".to_string();
        }

        let sign = if self.nanos < 0 { "-" } else { "" };
        let magnitude = self.nanos.unsigned_abs();
        let whole_units =
            magnitude.is_multiple_of(NANOS_PER_UNIT).then_some(magnitude / NANOS_PER_UNIT);

        match (self.family, whole_units) {
            (SuffixFamily::BinarySi, Some(units)) if units >= 1024 => {
                let (mantissa, power) = canonical_binary(units);
                format!("{sign}{mantissa}{}", BINARY_SUFFIXES[power])
            }
            (SuffixFamily::BinarySi | SuffixFamily::DecimalSi, _) => {
                let (mantissa, exponent) = canonical_decimal(magnitude, Some(18));
                let suffix = DECIMAL_SUFFIXES
                    .iter()
                    .find_map(|(exp, suffix)| (*exp == exponent).then_some(*suffix))
                    .unwrap_or_default();
                format!("{sign}{mantissa}{suffix}")
            }
            (SuffixFamily::DecimalExponent, _) => match canonical_decimal(magnitude, None) {
                (mantissa, 0) => format!("{sign}{mantissa}"),
                (mantissa, exponent) => format!("{sign}{mantissa}e{exponent}"),
            },
        }
    }

    /// Returns the scalar together with the canonical string, the pair that
    /// occupies two adjacent report columns.
    ///
    /// # Errors
    ///
    /// See [`ResourceQuantity::scalar`].
    pub fn format(&self) -> Result<(i64, String), QuantityError> {
        Ok((self.scalar()?, self.canonical()))
    }
}

impl fmt::Display for ResourceQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.canonical()) }
}

/// Maps a suffix to its family, decimal exponent and binary shift.
fn parse_suffix(suffix: &str) -> Option<(SuffixFamily, i32, u32)> {
    if let Some((exponent, _)) = DECIMAL_SUFFIXES.iter().find(|(_, s)| *s == suffix) {
        return Some((SuffixFamily::DecimalSi, *exponent, 0));
    }
    if let Some(power) = BINARY_SUFFIXES.iter().skip(1).position(|s| *s == suffix) {
        let shift = u32::try_from((power + 1) * 10).ok()?;
        return Some((SuffixFamily::BinarySi, 0, shift));
    }
    let exponent = suffix.strip_prefix(['e', 'E'])?;
    Some((SuffixFamily::DecimalExponent, exponent.parse().ok()?, 0))
}

/// Computes `mantissa * 10^exponent * 2^binary_shift` in nano-units, rounding
/// up. Returns `None` on overflow.
fn to_nanos(mantissa: u128, exponent: i32, binary_shift: u32) -> Option<u128> {
    if mantissa == 0 {
        return Some(0);
    }
    let value = mantissa.checked_mul(1_u128.checked_shl(binary_shift)?)?;
    let power = exponent.checked_add(9)?;
    u32::try_from(power).map_or_else(
        // Below one nano-unit when the divisor itself overflows.
        |_| Some(10_u128.checked_pow(power.unsigned_abs()).map_or(1, |d| value.div_ceil(d))),
        |power| value.checked_mul(10_u128.checked_pow(power)?),
    )
}

/// Strips factors of 1000 from a nano-unit magnitude, returning the mantissa
/// and its decimal exponent.
fn canonical_decimal(magnitude: u128, max_exponent: Option<i32>) -> (u128, i32) {
    let mut mantissa = magnitude;
    let mut exponent = -9;
    while mantissa.is_multiple_of(1000) && max_exponent.is_none_or(|max| exponent < max) {
        mantissa /= 1000;
        exponent += 3;
    }
    (mantissa, exponent)
}

const fn canonical_binary(units: u128) -> (u128, usize) {
    let mut mantissa = units;
    let mut power = 0;
    while mantissa.is_multiple_of(1024) && power + 1 < BINARY_SUFFIXES.len() {
        mantissa /= 1024;
        power += 1;
    }
    (mantissa, power)
}

#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub))]
pub enum QuantityError {
    #[snafu(display("Invalid quantity '{input}': expected a number with an optional suffix"))]
    InvalidFormat { input: String },

    #[snafu(display("Invalid suffix '{suffix}' in quantity '{input}'"))]
    InvalidSuffix { input: String, suffix: String },

    #[snafu(display("Quantity '{input}' cannot be represented without losing precision"))]
    Precision { input: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu(input: &str) -> ResourceQuantity {
        ResourceQuantity::parse(ResourceKind::Cpu, input).unwrap()
    }

    fn memory(input: &str) -> ResourceQuantity {
        ResourceQuantity::parse(ResourceKind::Memory, input).unwrap()
    }

    #[test]
    fn test_absent_quantity_is_zero() {
        for kind in [ResourceKind::Cpu, ResourceKind::Memory] {
            let quantity = ResourceQuantity::from_quantity(kind, None).unwrap();
            assert_eq!(quantity.format().unwrap(), (0, "0".to_string()));
        }
    }

    #[test]
    fn test_cpu_milli_scalar() {
        assert_eq!(cpu("500m").format().unwrap(), (500, "500m".to_string()));
        assert_eq!(cpu("2").format().unwrap(), (2000, "2".to_string()));
        assert_eq!(cpu("0.5").format().unwrap(), (500, "500m".to_string()));
        assert_eq!(cpu("1.5").format().unwrap(), (1500, "1500m".to_string()));
        assert_eq!(cpu("1000m").format().unwrap(), (1000, "1".to_string()));
    }

    #[test]
    fn test_cpu_rounds_up_to_whole_milli() {
        assert_eq!(cpu("100n").format().unwrap(), (1, "100n".to_string()));
        assert_eq!(cpu("0.0001").scalar().unwrap(), 1);
        assert_eq!(cpu("250u").canonical(), "250u");
    }

    #[test]
    fn test_sub_nano_values_round_up_to_one_nano() {
        assert_eq!(cpu("1e-12").format().unwrap(), (1, "1e-9".to_string()));
        assert_eq!(cpu("1e-50").format().unwrap(), (1, "1e-9".to_string()));
        assert_eq!(cpu("1500e-12").canonical(), "2e-9");
    }

    #[test]
    fn test_memory_byte_scalar() {
        assert_eq!(memory("128Mi").format().unwrap(), (134_217_728, "128Mi".to_string()));
        assert_eq!(memory("1G").format().unwrap(), (1_000_000_000, "1G".to_string()));
        assert_eq!(memory("1024Mi").format().unwrap(), (1_073_741_824, "1Gi".to_string()));
        assert_eq!(memory("0.5Gi").format().unwrap(), (536_870_912, "512Mi".to_string()));
        assert_eq!(memory("1500").format().unwrap(), (1500, "1500".to_string()));
    }

    #[test]
    fn test_small_binary_quantity_switches_to_decimal() {
        assert_eq!(memory("0.5Ki").canonical(), "512");
        assert_eq!(memory("1Ki").canonical(), "1Ki");
        assert_eq!(memory("1.5Ki").canonical(), "1536");
    }

    #[test]
    fn test_exponent_suffix() {
        assert_eq!(memory("1e3").format().unwrap(), (1000, "1e3".to_string()));
        assert_eq!(memory("12E6").canonical(), "12e6");
        assert_eq!(memory("5e0").canonical(), "5");
        // A lone `E` is the exa suffix rather than an exponent.
        assert_eq!(memory("2E").canonical(), "2E");
    }

    #[test]
    fn test_signed_quantity() {
        assert_eq!(cpu("-250m").format().unwrap(), (-250, "-250m".to_string()));
        assert_eq!(cpu("+3").format().unwrap(), (3000, "3".to_string()));
    }

    #[test]
    fn test_canonical_is_stable_across_calls() {
        let quantity = memory("2048Ki");
        assert_eq!(quantity.canonical(), "2Mi");
        assert_eq!(quantity.canonical(), quantity.to_string());
    }

    #[test]
    fn test_invalid_quantities() {
        for input in ["", "abc", "m", "-", "."] {
            let err = ResourceQuantity::parse(ResourceKind::Cpu, input).unwrap_err();
            assert!(matches!(err, QuantityError::InvalidFormat { .. }), "{input}: {err}");
        }
        for input in ["12x", "1.5.5", "3Kb", "1e", "4 Gi"] {
            let err = ResourceQuantity::parse(ResourceKind::Memory, input).unwrap_err();
            assert!(matches!(err, QuantityError::InvalidSuffix { .. }), "{input}: {err}");
        }
    }

    #[test]
    fn test_out_of_range_quantities() {
        let err = ResourceQuantity::parse(ResourceKind::Memory, "1e40").unwrap_err();
        assert!(matches!(err, QuantityError::Precision { .. }));

        let huge = memory("100000000000000000000");
        assert!(matches!(huge.scalar(), Err(QuantityError::Precision { .. })));
        assert_eq!(huge.canonical(), "100E");
    }
}
