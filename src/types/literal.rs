//! Fixed-width numeric types and literal width derivation.
//!
//! Integer types carry a bit width in `[8, 256]` with a step of 8, or no width at
//! all (`int`/`uint`), which behaves as a 256-bit type. Literal types carry their
//! concrete value; their width is derived from the value's magnitude.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, Zero};

/// Smallest bit width a numeric type may have.
pub const MIN_BITWIDTH: u16 = 8;

/// Largest bit width a numeric type may have.
pub const MAX_BITWIDTH: u16 = 256;

/// A concrete `int`/`uint` type.
///
/// Equality compares effective widths, so `uint` equals `uint256`.
#[derive(Debug, Clone, Copy)]
pub struct NumericType {
    /// Whether the type is two's-complement signed (`int`)
    pub signed: bool,
    /// Declared width; `None` for the bare `int`/`uint` spelling
    pub bits: Option<u16>,
}

impl NumericType {
    /// `int<bits>`, or bare `int` when `bits` is `None`.
    #[must_use]
    pub const fn int(bits: Option<u16>) -> Self {
        Self { signed: true, bits }
    }

    /// `uint<bits>`, or bare `uint` when `bits` is `None`.
    #[must_use]
    pub const fn uint(bits: Option<u16>) -> Self {
        Self {
            signed: false,
            bits,
        }
    }

    /// Parses `int`, `intN`, `uint` or `uintN`.
    ///
    /// Returns `None` for other spellings and for widths outside `[8, 256]` or not
    /// divisible by 8.
    ///
    /// ## Arguments
    /// * `name` - The source spelling of the type
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let (signed, digits) = if let Some(rest) = name.strip_prefix("uint") {
            (false, rest)
        } else if let Some(rest) = name.strip_prefix("int") {
            (true, rest)
        } else {
            return None;
        };

        if digits.is_empty() {
            return Some(Self { signed, bits: None });
        }

        let bits: u16 = digits.parse().ok()?;
        if (MIN_BITWIDTH..=MAX_BITWIDTH).contains(&bits) && bits % 8 == 0 {
            Some(Self {
                signed,
                bits: Some(bits),
            })
        } else {
            None
        }
    }

    /// Effective width; unset widths count as 256 bits.
    #[must_use]
    pub fn elem_bitwidth(&self) -> u16 {
        self.bits.unwrap_or(MAX_BITWIDTH)
    }

    /// Returns true if `value` lies in the representable range of this type.
    ///
    /// ## Arguments
    /// * `value` - The value to test
    #[must_use]
    pub fn can_represent(&self, value: &BigInt) -> bool {
        can_represent(self.signed, self.elem_bitwidth(), value)
    }
}

impl PartialEq for NumericType {
    fn eq(&self, other: &Self) -> bool {
        self.signed == other.signed && self.elem_bitwidth() == other.elem_bitwidth()
    }
}

impl Eq for NumericType {}

impl Hash for NumericType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signed.hash(state);
        self.elem_bitwidth().hash(state);
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.signed { "int" } else { "uint" };
        match self.bits {
            Some(bits) => write!(f, "{prefix}{bits}"),
            None => write!(f, "{prefix}"),
        }
    }
}

/// Range test for a two's-complement (`signed`) or unsigned integer of `bits` width.
///
/// ## Arguments
/// * `signed` - Whether negative values are representable
/// * `bits` - Width of the integer type
/// * `value` - The value to test
#[must_use]
pub fn can_represent(signed: bool, bits: u16, value: &BigInt) -> bool {
    let bits = usize::from(bits);
    let (lo, hi) = if signed {
        let half = BigInt::one() << (bits - 1);
        (-half.clone(), half)
    } else {
        (BigInt::zero(), BigInt::one() << bits)
    };
    &lo <= value && value < &hi
}

/// Width of the smallest integer type able to hold `value`.
///
/// Negative values need one extra sign bit unless they are an exact negative power
/// of two. The result is rounded up to the next multiple of 8 and clamped to
/// `[8, 256]`.
///
/// ## Arguments
/// * `value` - The literal value
#[must_use]
pub fn literal_bitwidth(value: &BigInt) -> u16 {
    let blen = value.bits();
    let width = if value.sign() == Sign::Minus {
        let min_of_width = -(BigInt::one() << (blen.saturating_sub(1)));
        if *value == min_of_width {
            blen
        } else {
            blen + 1
        }
    } else {
        blen
    };

    let rounded = width.div_ceil(8) * 8;
    // Clamped, so the narrowing below cannot truncate.
    #[allow(clippy::cast_possible_truncation)]
    let clamped = rounded.clamp(u64::from(MIN_BITWIDTH), u64::from(MAX_BITWIDTH)) as u16;
    clamped
}

/// Smallest concrete numeric type that represents `value`.
///
/// ## Arguments
/// * `value` - The literal value
#[must_use]
pub fn literal_abstract_type(value: &BigInt) -> NumericType {
    let bits = Some(literal_bitwidth(value));
    if value.is_negative() {
        NumericType::int(bits)
    } else {
        NumericType::uint(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn test_numeric_from_name() {
        assert_eq!(NumericType::from_name("uint"), Some(NumericType::uint(None)));
        assert_eq!(NumericType::from_name("int8"), Some(NumericType::int(Some(8))));
        assert_eq!(
            NumericType::from_name("uint256"),
            Some(NumericType::uint(Some(256)))
        );
        assert_eq!(NumericType::from_name("uint7"), None);
        assert_eq!(NumericType::from_name("int264"), None);
        assert_eq!(NumericType::from_name("bytes32"), None);
    }

    #[test]
    fn test_unsized_equals_full_width() {
        assert_eq!(NumericType::uint(None), NumericType::uint(Some(256)));
        assert_ne!(NumericType::uint(None), NumericType::int(None));
        assert_ne!(NumericType::uint(Some(8)), NumericType::uint(Some(16)));
    }

    #[test]
    fn test_numeric_display() {
        assert_eq!(NumericType::uint(None).to_string(), "uint");
        assert_eq!(NumericType::int(Some(64)).to_string(), "int64");
    }

    #[test]
    fn test_range_boundaries() {
        let int8 = NumericType::int(Some(8));
        assert!(int8.can_represent(&big(127)));
        assert!(!int8.can_represent(&big(128)));
        assert!(int8.can_represent(&big(-128)));
        assert!(!int8.can_represent(&big(-129)));

        let uint8 = NumericType::uint(Some(8));
        assert!(uint8.can_represent(&big(0)));
        assert!(uint8.can_represent(&big(255)));
        assert!(!uint8.can_represent(&big(256)));
        assert!(!uint8.can_represent(&big(-1)));

        let uint = NumericType::uint(None);
        let max = (BigInt::one() << 256usize) - 1;
        assert!(uint.can_represent(&max));
        assert!(!uint.can_represent(&(max + 1)));
    }

    #[test]
    fn test_literal_bitwidth() {
        assert_eq!(literal_bitwidth(&big(0)), 8);
        assert_eq!(literal_bitwidth(&big(1)), 8);
        assert_eq!(literal_bitwidth(&big(255)), 8);
        assert_eq!(literal_bitwidth(&big(256)), 16);
        assert_eq!(literal_bitwidth(&big(-128)), 8);
        assert_eq!(literal_bitwidth(&big(-129)), 16);
        assert_eq!(literal_bitwidth(&big(-1)), 8);

        let address_sized = (BigInt::one() << 159usize) + 7;
        assert_eq!(literal_bitwidth(&address_sized), 160);

        let huge = BigInt::one() << 300usize;
        assert_eq!(literal_bitwidth(&huge), 256);
    }

    #[test]
    fn test_literal_bitwidth_is_step_of_eight() {
        let mut value = BigInt::one();
        for _ in 0..300 {
            for candidate in [value.clone(), -value.clone(), value.clone() - 1] {
                let width = literal_bitwidth(&candidate);
                assert_eq!(width % 8, 0);
                assert!((MIN_BITWIDTH..=MAX_BITWIDTH).contains(&width));
            }
            value <<= 1usize;
        }
    }

    #[test]
    fn test_literal_fits_its_abstract_type() {
        for v in [0i64, 1, 127, 128, 255, 256, -1, -128, -129, 65_535, -32_768] {
            let value = big(v);
            assert!(literal_abstract_type(&value).can_represent(&value), "{v}");
        }
        assert_eq!(literal_abstract_type(&big(-3)), NumericType::int(Some(8)));
        assert_eq!(literal_abstract_type(&big(300)), NumericType::uint(Some(16)));
    }
}
