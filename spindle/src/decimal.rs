use crate::error::{DecodeError, EncodeError};
use crate::primitive::{fixed, Primitive};
use std::fmt::{self, Display, Formatter};

const SCALE_SHIFT: u32 = 16;
const SCALE_MASK: u32 = 0x00ff_0000;
const SIGN_MASK: u32 = 0x8000_0000;
const MANTISSA_MAX: u128 = (1 << 96) - 1;

/// A 128-bit decimal floating point number: a 96-bit unsigned mantissa, a sign and a power of ten
/// scale between 0 and 28.
///
/// The value is kept in its raw three-part form. Equality is structural, so `1.0` and `1.00`
/// compare unequal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    flags: u32,
    hi: u32,
    lo: u64,
}

impl Decimal {
    pub const MAX_SCALE: u8 = 28;

    pub const ZERO: Decimal = Decimal { flags: 0, hi: 0, lo: 0 };

    /// Creates `mantissa * 10^-scale`.
    ///
    /// # Panics
    ///
    /// If `scale` exceeds [`MAX_SCALE`](Self::MAX_SCALE).
    pub fn new(mantissa: i64, scale: u8) -> Decimal {
        assert!(scale <= Self::MAX_SCALE, "decimal scale {} exceeds {}", scale, Self::MAX_SCALE);
        Self::compose(mantissa < 0, mantissa.unsigned_abs() as u128, scale)
    }

    /// Creates `mantissa * 10^-scale`, or `None` if the mantissa needs more than 96 bits or the
    /// scale is out of range.
    pub fn try_new(mantissa: i128, scale: u8) -> Option<Decimal> {
        let magnitude = mantissa.unsigned_abs();
        if magnitude > MANTISSA_MAX || scale > Self::MAX_SCALE {
            return None;
        }
        Some(Self::compose(mantissa < 0, magnitude, scale))
    }

    /// Reassembles a decimal from its wire parts. Reserved flag bits are kept as they are.
    pub const fn from_parts(flags: u32, hi: u32, lo: u64) -> Decimal {
        Decimal { flags, hi, lo }
    }

    pub const fn to_parts(self) -> (u32, u32, u64) {
        (self.flags, self.hi, self.lo)
    }

    fn compose(negative: bool, magnitude: u128, scale: u8) -> Decimal {
        let sign = if negative && magnitude != 0 { SIGN_MASK } else { 0 };
        Decimal {
            flags: sign | (scale as u32) << SCALE_SHIFT,
            hi: (magnitude >> 64) as u32,
            lo: magnitude as u64,
        }
    }

    pub fn mantissa(&self) -> i128 {
        let magnitude = ((self.hi as i128) << 64) | self.lo as i128;
        if self.is_negative() { -magnitude } else { magnitude }
    }

    pub fn scale(&self) -> u8 {
        ((self.flags & SCALE_MASK) >> SCALE_SHIFT) as u8
    }

    pub fn is_negative(&self) -> bool {
        self.flags & SIGN_MASK != 0
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let digits = self.mantissa().unsigned_abs().to_string();
        let scale = self.scale() as usize;
        if self.is_negative() {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int, frac)
        } else {
            write!(f, "0.{:0>width$}", digits, width = scale)
        }
    }
}

impl Primitive for Decimal {
    const WIDTH: usize = 16;

    fn put(self, dst: &mut [u8]) -> Result<(), EncodeError> {
        dst[..4].copy_from_slice(&self.flags.to_le_bytes());
        dst[4..8].copy_from_slice(&self.hi.to_le_bytes());
        dst[8..16].copy_from_slice(&self.lo.to_le_bytes());
        Ok(())
    }

    fn get(src: &[u8]) -> Result<Self, DecodeError> {
        Ok(Decimal {
            flags: u32::from_le_bytes(fixed(&src[..4])),
            hi: u32::from_le_bytes(fixed(&src[4..8])),
            lo: u64::from_le_bytes(fixed(&src[8..16])),
        })
    }
}
