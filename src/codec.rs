/// Price, quantity and identifier codecs
///
/// Numeric fields arrive either as little-endian binary integers (multicast)
/// or as zero-filled ASCII digit strings (direct). `NumericCodec` hides the
/// difference; each implementation also fixes the implied decimal position of
/// its short and long price forms.

use crate::decoder::FieldError;
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

/// Widest identifier/alphanumeric field in either catalog
pub const TOKEN_CAPACITY: usize = 12;

/// Fixed-point price: `raw / 10^decimals`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Price {
    raw: u64,
    decimals: u8,
}

impl Price {
    pub const fn new(raw: u64, decimals: u8) -> Self {
        Price { raw, decimals }
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Divisor implied by the decimal position
    pub fn scale(&self) -> u64 {
        10u64.pow(self.decimals as u32)
    }

    pub fn to_f64(&self) -> f64 {
        self.raw as f64 / self.scale() as f64
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            return write!(f, "{}", self.raw);
        }
        let scale = self.scale();
        write!(
            f,
            "{}.{:0width$}",
            self.raw / scale,
            self.raw % scale,
            width = self.decimals as usize
        )
    }
}

/// Opaque fixed-width byte string: order/execution ids, symbols, venues
///
/// Ids are compared as raw bytes and never parsed as integers. Alphanumeric
/// fields are space padded on the right; `as_str` drops the padding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    bytes: [u8; TOKEN_CAPACITY],
    len: u8,
}

impl Token {
    pub fn new(src: &[u8]) -> Result<Self, FieldError> {
        if src.len() > TOKEN_CAPACITY {
            return Err(FieldError::Width(src.len()));
        }
        let mut bytes = [0u8; TOKEN_CAPACITY];
        bytes[..src.len()].copy_from_slice(src);
        Ok(Token {
            bytes,
            len: src.len() as u8,
        })
    }

    /// Exact bytes as received, padding included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Bytes with right-hand space padding removed
    pub fn trimmed(&self) -> &[u8] {
        let raw = self.as_bytes();
        let end = raw.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
        &raw[..end]
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.trimmed()).ok()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    fn is_printable(&self) -> bool {
        self.as_bytes().iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.trimmed() == other.as_bytes()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) if self.is_printable() => f.write_str(s),
            _ => write!(f, "0x{}", hex::encode(self.as_bytes())),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self)
    }
}

/// Source representation of numeric fields
pub trait NumericCodec {
    /// Implied decimals of the narrow price form
    const SHORT_PRICE_DECIMALS: u8;
    /// Implied decimals of the wide price form
    const LONG_PRICE_DECIMALS: u8;

    fn unsigned(bytes: &[u8]) -> Result<u64, FieldError>;

    /// Whether a price field of this width is the wide form
    fn is_long_price(width: usize) -> bool;

    fn quantity(bytes: &[u8]) -> Result<u64, FieldError> {
        Self::unsigned(bytes)
    }

    fn price(bytes: &[u8]) -> Result<Price, FieldError> {
        let decimals = if Self::is_long_price(bytes.len()) {
            Self::LONG_PRICE_DECIMALS
        } else {
            Self::SHORT_PRICE_DECIMALS
        };
        Ok(Price::new(Self::unsigned(bytes)?, decimals))
    }
}

/// Little-endian binary integers (multicast feed)
#[derive(Debug, Clone, Copy)]
pub struct Binary;

impl NumericCodec for Binary {
    const SHORT_PRICE_DECIMALS: u8 = 2;
    const LONG_PRICE_DECIMALS: u8 = 4;

    fn unsigned(bytes: &[u8]) -> Result<u64, FieldError> {
        match bytes.len() {
            0 => Err(FieldError::Empty),
            1 => Ok(bytes[0] as u64),
            2 => Ok(LittleEndian::read_u16(bytes) as u64),
            4 => Ok(LittleEndian::read_u32(bytes) as u64),
            8 => Ok(LittleEndian::read_u64(bytes)),
            n if n < 8 => Ok(LittleEndian::read_uint(bytes, n)),
            n => Err(FieldError::Width(n)),
        }
    }

    fn is_long_price(width: usize) -> bool {
        width > 2
    }
}

/// Zero-filled ASCII digit strings (direct feed)
#[derive(Debug, Clone, Copy)]
pub struct Decimal;

impl NumericCodec for Decimal {
    // 6 whole + 4 decimal digits
    const SHORT_PRICE_DECIMALS: u8 = 4;
    // 12 whole + 7 decimal digits
    const LONG_PRICE_DECIMALS: u8 = 7;

    fn unsigned(bytes: &[u8]) -> Result<u64, FieldError> {
        if bytes.is_empty() {
            return Err(FieldError::Empty);
        }
        bytes.iter().try_fold(0u64, |acc, &b| {
            if !b.is_ascii_digit() {
                return Err(FieldError::NonNumeric(b));
            }
            acc.checked_mul(10)
                .and_then(|v| v.checked_add((b - b'0') as u64))
                .ok_or(FieldError::Overflow)
        })
    }

    fn is_long_price(width: usize) -> bool {
        width > 10
    }
}
