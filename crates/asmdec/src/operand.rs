//! Operands: integers, numeric strings and raw byte strings, and the
//! normalization that turns each into the bits an operand slot reads.

use alloc::string::String;

use crate::error::AsmDecError;
use crate::size::Slot;

/// An operand as the caller supplies it.
///
/// Every public operation converts its arguments with `Into<Operand>` and
/// normalizes them with [`Operand::resolve`] before any arithmetic happens.
///
/// # Examples
///
/// ```rust
/// use asmdec::{Operand, Slot};
///
/// assert_eq!(Operand::from("0x1234").resolve(Slot::High).unwrap(), 0x12);
/// assert_eq!(Operand::from(-1i32).resolve(Slot::Word).unwrap(), 0xFFFF);
/// assert_eq!(Operand::from(&b"MZ"[..]).value().unwrap(), 0x4D5A);
/// ```
///
/// With the `serde` feature an operand serializes but does not deserialize:
/// it borrows its text and bytes, and JSON has no borrowed byte strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Operand<'a> {
    /// An integer. Negative values are read as two's complement.
    Integer(i128),
    /// An integer literal to be parsed (see [`parse_literal`]).
    Numeric(&'a str),
    /// Raw bytes read as a big-endian integer (`b"MZ"` is `0x4D5A`).
    Bytes(&'a [u8]),
}

impl Operand<'_> {
    /// The low 64 bits of the operand.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::Parse`] if a [`Operand::Numeric`] string is not
    /// a valid integer literal.
    pub fn value(self) -> Result<u64, AsmDecError> {
        match self {
            Operand::Integer(v) => Ok(v as u64),
            Operand::Numeric(s) => parse_literal(s),
            Operand::Bytes(bytes) => Ok(bytes
                .iter()
                .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))),
        }
    }

    /// Parse the operand and read the sub-field `slot` selects.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::Parse`] on an invalid literal.
    pub fn resolve(self, slot: Slot) -> Result<u64, AsmDecError> {
        Ok(slot.read(self.value()?))
    }
}

macro_rules! operand_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand<'_> {
                fn from(v: $t) -> Self {
                    Operand::Integer(v as i128)
                }
            }
        )*
    };
}

operand_from_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, isize);

impl From<i128> for Operand<'_> {
    fn from(v: i128) -> Self {
        Operand::Integer(v)
    }
}

impl From<char> for Operand<'_> {
    fn from(c: char) -> Self {
        Operand::Integer(i128::from(u32::from(c)))
    }
}

impl<'a> From<&'a str> for Operand<'a> {
    fn from(s: &'a str) -> Self {
        Operand::Numeric(s)
    }
}

impl<'a> From<&'a String> for Operand<'a> {
    fn from(s: &'a String) -> Self {
        Operand::Numeric(s.as_str())
    }
}

impl<'a> From<&'a [u8]> for Operand<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Operand::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Operand<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Operand::Bytes(bytes)
    }
}

/// Parse an integer literal and return its low 64 bits.
///
/// Accepted forms, after trimming surrounding whitespace and an optional
/// `+`/`-` sign:
///
/// - decimal: `42`
/// - hex: `0x2A`, or MASM style `2Ah` / `0FFh` (leading decimal digit,
///   trailing `h`)
/// - binary: `0b101010`
/// - octal: `0o52`
///
/// `_` may separate digits. Literals wider than 64 bits wrap, so only the
/// bits a 64-bit register could hold survive; a negative literal yields its
/// two's complement.
///
/// # Errors
///
/// Returns [`AsmDecError::Parse`] when the literal is empty, has no digits
/// after its prefix, or contains a digit outside its radix.
///
/// # Examples
///
/// ```rust
/// use asmdec::parse_literal;
///
/// assert_eq!(parse_literal("0x2A").unwrap(), 42);
/// assert_eq!(parse_literal("2Ah").unwrap(), 42);
/// assert_eq!(parse_literal("-1").unwrap(), u64::MAX);
/// assert!(parse_literal("forty-two").is_err());
/// ```
pub fn parse_literal(literal: &str) -> Result<u64, AsmDecError> {
    let fail = |reason| AsmDecError::Parse {
        literal: String::from(literal),
        reason,
    };

    let text = literal.trim();
    if text.is_empty() {
        return Err(fail("empty literal"));
    }
    let (negative, text) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = split_radix(text);
    let mut value: u64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        if c == '_' {
            if !seen_digit {
                return Err(fail("digit separator before first digit"));
            }
            continue;
        }
        let digit = c.to_digit(radix).ok_or_else(|| fail(radix_reason(radix)))?;
        value = value
            .wrapping_mul(u64::from(radix))
            .wrapping_add(u64::from(digit));
        seen_digit = true;
    }
    if !seen_digit {
        return Err(fail("missing digits"));
    }

    Ok(if negative { value.wrapping_neg() } else { value })
}

/// Split a sign-free literal into its radix and digit string.
fn split_radix(text: &str) -> (u32, &str) {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X') {
        return (16, &text[2..]);
    }
    // MASM hex suffix: `0FFh`. Checked before `0b`/`0o` so that `0Bh` is 11.
    if bytes.len() >= 2
        && bytes[0].is_ascii_digit()
        && matches!(bytes[bytes.len() - 1], b'h' | b'H')
    {
        return (16, &text[..text.len() - 1]);
    }
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'b' | b'B' => return (2, &text[2..]),
            b'o' | b'O' => return (8, &text[2..]),
            _ => {}
        }
    }
    (10, text)
}

fn radix_reason(radix: u32) -> &'static str {
    match radix {
        16 => "invalid hex digit",
        8 => "invalid octal digit",
        2 => "invalid binary digit",
        _ => "invalid decimal digit",
    }
}
