//! Size designators: the `l`/`h`/`w`/`d`/`q` letters and the two-slot
//! [`SizeSpec`] they are parsed into.
//!
//! A designator such as `"ld"` reads operand 1 as a low byte (`al`) and
//! operand 2 as a dword (`eax`). The result is always truncated to the width
//! of the first letter, the way the destination register of an x86
//! instruction bounds what is written.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::error::AsmDecError;

/// Register width class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Width {
    /// 8 bits (`al`, `ah`).
    Byte,
    /// 16 bits (`ax`).
    Word,
    /// 32 bits (`eax`).
    Dword,
    /// 64 bits (`rax`).
    Qword,
}

impl Width {
    /// Number of bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Width::Byte => 8,
            Width::Word => 16,
            Width::Dword => 32,
            Width::Qword => 64,
        }
    }

    /// `2^bits - 1`.
    #[must_use]
    pub const fn mask(self) -> u64 {
        match self {
            Width::Byte => 0xFF,
            Width::Word => 0xFFFF,
            Width::Dword => 0xFFFF_FFFF,
            Width::Qword => u64::MAX,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Width::Byte => write!(f, "byte"),
            Width::Word => write!(f, "word"),
            Width::Dword => write!(f, "dword"),
            Width::Qword => write!(f, "qword"),
        }
    }
}

/// Which part of a value an operand slot reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadMode {
    /// The low `width` bits.
    Full,
    /// Bits 0–7.
    LowByte,
    /// Bits 8–15. Read-only: never selects how a result is written back.
    HighByte,
}

/// One letter of a size designator.
///
/// | letter | width | reads | registers |
/// |---|---|---|---|
/// | `l` | 8 | bits 0–7 | `al`, `bl`, `cl`, `dl` |
/// | `h` | 8 | bits 8–15 | `ah`, `bh`, `ch`, `dh` |
/// | `w` | 16 | bits 0–15 | `ax`, `bx`, `cx`, `dx` |
/// | `d` | 32 | bits 0–31 | `eax` … `esp`, `r8d` … `r15d` |
/// | `q` | 64 | bits 0–63 | `rax` … `rsp`, `r8` … `r15` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    /// `l`: low byte.
    Low,
    /// `h`: high byte.
    High,
    /// `w`: word.
    Word,
    /// `d`: dword.
    Dword,
    /// `q`: qword.
    Qword,
}

const SLOT_TABLE: [(char, Slot); 5] = [
    ('l', Slot::Low),
    ('h', Slot::High),
    ('w', Slot::Word),
    ('d', Slot::Dword),
    ('q', Slot::Qword),
];

impl Slot {
    /// Look up a designator letter (case-insensitive).
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        let letter = letter.to_ascii_lowercase();
        SLOT_TABLE
            .iter()
            .find(|(c, _)| *c == letter)
            .map(|&(_, slot)| slot)
    }

    /// The slot named by the first letter of `designator`. Letters after the
    /// first are not inspected.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] for an empty designator or an
    /// unknown first letter.
    pub fn from_designator(designator: &str) -> Result<Self, AsmDecError> {
        let invalid = |reason| AsmDecError::InvalidSize {
            designator: String::from(designator),
            reason,
        };
        let letter = designator
            .chars()
            .next()
            .ok_or_else(|| invalid("empty designator"))?;
        Self::from_letter(letter).ok_or_else(|| invalid("unknown size letter"))
    }

    /// The canonical (lowercase) letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Slot::Low => 'l',
            Slot::High => 'h',
            Slot::Word => 'w',
            Slot::Dword => 'd',
            Slot::Qword => 'q',
        }
    }

    /// Nominal width; for `h` this is 8, the width of the byte it reads.
    #[must_use]
    pub const fn width(self) -> Width {
        match self {
            Slot::Low | Slot::High => Width::Byte,
            Slot::Word => Width::Word,
            Slot::Dword => Width::Dword,
            Slot::Qword => Width::Qword,
        }
    }

    /// Which bits the slot reads.
    #[must_use]
    pub const fn mode(self) -> ReadMode {
        match self {
            Slot::Low => ReadMode::LowByte,
            Slot::High => ReadMode::HighByte,
            Slot::Word | Slot::Dword | Slot::Qword => ReadMode::Full,
        }
    }

    /// Read the slot's sub-field out of `value`.
    #[must_use]
    pub const fn read(self, value: u64) -> u64 {
        match self.mode() {
            ReadMode::HighByte => (value >> 8) & 0xFF,
            ReadMode::LowByte | ReadMode::Full => value & self.width().mask(),
        }
    }

    /// Truncate a result to the slot's width, as a write to a destination
    /// register of that width would. `h` truncates to 8 bits; it does not
    /// extract bits 8–15 a second time.
    #[must_use]
    pub const fn truncate(self, value: u64) -> u64 {
        value & self.width().mask()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A parsed size designator: one [`Slot`] per operand.
///
/// # Examples
///
/// ```rust
/// use asmdec::{SizeSpec, Slot};
///
/// let size: SizeSpec = "ld".parse().unwrap();
/// assert_eq!(size.first, Slot::Low);
/// assert_eq!(size.second, Slot::Dword);
/// assert_eq!(SizeSpec::default().to_string(), "dd");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeSpec {
    /// Operand 1; also the destination.
    pub first: Slot,
    /// Operand 2.
    pub second: Slot,
}

impl SizeSpec {
    /// `dd`: both operands are dwords.
    pub const DEFAULT: SizeSpec = SizeSpec::new(Slot::Dword, Slot::Dword);

    /// Build from two slots.
    #[must_use]
    pub const fn new(first: Slot, second: Slot) -> Self {
        Self { first, second }
    }

    /// Both operands use `slot`.
    #[must_use]
    pub const fn uniform(slot: Slot) -> Self {
        Self::new(slot, slot)
    }

    /// Width results are truncated to.
    #[must_use]
    pub const fn destination(self) -> Width {
        self.first.width()
    }

    /// Parse a one- or two-letter designator.
    ///
    /// A single letter applies to both slots, so `"q"` is `"qq"`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] for an empty designator, more than
    /// two letters, or a letter outside `l h w d q`.
    pub fn parse(designator: &str) -> Result<Self, AsmDecError> {
        let invalid = |reason| AsmDecError::InvalidSize {
            designator: String::from(designator),
            reason,
        };
        let mut chars = designator.chars();
        let first = chars.next().ok_or_else(|| invalid("empty designator"))?;
        let second = chars.next();
        if chars.next().is_some() {
            return Err(invalid("expected at most two size letters"));
        }
        let first = Slot::from_letter(first).ok_or_else(|| invalid("unknown size letter"))?;
        let second = match second {
            Some(c) => Slot::from_letter(c).ok_or_else(|| invalid("unknown size letter"))?,
            None => first,
        };
        Ok(Self::new(first, second))
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for SizeSpec {
    type Err = AsmDecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for SizeSpec {
    type Error = AsmDecError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Slot> for SizeSpec {
    fn from(slot: Slot) -> Self {
        Self::uniform(slot)
    }
}

/// A size argument: a designator string, a parsed [`SizeSpec`], a single
/// [`Slot`] for both operands, or `None` for the evaluator's default.
///
/// # Examples
///
/// ```rust
/// use asmdec::{AsmDec, SizeSpec, Slot};
///
/// let a = AsmDec::new();
/// assert_eq!(a.add(0xFF, 1, "ll").unwrap(), 0);
/// assert_eq!(a.add(0xFF, 1, Slot::Low).unwrap(), 0);
/// assert_eq!(a.add(0xFF, 1, SizeSpec::DEFAULT).unwrap(), 0x100);
/// assert_eq!(a.add(0xFF, 1, None::<&str>).unwrap(), 0x100);
/// ```
pub trait IntoSizeSpec {
    /// Resolve to a [`SizeSpec`], falling back to `default` when no size was
    /// given.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] for a bad designator string.
    fn into_size_spec(self, default: SizeSpec) -> Result<SizeSpec, AsmDecError>;
}

impl IntoSizeSpec for SizeSpec {
    fn into_size_spec(self, _default: SizeSpec) -> Result<SizeSpec, AsmDecError> {
        Ok(self)
    }
}

impl IntoSizeSpec for Slot {
    fn into_size_spec(self, _default: SizeSpec) -> Result<SizeSpec, AsmDecError> {
        Ok(SizeSpec::uniform(self))
    }
}

impl IntoSizeSpec for &str {
    fn into_size_spec(self, _default: SizeSpec) -> Result<SizeSpec, AsmDecError> {
        SizeSpec::parse(self)
    }
}

impl IntoSizeSpec for &String {
    fn into_size_spec(self, _default: SizeSpec) -> Result<SizeSpec, AsmDecError> {
        SizeSpec::parse(self)
    }
}

impl<T: IntoSizeSpec> IntoSizeSpec for Option<T> {
    fn into_size_spec(self, default: SizeSpec) -> Result<SizeSpec, AsmDecError> {
        match self {
            Some(size) => size.into_size_spec(default),
            None => Ok(default),
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first, self.second)
    }
}
