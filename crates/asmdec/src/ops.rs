//! Masked operators.
//!
//! Each [`Mnemonic`] is a pure function of two already-normalized operands.
//! Its result is truncated to the destination [`Width`], so every operation
//! wraps exactly like a register of that width.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::error::AsmDecError;
use crate::size::Width;

/// Supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mnemonic {
    /// `dst + src`
    Add,
    /// `dst - src`
    Sub,
    /// `dst & src`
    And,
    /// `dst | src`
    Or,
    /// `dst ^ src`
    Xor,
    /// Logical shift left.
    Shl,
    /// Logical shift right; zero-fills, never sign-extends.
    Shr,
    /// Rotate left within the destination width.
    Rol,
    /// Rotate right within the destination width.
    Ror,
    /// `dst + 1`
    Inc,
    /// `dst - 1`
    Dec,
    /// One's complement.
    Not,
    /// Two's complement negation.
    Neg,
}

impl Mnemonic {
    /// Every mnemonic, binary ones first.
    pub const ALL: [Mnemonic; 13] = [
        Mnemonic::Add,
        Mnemonic::Sub,
        Mnemonic::And,
        Mnemonic::Or,
        Mnemonic::Xor,
        Mnemonic::Shl,
        Mnemonic::Shr,
        Mnemonic::Rol,
        Mnemonic::Ror,
        Mnemonic::Inc,
        Mnemonic::Dec,
        Mnemonic::Not,
        Mnemonic::Neg,
    ];

    /// Lowercase assembly name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mnemonic::Add => "add",
            Mnemonic::Sub => "sub",
            Mnemonic::And => "and",
            Mnemonic::Or => "or",
            Mnemonic::Xor => "xor",
            Mnemonic::Shl => "shl",
            Mnemonic::Shr => "shr",
            Mnemonic::Rol => "rol",
            Mnemonic::Ror => "ror",
            Mnemonic::Inc => "inc",
            Mnemonic::Dec => "dec",
            Mnemonic::Not => "not",
            Mnemonic::Neg => "neg",
        }
    }

    /// Whether the operation reads only operand 1.
    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(
            self,
            Mnemonic::Inc | Mnemonic::Dec | Mnemonic::Not | Mnemonic::Neg
        )
    }

    /// Look a mnemonic up by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Compute the operation on normalized operands and truncate the result
    /// to `width`. `src` is ignored by unary operations.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use asmdec::{Mnemonic, ShiftCount, Width};
    ///
    /// let r = Mnemonic::Add.apply(0xFF, 1, Width::Byte, ShiftCount::Hardware);
    /// assert_eq!(r, 0);
    /// let r = Mnemonic::Rol.apply(0x8000_0000, 1, Width::Dword, ShiftCount::Hardware);
    /// assert_eq!(r, 1);
    /// ```
    #[must_use]
    pub fn apply(self, dst: u64, src: u64, width: Width, counts: ShiftCount) -> u64 {
        let mask = width.mask();
        let raw = match self {
            Mnemonic::Add => dst.wrapping_add(src),
            Mnemonic::Sub => dst.wrapping_sub(src),
            Mnemonic::And => dst & src,
            Mnemonic::Or => dst | src,
            Mnemonic::Xor => dst ^ src,
            Mnemonic::Shl => shl(dst, counts.effective(src, width), width),
            Mnemonic::Shr => shr(dst & mask, counts.effective(src, width), width),
            Mnemonic::Rol => rol(dst & mask, counts.effective(src, width), width),
            Mnemonic::Ror => ror(dst & mask, counts.effective(src, width), width),
            Mnemonic::Inc => dst.wrapping_add(1),
            Mnemonic::Dec => dst.wrapping_sub(1),
            Mnemonic::Not => !dst,
            Mnemonic::Neg => dst.wrapping_neg(),
        };
        raw & mask
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mnemonic {
    type Err = AsmDecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| AsmDecError::UnsupportedOperation {
            mnemonic: String::from(s),
        })
    }
}

/// How shift and rotate counts are reduced before use.
///
/// x86 masks the count register (`cl` or an immediate) to 5 bits, or 6 bits
/// for 64-bit operands, before shifting. Shifts by a count that is still at
/// least the destination width produce 0; rotations always wrap modulo the
/// destination width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftCount {
    /// Mask the count like the processor: `& 0x3F` for qwords, `& 0x1F`
    /// otherwise. `shl al, 9` gives 0, `shl eax, 33` shifts by 1.
    #[default]
    Hardware,
    /// Reduce the count modulo the destination width: `shl al, 9` shifts by 1.
    Modulo,
    /// Use the count as given: any shift of at least the width gives 0.
    Unbounded,
}

impl ShiftCount {
    /// The count actually used for a destination of `width`.
    #[must_use]
    pub const fn effective(self, count: u64, width: Width) -> u64 {
        match self {
            ShiftCount::Hardware => match width {
                Width::Qword => count & 0x3F,
                _ => count & 0x1F,
            },
            ShiftCount::Modulo => count % width.bits() as u64,
            ShiftCount::Unbounded => count,
        }
    }
}

fn shl(value: u64, count: u64, width: Width) -> u64 {
    if count >= u64::from(width.bits()) {
        0
    } else {
        value << count
    }
}

fn shr(value: u64, count: u64, width: Width) -> u64 {
    if count >= u64::from(width.bits()) {
        0
    } else {
        value >> count
    }
}

fn rol(value: u64, count: u64, width: Width) -> u64 {
    let bits = width.bits();
    let n = (count % u64::from(bits)) as u32;
    if n == 0 {
        value
    } else {
        (value << n) | (value >> (bits - n))
    }
}

fn ror(value: u64, count: u64, width: Width) -> u64 {
    let bits = width.bits();
    let n = (count % u64::from(bits)) as u32;
    if n == 0 {
        value
    } else {
        (value >> n) | (value << (bits - n))
    }
}
