//! # asmdec: x86/x64 Register-Width Arithmetic
//!
//! `asmdec` mimics the size limits of Intel x86/x64 registers so that decoder,
//! hashing and obfuscation loops lifted from a disassembly can be ported
//! without hand-written masks. Every operation reads its operands through a
//! size designator and truncates the result like a write to the destination
//! register would.
//!
//! ## Quick Start
//!
//! ```rust
//! use asmdec::AsmDec;
//!
//! let a = AsmDec::new();
//! assert_eq!(a.add(0xFFFF_FFFFu32, 1, "dd").unwrap(), 0);
//! assert_eq!(a.dec(0, "d").unwrap(), 0xFFFF_FFFF);
//! assert_eq!(a.rol(0x8000_0000u32, 1, "dd").unwrap(), 1);
//! ```
//!
//! ## Size designators
//!
//! | letter | width | reads | registers |
//! |---|---|---|---|
//! | `l` | 8 | bits 0–7 | `al`, `bl`, `cl`, `dl` |
//! | `h` | 8 | bits 8–15 | `ah`, `bh`, `ch`, `dh` |
//! | `w` | 16 | bits 0–15 | `ax` |
//! | `d` | 32 | bits 0–31 | `eax`, `r8d` |
//! | `q` | 64 | bits 0–63 | `rax`, `r8` |
//!
//! The first letter describes operand 1 and the destination, the second
//! letter operand 2: `"ld"` is `op al, edx`. The usual default is `"dd"`.
//!
//! `h` only reads. To emulate a write to a high-byte register, move the value
//! into place with [`high_byte`] and combine it with the full register:
//!
//! ```rust
//! use asmdec::{high_byte, AsmDec};
//!
//! let a = AsmDec::new();
//! // add ah, 0x22 with eax = 0xAABBCCDD
//! assert_eq!(a.add(0xAABB_CCDDu32, high_byte(0x22), "dd").unwrap(), 0xAABB_EEDD);
//! ```
//!
//! ## Features
//!
//! - **`no_std` + `alloc`**: `std` (default) only adds `std::error::Error`.
//! - **`serde`**: `Serialize`/`Deserialize` for sizes, mnemonics and the
//!   evaluator configuration; [`Operand`] and [`AsmDecError`] only serialize.
//! - Operations are logged at `trace` level through the [`log`] facade.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// Width conversion is the point of this crate: narrowing casts between
// integer widths and dense hex literals are expected here.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::doc_markdown,
    clippy::missing_errors_doc
)]

extern crate alloc;

/// Error type.
pub mod error;
/// The `AsmDec` evaluator.
pub mod evaluator;
/// Operands and integer literal parsing.
pub mod operand;
/// Mnemonics, shift-count policies and the masked operators.
pub mod ops;
/// Size designators and register widths.
pub mod size;

// Re-exports
pub use error::AsmDecError;
pub use evaluator::AsmDec;
pub use operand::{parse_literal, Operand};
pub use ops::{Mnemonic, ShiftCount};
pub use size::{IntoSizeSpec, ReadMode, SizeSpec, Slot, Width};

/// Move the low byte of `value` into bits 8–15: `(value & 0xFF) << 8`.
///
/// # Examples
///
/// ```rust
/// use asmdec::{format, high_byte, Slot};
///
/// assert_eq!(high_byte(0x22), 0x2200);
/// assert_eq!(high_byte(0x1234), 0x3400);
/// assert_eq!(format(high_byte(0xAB), Slot::High), 0xAB);
/// ```
#[must_use]
pub const fn high_byte(value: u64) -> u64 {
    (value & 0xFF) << 8
}

/// Read the sub-field `slot` selects from `value`, without any arithmetic.
///
/// `l` gives the low byte, `h` bits 8–15, `w`, `d` and `q` the low 16, 32
/// and 64 bits.
///
/// # Examples
///
/// ```rust
/// use asmdec::{format, Slot};
///
/// assert_eq!(format(0xAABB_CCDD, Slot::High), 0xCC);
/// assert_eq!(format(0xAABB_CCDD, Slot::Low), 0xDD);
/// assert_eq!(format(0x1_AABB_CCDD, Slot::Dword), 0xAABB_CCDD);
/// ```
#[must_use]
pub const fn format(value: u64, slot: Slot) -> u64 {
    slot.read(value)
}
