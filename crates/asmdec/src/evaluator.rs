//! The public evaluator.

use alloc::string::String;

use crate::error::AsmDecError;
use crate::operand::Operand;
use crate::ops::{Mnemonic, ShiftCount};
use crate::size::{IntoSizeSpec, SizeSpec, Slot};

/// Register-width arithmetic evaluator.
///
/// Operands are anything convertible into an [`Operand`]: integers, `char`s,
/// numeric strings such as `"0x41"`, or byte strings. Sizes are one- or
/// two-letter designators (`"dd"`, `"ld"`, `"q"`), a parsed [`SizeSpec`] or
/// `None` for the configured default (see [`IntoSizeSpec`]); the result is
/// truncated to the width of the first letter.
///
/// The evaluator holds only configuration, so one instance can be shared
/// freely between threads.
///
/// # Examples
///
/// ```rust
/// use asmdec::AsmDec;
///
/// let a = AsmDec::new();
/// // add ah, 0x22 on eax = 0xAABBCCDD
/// let eax = a.add(0xAABB_CCDDu32, a.high_byte(0x22)?, None::<&str>)?;
/// assert_eq!(eax, 0xAABB_EEDD);
/// // dec al after xor al, dl
/// assert_eq!(a.dec(a.xor(0x21, 'M', "ld")?, "l")?, 0x6B);
/// # Ok::<(), asmdec::AsmDecError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsmDec {
    shift_count: ShiftCount,
    /// Designator used by [`AsmDec::eval`] when none is given.
    default_size: SizeSpec,
}

impl AsmDec {
    /// Create an evaluator with hardware shift-count masking and `dd` as the
    /// default size.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            shift_count: ShiftCount::Hardware,
            default_size: SizeSpec::DEFAULT,
        }
    }

    /// Choose how shift and rotate counts are reduced.
    ///
    /// See [`ShiftCount`] for the policies and their defaults.
    pub fn shift_count(&mut self, policy: ShiftCount) -> &mut Self {
        self.shift_count = policy;
        self
    }

    /// Set the designator used when an operation is given no size.
    pub fn default_size(&mut self, size: SizeSpec) -> &mut Self {
        self.default_size = size;
        self
    }

    /// Dispatch a parsed mnemonic on a parsed size.
    ///
    /// `op2` is ignored by unary mnemonics.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::Parse`] for an invalid operand literal and
    /// [`AsmDecError::MissingOperand`] when a binary mnemonic has no `op2`.
    pub fn apply(
        &self,
        mnemonic: Mnemonic,
        op1: Operand<'_>,
        op2: Option<Operand<'_>>,
        size: SizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.compute(mnemonic, op1, op2, size).map_err(rejected)
    }

    fn compute(
        &self,
        mnemonic: Mnemonic,
        op1: Operand<'_>,
        op2: Option<Operand<'_>>,
        size: SizeSpec,
    ) -> Result<u64, AsmDecError> {
        let dst = op1.resolve(size.first)?;
        let result = if mnemonic.is_unary() {
            let result = mnemonic.apply(dst, 0, size.destination(), self.shift_count);
            log::trace!("{} {:#x} [{}] = {:#x}", mnemonic, dst, size, result);
            result
        } else {
            let src = op2
                .ok_or_else(|| AsmDecError::MissingOperand {
                    mnemonic: String::from(mnemonic.name()),
                })?
                .resolve(size.second)?;
            let result = mnemonic.apply(dst, src, size.destination(), self.shift_count);
            log::trace!(
                "{} {:#x}, {:#x} [{}] = {:#x}",
                mnemonic,
                dst,
                src,
                size,
                result
            );
            result
        };
        Ok(result)
    }

    /// Dispatch by mnemonic name (`"add"`, `"ROL"`, ...). Both operands are
    /// already [`Operand`]s, as in [`AsmDec::apply`].
    ///
    /// `size` of `None` uses the configured default (`dd` unless changed with
    /// [`AsmDec::default_size`]).
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::UnsupportedOperation`] for an unknown mnemonic,
    /// [`AsmDecError::InvalidSize`] for a bad designator, and the errors of
    /// [`AsmDec::apply`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use asmdec::AsmDec;
    ///
    /// let a = AsmDec::new();
    /// assert_eq!(a.eval("add", "5".into(), Some("3".into()), None).unwrap(), 8);
    /// assert_eq!(a.eval("NOT", 0.into(), None, Some("w")).unwrap(), 0xFFFF);
    /// assert!(a.eval("imul", 1.into(), Some(2.into()), None).is_err());
    /// ```
    pub fn eval(
        &self,
        mnemonic: &str,
        op1: Operand<'_>,
        op2: Option<Operand<'_>>,
        size: Option<&str>,
    ) -> Result<u64, AsmDecError> {
        let mnemonic: Mnemonic = mnemonic.parse().map_err(rejected)?;
        let size = self.size(size)?;
        self.apply(mnemonic, op1, op2, size)
    }

    fn size(&self, size: impl IntoSizeSpec) -> Result<SizeSpec, AsmDecError> {
        size.into_size_spec(self.default_size).map_err(rejected)
    }

    fn binary(
        &self,
        mnemonic: Mnemonic,
        op1: Operand<'_>,
        op2: Operand<'_>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        let size = self.size(size)?;
        self.apply(mnemonic, op1, Some(op2), size)
    }

    fn unary(
        &self,
        mnemonic: Mnemonic,
        op1: Operand<'_>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        let size = self.size(size)?;
        self.apply(mnemonic, op1, None, size)
    }

    /// `add dst, src`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn add<'a, 'b>(
        &self,
        op1: impl Into<Operand<'a>>,
        op2: impl Into<Operand<'b>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.binary(Mnemonic::Add, op1.into(), op2.into(), size)
    }

    /// `sub dst, src`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn sub<'a, 'b>(
        &self,
        op1: impl Into<Operand<'a>>,
        op2: impl Into<Operand<'b>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.binary(Mnemonic::Sub, op1.into(), op2.into(), size)
    }

    /// `and dst, src`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn and<'a, 'b>(
        &self,
        op1: impl Into<Operand<'a>>,
        op2: impl Into<Operand<'b>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.binary(Mnemonic::And, op1.into(), op2.into(), size)
    }

    /// `or dst, src`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn or<'a, 'b>(
        &self,
        op1: impl Into<Operand<'a>>,
        op2: impl Into<Operand<'b>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.binary(Mnemonic::Or, op1.into(), op2.into(), size)
    }

    /// `xor dst, src`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn xor<'a, 'b>(
        &self,
        op1: impl Into<Operand<'a>>,
        op2: impl Into<Operand<'b>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.binary(Mnemonic::Xor, op1.into(), op2.into(), size)
    }

    /// `shl dst, count`. The count is reduced per [`ShiftCount`].
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn shl<'a, 'b>(
        &self,
        op1: impl Into<Operand<'a>>,
        op2: impl Into<Operand<'b>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.binary(Mnemonic::Shl, op1.into(), op2.into(), size)
    }

    /// `shr dst, count`, zero-filling.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn shr<'a, 'b>(
        &self,
        op1: impl Into<Operand<'a>>,
        op2: impl Into<Operand<'b>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.binary(Mnemonic::Shr, op1.into(), op2.into(), size)
    }

    /// `rol dst, count` within the destination width.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn rol<'a, 'b>(
        &self,
        op1: impl Into<Operand<'a>>,
        op2: impl Into<Operand<'b>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.binary(Mnemonic::Rol, op1.into(), op2.into(), size)
    }

    /// `ror dst, count` within the destination width.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn ror<'a, 'b>(
        &self,
        op1: impl Into<Operand<'a>>,
        op2: impl Into<Operand<'b>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.binary(Mnemonic::Ror, op1.into(), op2.into(), size)
    }

    /// `inc dst`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn inc<'a>(
        &self,
        op1: impl Into<Operand<'a>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.unary(Mnemonic::Inc, op1.into(), size)
    }

    /// `dec dst`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn dec<'a>(
        &self,
        op1: impl Into<Operand<'a>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.unary(Mnemonic::Dec, op1.into(), size)
    }

    /// `not dst`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn not<'a>(
        &self,
        op1: impl Into<Operand<'a>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.unary(Mnemonic::Not, op1.into(), size)
    }

    /// `neg dst`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn neg<'a>(
        &self,
        op1: impl Into<Operand<'a>>,
        size: impl IntoSizeSpec,
    ) -> Result<u64, AsmDecError> {
        self.unary(Mnemonic::Neg, op1.into(), size)
    }

    /// Move the low byte of `value` into bits 8–15, ready to be added or
    /// or-ed into a full register to emulate a write to `ah`/`bh`/`ch`/`dh`.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::Parse`] for an invalid literal.
    pub fn high_byte<'a>(&self, value: impl Into<Operand<'a>>) -> Result<u64, AsmDecError> {
        let value = value.into().value().map_err(rejected)?;
        Ok(crate::high_byte(value))
    }

    /// Read the sub-field the first letter of `mode` selects, without any
    /// arithmetic. Letters after the first are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AsmDecError::InvalidSize`] or [`AsmDecError::Parse`].
    pub fn format<'a>(
        &self,
        value: impl Into<Operand<'a>>,
        mode: &str,
    ) -> Result<u64, AsmDecError> {
        let slot = Slot::from_designator(mode).map_err(rejected)?;
        let value = value.into().value().map_err(rejected)?;
        Ok(crate::format(value, slot))
    }
}

fn rejected(err: AsmDecError) -> AsmDecError {
    log::debug!("rejected: {}", err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_matches_default() {
        assert_eq!(AsmDec::new(), AsmDec::default());
    }

    #[test]
    fn builder_sets_policy() {
        let mut a = AsmDec::new();
        assert_eq!(a.shl(1, 33, "dd").unwrap(), 2);
        a.shift_count(ShiftCount::Unbounded);
        assert_eq!(a.shl(1, 33, "dd").unwrap(), 0);
    }

    #[test]
    fn builder_sets_default_size() {
        let mut a = AsmDec::new();
        a.default_size(SizeSpec::uniform(Slot::Low));
        assert_eq!(a.eval("add", 0xFF.into(), Some(1.into()), None).unwrap(), 0);
        assert_eq!(a.eval("add", 0xFF.into(), Some(1.into()), Some("dd")).unwrap(), 0x100);
    }

    #[test]
    fn apply_missing_operand() {
        let a = AsmDec::new();
        let err = a
            .apply(Mnemonic::Xor, Operand::Integer(1), None, SizeSpec::DEFAULT)
            .unwrap_err();
        assert_eq!(
            err,
            AsmDecError::MissingOperand {
                mnemonic: "xor".into()
            }
        );
    }

    #[test]
    fn apply_unary_ignores_second_operand() {
        let a = AsmDec::new();
        let r = a
            .apply(
                Mnemonic::Inc,
                Operand::Integer(1),
                Some(Operand::Numeric("not a number")),
                SizeSpec::DEFAULT,
            )
            .unwrap();
        assert_eq!(r, 2);
    }

    #[test]
    fn high_slot_destination_truncates() {
        let a = AsmDec::new();
        // ah (0xCC) + 1, written back as a byte.
        assert_eq!(a.add(0xAABB_CCDDu32, 1, "hd").unwrap(), 0xCD);
        assert_eq!(a.add(0xAABB_FFDDu32, 1, "hd").unwrap(), 0x00);
    }

    #[test]
    fn second_slot_reads_independently() {
        let a = AsmDec::new();
        assert_eq!(a.add(0x10, 0x1234, "dh").unwrap(), 0x22);
        assert_eq!(a.add(0x10, 0x1234, "dl").unwrap(), 0x44);
        assert_eq!(a.add(0x10, 0x1_0000_1234u64, "dw").unwrap(), 0x1244);
    }

    #[test]
    fn format_uses_first_letter() {
        let a = AsmDec::new();
        assert_eq!(a.format(0xAABB_CCDDu32, "h").unwrap(), 0xCC);
        assert_eq!(a.format(0xAABB_CCDDu32, "ld").unwrap(), 0xDD);
        assert_eq!(a.format(0xAABB_CCDDu32, "lx").unwrap(), 0xDD);
        assert_eq!(a.format(0xAABB_CCDDu32, "hzz").unwrap(), 0xCC);
        assert!(a.format(0, "z").is_err());
        assert!(a.format(0, "").is_err());
    }

    #[test]
    fn named_operations_take_any_size_argument() {
        let mut a = AsmDec::new();
        let ah = a.high_byte(0x22).unwrap();
        assert_eq!(a.add(0xAABB_CCDDu32, ah, None::<&str>).unwrap(), 0xAABB_EEDD);
        assert_eq!(a.add(0xAABB_CCDDu32, ah, SizeSpec::DEFAULT).unwrap(), 0xAABB_EEDD);
        assert_eq!(a.inc(0xFF, Slot::Low).unwrap(), 0);
        let owned = String::from("ll");
        assert_eq!(a.add(0xFF, 1, &owned).unwrap(), 0);

        a.default_size(SizeSpec::uniform(Slot::Word));
        assert_eq!(a.add(0xFFFF, 1, None::<SizeSpec>).unwrap(), 0);
        assert_eq!(a.dec(0, None::<&str>).unwrap(), 0xFFFF);
        assert_eq!(a.add(0xFFFF, 1, Some("dd")).unwrap(), 0x1_0000);
        assert!(a.add(1, 2, Some("x")).is_err());
    }

    #[test]
    fn high_byte_parses_strings() {
        let a = AsmDec::new();
        assert_eq!(a.high_byte("0x22").unwrap(), 0x2200);
        assert_eq!(a.high_byte(0x1FF).unwrap(), 0xFF00);
        assert!(a.high_byte("zz").is_err());
    }

    #[test]
    fn eval_checks_mnemonic_before_size() {
        let a = AsmDec::new();
        let err = a.eval("mul", 1.into(), Some(2.into()), Some("x")).unwrap_err();
        assert!(matches!(err, AsmDecError::UnsupportedOperation { .. }));
    }
}
