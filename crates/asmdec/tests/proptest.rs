#![cfg(not(target_arch = "wasm32"))]
//! Property-based tests using proptest.
//!
//! These tests check the masking laws across randomly generated operands,
//! designators and mnemonics.

use asmdec::{format, high_byte, AsmDec, Mnemonic, Operand, ShiftCount, SizeSpec, Slot, Width};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn arb_slot() -> impl Strategy<Value = Slot> {
    prop::sample::select(vec![
        Slot::Low,
        Slot::High,
        Slot::Word,
        Slot::Dword,
        Slot::Qword,
    ])
}

fn arb_size() -> impl Strategy<Value = SizeSpec> {
    (arb_slot(), arb_slot()).prop_map(|(first, second)| SizeSpec::new(first, second))
}

fn arb_mnemonic() -> impl Strategy<Value = Mnemonic> {
    prop::sample::select(Mnemonic::ALL.to_vec())
}

fn arb_policy() -> impl Strategy<Value = ShiftCount> {
    prop::sample::select(vec![
        ShiftCount::Hardware,
        ShiftCount::Modulo,
        ShiftCount::Unbounded,
    ])
}

fn arb_width() -> impl Strategy<Value = Width> {
    prop::sample::select(vec![Width::Byte, Width::Word, Width::Dword, Width::Qword])
}

// ── Read accessors ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn format_dword_is_low_32(x in any::<u64>()) {
        prop_assert_eq!(format(x, Slot::Dword), x & 0xFFFF_FFFF);
        prop_assert_eq!(AsmDec::new().format(x, "d").unwrap(), x & 0xFFFF_FFFF);
    }

    #[test]
    fn format_bytes(x in any::<u64>()) {
        let a = AsmDec::new();
        prop_assert_eq!(a.format(x, "h").unwrap(), (x >> 8) & 0xFF);
        prop_assert_eq!(a.format(x, "l").unwrap(), x & 0xFF);
        prop_assert_eq!(a.format(x, "w").unwrap(), x & 0xFFFF);
        prop_assert_eq!(a.format(x, "q").unwrap(), x);
    }

    #[test]
    fn high_byte_law(x in any::<u64>()) {
        prop_assert_eq!(high_byte(x), (x & 0xFF) << 8);
        prop_assert_eq!(format(high_byte(x), Slot::High), x & 0xFF);
        prop_assert_eq!(format(high_byte(x), Slot::Low), 0);
    }

    #[test]
    fn high_byte_add_only_touches_bits_8_to_15(reg in any::<u32>(), b in any::<u8>()) {
        let a = AsmDec::new();
        let r = a.add(reg, high_byte(u64::from(b)), "dd").unwrap();
        let reg = u64::from(reg);
        prop_assert_eq!(r & 0xFF, reg & 0xFF);
        prop_assert_eq!(format(r, Slot::High), (format(reg, Slot::High) + u64::from(b)) & 0xFF);
    }
}

// ── Masking laws ────────────────────────────────────────────────────────

proptest! {
    /// Every result fits the destination width.
    #[test]
    fn result_fits_destination(
        m in arb_mnemonic(),
        x in any::<i128>(),
        y in any::<i128>(),
        size in arb_size(),
        policy in arb_policy(),
    ) {
        let mut a = AsmDec::new();
        a.shift_count(policy);
        let r = a.apply(m, Operand::Integer(x), Some(Operand::Integer(y)), size).unwrap();
        prop_assert_eq!(r, r & size.destination().mask());
    }

    /// Operands are read through their own slot before the operation.
    #[test]
    fn operands_are_read_through_their_slot(
        m in arb_mnemonic(),
        x in any::<u64>(),
        y in any::<u64>(),
        size in arb_size(),
    ) {
        let a = AsmDec::new();
        let r = a.apply(m, x.into(), Some(y.into()), size).unwrap();
        let expected = m.apply(
            size.first.read(x),
            size.second.read(y),
            size.destination(),
            ShiftCount::Hardware,
        );
        prop_assert_eq!(r, expected);
    }

    /// Numeric strings evaluate exactly like the integers they spell.
    #[test]
    fn strings_match_integers(
        m in arb_mnemonic(),
        x in any::<u64>(),
        y in any::<u64>(),
        size in arb_size(),
    ) {
        let a = AsmDec::new();
        let hex = format!("{:#x}", x);
        let dec = y.to_string();
        let designator = size.to_string();
        let from_strings = a
            .eval(m.name(), hex.as_str().into(), Some(dec.as_str().into()), Some(designator.as_str()))
            .unwrap();
        let from_ints = a.apply(m, x.into(), Some(y.into()), size).unwrap();
        prop_assert_eq!(from_strings, from_ints);
    }

    /// add/sub agree with arithmetic modulo 2^width.
    #[test]
    fn add_sub_are_modular(x in any::<u64>(), y in any::<u64>(), w in arb_width()) {
        let m = u128::from(w.mask()) + 1;
        let xw = u128::from(x & w.mask());
        let yw = u128::from(y & w.mask());
        prop_assert_eq!(
            u128::from(Mnemonic::Add.apply(x & w.mask(), y & w.mask(), w, ShiftCount::Hardware)),
            (xw + yw) % m
        );
        prop_assert_eq!(
            u128::from(Mnemonic::Sub.apply(x & w.mask(), y & w.mask(), w, ShiftCount::Hardware)),
            (xw + m - yw) % m
        );
    }

    #[test]
    fn not_is_involution(x in any::<u64>(), w in arb_width()) {
        let once = Mnemonic::Not.apply(x, 0, w, ShiftCount::Hardware);
        prop_assert_eq!(Mnemonic::Not.apply(once, 0, w, ShiftCount::Hardware), x & w.mask());
    }

    #[test]
    fn neg_plus_self_is_zero(x in any::<u64>(), w in arb_width()) {
        let n = Mnemonic::Neg.apply(x, 0, w, ShiftCount::Hardware);
        prop_assert_eq!(Mnemonic::Add.apply(x, n, w, ShiftCount::Hardware), 0);
    }

    #[test]
    fn inc_then_dec_is_identity(x in any::<u64>(), w in arb_width()) {
        let up = Mnemonic::Inc.apply(x, 0, w, ShiftCount::Hardware);
        prop_assert_eq!(Mnemonic::Dec.apply(up, 0, w, ShiftCount::Hardware), x & w.mask());
    }
}

// ── Shifts and rotates ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn rotate_inverse(x in any::<u64>(), n in 0u64..256, w in arb_width(), policy in arb_policy()) {
        let x = x & w.mask();
        let l = Mnemonic::Rol.apply(x, n, w, policy);
        prop_assert_eq!(Mnemonic::Ror.apply(l, n, w, policy), x);
    }

    #[test]
    fn rotate_preserves_popcount(x in any::<u64>(), n in any::<u64>(), w in arb_width()) {
        let x = x & w.mask();
        let r = Mnemonic::Rol.apply(x, n, w, ShiftCount::Hardware);
        prop_assert_eq!(r.count_ones(), x.count_ones());
    }

    #[test]
    fn rotate_by_width_is_identity(x in any::<u64>(), w in arb_width()) {
        let x = x & w.mask();
        let bits = u64::from(w.bits());
        prop_assert_eq!(Mnemonic::Rol.apply(x, bits, w, ShiftCount::Modulo), x);
        prop_assert_eq!(Mnemonic::Ror.apply(x, bits, w, ShiftCount::Unbounded), x);
    }

    #[test]
    fn shr_never_sign_extends(x in any::<u64>(), n in 1u64..64) {
        let r = Mnemonic::Shr.apply(x, n, Width::Qword, ShiftCount::Hardware);
        prop_assert_eq!(r, x >> n);
        prop_assert!(r.leading_zeros() as u64 >= n);
    }

    #[test]
    fn shl_in_range_matches_native(x in any::<u32>(), n in 0u64..32) {
        let r = Mnemonic::Shl.apply(u64::from(x), n, Width::Dword, ShiftCount::Hardware);
        prop_assert_eq!(r, u64::from(x.wrapping_shl(n as u32)));
    }

    #[test]
    fn hardware_counts_fit_five_or_six_bits(n in any::<u64>(), w in arb_width()) {
        let c = ShiftCount::Hardware.effective(n, w);
        let limit = if w == Width::Qword { 64 } else { 32 };
        prop_assert!(c < limit);
    }
}

// ── Parsing robustness ──────────────────────────────────────────────────

proptest! {
    /// Arbitrary designators never panic: they parse or report InvalidSize.
    #[test]
    fn size_parse_never_panics(s in "\\PC{0,4}") {
        let _ = s.parse::<SizeSpec>();
    }

    /// Arbitrary literals never panic.
    #[test]
    fn literal_parse_never_panics(s in "\\PC{0,40}") {
        let _ = asmdec::parse_literal(&s);
    }

    #[test]
    fn decimal_literal_round_trip(x in any::<u64>()) {
        prop_assert_eq!(asmdec::parse_literal(&x.to_string()).unwrap(), x);
        prop_assert_eq!(asmdec::parse_literal(&format!("0{:X}h", x)).unwrap(), x);
        prop_assert_eq!(asmdec::parse_literal(&format!("0b{:b}", x)).unwrap(), x);
    }

    #[test]
    fn negative_literal_matches_wrapping_neg(x in any::<u64>()) {
        prop_assert_eq!(asmdec::parse_literal(&format!("-{}", x)).unwrap(), x.wrapping_neg());
    }
}
