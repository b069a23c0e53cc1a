#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // "<mnemonic> <op1> <op2> <size>": must never panic, only return Ok/Err.
    let mut parts = data.split_whitespace();
    let (Some(mnemonic), Some(op1)) = (parts.next(), parts.next()) else {
        return;
    };
    let op1 = asmdec::Operand::from(op1);
    let op2 = parts.next().map(asmdec::Operand::from);
    let size = parts.next();

    let a = asmdec::AsmDec::new();
    if let Ok(r) = a.eval(mnemonic, op1, op2, size) {
        let designator = size.unwrap_or("dd");
        let width = designator
            .parse::<asmdec::SizeSpec>()
            .map(|s| s.destination().mask())
            .unwrap_or(u64::MAX);
        assert_eq!(r, r & width);
    }

    // Every shift-count policy must stay panic-free.
    for policy in [
        asmdec::ShiftCount::Modulo,
        asmdec::ShiftCount::Unbounded,
    ] {
        let mut a = asmdec::AsmDec::new();
        a.shift_count(policy);
        let _ = a.eval(mnemonic, op1, op2, size);
    }
});
