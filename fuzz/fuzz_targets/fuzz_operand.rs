#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Raw bytes as a byte-string operand and, when UTF-8, as a literal.
    let a = asmdec::AsmDec::new();
    let _ = a.format(data, "q");
    if let Ok(text) = core::str::from_utf8(data) {
        let _ = asmdec::parse_literal(text);
        let _ = text.parse::<asmdec::SizeSpec>();
        let _ = a.high_byte(text);
    }
});
