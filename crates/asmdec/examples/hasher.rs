//! Port of a small string hasher lifted from a disassembly.
//!
//! The routine keeps a 4-byte accumulator in memory and, for every input
//! byte, loads one accumulator byte into `al`, xors it with the input byte,
//! decrements `al` and stores it back.
//!
//! Run with: `cargo run --example hasher -- McTray.exe`

use asmdec::{AsmDec, AsmDecError};

fn hasher(a: &AsmDec, input: &str) -> Result<u32, AsmDecError> {
    let mut init = 0x8765_4321u32.to_le_bytes();
    for count in 0..3usize {
        for (cc, byte) in input.bytes().enumerate() {
            // and (cc + count), 3
            let index = a.and(a.add(cc, count, "dd")?, 3, "dd")? as usize;
            // xor al, byte; dec al
            let temp = a.dec(a.xor(init[index], byte, "ld")?, "l")?;
            init[index] = temp as u8;
        }
    }
    Ok(u32::from_le_bytes(init))
}

fn main() -> Result<(), AsmDecError> {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("McTray.exe"));

    let a = AsmDec::new();
    let hash = hasher(&a, &input)?;
    println!("hash({:?}) = 0x{:08x}", input, hash);

    // Writing to ah: add ah, 0x22 on eax = 0xAABBCCDD.
    let eax = a.add(0xAABB_CCDDu32, a.high_byte(0x22)?, "dd")?;
    println!("eax after add ah, 0x22 = 0x{:08X}", eax);
    println!("ah = 0x{:02X}", a.format(eax, "h")?);
    Ok(())
}
