//! CRC-16/ARC as used by the PowerStream framing: polynomial 0x8005
//! reflected (0xA001), initial value 0, no final XOR, processed low byte
//! first through a 256-entry table built at compile time.

/// Reflected polynomial driving the table.
pub const POLY_REFLECTED: u16 = 0xA001;

/// Precomputed lookup table.
pub static CRC16_TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLY_REFLECTED
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute the CRC over `data` starting from 0.
pub fn crc16(data: &[u8]) -> u16 {
    update(0, data)
}

/// Continue a running CRC with more bytes. Lets the codec checksum the header
/// and the encoded payload without concatenating them first.
pub fn update(mut crc: u16, data: &[u8]) -> u16 {
    for &byte in data {
        crc = CRC16_TABLE[((crc ^ byte as u16) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
