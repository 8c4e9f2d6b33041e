//! CRC-16/CCITT integrity check.

/// Compute the CRC-16/CCITT of `data`.
///
/// Initial register 0xFFFF, polynomial 0x1021, MSB-first, no reflection and
/// no final XOR. This matches the checksum the module firmware appends to
/// every frame. An empty input yields 0xFFFF.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}
