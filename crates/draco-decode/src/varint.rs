//! LEB128 varint decoding.

/// Read an unsigned varint from the start of `data`.
///
/// Returns the value and the number of bytes consumed, or `None` if the
/// input ends mid-value or the value does not fit in `max_bytes` bytes.
#[must_use]
pub fn read_varint(data: &[u8], max_bytes: usize) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in data.iter().take(max_bytes).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

/// Append `value` as an unsigned varint.
#[cfg(any(test, feature = "test-tools"))]
pub(crate) fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}
