//! Width codec: fixed little-endian unsigned reads at a cursor, parameterized
//! by a per-document width in {1, 2, 4} bytes.
//!
//! A width of 0 means "this table is absent" and must never be passed to
//! [`read_uint`] — callers check for that case before reading.

use byteorder::{ByteOrder, LittleEndian};

/// Maps a 2-bit `sizeMode` field (0..=3) to the byte width it selects.
pub fn size_code_to_width(code: u8) -> u32 {
    match code & 0b11 {
        0 => 0,
        1 => 1,
        2 => 2,
        3 => 4,
        _ => unreachable!(),
    }
}

/// Reads an unsigned integer of `width` bytes (1, 2, or 4) at `pos`, little-endian.
///
/// # Panics
///
/// Panics if `width` is not one of 1, 2, 4, or if `pos + width` exceeds
/// `buf.len()`. Callers are responsible for proving the read is in range
/// before calling; this function does not do bounds checking of its own
/// because every call site in this crate derives `pos` from an already
/// length-validated table range.
pub fn read_uint(buf: &[u8], pos: usize, width: u32) -> u32 {
    match width {
        1 => buf[pos] as u32,
        2 => LittleEndian::read_u16(&buf[pos..pos + 2]) as u32,
        4 => LittleEndian::read_u32(&buf[pos..pos + 4]),
        w => panic!("invalid field width {w}"),
    }
}

/// Reads a two's-complement signed integer of `width` bytes (1, 2, or 4) at
/// `pos`, sign-extended to `i32`.
pub fn read_signed(buf: &[u8], pos: usize, width: u32) -> i32 {
    match width {
        1 => buf[pos] as i8 as i32,
        2 => LittleEndian::read_i16(&buf[pos..pos + 2]) as i32,
        4 => LittleEndian::read_i32(&buf[pos..pos + 4]),
        w => panic!("invalid field width {w}"),
    }
}

/// Reads a 4-byte IEEE-754 single-precision float at `pos`.
pub fn read_f32(buf: &[u8], pos: usize) -> f32 {
    LittleEndian::read_f32(&buf[pos..pos + 4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_codes() {
        assert_eq!(size_code_to_width(0), 0);
        assert_eq!(size_code_to_width(1), 1);
        assert_eq!(size_code_to_width(2), 2);
        assert_eq!(size_code_to_width(3), 4);
    }

    #[test]
    fn reads_little_endian() {
        let buf = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(read_uint(&buf, 0, 1), 0x01);
        assert_eq!(read_uint(&buf, 0, 2), 0x0201);
        assert_eq!(read_uint(&buf, 0, 4), 0x04030201);
    }

    #[test]
    fn sign_extends() {
        let buf = [0xff_u8];
        assert_eq!(read_signed(&buf, 0, 1), -1);
        let buf = [0xff_u8, 0xff];
        assert_eq!(read_signed(&buf, 0, 2), -1);
        let buf = [0xff_u8, 0xff, 0xff, 0xff];
        assert_eq!(read_signed(&buf, 0, 4), -1);
    }
}
