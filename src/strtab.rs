//! String table decoding: the STR table is a run of `dataWidth`-sized
//! offsets into the DATA region, each pointing at a NUL-terminated byte
//! string.

use crate::error::{Error, Result};
use crate::layout::TableRange;
use crate::width;

/// Decodes the STR table into an ordered list of strings, in encounter
/// order (the order is also each string's table index).
///
/// `body` is the payload body (everything after the header). `str_range`
/// and `data_range` are both relative to `body`.
///
/// Bytes are preserved verbatim — UTF-8 is not validated here, so the
/// result is `Vec<Vec<u8>>` rather than `Vec<String>`; `Document` exposes
/// these as `&[u8]` and leaves UTF-8 interpretation to the caller.
pub fn decode(body: &[u8], str_range: TableRange, data_range: TableRange, data_width: u32) -> Result<Vec<Vec<u8>>> {
    let mut strings = Vec::new();
    let mut pos = str_range.start;
    while pos < str_range.end {
        let offset = width::read_uint(body, pos, data_width) as usize;
        pos += data_width as usize;

        let start = data_range.start + offset;
        if start > data_range.end {
            return Err(Error::InvalidString);
        }
        let window = &body[start..data_range.end];
        let zero_pos = window.iter().position(|&b| b == 0).ok_or(Error::InvalidString)?;
        strings.push(window[..zero_pos].to_vec());
    }
    Ok(strings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nul_terminated_strings() {
        // DATA region: "x\0y\0"
        let data = b"x\0y\0";
        // STR region: two 1-byte offsets, 0 and 2.
        let str_table = [0u8, 2u8];
        let mut body = str_table.to_vec();
        body.extend_from_slice(data);
        let str_range = TableRange { start: 0, end: 2 };
        let data_range = TableRange { start: 2, end: 6 };
        let strings = decode(&body, str_range, data_range, 1).unwrap();
        assert_eq!(strings, vec![b"x".to_vec(), b"y".to_vec()]);
    }

    #[test]
    fn unterminated_string_fails() {
        let data = b"xyz";
        let str_table = [0u8];
        let mut body = str_table.to_vec();
        body.extend_from_slice(data);
        let str_range = TableRange { start: 0, end: 1 };
        let data_range = TableRange { start: 1, end: 4 };
        assert_eq!(decode(&body, str_range, data_range, 1), Err(Error::InvalidString));
    }
}
