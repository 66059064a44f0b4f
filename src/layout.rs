//! Header and table-layout resolution.
//!
//! A MapleCode payload begins with a 1-byte `sizeMode` packing four 2-bit
//! width selectors, followed by the four table lengths (STR, TYPE, NODE,
//! DATA) each encoded at its own width. This module turns that header into
//! the four absolute, non-overlapping table ranges within the payload body.

use crate::error::{Error, Result};
use crate::width;

/// The four per-document field widths, each in {0, 1, 2, 4}.
#[derive(Debug, Clone, Copy)]
pub struct Widths {
    pub str_width: u32,
    pub type_width: u32,
    pub node_width: u32,
    pub data_width: u32,
}

/// A half-open `[start, end)` range within the payload body (i.e. measured
/// from the first byte after the header).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRange {
    pub start: usize,
    pub end: usize,
}

impl TableRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The four table ranges, in their fixed order.
#[derive(Debug, Clone, Copy)]
pub struct TableRanges {
    pub str_range: TableRange,
    pub type_range: TableRange,
    pub node_range: TableRange,
    pub data_range: TableRange,
}

/// Result of decoding the header: the widths, the table ranges (relative to
/// the body, i.e. excluding the header itself), and the header's own byte
/// length `H = 1 + strWidth + typeWidth + nodeWidth + dataWidth`.
pub struct Header {
    pub widths: Widths,
    pub ranges: TableRanges,
    pub header_len: usize,
}

/// Reads the header and derives table ranges, then checks that `bytes`
/// actually contains the whole declared body. Does not look past the
/// header/table-length fields; string/type/node content is validated by
/// their respective decoders.
pub fn read_header(bytes: &[u8]) -> Result<Header> {
    if bytes.is_empty() {
        return Err(Error::TruncatedPayload);
    }
    let size_mode = bytes[0];
    let str_width = width::size_code_to_width(size_mode);
    let type_width = width::size_code_to_width(size_mode >> 2);
    let node_width = width::size_code_to_width(size_mode >> 4);
    let data_width = width::size_code_to_width(size_mode >> 6);

    let header_len = 1 + str_width as usize + type_width as usize + node_width as usize + data_width as usize;
    if bytes.len() < header_len {
        return Err(Error::TruncatedPayload);
    }

    let mut pos = 1usize;
    let mut read_len = |w: u32| -> usize {
        if w == 0 {
            return 0;
        }
        let v = width::read_uint(bytes, pos, w) as usize;
        pos += w as usize;
        v
    };
    let str_len = read_len(str_width);
    let type_len = read_len(type_width);
    let node_len = read_len(node_width);
    let data_len = read_len(data_width);

    let str_range = TableRange { start: 0, end: str_len };
    let type_range = TableRange {
        start: str_range.end,
        end: str_range.end + type_len,
    };
    let node_range = TableRange {
        start: type_range.end,
        end: type_range.end + node_len,
    };
    let data_range = TableRange {
        start: node_range.end,
        end: node_range.end + data_len,
    };

    let total_len = header_len + data_range.end;
    if bytes.len() < total_len {
        return Err(Error::TruncatedPayload);
    }

    log::trace!(
        "maplecode header: widths=({},{},{},{}) ranges=str{:?} type{:?} node{:?} data{:?}",
        str_width,
        type_width,
        node_width,
        data_width,
        str_range,
        type_range,
        node_range,
        data_range
    );

    Ok(Header {
        widths: Widths {
            str_width,
            type_width,
            node_width,
            data_width,
        },
        ranges: TableRanges {
            str_range,
            type_range,
            node_range,
            data_range,
        },
        header_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_header_fails() {
        assert_eq!(read_header(&[]), Err(Error::TruncatedPayload));
        // sizeMode claims strWidth=1 but no byte follows for the length field.
        assert_eq!(read_header(&[0x01]), Err(Error::TruncatedPayload));
    }

    #[test]
    fn zero_width_table_is_absent() {
        // All four widths zero: sizeMode = 0, header is 1 byte, all tables empty.
        let bytes = [0x00];
        let h = read_header(&bytes).unwrap();
        assert_eq!(h.widths.str_width, 0);
        assert_eq!(h.ranges.str_range.len(), 0);
        assert_eq!(h.ranges.data_range.len(), 0);
        assert_eq!(h.header_len, 1);
    }

    #[test]
    fn truncated_body_fails() {
        // sizeMode selects strWidth=1 (code 1), rest 0; declares STR len = 5
        // but body omitted entirely.
        let bytes = [0x01, 0x05];
        assert_eq!(read_header(&bytes), Err(Error::TruncatedPayload));
    }
}
