//! `Document`: the immutable, owned, decoded form of one MapleCode payload.
//!
//! Construction (`read_from_data`) resolves the header, the string table,
//! and the type dictionary, in that order, and fails fast with a typed
//! error at the first inconsistency. Once built, a `Document` is never
//! mutated; `Node`/`Argument` views borrow it to navigate.

use crate::error::{Error, Result};
use crate::layout::{self, TableRange};
use crate::node::{Node, NodeRange};
use crate::nodetype::{NodeArgumentKind, NodeType};
use crate::strtab;
use crate::width;

/// Wire widths for U8..REFFIELD (0..=10), indexed by `NodeArgumentKind` discriminant order.
const ARG_KIND_COUNT: usize = 11;

pub use crate::layout::Widths;

/// A fully decoded MapleCode document: the payload body, the four widths,
/// the four table ranges, the resolved string table, and the resolved type
/// dictionary.
pub struct Document {
    pub(crate) body: Vec<u8>,
    pub(crate) widths: Widths,
    pub(crate) str_range: TableRange,
    pub(crate) type_range: TableRange,
    pub(crate) node_range: TableRange,
    pub(crate) data_range: TableRange,
    pub(crate) str_list: Vec<Vec<u8>>,
    pub(crate) type_list: Vec<NodeType>,
    pub(crate) arg_width: [u32; ARG_KIND_COUNT],
}

impl Document {
    /// Decodes a MapleCode payload.
    ///
    /// `external_type_list`, when present, supplies the type dictionary —
    /// the new document's inline TYPE table must then be absent (length 0).
    /// When absent, the payload must carry its own inline type dictionary
    /// unless it declares zero nodes.
    pub fn read_from_data(external_type_list: Option<&Document>, bytes: &[u8]) -> Result<Document> {
        let header = layout::read_header(bytes)?;
        let body = &bytes[header.header_len..header.header_len + header.ranges.data_range.end];

        let type_len = header.ranges.type_range.len();
        match (external_type_list, type_len) {
            (Some(_), n) if n > 0 => return Err(Error::DuplicateTypeList),
            (None, 0) if !header.ranges.node_range.is_empty() => return Err(Error::MissingTypeList),
            _ => {}
        }

        let str_list = strtab::decode(
            body,
            header.ranges.str_range,
            header.ranges.data_range,
            header.widths.data_width,
        )?;

        let arg_width = build_arg_width_table(
            header.widths.str_width,
            header.widths.node_width,
            header.widths.data_width,
        );

        let type_list = match external_type_list {
            Some(ext) => {
                if ext.widths.str_width != header.widths.str_width
                    || ext.widths.type_width != header.widths.type_width
                    || ext.widths.node_width != header.widths.node_width
                    || ext.widths.data_width != header.widths.data_width
                {
                    return Err(Error::WidthMismatch);
                }
                ext.type_list.clone()
            }
            None => decode_type_list(
                body,
                header.ranges.type_range,
                header.ranges.data_range,
                &header.widths,
                &str_list,
            )?,
        };

        log::debug!(
            "maplecode document: {} strings, {} types, node table {} bytes",
            str_list.len(),
            type_list.len(),
            header.ranges.node_range.len()
        );

        Ok(Document {
            body: body.to_vec(),
            widths: Widths {
                str_width: header.widths.str_width,
                type_width: header.widths.type_width,
                node_width: header.widths.node_width,
                data_width: header.widths.data_width,
            },
            str_range: header.ranges.str_range,
            type_range: header.ranges.type_range,
            node_range: header.ranges.node_range,
            data_range: header.ranges.data_range,
            str_list,
            type_list,
            arg_width,
        })
    }

    /// The top-level sibling sequence, spanning the whole node table.
    pub fn all_nodes(&self) -> NodeRange<'_> {
        NodeRange::new(self, 0, self.node_range.len())
    }

    pub fn string_table(&self) -> &[Vec<u8>] {
        &self.str_list
    }

    pub fn type_dictionary(&self) -> &[NodeType] {
        &self.type_list
    }

    pub(crate) fn arg_wire_width(&self, kind: NodeArgumentKind) -> u32 {
        self.arg_width[arg_kind_index(kind)]
    }

    pub(crate) fn node_range_len(&self) -> usize {
        self.node_range.len()
    }

    pub(crate) fn node_width(&self) -> u32 {
        self.widths.node_width
    }

    pub(crate) fn str_width(&self) -> u32 {
        self.widths.str_width
    }

    pub(crate) fn data_width(&self) -> u32 {
        self.widths.data_width
    }

    pub(crate) fn type_width(&self) -> u32 {
        self.widths.type_width
    }

    pub(crate) fn data_range_len(&self) -> usize {
        self.data_range.len()
    }

    pub(crate) fn data_bytes(&self, begin: usize, end: usize) -> Result<&[u8]> {
        if end < begin || end > self.data_range.len() {
            return Err(Error::InvalidNodeData);
        }
        Ok(&self.body[self.data_range.start + begin..self.data_range.start + end])
    }

    /// Reads an unsigned field at `offset` (measured from `node_range.start`), width `w`.
    pub(crate) fn read_node_uint(&self, offset: usize, w: u32) -> u32 {
        width::read_uint(&self.body, self.node_range.start + offset, w)
    }

    pub(crate) fn read_node_signed(&self, offset: usize, w: u32) -> i32 {
        width::read_signed(&self.body, self.node_range.start + offset, w)
    }

    pub(crate) fn read_node_f32(&self, offset: usize) -> f32 {
        width::read_f32(&self.body, self.node_range.start + offset)
    }

    /// Returns the `NodeType` declared by the node at `offset`, validating
    /// both that the type-index field itself lies within the node table and
    /// that the type index it contains is in range. This is the one place
    /// that guards every other node-table read against running off the end
    /// of the buffer: every other access first reaches a node's fields
    /// through a node whose extent was already proven in range.
    pub(crate) fn node_type_at(&self, offset: usize) -> Result<&NodeType> {
        if offset + self.widths.type_width as usize > self.node_range.len() {
            return Err(Error::InvalidNodeData);
        }
        // typeWidth == 0 means the inline TYPE table is absent (an external
        // dictionary was supplied); there is no encoded field to read, and
        // every node implicitly names type index 0.
        let idx = if self.widths.type_width == 0 {
            0
        } else {
            self.read_node_uint(offset, self.widths.type_width) as usize
        };
        self.type_list.get(idx).ok_or(Error::InvalidNodeType)
    }

    /// `o + totalLen` (no children) or `o + totalLen + nodeWidth + childrenLen` (with children).
    pub(crate) fn next_sibling_offset(&self, offset: usize) -> Result<usize> {
        let node_type = self.node_type_at(offset)?;
        if node_type.has_children {
            let children_len_pos = offset + node_type.total_len as usize;
            if children_len_pos + self.widths.node_width as usize > self.node_range.len() {
                return Err(Error::InvalidNodeData);
            }
            let children_len = self.read_node_uint(children_len_pos, self.widths.node_width) as usize;
            Ok(offset + node_type.total_len as usize + self.widths.node_width as usize + children_len)
        } else {
            Ok(offset + node_type.total_len as usize)
        }
    }

    /// Validates that a node's declared extent (prefix, plus children-length
    /// field if it has children) lies within the node table.
    pub(crate) fn validate_node_offset(&self, offset: usize) -> Result<()> {
        let node_type = self.node_type_at(offset)?;
        let mut node_end = offset + node_type.total_len as usize;
        if node_type.has_children {
            node_end += self.widths.node_width as usize;
        }
        if node_end <= self.node_range.len() {
            Ok(())
        } else {
            Err(Error::InvalidNodeData)
        }
    }

    /// Builds a validated `Node` view at `offset`, or fails `InvalidNodeData`
    /// if the node's declared extent would run past the node table.
    pub(crate) fn node_at(&self, offset: usize) -> Result<Node<'_>> {
        self.validate_node_offset(offset)?;
        Ok(Node::new(self, offset))
    }
}

fn arg_kind_index(kind: NodeArgumentKind) -> usize {
    match kind {
        NodeArgumentKind::U8 => 0,
        NodeArgumentKind::U16 => 1,
        NodeArgumentKind::U32 => 2,
        NodeArgumentKind::S8 => 3,
        NodeArgumentKind::S16 => 4,
        NodeArgumentKind::S32 => 5,
        NodeArgumentKind::F32 => 6,
        NodeArgumentKind::Str => 7,
        NodeArgumentKind::Dat => 8,
        NodeArgumentKind::Ref => 9,
        NodeArgumentKind::RefField => 10,
    }
}

fn build_arg_width_table(str_width: u32, node_width: u32, data_width: u32) -> [u32; ARG_KIND_COUNT] {
    let mut table = [0u32; ARG_KIND_COUNT];
    for code in 0..ARG_KIND_COUNT as u8 {
        let kind = NodeArgumentKind::from_code(code).expect("0..=10 are all valid codes");
        table[arg_kind_index(kind)] = kind.wire_width(str_width, node_width, data_width);
    }
    table
}

fn decode_type_list(
    body: &[u8],
    type_range: TableRange,
    data_range: TableRange,
    widths: &layout::Widths,
    str_list: &[Vec<u8>],
) -> Result<Vec<NodeType>> {
    let mut types = Vec::new();
    let mut pos = type_range.start;
    while pos < type_range.end {
        let name_index = width::read_uint(body, pos, widths.str_width) as usize;
        pos += widths.str_width as usize;
        if name_index >= str_list.len() {
            return Err(Error::InvalidTypeDef);
        }

        let data_offset = width::read_uint(body, pos, widths.data_width) as usize;
        pos += widths.data_width as usize;
        if data_offset >= data_range.len() {
            return Err(Error::InvalidTypeDef);
        }

        let generic_arg_count = body[pos];
        pos += 1;
        let has_children = body[pos] != 0;
        pos += 1;

        let arg_count_pos = data_range.start + data_offset;
        let arg_count = body[arg_count_pos] as usize;
        if data_offset + 1 + arg_count > data_range.len() {
            return Err(Error::InvalidTypeDef);
        }
        let kinds_start = arg_count_pos + 1;
        let mut argument_kinds = Vec::with_capacity(arg_count);
        for i in 0..arg_count {
            argument_kinds.push(NodeArgumentKind::from_code(body[kinds_start + i])?);
        }

        let total_len = NodeType::compute_total_len(
            widths.type_width,
            widths.str_width,
            widths.node_width,
            widths.data_width,
            generic_arg_count,
            &argument_kinds,
        );

        types.push(NodeType {
            name: String::from_utf8_lossy(&str_list[name_index]).into_owned(),
            generic_arg_count,
            argument_kinds,
            has_children,
            total_len,
        });
    }
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_bytes(s: &str) -> Vec<u8> {
        hex::decode(s.replace([' ', '\n'], "")).unwrap()
    }

    // From spec.md S1: two `n` nodes, each with a REF and a REFFIELD argument.
    const S1: &str = "55 03 04 08 09  00 05 07  00 02 00 00  00 00 04 01 00 00 04 02  6E 00 02 09 0A 78 00 79 00";

    #[test]
    fn s1_minimal_reference_pair() {
        let bytes = hex_bytes(S1);
        let doc = Document::read_from_data(None, &bytes).expect("should decode");
        let nodes = doc.all_nodes().to_vec().unwrap();
        assert_eq!(nodes.len(), 2);
        for n in &nodes {
            assert_eq!(n.node_type().name, "n");
        }
    }

    #[test]
    fn truncating_any_byte_fails() {
        let bytes = hex_bytes(S1);
        for k in 0..bytes.len() {
            assert!(Document::read_from_data(None, &bytes[..k]).is_err(), "should fail at len {k}");
        }
        assert!(Document::read_from_data(None, &bytes).is_ok());
    }

    #[test]
    fn missing_type_list_is_rejected() {
        // sizeMode: strWidth=1(code1), typeWidth=0, nodeWidth=1(code1), dataWidth=0 -> sizeMode=0b00_01_00_01=0x11
        // lengths: str=0, node=1 (so a node table is declared nonempty, with no type list).
        // One extra byte of body so truncation isn't hit before ownership resolution.
        let bytes = vec![0x11, 0x00, 0x01, 0xff];
        assert_eq!(Document::read_from_data(None, &bytes), Err(Error::MissingTypeList));
    }
}
