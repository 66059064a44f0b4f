//! Node-type dictionary: the tagged argument-kind enum and the per-type
//! records decoded from (or inherited into) a document's TYPE table.

use crate::error::{Error, Result};

/// Tagged wire type of one positional argument slot.
///
/// Wire sizes: U8/S8 = 1 byte, U16/S16 = 2 bytes, U32/S32/F32 = 4 bytes,
/// STR = the document's `strWidth`, DAT = 2 * `dataWidth`, REF = `nodeWidth`,
/// REFFIELD = `nodeWidth` + `strWidth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeArgumentKind {
    U8,
    U16,
    U32,
    S8,
    S16,
    S32,
    F32,
    Str,
    Dat,
    Ref,
    RefField,
}

impl NodeArgumentKind {
    const CODE_COUNT: u8 = 11;

    pub fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => NodeArgumentKind::U8,
            1 => NodeArgumentKind::U16,
            2 => NodeArgumentKind::U32,
            3 => NodeArgumentKind::S8,
            4 => NodeArgumentKind::S16,
            5 => NodeArgumentKind::S32,
            6 => NodeArgumentKind::F32,
            7 => NodeArgumentKind::Str,
            8 => NodeArgumentKind::Dat,
            9 => NodeArgumentKind::Ref,
            10 => NodeArgumentKind::RefField,
            _ => return Err(Error::InvalidTypeDef),
        })
    }

    /// On-wire byte width of a slot of this kind, given the document's widths.
    pub fn wire_width(self, str_width: u32, node_width: u32, data_width: u32) -> u32 {
        match self {
            NodeArgumentKind::U8 | NodeArgumentKind::S8 => 1,
            NodeArgumentKind::U16 | NodeArgumentKind::S16 => 2,
            NodeArgumentKind::U32 | NodeArgumentKind::S32 | NodeArgumentKind::F32 => 4,
            NodeArgumentKind::Str => str_width,
            NodeArgumentKind::Dat => 2 * data_width,
            NodeArgumentKind::Ref => node_width,
            NodeArgumentKind::RefField => node_width + str_width,
        }
    }
}

/// A declared node type: name, generic string-parameter count, the ordered
/// kinds of its positional arguments, whether it carries a children block,
/// and the precomputed fixed length of a node of this type (excluding the
/// children block itself).
#[derive(Debug, Clone)]
pub struct NodeType {
    pub name: String,
    pub generic_arg_count: u8,
    pub argument_kinds: Vec<NodeArgumentKind>,
    pub has_children: bool,
    pub total_len: u32,
}

impl NodeType {
    /// `total_len = typeWidth + g*strWidth + sum(argWidth[kind_i])`, per spec §3.
    pub fn compute_total_len(
        type_width: u32,
        str_width: u32,
        node_width: u32,
        data_width: u32,
        generic_arg_count: u8,
        argument_kinds: &[NodeArgumentKind],
    ) -> u32 {
        let mut len = type_width + str_width * generic_arg_count as u32;
        for kind in argument_kinds {
            len += kind.wire_width(str_width, node_width, data_width);
        }
        len
    }
}
