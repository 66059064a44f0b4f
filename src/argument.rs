//! `Argument`: a typed accessor over one positional argument slot.
//!
//! An `Argument` is a `(document, kind, offset)` triple pointing at the
//! on-wire bytes of one slot; constructing one does not decode anything.
//! Each typed getter validates that `kind` matches before reading, per
//! spec §4.6.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::nodetype::NodeArgumentKind;

#[derive(Clone, Copy)]
pub struct Argument<'doc> {
    doc: &'doc Document,
    kind: NodeArgumentKind,
    offset: usize,
}

impl<'doc> Argument<'doc> {
    pub(crate) fn new(doc: &'doc Document, kind: NodeArgumentKind, offset: usize) -> Self {
        Argument { doc, kind, offset }
    }

    pub fn kind(&self) -> NodeArgumentKind {
        self.kind
    }

    fn require(&self, kind: NodeArgumentKind) -> Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(Error::WrongArgumentKind)
        }
    }

    /// Unsigned value of a U8/U16/U32 argument.
    pub fn get_unsigned(&self) -> Result<u32> {
        let width = match self.kind {
            NodeArgumentKind::U8 => 1,
            NodeArgumentKind::U16 => 2,
            NodeArgumentKind::U32 => 4,
            _ => return Err(Error::WrongArgumentKind),
        };
        Ok(self.doc.read_node_uint(self.offset, width))
    }

    /// Sign-extended value of an S8/S16/S32 argument.
    pub fn get_signed(&self) -> Result<i32> {
        let width = match self.kind {
            NodeArgumentKind::S8 => 1,
            NodeArgumentKind::S16 => 2,
            NodeArgumentKind::S32 => 4,
            _ => return Err(Error::WrongArgumentKind),
        };
        Ok(self.doc.read_node_signed(self.offset, width))
    }

    pub fn get_float(&self) -> Result<f32> {
        self.require(NodeArgumentKind::F32)?;
        Ok(self.doc.read_node_f32(self.offset))
    }

    /// Looks up the string-table entry referenced by a STR argument.
    pub fn get_string(&self) -> Result<&'doc [u8]> {
        self.require(NodeArgumentKind::Str)?;
        let idx = self.doc.read_node_uint(self.offset, self.doc.str_width()) as usize;
        self.doc.string_table().get(idx).map(|s| s.as_slice()).ok_or(Error::InvalidStringIndex)
    }

    /// Resolves the node referenced by a REF argument, validating its offset.
    pub fn get_node(&self) -> Result<Node<'doc>> {
        self.require(NodeArgumentKind::Ref)?;
        let target = self.doc.read_node_uint(self.offset, self.doc.node_width()) as usize;
        self.doc.node_at(target)
    }

    /// Resolves the `(node, field name)` pair referenced by a REFFIELD argument.
    pub fn get_field(&self) -> Result<(Node<'doc>, &'doc [u8])> {
        self.require(NodeArgumentKind::RefField)?;
        let node_width = self.doc.node_width();
        let target = self.doc.read_node_uint(self.offset, node_width) as usize;
        let node = self.doc.node_at(target)?;
        let field_idx = self.doc.read_node_uint(self.offset + node_width as usize, self.doc.str_width()) as usize;
        let field = self
            .doc
            .string_table()
            .get(field_idx)
            .map(|s| s.as_slice())
            .ok_or(Error::InvalidStringIndex)?;
        Ok((node, field))
    }

    /// The raw byte slice addressed by a DAT argument's `(begin, end)` pair.
    pub fn get_data(&self) -> Result<&'doc [u8]> {
        self.require(NodeArgumentKind::Dat)?;
        let data_width = self.doc.data_width();
        let begin = self.doc.read_node_uint(self.offset, data_width) as usize;
        let end = self.doc.read_node_uint(self.offset + data_width as usize, data_width) as usize;
        self.doc.data_bytes(begin, end)
    }

    /// `get_data` reinterpreted as an array of `element_size`-byte elements,
    /// failing `DataAlignment` if the blob length isn't a multiple of it.
    pub fn get_data_as(&self, element_size: usize) -> Result<&'doc [u8]> {
        let data = self.get_data()?;
        if element_size == 0 || data.len() % element_size != 0 {
            return Err(Error::DataAlignment);
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn hex_bytes(s: &str) -> Vec<u8> {
        hex::decode(s.replace([' ', '\n'], "")).unwrap()
    }

    const S1: &str = "55 03 04 08 09  00 05 07  00 02 00 00  00 00 04 01 00 00 04 02  6E 00 02 09 0A 78 00 79 00";

    #[test]
    fn reference_and_reffield_roundtrip() {
        let bytes = hex_bytes(S1);
        let doc = Document::read_from_data(None, &bytes).unwrap();
        let nodes: Vec<_> = doc.all_nodes().to_vec().unwrap();
        let n0 = nodes[0];
        let n1 = nodes[1];

        let args0 = n0.arguments().unwrap();
        assert_eq!(args0[0].get_node().unwrap(), n0);
        let (field_node, field_name) = args0[1].get_field().unwrap();
        assert_eq!(field_node, n1);
        assert_eq!(field_name, b"x");

        let args1 = n1.arguments().unwrap();
        assert_eq!(args1[0].get_node().unwrap(), n0);
        let (field_node, field_name) = args1[1].get_field().unwrap();
        assert_eq!(field_node, n1);
        assert_eq!(field_name, b"y");
    }

    #[test]
    fn wrong_kind_accessor_fails() {
        let bytes = hex_bytes(S1);
        let doc = Document::read_from_data(None, &bytes).unwrap();
        let n0 = doc.all_nodes().to_vec().unwrap()[0];
        let arg0 = &n0.arguments().unwrap()[0]; // REF
        assert_eq!(arg0.get_unsigned(), Err(Error::WrongArgumentKind));
        assert_eq!(arg0.get_signed(), Err(Error::WrongArgumentKind));
        assert_eq!(arg0.get_string(), Err(Error::WrongArgumentKind));
        assert_eq!(arg0.get_float(), Err(Error::WrongArgumentKind));
        assert_eq!(arg0.get_data(), Err(Error::WrongArgumentKind));
    }
}
