//! `Node` and `NodeRange`: non-owning cursors into a document's node table.
//!
//! A `Node` is a `(document, offset)` pair, not a pointer into the payload —
//! it is `Copy`, trivially compared by value, and its validity is tied to
//! the `Document` it borrows rather than to any raw pointer.

use crate::argument::Argument;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::nodetype::NodeType;

/// A cursor at one node's offset within its document's node table.
#[derive(Clone, Copy)]
pub struct Node<'doc> {
    doc: &'doc Document,
    offset: usize,
}

impl<'doc> Node<'doc> {
    /// Callers must have already proven `offset` a valid node extent
    /// (see [`Document::node_at`] / [`Document::validate_node_offset`]).
    pub(crate) fn new(doc: &'doc Document, offset: usize) -> Self {
        Node { doc, offset }
    }

    /// Offset into the node table, measured from `nodeRange.start`.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn node_type(&self) -> &'doc NodeType {
        self.doc
            .node_type_at(self.offset)
            .expect("Node is only constructed over an already-validated offset")
    }

    /// The node's generic string parameters, in declared order.
    pub fn generic_arguments(&self) -> Result<Vec<&'doc [u8]>> {
        let node_type = self.node_type();
        let mut pos = self.offset + self.doc.widths.type_width as usize;
        let mut out = Vec::with_capacity(node_type.generic_arg_count as usize);
        for _ in 0..node_type.generic_arg_count {
            let idx = self.doc.read_node_uint(pos, self.doc.widths.str_width) as usize;
            pos += self.doc.widths.str_width as usize;
            let s = self.doc.string_table().get(idx).ok_or(Error::InvalidStringIndex)?;
            out.push(s.as_slice());
        }
        Ok(out)
    }

    /// The node's positional arguments, in declared order. Each `Argument`
    /// is a view over its slot's bytes — this does not decode any value.
    pub fn arguments(&self) -> Result<Vec<Argument<'doc>>> {
        let node_type = self.node_type();
        let mut pos = self.offset
            + self.doc.widths.type_width as usize
            + self.doc.widths.str_width as usize * node_type.generic_arg_count as usize;
        let mut out = Vec::with_capacity(node_type.argument_kinds.len());
        for &kind in &node_type.argument_kinds {
            out.push(Argument::new(self.doc, kind, pos));
            pos += self.doc.arg_wire_width(kind) as usize;
        }
        if pos > self.doc.node_range_len() {
            return Err(Error::InvalidNodeData);
        }
        Ok(out)
    }

    /// This node's children, or an empty range for a childless type.
    pub fn children(&self) -> Result<NodeRange<'doc>> {
        let node_type = self.node_type();
        let content_start = self.offset + node_type.total_len as usize;
        if !node_type.has_children {
            return Ok(NodeRange::new(self.doc, content_start, content_start));
        }
        let children_len = self.doc.read_node_uint(content_start, self.doc.node_width()) as usize;
        let begin = content_start + self.doc.node_width() as usize;
        let end = begin + children_len;
        if end > self.doc.node_range_len() {
            return Err(Error::InvalidNodeData);
        }
        Ok(NodeRange::new(self.doc, begin, end))
    }

    /// Walks back up the (parentless) node table to find this node's parent,
    /// via the recursive top-down scan described in spec §4.5: the format
    /// stores no back-pointers, so the search re-derives ancestry from
    /// sibling extents on every call.
    pub fn find_parent(&self) -> Result<Option<Node<'doc>>> {
        if self.offset > self.doc.node_range_len() {
            return Err(Error::InvalidHierarchy);
        }
        let parent_offset = find_parent(self.doc, self.offset, 0)?;
        Ok(parent_offset.map(|o| Node::new(self.doc, o)))
    }
}

impl<'doc> PartialEq for Node<'doc> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.offset == other.offset
    }
}

impl<'doc> Eq for Node<'doc> {}

impl<'doc> std::fmt::Debug for Node<'doc> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("offset", &self.offset)
            .field("type", &self.node_type().name)
            .finish()
    }
}

/// Scans the top-level sibling range for the node containing `target`; `None`
/// means `target` is itself a top-level node (no parent). `start` is always
/// 0 at the outermost call (see `Node::find_parent`).
fn find_parent(doc: &Document, target: usize, start: usize) -> Result<Option<usize>> {
    let mut begin = start;
    let mut end = doc.next_sibling_offset(begin)?;
    loop {
        if target == begin {
            return Ok(None);
        }
        if begin < target && target < end {
            return find_parent_within(doc, target, begin).map(Some);
        }
        begin = end;
        end = doc.next_sibling_offset(begin)?;
    }
}

/// Recursive descent used once the top-level scan (or an enclosing call)
/// has located the unique sibling whose extent `[start, ..)` contains
/// `target`: searches `start`'s children for `target`, recursing one level
/// deeper whenever `target` lies inside one specific grandchild's extent.
fn find_parent_within(doc: &Document, target: usize, start: usize) -> Result<usize> {
    let node_type = doc.node_type_at(start)?;
    if !node_type.has_children {
        return Err(Error::InvalidHierarchy);
    }
    let mut child = start + node_type.total_len as usize + doc.node_width() as usize;
    if target < child {
        return Err(Error::InvalidHierarchy);
    }
    let mut child_end = doc.next_sibling_offset(child)?;
    loop {
        if child == target {
            return Ok(start);
        }
        if child < target && target < child_end {
            return find_parent_within(doc, target, child);
        }
        child = child_end;
        child_end = doc.next_sibling_offset(child)?;
    }
}

/// A half-open `[begin, end)` span of sibling nodes within one document's
/// node table, iterable in order.
#[derive(Clone, Copy)]
pub struct NodeRange<'doc> {
    doc: &'doc Document,
    begin: usize,
    end: usize,
}

impl<'doc> NodeRange<'doc> {
    pub(crate) fn new(doc: &'doc Document, begin: usize, end: usize) -> Self {
        NodeRange { doc, begin, end }
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    /// Materializes the range as a `Vec`, failing on the first invalid node
    /// encountered — this is `GetAllNodes().ToList()` from spec §6.
    pub fn to_vec(&self) -> Result<Vec<Node<'doc>>> {
        self.into_iter().collect()
    }
}

impl<'doc> IntoIterator for NodeRange<'doc> {
    type Item = Result<Node<'doc>>;
    type IntoIter = NodeIter<'doc>;

    fn into_iter(self) -> NodeIter<'doc> {
        NodeIter {
            doc: self.doc,
            offset: self.begin,
            end: self.end,
        }
    }
}

impl<'doc> IntoIterator for &NodeRange<'doc> {
    type Item = Result<Node<'doc>>;
    type IntoIter = NodeIter<'doc>;

    fn into_iter(self) -> NodeIter<'doc> {
        (*self).into_iter()
    }
}

pub struct NodeIter<'doc> {
    doc: &'doc Document,
    offset: usize,
    end: usize,
}

impl<'doc> Iterator for NodeIter<'doc> {
    type Item = Result<Node<'doc>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.end {
            return None;
        }
        match self.doc.node_at(self.offset) {
            Ok(node) => {
                match self.doc.next_sibling_offset(self.offset) {
                    Ok(next) => self.offset = next,
                    Err(e) => {
                        // Force the next call to re-surface the same error rather
                        // than looping forever at a position we can't advance past.
                        self.offset = self.end;
                        return Some(Err(e));
                    }
                }
                Some(Ok(node))
            }
            Err(e) => {
                self.offset = self.end;
                Some(Err(e))
            }
        }
    }
}
