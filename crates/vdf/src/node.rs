//! Document tree: leaves and ordered blocks.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::options::KeyMatch;

/// A parsed value: either a string or a nested block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(String),
    Block(Block),
}

impl Node {
    /// Returns the string if this is a leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Leaf(s) => Some(s),
            Node::Block(_) => None,
        }
    }

    /// Returns the block if this is a nested block.
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(b) => Some(b),
            Node::Leaf(_) => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(_))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Leaf(s.to_owned())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Leaf(s)
    }
}

impl From<Block> for Node {
    fn from(b: Block) -> Self {
        Node::Block(b)
    }
}

/// An ordered mapping from key to node with unique keys.
///
/// Keys are compared with the block's `KeyMatch` mode. Insertion order is
/// kept for serialization; equality compares entries only.
///
/// Dropping and comparing blocks walk the tree with an explicit stack, so
/// nesting depth is limited by memory only. `Clone`, `Debug` and the serde
/// `Serialize` impl still recurse.
#[derive(Debug, Clone, Default)]
pub struct Block {
    entries: Vec<(String, Node)>,
    key_match: KeyMatch,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty block comparing keys with `key_match`.
    pub fn with_key_match(key_match: KeyMatch) -> Self {
        Self {
            entries: Vec::new(),
            key_match,
        }
    }

    pub fn key_match(&self) -> KeyMatch {
        self.key_match
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| self.key_match.matches(k, key))
    }

    pub(crate) fn entries(&self) -> &[(String, Node)] {
        &self.entries
    }

    pub(crate) fn push(&mut self, key: String, node: Node) {
        self.entries.push((key, node));
    }

    pub(crate) fn replace_at(&mut self, index: usize, node: Node) -> Node {
        std::mem::replace(&mut self.entries[index].1, node)
    }

    /// Inserts `node` under `key`.
    ///
    /// An existing matching entry keeps its position and spelling and has its
    /// value replaced; the old value is returned.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let node = node.into();
        match self.position(&key) {
            Some(index) => Some(self.replace_at(index, node)),
            None => {
                self.push(key, node);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Returns the string stored under `key`, if it is a leaf.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_str)
    }

    /// Returns the block stored under `key`, if it is a nested block.
    pub fn get_block(&self, key: &str) -> Option<&Block> {
        self.get(key).and_then(Node::as_block)
    }

    /// Follows `path` through nested blocks.
    ///
    /// An empty path returns `None`.
    pub fn get_path(&self, path: &[&str]) -> Option<&Node> {
        let (last, parents) = path.split_last()?;
        let mut block = self;
        for key in parents {
            block = block.get_block(key)?;
        }
        block.get(last)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Removes and returns the entry for `key`, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.entries.len() != b.entries.len() {
                return false;
            }
            for ((ka, na), (kb, nb)) in a.entries.iter().zip(&b.entries) {
                if ka != kb {
                    return false;
                }
                match (na, nb) {
                    (Node::Leaf(x), Node::Leaf(y)) if x == y => {}
                    (Node::Block(x), Node::Block(y)) => pending.push((x, y)),
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for Block {}

impl Drop for Block {
    fn drop(&mut self) {
        if !self.entries.iter().any(|(_, node)| node.is_block()) {
            return;
        }
        // Detach nested blocks so each one is dropped with no children left.
        let mut pending = Vec::new();
        detach_children(&mut self.entries, &mut pending);
        while let Some(mut block) = pending.pop() {
            detach_children(&mut block.entries, &mut pending);
        }
    }
}

fn detach_children(entries: &mut Vec<(String, Node)>, pending: &mut Vec<Block>) {
    for (_, node) in entries.drain(..) {
        if let Node::Block(child) = node {
            pending.push(child);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Block
where
    K: Into<String>,
    V: Into<Node>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut block = Block::new();
        for (k, v) in iter {
            block.insert(k, v);
        }
        block
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(s) => serializer.serialize_str(s),
            Node::Block(b) => b.serialize(serializer),
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
