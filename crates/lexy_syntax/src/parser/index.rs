//! Indentation-depth index of the nodes that receive the next line.
//!
//! Entry `d` holds the path (child slots from the document root) of the node that parses lines indented at
//! depth `d`. Reading depth `d` drops every deeper entry: a dedent closes the blocks below it.

/// Path of child slots from the document root; empty for the root list itself.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsableNodeIndex {
    /// `None` marks a depth whose lines are swallowed (the block header failed to parse).
    entries: Vec<Option<NodePath>>,
}

impl Default for ParsableNodeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ParsableNodeIndex {
    pub fn new() -> Self {
        Self {
            entries: vec![Some(Vec::new())],
        }
    }

    /// Deepest indentation a line may currently have.
    pub fn max_depth(&self) -> usize {
        self.entries.len() - 1
    }

    /// Receiver for a line at `depth`; closes every deeper block.
    ///
    /// Returns `None` when the depth is out of range or swallowed.
    pub fn enter(&mut self, depth: usize) -> Option<NodePath> {
        if depth > self.max_depth() {
            return None;
        }
        self.entries.truncate(depth + 1);
        self.entries[depth].clone()
    }

    /// Set the receiver for lines at `depth`, dropping anything deeper.
    pub fn set(&mut self, depth: usize, path: Option<NodePath>) {
        self.entries.truncate(depth);
        while self.entries.len() < depth {
            self.entries.push(None);
        }
        self.entries.push(path);
    }

    /// Root slot of the declaration that owns lines at `depth`, if any.
    pub fn root_slot(&self, depth: usize) -> Option<usize> {
        let depth = depth.min(self.max_depth());
        self.entries[..=depth]
            .iter()
            .rev()
            .flatten()
            .find_map(|path| path.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedent_closes_deeper_blocks() {
        let mut index = ParsableNodeIndex::new();
        assert_eq!(index.enter(0), Some(vec![]));
        index.set(1, Some(vec![0]));
        assert_eq!(index.enter(1), Some(vec![0]));
        index.set(2, Some(vec![0, 2]));
        assert_eq!(index.max_depth(), 2);

        assert_eq!(index.enter(0), Some(vec![]));
        assert_eq!(index.max_depth(), 0);
        assert_eq!(index.enter(1), None);
    }

    #[test]
    fn test_swallowed_depth() {
        let mut index = ParsableNodeIndex::new();
        index.set(1, None);
        assert_eq!(index.max_depth(), 1);
        assert_eq!(index.enter(1), None);
    }

    #[test]
    fn test_root_slot() {
        let mut index = ParsableNodeIndex::new();
        index.set(1, Some(vec![3]));
        index.set(2, Some(vec![3, 0]));
        assert_eq!(index.root_slot(2), Some(3));
        assert_eq!(index.root_slot(5), Some(3));
        assert_eq!(index.root_slot(0), None);
    }
}
