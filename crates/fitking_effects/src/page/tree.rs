//! Element tree for hierarchical page structure.

use std::collections::HashMap;

use super::element::{ElementId, ElementInfo, ElementSpec};

/// A node in the tree.
#[derive(Debug, Clone)]
struct Node {
    spec: ElementSpec,
    parent: Option<ElementId>,
}

/// Manages the element hierarchy.
#[derive(Debug)]
pub struct ElementTree {
    /// Nodes indexed by ID.
    nodes: HashMap<ElementId, Node>,
    /// Root element IDs in insertion order.
    roots: Vec<ElementId>,
    /// Parent-child relationships.
    children: HashMap<ElementId, Vec<ElementId>>,
    /// ID counter for generating unique IDs.
    next_id: u64,
}

impl ElementTree {
    /// Creates a new empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::with_capacity(64),
            roots: Vec::with_capacity(8),
            children: HashMap::with_capacity(64),
            next_id: 1,
        }
    }

    fn allocate(&mut self) -> ElementId {
        let id = ElementId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Inserts a root element.
    pub fn add_root(&mut self, spec: ElementSpec) -> ElementId {
        let id = self.allocate();
        self.nodes.insert(id, Node { spec, parent: None });
        self.roots.push(id);
        self.children.insert(id, Vec::new());
        id
    }

    /// Inserts a child under `parent`. Returns `None` if `parent` is unknown.
    pub fn add_child(&mut self, parent: ElementId, spec: ElementSpec) -> Option<ElementId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }

        let id = self.allocate();
        self.nodes.insert(
            id,
            Node {
                spec,
                parent: Some(parent),
            },
        );
        self.children.entry(parent).or_default().push(id);
        self.children.insert(id, Vec::new());
        Some(id)
    }

    /// Removes an element and its subtree. Returns every removed ID.
    pub fn remove(&mut self, id: ElementId) -> Vec<ElementId> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };

        match node.parent {
            Some(parent) => {
                if let Some(siblings) = self.children.get_mut(&parent) {
                    siblings.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(children) = self.children.remove(&current) {
                stack.extend(children);
            }
            self.nodes.remove(&current);
            removed.push(current);
        }
        removed
    }

    /// Returns true if the element exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns the element's description.
    #[must_use]
    pub fn spec(&self, id: ElementId) -> Option<&ElementSpec> {
        self.nodes.get(&id).map(|n| &n.spec)
    }

    /// Returns mutable access to the element's description.
    pub fn spec_mut(&mut self, id: ElementId) -> Option<&mut ElementSpec> {
        self.nodes.get_mut(&id).map(|n| &mut n.spec)
    }

    /// Returns the parent of an element.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Returns the children of an element.
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Returns the element followed by its ancestors, innermost first.
    #[must_use]
    pub fn ancestry(&self, id: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = self.contains(id).then_some(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Nearest element, `id` included, matching the interactive predicate.
    #[must_use]
    pub fn closest_interactive(&self, id: ElementId) -> Option<ElementId> {
        self.ancestry(id)
            .into_iter()
            .find(|&e| self.spec(e).is_some_and(ElementSpec::is_interactive))
    }

    /// Builds the event snapshot of an element.
    #[must_use]
    pub fn info(&self, id: ElementId) -> Option<ElementInfo> {
        let spec = self.spec(id)?;
        Some(ElementInfo {
            id,
            tag: spec.tag,
            bounds: spec.bounds,
            closest_interactive: self.closest_interactive(id),
        })
    }

    /// Returns all element IDs in depth-first (document) order.
    pub fn iter_dfs(&self) -> impl Iterator<Item = ElementId> + '_ {
        DfsIterator {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first iterator over the tree.
struct DfsIterator<'a> {
    tree: &'a ElementTree,
    stack: Vec<ElementId>,
}

impl Iterator for DfsIterator<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::element::Tag;

    #[test]
    fn test_tree_hierarchy() {
        let mut tree = ElementTree::new();

        let root = tree.add_root(ElementSpec::new(Tag::Section));
        let first = tree.add_child(root, ElementSpec::new(Tag::Div)).unwrap();
        let second = tree.add_child(root, ElementSpec::new(Tag::Div)).unwrap();
        let leaf = tree.add_child(first, ElementSpec::new(Tag::Span)).unwrap();

        assert_eq!(tree.children(root), &[first, second]);
        assert_eq!(tree.iter_dfs().collect::<Vec<_>>(), vec![root, first, leaf, second]);
        assert_eq!(tree.ancestry(leaf), vec![leaf, first, root]);
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = ElementTree::new();
        let root = tree.add_root(ElementSpec::new(Tag::Section));
        let card = tree.add_child(root, ElementSpec::new(Tag::Div)).unwrap();
        let label = tree.add_child(card, ElementSpec::new(Tag::Span)).unwrap();

        let mut removed = tree.remove(card);
        removed.sort();
        assert_eq!(removed, vec![card, label]);
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_closest_interactive_walks_up() {
        let mut tree = ElementTree::new();
        let root = tree.add_root(ElementSpec::new(Tag::Div));
        let button = tree.add_child(root, ElementSpec::new(Tag::Button)).unwrap();
        let icon = tree.add_child(button, ElementSpec::new(Tag::Span)).unwrap();

        assert_eq!(tree.closest_interactive(icon), Some(button));
        assert_eq!(tree.closest_interactive(root), None);
        assert!(!tree.info(icon).unwrap().is_interactive());
        assert!(tree.info(icon).unwrap().within_interactive());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut tree = ElementTree::new();
        assert!(tree.add_child(ElementId::new(99), ElementSpec::new(Tag::Div)).is_none());
        assert!(tree.is_empty());
    }
}
