//! Validated, indexed component tree.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{Component, ComponentRef, ComponentType};

/// Errors raised while indexing a tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Component ref {0} appears more than once in the tree")]
    DuplicateRef(ComponentRef),

    #[error("Root component must be a PROJECT or a VIEW, got {0}")]
    InvalidRoot(ComponentType),

    #[error("Component {child} of type {child_type} cannot be a child of {parent_type}")]
    InvalidNesting {
        child: ComponentRef,
        child_type: ComponentType,
        parent_type: ComponentType,
    },
}

#[derive(Debug, Clone, Copy)]
struct Location {
    parent: Option<ComponentRef>,
}

/// The tree of one analysis, indexed by reference.
///
/// Owning the root here keeps every lookup (`get`, `parent_of`) consistent
/// with the tree that passes walk over.
#[derive(Debug, Clone)]
pub struct ComponentTree {
    root: Component,
    index: BTreeMap<ComponentRef, Location>,
}

impl ComponentTree {
    /// Index `root`, rejecting duplicate references, a non-root top node, and
    /// children that are not strictly deeper than their parent.
    pub fn new(root: Component) -> Result<Self, TreeError> {
        if !root.kind.is_root() {
            return Err(TreeError::InvalidRoot(root.kind));
        }
        let mut index = BTreeMap::new();
        index_node(&root, None, &mut index)?;
        Ok(Self { root, index })
    }

    #[must_use]
    pub fn root(&self) -> &Component {
        &self.root
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn contains(&self, reference: ComponentRef) -> bool {
        self.index.contains_key(&reference)
    }

    /// Look up a component by reference.
    #[must_use]
    pub fn get(&self, reference: ComponentRef) -> Option<&Component> {
        if !self.contains(reference) {
            return None;
        }
        self.root.descendants().find(|c| c.reference == reference)
    }

    /// Reference of the parent of `reference`, `None` for the root or an
    /// unknown reference.
    #[must_use]
    pub fn parent_of(&self, reference: ComponentRef) -> Option<ComponentRef> {
        self.index.get(&reference).and_then(|loc| loc.parent)
    }

    /// References from the root down to `reference`, inclusive.
    #[must_use]
    pub fn path_to(&self, reference: ComponentRef) -> Vec<ComponentRef> {
        let mut path = Vec::new();
        if !self.contains(reference) {
            return path;
        }
        let mut cursor = Some(reference);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.parent_of(current);
        }
        path.reverse();
        path
    }

    pub fn iter(&self) -> crate::Descendants<'_> {
        self.root.descendants()
    }
}

// Modules and subviews may contain their own kind.
fn can_nest(parent: ComponentType, child: ComponentType) -> bool {
    child.is_deeper_than(parent)
        || (parent == child && matches!(child, ComponentType::Module | ComponentType::Subview))
}

fn index_node(
    node: &Component,
    parent: Option<&Component>,
    index: &mut BTreeMap<ComponentRef, Location>,
) -> Result<(), TreeError> {
    if let Some(parent) = parent
        && !can_nest(parent.kind, node.kind)
    {
        return Err(TreeError::InvalidNesting {
            child: node.reference,
            child_type: node.kind,
            parent_type: parent.kind,
        });
    }
    let location = Location {
        parent: parent.map(|p| p.reference),
    };
    if index.insert(node.reference, location).is_some() {
        return Err(TreeError::DuplicateRef(node.reference));
    }
    for child in &node.children {
        index_node(child, Some(node), index)?;
    }
    Ok(())
}
