//! # caliper-component
//!
//! **Tier 0 (Core Types)**
//!
//! The component tree an analysis is computed over: projects and modules,
//! directories and files, plus the views/subviews/project-views family used by
//! portfolio-style aggregations.
//!
//! ## What belongs here
//! * `ComponentType` and its depth ordering
//! * `Component` nodes and their builder
//! * `ComponentTree`, the validated, indexed root
//!
//! ## What does NOT belong here
//! * Report parsing (the tree is built by an external collaborator)
//! * Measures or metrics
//! * Traversal strategies (see `caliper-crawler`)

#![forbid(unsafe_code)]

mod tree;

use serde::{Deserialize, Serialize};

pub use tree::{ComponentTree, TreeError};

/// Stable identifier of a component within one analysis report.
pub type ComponentRef = u32;

/// The kind of a node in the component tree.
///
/// Two families coexist and never mix inside one tree:
/// * reports: `Project` > `Module` > `Directory` > `File`
/// * views: `View` > `Subview` > `ProjectView`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    Project,
    Module,
    Directory,
    File,
    View,
    Subview,
    ProjectView,
}

impl ComponentType {
    pub const REPORT_TYPES: [ComponentType; 4] = [
        ComponentType::Project,
        ComponentType::Module,
        ComponentType::Directory,
        ComponentType::File,
    ];

    pub const VIEWS_TYPES: [ComponentType; 3] = [
        ComponentType::View,
        ComponentType::Subview,
        ComponentType::ProjectView,
    ];

    /// Depth of the type inside its own family, the root type being `0`.
    #[must_use]
    pub fn depth(self) -> usize {
        match self {
            ComponentType::Project | ComponentType::View => 0,
            ComponentType::Module | ComponentType::Subview => 1,
            ComponentType::Directory | ComponentType::ProjectView => 2,
            ComponentType::File => 3,
        }
    }

    #[must_use]
    pub fn is_report_type(self) -> bool {
        Self::REPORT_TYPES.contains(&self)
    }

    #[must_use]
    pub fn is_views_type(self) -> bool {
        Self::VIEWS_TYPES.contains(&self)
    }

    /// Leaves carry the raw data formulas are initialized from.
    #[must_use]
    pub fn is_leaf(self) -> bool {
        matches!(self, ComponentType::File | ComponentType::ProjectView)
    }

    #[must_use]
    pub fn is_root(self) -> bool {
        matches!(self, ComponentType::Project | ComponentType::View)
    }

    #[must_use]
    pub fn same_family(self, other: ComponentType) -> bool {
        self.is_report_type() == other.is_report_type()
    }

    /// `true` when both types belong to the same family and `self` sits
    /// strictly below `other`.
    #[must_use]
    pub fn is_deeper_than(self, other: ComponentType) -> bool {
        self.same_family(other) && self.depth() > other.depth()
    }

    /// `true` when both types belong to the same family and `self` sits
    /// strictly above `other`.
    #[must_use]
    pub fn is_higher_than(self, other: ComponentType) -> bool {
        self.same_family(other) && self.depth() < other.depth()
    }

    /// Settings qualifier of a root type, used to look up qualified
    /// properties such as `period1.TRK`.
    #[must_use]
    pub fn qualifier(self) -> &'static str {
        match self {
            ComponentType::Project => "TRK",
            ComponentType::Module => "BRC",
            ComponentType::Directory => "DIR",
            ComponentType::File => "FIL",
            ComponentType::View => "VW",
            ComponentType::Subview => "SVW",
            ComponentType::ProjectView => "PVW",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentType::Project => "PROJECT",
            ComponentType::Module => "MODULE",
            ComponentType::Directory => "DIRECTORY",
            ComponentType::File => "FILE",
            ComponentType::View => "VIEW",
            ComponentType::Subview => "SUBVIEW",
            ComponentType::ProjectView => "PROJECT_VIEW",
        };
        f.write_str(name)
    }
}

/// Attributes only files carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    #[serde(default)]
    pub language_key: Option<String>,
    #[serde(default)]
    pub unit_test: bool,
    #[serde(default)]
    pub lines: usize,
}

/// A node of the analysis tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "ref")]
    pub reference: ComponentRef,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub key: String,
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub file_attributes: Option<FileAttributes>,
    #[serde(default)]
    pub children: Vec<Component>,
}

impl Component {
    /// Start building a component of the given type and reference.
    pub fn builder(kind: ComponentType, reference: ComponentRef) -> ComponentBuilder {
        ComponentBuilder::new(kind, reference)
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }

    /// `true` for files flagged as unit tests.
    #[must_use]
    pub fn is_unit_test(&self) -> bool {
        self.file_attributes.as_ref().is_some_and(|a| a.unit_test)
    }

    #[must_use]
    pub fn language_key(&self) -> Option<&str> {
        self.file_attributes
            .as_ref()
            .and_then(|a| a.language_key.as_deref())
    }

    /// Iterate over this component and all its descendants, parents first.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Pre-order iterator over a subtree, siblings in report order.
pub struct Descendants<'a> {
    stack: Vec<&'a Component>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Builder mirroring how report readers assemble the tree.
#[derive(Debug, Clone)]
pub struct ComponentBuilder {
    component: Component,
}

impl ComponentBuilder {
    fn new(kind: ComponentType, reference: ComponentRef) -> Self {
        Self {
            component: Component {
                reference,
                kind,
                key: format!("key_{reference}"),
                uuid: format!("uuid_{reference}"),
                name: format!("name_{reference}"),
                version: None,
                file_attributes: None,
                children: Vec::new(),
            },
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.component.key = key.into();
        self
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.component.uuid = uuid.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.component.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.component.version = Some(version.into());
        self
    }

    pub fn file_attributes(mut self, attributes: FileAttributes) -> Self {
        self.component.file_attributes = Some(attributes);
        self
    }

    /// Shorthand for flagging a file as a unit test.
    pub fn unit_test(mut self, unit_test: bool) -> Self {
        self.component
            .file_attributes
            .get_or_insert_with(FileAttributes::default)
            .unit_test = unit_test;
        self
    }

    pub fn language(mut self, language_key: impl Into<String>) -> Self {
        self.component
            .file_attributes
            .get_or_insert_with(FileAttributes::default)
            .language_key = Some(language_key.into());
        self
    }

    pub fn child(mut self, child: Component) -> Self {
        self.component.children.push(child);
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Component>,
    {
        self.component.children.extend(children);
        self
    }

    #[must_use]
    pub fn build(self) -> Component {
        self.component
    }
}
