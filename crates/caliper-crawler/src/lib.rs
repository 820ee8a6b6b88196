//! # caliper-crawler
//!
//! **Tier 1 (Traversal)**
//!
//! Depth-first walks over a component tree.
//!
//! ## What belongs here
//! * `TypeAwareVisitor` and the `crawl` function
//! * `PathAwareVisitor`, which keeps one accumulator per ancestor
//! * `VisitorsCrawler`, running several visitors in one walk
//! * Depth windows (`CrawlerDepthLimit`) and visit `Order`
//!
//! ## What does NOT belong here
//! * What visitors compute (formulas, measure computers)
//!
//! Siblings are walked in report order. A callback error stops the walk and
//! is returned as is.

#![forbid(unsafe_code)]

mod path_aware;
mod type_aware;
mod visitors;

use caliper_component::ComponentType;

pub use path_aware::{Path, PathAwareVisitor, crawl_with_path};
pub use type_aware::{TypeAwareVisitor, crawl};
pub use visitors::VisitorsCrawler;

/// Whether a node's callback fires before or after its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    PreOrder,
    PostOrder,
}

/// The window of component types a visitor sees.
///
/// Each tree family has its own floor: types deeper than the floor are
/// neither visited nor descended into. An optional ceiling per family makes
/// types above it pass-through: they are descended into but get no callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlerDepthLimit {
    report_max: ComponentType,
    views_max: ComponentType,
    report_min: ComponentType,
    views_min: ComponentType,
}

impl CrawlerDepthLimit {
    /// Visit everything down to the leaves.
    pub const LEAVES: CrawlerDepthLimit =
        CrawlerDepthLimit::new(ComponentType::File, ComponentType::ProjectView);

    /// Window from the roots down to `report_max` (reports) and `views_max`
    /// (views). A type passed for the wrong family never limits anything.
    #[must_use]
    pub const fn new(report_max: ComponentType, views_max: ComponentType) -> Self {
        Self {
            report_max,
            views_max,
            report_min: ComponentType::Project,
            views_min: ComponentType::View,
        }
    }

    /// Only fire callbacks from `report_min` / `views_min` downwards.
    #[must_use]
    pub const fn starting_at(mut self, report_min: ComponentType, views_min: ComponentType) -> Self {
        self.report_min = report_min;
        self.views_min = views_min;
        self
    }

    /// `true` when `kind` is below the floor of its family.
    #[must_use]
    pub fn is_deeper_than(&self, kind: ComponentType) -> bool {
        kind.is_deeper_than(self.report_max) || kind.is_deeper_than(self.views_max)
    }

    /// `true` when `kind` is above the ceiling of its family.
    #[must_use]
    pub fn is_above_ceiling(&self, kind: ComponentType) -> bool {
        kind.is_higher_than(self.report_min) || kind.is_higher_than(self.views_min)
    }

    /// `true` when `kind` gets callbacks.
    #[must_use]
    pub fn accepts(&self, kind: ComponentType) -> bool {
        !self.is_deeper_than(kind) && !self.is_above_ceiling(kind)
    }
}

impl Default for CrawlerDepthLimit {
    fn default() -> Self {
        Self::LEAVES
    }
}
