use caliper_component::Component;

use crate::type_aware::dispatch;
use crate::{Order, TypeAwareVisitor};

/// Runs several type-aware visitors in a single walk.
///
/// At each node, pre-order visitors fire before the children are walked and
/// post-order visitors after, each in registration order and each within its
/// own depth window. A node is descended into while at least one visitor
/// still accepts its depth.
pub struct VisitorsCrawler<'a, E> {
    visitors: Vec<Box<dyn TypeAwareVisitor<Error = E> + 'a>>,
}

impl<'a, E> VisitorsCrawler<'a, E> {
    pub fn new(visitors: Vec<Box<dyn TypeAwareVisitor<Error = E> + 'a>>) -> Self {
        Self { visitors }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    pub fn visit(&mut self, root: &Component) -> Result<(), E> {
        self.walk(root)
    }

    fn walk(&mut self, component: &Component) -> Result<(), E> {
        let kind = component.kind;
        let mut descend = false;
        for visitor in &mut self.visitors {
            let limit = visitor.depth_limit();
            if limit.is_deeper_than(kind) {
                continue;
            }
            descend = true;
            if visitor.order() == Order::PreOrder && !limit.is_above_ceiling(kind) {
                dispatch(visitor.as_mut(), component)?;
            }
        }
        if !descend {
            return Ok(());
        }
        for child in &component.children {
            self.walk(child)?;
        }
        for visitor in &mut self.visitors {
            let limit = visitor.depth_limit();
            if visitor.order() == Order::PostOrder && limit.accepts(kind) {
                dispatch(visitor.as_mut(), component)?;
            }
        }
        Ok(())
    }
}
