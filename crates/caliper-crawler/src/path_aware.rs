use caliper_component::{Component, ComponentRef, ComponentType};

use crate::{CrawlerDepthLimit, Order};

/// The stack of accumulators from the root down to the node being visited.
///
/// Leaves may have no accumulator (see [`PathAwareVisitor::create_for_file`]).
#[derive(Debug)]
pub struct Path<T> {
    stack: Vec<(ComponentRef, Option<T>)>,
}

impl<T> Path<T> {
    fn new() -> Self {
        Self { stack: Vec::new() }
    }

    fn push(&mut self, reference: ComponentRef, element: Option<T>) {
        self.stack.push((reference, element));
    }

    fn pop(&mut self) -> Option<(ComponentRef, Option<T>)> {
        self.stack.pop()
    }

    /// Accumulator of the node being visited.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.stack.last().and_then(|(_, e)| e.as_ref())
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.stack.last_mut().and_then(|(_, e)| e.as_mut())
    }

    /// Accumulator of the parent, `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<&T> {
        let len = self.stack.len();
        if len < 2 {
            return None;
        }
        self.stack[len - 2].1.as_ref()
    }

    pub fn parent_mut(&mut self) -> Option<&mut T> {
        let len = self.stack.len();
        if len < 2 {
            return None;
        }
        self.stack[len - 2].1.as_mut()
    }

    /// Reference of the parent, `None` at the root.
    #[must_use]
    pub fn parent_ref(&self) -> Option<ComponentRef> {
        let len = self.stack.len();
        len.checked_sub(2).map(|i| self.stack[i].0)
    }

    /// Both the current accumulator and the parent's, for merging upwards.
    pub fn current_and_parent_mut(&mut self) -> (Option<&mut T>, Option<&mut T>) {
        match self.stack.split_last_mut() {
            Some(((_, current), rest)) => (
                current.as_mut(),
                rest.last_mut().and_then(|(_, e)| e.as_mut()),
            ),
            None => (None, None),
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.stack.len() == 1
    }

    /// Number of nodes on the path, the current one included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Accumulators from the current node up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = (ComponentRef, Option<&T>)> {
        self.stack.iter().rev().map(|(r, e)| (*r, e.as_ref()))
    }
}

/// A visitor that keeps one accumulator of type `Self::Element` per node on
/// the current path.
///
/// Accumulators are created when the walk enters a node and dropped once its
/// subtree completes.
pub trait PathAwareVisitor {
    type Element;
    type Error;

    fn depth_limit(&self) -> CrawlerDepthLimit {
        CrawlerDepthLimit::LEAVES
    }

    fn order(&self) -> Order;

    /// Accumulator for a non-leaf node.
    fn create_for_any(&mut self, component: &Component) -> Self::Element;

    /// Accumulator for a leaf, if any.
    fn create_for_file(&mut self, component: &Component) -> Option<Self::Element> {
        Some(self.create_for_any(component))
    }

    fn visit_any(
        &mut self,
        _component: &Component,
        _path: &mut Path<Self::Element>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_project(
        &mut self,
        _component: &Component,
        _path: &mut Path<Self::Element>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_module(
        &mut self,
        _component: &Component,
        _path: &mut Path<Self::Element>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_directory(
        &mut self,
        _component: &Component,
        _path: &mut Path<Self::Element>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_file(
        &mut self,
        _component: &Component,
        _path: &mut Path<Self::Element>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_view(
        &mut self,
        _component: &Component,
        _path: &mut Path<Self::Element>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_subview(
        &mut self,
        _component: &Component,
        _path: &mut Path<Self::Element>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_project_view(
        &mut self,
        _component: &Component,
        _path: &mut Path<Self::Element>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk `root` depth-first, maintaining the accumulator stack of `visitor`.
pub fn crawl_with_path<V>(root: &Component, visitor: &mut V) -> Result<(), V::Error>
where
    V: PathAwareVisitor + ?Sized,
{
    let limit = visitor.depth_limit();
    let order = visitor.order();
    let mut path = Path::new();
    walk(root, visitor, &mut path, limit, order)
}

fn walk<V>(
    component: &Component,
    visitor: &mut V,
    path: &mut Path<V::Element>,
    limit: CrawlerDepthLimit,
    order: Order,
) -> Result<(), V::Error>
where
    V: PathAwareVisitor + ?Sized,
{
    if limit.is_deeper_than(component.kind) {
        return Ok(());
    }
    let element = if component.is_leaf() {
        visitor.create_for_file(component)
    } else {
        Some(visitor.create_for_any(component))
    };
    path.push(component.reference, element);
    let result = walk_entered(component, visitor, path, limit, order);
    path.pop();
    result
}

fn walk_entered<V>(
    component: &Component,
    visitor: &mut V,
    path: &mut Path<V::Element>,
    limit: CrawlerDepthLimit,
    order: Order,
) -> Result<(), V::Error>
where
    V: PathAwareVisitor + ?Sized,
{
    let fires = !limit.is_above_ceiling(component.kind);
    if fires && order == Order::PreOrder {
        dispatch(visitor, component, path)?;
    }
    for child in &component.children {
        walk(child, visitor, path, limit, order)?;
    }
    if fires && order == Order::PostOrder {
        dispatch(visitor, component, path)?;
    }
    Ok(())
}

fn dispatch<V>(
    visitor: &mut V,
    component: &Component,
    path: &mut Path<V::Element>,
) -> Result<(), V::Error>
where
    V: PathAwareVisitor + ?Sized,
{
    visitor.visit_any(component, path)?;
    match component.kind {
        ComponentType::Project => visitor.visit_project(component, path),
        ComponentType::Module => visitor.visit_module(component, path),
        ComponentType::Directory => visitor.visit_directory(component, path),
        ComponentType::File => visitor.visit_file(component, path),
        ComponentType::View => visitor.visit_view(component, path),
        ComponentType::Subview => visitor.visit_subview(component, path),
        ComponentType::ProjectView => visitor.visit_project_view(component, path),
    }
}
