use caliper_component::{Component, ComponentType};

use crate::{CrawlerDepthLimit, Order};

/// A visitor with one callback per component type.
///
/// `visit_any` fires for every visited node, before the type-specific
/// callback. Every callback defaults to doing nothing.
pub trait TypeAwareVisitor {
    type Error;

    fn depth_limit(&self) -> CrawlerDepthLimit {
        CrawlerDepthLimit::LEAVES
    }

    fn order(&self) -> Order;

    fn visit_any(&mut self, _component: &Component) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_project(&mut self, _component: &Component) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_module(&mut self, _component: &Component) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_directory(&mut self, _component: &Component) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_file(&mut self, _component: &Component) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_view(&mut self, _component: &Component) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_subview(&mut self, _component: &Component) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_project_view(&mut self, _component: &Component) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk `root` depth-first, calling `visitor` on every node within its window.
pub fn crawl<V>(root: &Component, visitor: &mut V) -> Result<(), V::Error>
where
    V: TypeAwareVisitor + ?Sized,
{
    let limit = visitor.depth_limit();
    let order = visitor.order();
    walk(root, visitor, limit, order)
}

fn walk<V>(
    component: &Component,
    visitor: &mut V,
    limit: CrawlerDepthLimit,
    order: Order,
) -> Result<(), V::Error>
where
    V: TypeAwareVisitor + ?Sized,
{
    if limit.is_deeper_than(component.kind) {
        return Ok(());
    }
    let fires = !limit.is_above_ceiling(component.kind);
    if fires && order == Order::PreOrder {
        dispatch(visitor, component)?;
    }
    for child in &component.children {
        walk(child, visitor, limit, order)?;
    }
    if fires && order == Order::PostOrder {
        dispatch(visitor, component)?;
    }
    Ok(())
}

pub(crate) fn dispatch<V>(visitor: &mut V, component: &Component) -> Result<(), V::Error>
where
    V: TypeAwareVisitor + ?Sized,
{
    visitor.visit_any(component)?;
    match component.kind {
        ComponentType::Project => visitor.visit_project(component),
        ComponentType::Module => visitor.visit_module(component),
        ComponentType::Directory => visitor.visit_directory(component),
        ComponentType::File => visitor.visit_file(component),
        ComponentType::View => visitor.visit_view(component),
        ComponentType::Subview => visitor.visit_subview(component),
        ComponentType::ProjectView => visitor.visit_project_view(component),
    }
}
