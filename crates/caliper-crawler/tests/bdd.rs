//! BDD-style scenario tests for caliper-crawler.

use std::convert::Infallible;

use caliper_component::{Component, ComponentType};
use caliper_crawler::{
    CrawlerDepthLimit, Order, Path, PathAwareVisitor, TypeAwareVisitor, crawl, crawl_with_path,
};

fn views_tree() -> Component {
    Component::builder(ComponentType::View, 1)
        .child(
            Component::builder(ComponentType::Subview, 2)
                .child(Component::builder(ComponentType::ProjectView, 3).build())
                .build(),
        )
        .child(Component::builder(ComponentType::ProjectView, 4).build())
        .build()
}

#[derive(Default)]
struct TypeLog(Vec<(&'static str, u32)>);

impl TypeAwareVisitor for TypeLog {
    type Error = Infallible;

    fn order(&self) -> Order {
        Order::PreOrder
    }

    fn visit_view(&mut self, c: &Component) -> Result<(), Infallible> {
        self.0.push(("view", c.reference));
        Ok(())
    }

    fn visit_subview(&mut self, c: &Component) -> Result<(), Infallible> {
        self.0.push(("subview", c.reference));
        Ok(())
    }

    fn visit_project_view(&mut self, c: &Component) -> Result<(), Infallible> {
        self.0.push(("project_view", c.reference));
        Ok(())
    }
}

// =============================================================================
// Type-aware crawling
// =============================================================================

#[test]
fn given_a_views_tree_when_crawled_then_views_callbacks_fire() {
    // Given a view holding a subview and a project view
    let root = views_tree();

    // When it is crawled in pre-order
    let mut v = TypeLog::default();
    crawl(&root, &mut v).unwrap();

    // Then each type fires its own callback, in report order
    assert_eq!(
        v.0,
        vec![("view", 1), ("subview", 2), ("project_view", 3), ("project_view", 4)]
    );
}

#[test]
fn given_a_ceiling_when_crawled_then_higher_types_are_passed_through() {
    struct Leaves(Vec<u32>);
    impl TypeAwareVisitor for Leaves {
        type Error = Infallible;
        fn depth_limit(&self) -> CrawlerDepthLimit {
            CrawlerDepthLimit::LEAVES.starting_at(ComponentType::File, ComponentType::ProjectView)
        }
        fn order(&self) -> Order {
            Order::PostOrder
        }
        fn visit_any(&mut self, c: &Component) -> Result<(), Infallible> {
            self.0.push(c.reference);
            Ok(())
        }
    }

    // Given a views tree and a visitor that only wants leaves
    let root = views_tree();

    // When crawled
    let mut v = Leaves(Vec::new());
    crawl(&root, &mut v).unwrap();

    // Then only the project views fire, although they sit under other types
    assert_eq!(v.0, vec![3, 4]);
}

// =============================================================================
// Path-aware crawling
// =============================================================================

#[test]
fn given_nested_directories_when_crawled_with_path_then_depth_is_tracked() {
    struct Depths(Vec<(u32, usize)>);
    impl PathAwareVisitor for Depths {
        type Element = u32;
        type Error = Infallible;
        fn order(&self) -> Order {
            Order::PreOrder
        }
        fn create_for_any(&mut self, c: &Component) -> u32 {
            c.reference
        }
        fn visit_any(&mut self, c: &Component, path: &mut Path<u32>) -> Result<(), Infallible> {
            assert_eq!(path.current(), Some(&c.reference));
            self.0.push((c.reference, path.depth()));
            Ok(())
        }
    }

    // Given a project > module > directory > file chain
    let root = Component::builder(ComponentType::Project, 1)
        .child(
            Component::builder(ComponentType::Module, 2)
                .child(
                    Component::builder(ComponentType::Directory, 3)
                        .child(Component::builder(ComponentType::File, 4).build())
                        .build(),
                )
                .build(),
        )
        .build();

    // When crawled with a path
    let mut v = Depths(Vec::new());
    crawl_with_path(&root, &mut v).unwrap();

    // Then the path grows one level per type
    assert_eq!(v.0, vec![(1, 1), (2, 2), (3, 3), (4, 4)]);
}

#[test]
fn given_a_failing_path_visitor_when_crawled_then_the_error_is_returned() {
    struct Fail;
    impl PathAwareVisitor for Fail {
        type Element = ();
        type Error = &'static str;
        fn order(&self) -> Order {
            Order::PostOrder
        }
        fn create_for_any(&mut self, _c: &Component) {}
        fn visit_project_view(
            &mut self,
            _c: &Component,
            _path: &mut Path<()>,
        ) -> Result<(), &'static str> {
            Err("no project views allowed")
        }
    }

    // Given a views tree and a visitor that rejects project views
    // When crawled
    let result = crawl_with_path(&views_tree(), &mut Fail);

    // Then the first error aborts the walk
    assert_eq!(result, Err("no project views allowed"));
}
