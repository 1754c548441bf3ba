use nova_delta::{ChangeFlags, ChangeKind, DeltaNode, ElementHandle, ElementKind, NEED_CHILD_INDEX};
use proptest::prelude::*;

fn root_named(name: &str) -> ElementHandle {
    ElementHandle::project("P").child(ElementKind::PackageFragmentRoot, name)
}

fn flag_for(i: usize) -> ChangeFlags {
    [
        ChangeFlags::REORDER,
        ChangeFlags::ADDED_TO_CLASSPATH,
        ChangeFlags::REMOVED_FROM_CLASSPATH,
        ChangeFlags::SOURCE_ATTACHED,
        ChangeFlags::SOURCE_DETACHED,
        ChangeFlags::CLASSPATH_ATTRIBUTES,
        ChangeFlags::ARCHIVE_CONTENT_CHANGED,
        ChangeFlags::CONTENT,
    ][i % 8]
}

#[test]
fn third_distinct_child_builds_the_index() {
    let mut project = DeltaNode::new(ElementHandle::project("P"));
    project.changed(root_named("a"), ChangeFlags::REORDER);
    project.changed(root_named("b"), ChangeFlags::REORDER);
    assert!(!project.has_child_index());

    // Same key again: merged, no new child.
    project.changed(root_named("a"), ChangeFlags::CONTENT);
    assert_eq!(project.affected_children().len(), 2);
    assert!(!project.has_child_index());

    project.changed(root_named("c"), ChangeFlags::REORDER);
    assert_eq!(NEED_CHILD_INDEX, 3);
    assert!(project.has_child_index());
    assert_eq!(
        project.find(&root_named("a")).unwrap().flags(),
        ChangeFlags::REORDER | ChangeFlags::CONTENT
    );
}

#[test]
fn removal_keeps_index_consistent() {
    let mut project = DeltaNode::new(ElementHandle::project("P"));
    for name in ["a", "b", "c", "d"] {
        project.added(root_named(name));
    }
    project.removed(root_named("b"));

    let names: Vec<_> = project
        .affected_children()
        .iter()
        .map(|child| child.element().name().to_owned())
        .collect();
    assert_eq!(names, ["a", "c", "d"]);
    assert!(project.has_child_index());

    // Lookups after the shift still land on the right child.
    project.removed(root_named("d"));
    assert!(project.find(&root_named("d")).is_none());
    assert!(!project.has_child_index());
    assert_eq!(
        project.find(&root_named("c")).unwrap().kind(),
        ChangeKind::Added
    );
}

#[test]
fn remove_child_shifts_the_index() {
    let mut project = DeltaNode::new(ElementHandle::project("P"));
    for name in ["a", "b", "c", "d"] {
        project.added(root_named(name));
    }

    let removed = project.remove_child(&root_named("a")).unwrap();
    assert_eq!(removed.kind(), ChangeKind::Added);
    project.changed(root_named("a"), ChangeFlags::REORDER);
    assert!(project.remove_child(&root_named("c")).is_some());
    assert!(project.remove_child(&root_named("c")).is_none());

    let names: Vec<_> = project
        .affected_children()
        .iter()
        .map(|child| child.element().name().to_owned())
        .collect();
    assert_eq!(names, ["b", "d", "a"]);
    assert!(project.has_child_index());
    assert_eq!(project.find(&root_named("b")).unwrap().kind(), ChangeKind::Added);
    assert_eq!(
        project.find(&root_named("a")).unwrap().flags(),
        ChangeFlags::REORDER
    );

    project.clear_children();
    assert!(project.affected_children().is_empty());
    assert!(!project.has_child_index());
    assert!(project.find(&root_named("b")).is_none());
}

proptest! {
    #[test]
    fn indexed_lookups_match_linear_scan(
        order in Just((0..7usize).collect::<Vec<_>>()).prop_shuffle(),
        repeats in prop::collection::vec(0..7usize, 0..6),
    ) {
        let mut project = DeltaNode::new(ElementHandle::project("P"));
        for &i in order.iter().chain(repeats.iter()) {
            project.changed(root_named(&format!("root{i}")), flag_for(i));
        }

        prop_assert_eq!(project.affected_children().len(), 7);
        prop_assert!(project.has_child_index());

        for i in 0..7usize {
            let handle = root_named(&format!("root{i}"));
            let linear = project
                .affected_children()
                .iter()
                .find(|child| child.element() == &handle);
            let indexed = project.find(&handle);

            prop_assert!(linear.is_some());
            prop_assert_eq!(
                linear.map(|child| child.element()),
                indexed.map(|child| child.element())
            );
            prop_assert_eq!(indexed.map(|child| child.flags()), Some(flag_for(i)));
        }

        let inserted: Vec<_> = project
            .affected_children()
            .iter()
            .map(|child| child.element().name().to_owned())
            .collect();
        let expected: Vec<_> = order.iter().map(|i| format!("root{i}")).collect();
        prop_assert_eq!(inserted, expected);
    }
}
