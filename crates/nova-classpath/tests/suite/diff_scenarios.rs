use std::path::PathBuf;

use nova_classpath::{
    ClasspathChangeRequest, ClasspathDiff, ClasspathDiffOutcome, ClasspathEntryView,
    ClasspathEvent, ClasspathSnapshot, DiffOptions, PendingClasspathChange, ResultFlags,
    RootCache,
};
use nova_delta::{ChangeFlags, ChangeKind, DeltaNode, ElementHandle, ElementKind};
use pretty_assertions::assert_eq;

use super::{root, PathRoots};

fn project() -> ElementHandle {
    ElementHandle::project("P")
}

fn snapshot(entries: Vec<ClasspathEntryView>, output: Option<&str>) -> ClasspathSnapshot {
    ClasspathSnapshot::new(entries.clone(), output.map(PathBuf::from), entries)
}

fn request(
    old: Vec<ClasspathEntryView>,
    new: Vec<ClasspathEntryView>,
) -> ClasspathChangeRequest {
    PendingClasspathChange::new(project(), snapshot(old, Some("/P/bin")))
        .complete(snapshot(new, Some("/P/bin")))
}

fn run(roots: &PathRoots, request: &ClasspathChangeRequest) -> ClasspathDiffOutcome {
    run_with(roots, request, DiffOptions::default())
}

fn run_with(
    roots: &PathRoots,
    request: &ClasspathChangeRequest,
    options: DiffOptions,
) -> ClasspathDiffOutcome {
    let cache = RootCache::new();
    ClasspathDiff::new(roots, &cache, options).diff(request)
}

/// `(element name, kind, flags)` of every root-level delta, in order.
fn root_deltas(outcome: &ClasspathDiffOutcome) -> Vec<(String, ChangeKind, ChangeFlags)> {
    outcome
        .deltas()
        .filter(|delta| delta.element().kind() != ElementKind::JavaProject)
        .map(|delta| (delta.element().name().to_owned(), delta.kind(), delta.flags()))
        .collect()
}

fn project_flags(outcome: &ClasspathDiffOutcome) -> ChangeFlags {
    outcome
        .deltas()
        .filter(|delta| delta.element() == &project())
        .fold(ChangeFlags::empty(), |acc, delta| acc | delta.flags())
}

#[test]
fn identical_snapshots_produce_nothing() {
    let entries = vec![
        ClasspathEntryView::source("/P/src"),
        ClasspathEntryView::library("/lib/x.jar")
            .with_source_attachment(Some("/lib/x-src.zip".into()), None),
    ];
    let outcome = run(&PathRoots::default(), &request(entries.clone(), entries));

    assert_eq!(outcome.flags, ResultFlags::NO_DELTA);
    assert!(outcome.events.is_empty());
}

#[test]
fn swapping_two_entries_reorders_both_roots() {
    let a = ClasspathEntryView::source("/P/src");
    let b = ClasspathEntryView::library("/lib/x.jar");
    let outcome = run(
        &PathRoots::default(),
        &request(vec![a.clone(), b.clone()], vec![b, a]),
    );

    assert_eq!(outcome.flags, ResultFlags::HAS_DELTA);
    assert_eq!(
        root_deltas(&outcome),
        [
            ("/P/src".to_owned(), ChangeKind::Changed, ChangeFlags::REORDER),
            ("/lib/x.jar".to_owned(), ChangeKind::Changed, ChangeFlags::REORDER),
        ]
    );
    assert_eq!(outcome.closed_roots().count(), 0);
    assert_eq!(
        project_flags(&outcome),
        ChangeFlags::CLASSPATH_CHANGED | ChangeFlags::RESOLVED_CLASSPATH_CHANGED
    );
}

#[test]
fn removing_a_library_closes_its_root() {
    let src = ClasspathEntryView::source("/P/src");
    let jar = ClasspathEntryView::library("/lib/x.jar");
    let outcome = run(
        &PathRoots::default(),
        &request(vec![src.clone(), jar], vec![src]),
    );

    assert_eq!(
        outcome.flags,
        ResultFlags::HAS_DELTA | ResultFlags::HAS_LIBRARY_CHANGE
    );
    assert_eq!(
        root_deltas(&outcome),
        [(
            "/lib/x.jar".to_owned(),
            ChangeKind::Changed,
            ChangeFlags::REMOVED_FROM_CLASSPATH
        )]
    );
    let jar_root = root(&project(), "/lib/x.jar");
    assert!(outcome.closed_roots().any(|closed| closed == &jar_root));
}

#[test]
fn removing_a_project_entry_has_no_root_delta() {
    let src = ClasspathEntryView::source("/P/src");
    let outcome = run(
        &PathRoots::default(),
        &request(
            vec![src.clone(), ClasspathEntryView::project("/Q")],
            vec![src],
        ),
    );

    assert_eq!(
        outcome.flags,
        ResultFlags::HAS_DELTA | ResultFlags::HAS_PROJECT_CHANGE
    );
    assert!(root_deltas(&outcome).is_empty());
}

#[test]
fn adding_a_jar_reports_one_added_root() {
    let src = ClasspathEntryView::source("/P/src");
    let jar = ClasspathEntryView::library("/lib/new.jar");
    let outcome = run(
        &PathRoots::default(),
        &request(vec![src.clone()], vec![src, jar]),
    );

    assert_eq!(
        outcome.flags,
        ResultFlags::HAS_DELTA | ResultFlags::HAS_LIBRARY_CHANGE
    );
    let added: Vec<_> = root_deltas(&outcome)
        .into_iter()
        .filter(|(_, _, flags)| flags.contains(ChangeFlags::ADDED_TO_CLASSPATH))
        .collect();
    assert_eq!(
        added,
        [(
            "/lib/new.jar".to_owned(),
            ChangeKind::Changed,
            ChangeFlags::ADDED_TO_CLASSPATH
        )]
    );
}

#[test]
fn attaching_source_reports_only_source_attached() {
    let jar = ClasspathEntryView::library("/lib/x.jar");
    let attached = jar
        .clone()
        .with_source_attachment(Some("/lib/x-src.zip".into()), None);
    let outcome = run(&PathRoots::default(), &request(vec![jar], vec![attached]));

    assert_eq!(outcome.flags, ResultFlags::HAS_DELTA);
    assert_eq!(
        root_deltas(&outcome),
        [(
            "/lib/x.jar".to_owned(),
            ChangeKind::Changed,
            ChangeFlags::SOURCE_ATTACHED
        )]
    );
    let jar_root = root(&project(), "/lib/x.jar");
    assert_eq!(outcome.closed_roots().collect::<Vec<_>>(), [&jar_root]);
}

#[test]
fn replacing_attachment_root_reports_both_flags() {
    let jar = ClasspathEntryView::library("/lib/x.jar")
        .with_source_attachment(Some("/lib/x-src.zip".into()), Some("src".into()));
    let moved = jar
        .clone()
        .with_source_attachment(Some("/lib/x-src.zip".into()), Some("java".into()));
    let outcome = run(&PathRoots::default(), &request(vec![jar], vec![moved]));

    assert_eq!(
        root_deltas(&outcome),
        [(
            "/lib/x.jar".to_owned(),
            ChangeKind::Changed,
            ChangeFlags::SOURCE_ATTACHED | ChangeFlags::SOURCE_DETACHED
        )]
    );
}

#[test]
fn changed_attributes_are_carried_on_the_root_delta() {
    let jar = ClasspathEntryView::library("/lib/x.jar").with_attribute("optional", "true");
    let changed = ClasspathEntryView::library("/lib/x.jar")
        .with_attribute("javadoc_location", "https://example.com/api");
    let outcome = run(&PathRoots::default(), &request(vec![jar], vec![changed]));

    let delta = outcome
        .deltas()
        .find(|delta| delta.flags().contains(ChangeFlags::CLASSPATH_ATTRIBUTES))
        .unwrap();
    let names: Vec<_> = delta
        .attribute_deltas()
        .iter()
        .map(|attribute| (attribute.name.as_str(), attribute.kind))
        .collect();
    assert_eq!(
        names,
        [
            ("optional", ChangeKind::Removed),
            ("javadoc_location", ChangeKind::Added),
        ]
    );
}

#[test]
fn dropped_container_is_forgotten() {
    let jre = ClasspathEntryView::container("JRE_CONTAINER");
    let src = ClasspathEntryView::source("/P/src");
    let request = PendingClasspathChange::new(
        project(),
        ClasspathSnapshot::new(
            vec![jre, src.clone()],
            None,
            vec![src.clone()],
        ),
    )
    .complete(ClasspathSnapshot::new(vec![src.clone()], None, vec![src]));
    let outcome = run(&PathRoots::default(), &request);

    assert_eq!(outcome.flags, ResultFlags::HAS_DELTA);
    assert_eq!(
        outcome.events,
        [
            ClasspathEvent::Delta(DeltaNode::leaf(
                project(),
                ChangeKind::Changed,
                ChangeFlags::CLASSPATH_CHANGED
            )),
            ClasspathEvent::ForgetContainer {
                project: project(),
                path: PathBuf::from("JRE_CONTAINER"),
            },
        ]
    );
}

#[test]
fn first_resolution_stops_after_refresh() {
    let src = ClasspathEntryView::source("/P/src");
    let request = PendingClasspathChange::unresolved(project(), vec![src.clone()], None)
        .complete(ClasspathSnapshot::new(vec![src.clone()], None, vec![src]));
    let outcome = run(&PathRoots::default(), &request);

    assert_eq!(outcome.flags, ResultFlags::HAS_DELTA);
    assert_eq!(
        outcome.events,
        [
            ClasspathEvent::Delta(DeltaNode::leaf(
                project(),
                ChangeKind::Changed,
                ChangeFlags::RESOLVED_CLASSPATH_CHANGED
            )),
            ClasspathEvent::RefreshExternalArchives { project: project() },
        ]
    );
}

#[test]
fn moving_the_output_location_exposes_and_hides_fragments() {
    let src_root = root(&project(), "/P/src");
    let reappearing = src_root.child(ElementKind::PackageFragment, "bin");
    let hidden = src_root.child(ElementKind::PackageFragment, "out");
    let roots = PathRoots::default()
        .with_fragments("/P/bin", vec![reappearing.clone()])
        .with_fragments("/P/out", vec![hidden.clone()]);

    let src = ClasspathEntryView::source("/P/src");
    let request =
        PendingClasspathChange::new(project(), snapshot(vec![src.clone()], Some("/P/bin")))
            .complete(snapshot(vec![src], Some("/P/out")));
    let outcome = run(&roots, &request);

    assert_eq!(
        fragment_deltas(&outcome),
        [
            (reappearing, ChangeKind::Added),
            (hidden, ChangeKind::Removed),
        ]
    );
    assert!(outcome.closed_roots().any(|closed| closed == &src_root));
}

fn fragment_deltas(outcome: &ClasspathDiffOutcome) -> Vec<(ElementHandle, ChangeKind)> {
    outcome
        .deltas()
        .filter(|delta| delta.element().kind() == ElementKind::PackageFragment)
        .map(|delta| (delta.element().clone(), delta.kind()))
        .collect()
}

fn output_fixture() -> (ElementHandle, ElementHandle, PathRoots) {
    let src_root = root(&project(), "/P/src");
    let fragment = src_root.child(ElementKind::PackageFragment, "bin");
    let roots = PathRoots::default().with_fragments("/P/bin", vec![fragment.clone()]);
    (src_root, fragment, roots)
}

#[test]
fn setting_an_output_location_only_hides_fragments() {
    let (_, fragment, roots) = output_fixture();
    let request = PendingClasspathChange::new(project(), snapshot(vec![], None))
        .complete(snapshot(vec![], Some("/P/bin")));
    let outcome = run(&roots, &request);

    assert_eq!(outcome.flags, ResultFlags::HAS_DELTA);
    assert!(project_flags(&outcome).contains(ChangeFlags::CLASSPATH_CHANGED));
    assert_eq!(fragment_deltas(&outcome), [(fragment, ChangeKind::Removed)]);
    assert_eq!(outcome.closed_roots().count(), 0);
}

#[test]
fn clearing_the_output_location_only_exposes_fragments() {
    let (src_root, fragment, roots) = output_fixture();
    let request = PendingClasspathChange::new(project(), snapshot(vec![], Some("/P/bin")))
        .complete(snapshot(vec![], None));
    let outcome = run(&roots, &request);

    assert_eq!(outcome.flags, ResultFlags::HAS_DELTA);
    assert!(project_flags(&outcome).contains(ChangeFlags::CLASSPATH_CHANGED));
    assert_eq!(fragment_deltas(&outcome), [(fragment, ChangeKind::Added)]);
    let closed: Vec<_> = outcome.closed_roots().cloned().collect();
    assert_eq!(closed, [src_root]);
}

#[test]
fn annotation_paths_only_matter_with_null_analysis() {
    let jar = ClasspathEntryView::library("/lib/x.jar");
    let annotated = jar.clone().with_external_annotation_path("/ann/x");
    let request = request(vec![jar], vec![annotated]);

    let relaxed = run(&PathRoots::default(), &request);
    assert_eq!(relaxed.flags, ResultFlags::HAS_DELTA);
    assert!(root_deltas(&relaxed).is_empty());

    let strict = run_with(
        &PathRoots::default(),
        &request,
        DiffOptions { null_analysis: true },
    );
    assert_eq!(
        strict.flags,
        ResultFlags::HAS_DELTA | ResultFlags::HAS_LIBRARY_CHANGE
    );
    let flags: Vec<_> = root_deltas(&strict).into_iter().map(|(_, _, flags)| flags).collect();
    assert_eq!(
        flags,
        [
            ChangeFlags::REMOVED_FROM_CLASSPATH,
            ChangeFlags::ADDED_TO_CLASSPATH
        ]
    );
}
