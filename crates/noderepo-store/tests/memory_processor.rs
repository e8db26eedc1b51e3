//! Integration tests: drive the in-memory processor from a TOML fixture.
//!
//! The fixture in tests/fixtures/store.toml seeds two workspaces. Each test
//! builds requests against it, runs them through `RequestProcessor`, and
//! checks both the recorded outcomes and the resulting store state.

use noderepo_graph::{Location, Name, Path, Property, Value};
use noderepo_request::{
    GraphRequest, ReadPropertyRequest, Request, RequestBatch, UpdatePropertiesRequest,
};
use noderepo_store::{MemoryRepository, ProcessError, RequestProcessor, StoreConfig};
use std::path::PathBuf;
use uuid::Uuid;

const INTRO_ID: &str = "5b1c3d6e-0f7a-4b8e-9c2d-1e3f5a7b9c0d";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixture_repo() -> MemoryRepository {
    init_tracing();
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/store.toml");
    let config = StoreConfig::load(&path)
        .unwrap_or_else(|e| panic!("failed to load {}: {e}", path.display()));
    MemoryRepository::from_config(&config).expect("fixture must seed")
}

fn intro_id() -> Uuid {
    Uuid::parse_str(INTRO_ID).expect("fixture uuid is valid")
}

fn path(raw: &str) -> Path {
    Path::parse(raw).expect("valid path")
}

fn name(raw: &str) -> Name {
    Name::local(raw).expect("valid name")
}

#[test]
fn fixture_seeds_both_workspaces() {
    let repo = fixture_repo();
    assert_eq!(
        repo.workspace_names().collect::<Vec<_>>(),
        vec!["default", "staging"]
    );
    assert_eq!(repo.default_workspace(), "default");

    let intro = repo
        .node("default", &Location::with_uuid(intro_id()))
        .expect("intro is seeded");
    assert_eq!(intro.path(), &path("/articles/intro"));
    let tags = intro.property(&name("tags")).expect("tags are seeded");
    assert_eq!(
        tags.values(),
        &[Value::from("guide"), Value::from("start")]
    );
}

#[test]
fn read_resolves_identifier_to_full_location() {
    let mut repo = fixture_repo();
    let mut req = ReadPropertyRequest::new(Location::with_uuid(intro_id()), "default", name("title"));
    repo.process_read_property(&mut req).expect("read succeeds");

    assert_eq!(
        req.property(),
        Some(&Property::single(name("title"), "Introduction"))
    );
    let actual = req.actual_location_of_node().expect("location recorded");
    assert!(actual.has_path());
    assert!(actual.is_same(req.on()));
    assert_eq!(actual, &Location::resolved(path("/articles/intro"), intro_id()));
}

#[test]
fn batch_coalesces_updates_then_reads_merged_state() {
    let mut repo = fixture_repo();
    let intro = Location::at_path(path("/articles/intro"));

    let mut batch = RequestBatch::new();
    batch.push(
        UpdatePropertiesRequest::new(
            intro.clone(),
            "default",
            [
                Property::single(name("title"), "Intro v2"),
                Property::single(name("revision"), 2_i64),
            ],
        )
        .expect("valid update"),
    );
    batch.push(
        UpdatePropertiesRequest::new(
            intro.clone(),
            "default",
            [
                Property::single(name("revision"), 3_i64),
                Property::empty(name("tags")),
            ],
        )
        .expect("valid update"),
    );
    batch.push(ReadPropertyRequest::new(intro.clone(), "default", name("revision")));
    assert_eq!(batch.len(), 2);
    assert!(!batch.is_read_only());

    let processed = repo.process_batch(&mut batch).expect("batch succeeds");
    assert_eq!(processed, 2);

    let requests = batch.into_requests();
    let GraphRequest::UpdateProperties(update) = &requests[0] else {
        panic!("first request must be the coalesced update");
    };
    let rendered: Vec<String> = update.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![r#"title=["Intro v2"]"#, "revision=[3]", "tags=[]"]
    );
    assert!(update.actual_location_of_node().is_some());

    let GraphRequest::ReadProperty(read) = &requests[1] else {
        panic!("second request must be the read");
    };
    assert_eq!(
        read.property(),
        Some(&Property::single(name("revision"), 3_i64))
    );

    let node = repo
        .node("default", &intro)
        .expect("intro still exists");
    assert!(node.property(&name("tags")).is_none());
}

#[test]
fn batch_stops_at_first_failure() {
    let mut repo = fixture_repo();
    let drafts = Location::at_path(path("/drafts"));
    let mut batch = RequestBatch::new();
    for workspace in ["staging", "default", "archive"] {
        batch.push(ReadPropertyRequest::new(
            drafts.clone(),
            workspace,
            name("published"),
        ));
    }

    let err = repo
        .process_batch(&mut batch)
        .expect_err("drafts is not in the default workspace");
    assert!(matches!(err, ProcessError::NodeNotFound { ref workspace, .. } if workspace == "default"));

    let mut requests = batch.iter();
    let first = requests.next().expect("first request");
    assert!(first.actual_location_of_node().is_some());
    let third = requests.nth(1).expect("third request");
    assert!(third.actual_location_of_node().is_none());
}

#[test]
fn unknown_workspace_error_names_the_workspace() {
    let mut repo = fixture_repo();
    let mut req = UpdatePropertiesRequest::new(
        Location::at_path(path("/articles")),
        "archive",
        [Property::single(name("title"), "x")],
    )
    .expect("valid update");
    let err = repo
        .process_update_properties(&mut req)
        .expect_err("archive does not exist");
    insta::assert_snapshot!(err.to_string(), @r#"workspace "archive" does not exist"#);
}

#[test]
fn updates_pushed_after_processing_run_separately() {
    let mut repo = fixture_repo();
    let intro = Location::with_uuid(intro_id());

    let mut batch = RequestBatch::new();
    batch.push(
        UpdatePropertiesRequest::new(
            intro.clone(),
            "default",
            [Property::single(name("revision"), 2_i64)],
        )
        .expect("valid update"),
    );
    assert_eq!(repo.process_batch(&mut batch).expect("first pass"), 1);

    batch.push(
        UpdatePropertiesRequest::new(
            intro.clone(),
            "default",
            [Property::single(name("title"), "Intro v2")],
        )
        .expect("valid update"),
    );
    assert_eq!(batch.len(), 2);

    let resolved = Location::resolved(path("/articles/intro"), intro_id());
    let mut requests = batch.iter();
    let first = requests.next().expect("processed update");
    assert_eq!(first.actual_location_of_node(), Some(&resolved));
    let second = requests.next().expect("pending update");
    assert!(second.actual_location_of_node().is_none());
}

#[test]
fn last_duplicate_in_an_update_is_the_stored_value() {
    let mut repo = fixture_repo();
    let mut req = UpdatePropertiesRequest::new(
        Location::at_path(path("/articles")),
        "default",
        [
            Property::single(name("title"), "first"),
            Property::single(name("title"), "second"),
        ],
    )
    .expect("valid update");
    repo.process_update_properties(&mut req)
        .expect("update succeeds");

    let stored = repo
        .node("default", req.on())
        .expect("articles exists")
        .property(&name("title"))
        .cloned();
    assert_eq!(req.property(&name("title")).cloned(), stored);
    assert_eq!(stored, Some(Property::single(name("title"), "second")));
}
