//! Register, edit, add and remove across every storage backend

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use skillhub_core::storage::{JsonFileStorage, MemoryStorage, SqliteStorage};
use skillhub_core::{
    open_configured, Backend, Config, CredentialStore, Document, DocumentDraft, DocumentRepository,
    DocumentType, Error, Section, SessionManager, SortKey, Storage, ViewState,
};
use tempfile::TempDir;

fn seed() -> Vec<Document> {
    [
        ("seed-1", "Transcript.pdf", 3, &["Curriculum"][..]),
        ("seed-2", "React Certificate.png", 2, &["Skill", "React", "Certificate"][..]),
        ("seed-3", "Lab Report.docx", 1, &["Assignment", "Physics"][..]),
    ]
    .into_iter()
    .map(|(id, name, day, tags)| Document {
        id: id.to_string(),
        name: name.to_string(),
        doc_type: DocumentType::from_file_name(name),
        upload_date: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        tags: tags.iter().copied().collect(),
        url: format!("https://files.example.com/{}", id),
    })
    .collect()
}

fn ids(docs: &[Document]) -> Vec<String> {
    docs.iter().map(|d| d.id.clone()).collect()
}

fn run_scenario(storage: Arc<dyn Storage>) {
    let seed = seed();
    let store = CredentialStore::new(storage.clone());

    // Register
    let record = store.authenticate_or_register("a@x.ac.in", "pw1", &seed).unwrap();
    let identity = record.identity();
    assert_eq!(record.profile.name, "Student a");
    assert_eq!(record.documents, seed);

    // Profile edit
    let mut profile = record.profile.clone();
    assert!(profile.set_field("major", "CS"));
    store.update_profile("a@x.ac.in", profile).unwrap();

    // Add
    let repo = DocumentRepository::new(&store);
    let added = repo
        .add(
            &identity,
            DocumentDraft::new("notes.pdf", "file:///tmp/notes.pdf").with_tags(["Curriculum"]),
        )
        .unwrap();
    let docs = repo.list(&identity).unwrap();
    assert_eq!(docs.len(), seed.len() + 1);
    assert_eq!(docs[0].id, added.id);
    assert_eq!(docs[0].name, "notes.pdf");

    // Remove
    repo.remove(&identity, &added.id).unwrap();
    assert_eq!(ids(&repo.list(&identity).unwrap()), ids(&seed));

    // A later login sees the edits and rejects a wrong secret
    let again = store.authenticate_or_register("A@X.ac.in", "pw1", &[]).unwrap();
    assert_eq!(again.profile.major, "CS");
    assert_eq!(again.documents, seed);
    assert!(matches!(
        store.authenticate_or_register("a@x.ac.in", "pw2", &[]),
        Err(Error::InvalidCredential)
    ));
    assert_eq!(store.record_count().unwrap(), 1);

    // Session survives a new manager on the same storage
    let mut session = SessionManager::new(storage.clone(), store.clone());
    session.login(&again).unwrap();
    let mut restored = SessionManager::new(storage, store);
    let current = restored.restore_session().unwrap().unwrap();
    assert_eq!(current.identity(), identity);
}

#[test]
fn test_scenario_memory_backend() {
    run_scenario(Arc::new(MemoryStorage::new()));
}

#[test]
fn test_scenario_json_backend() {
    let temp = TempDir::new().unwrap();
    run_scenario(Arc::new(JsonFileStorage::open(temp.path()).unwrap()));
}

#[test]
fn test_scenario_sqlite_backend() {
    let temp = TempDir::new().unwrap();
    run_scenario(Arc::new(SqliteStorage::open(&temp.path().join("skillhub.db")).unwrap()));
}

#[test]
fn test_configured_backend_persists_across_handles() {
    let temp = TempDir::new().unwrap();
    for backend in [Backend::Json, Backend::Sqlite] {
        let config = Config {
            data_dir: temp.path().join(backend.to_string()),
            backend,
            ..Config::default()
        };
        std::fs::create_dir_all(&config.data_dir).unwrap();

        let first = CredentialStore::new(open_configured(&config).unwrap());
        first.authenticate_or_register("b@x.ac.in", "pw", &seed()).unwrap();

        let second = CredentialStore::new(open_configured(&config).unwrap());
        let record = second.get_record("b@x.ac.in").unwrap().unwrap();
        assert_eq!(record.documents.len(), 3);
    }
}

#[test]
fn test_section_views_over_a_collection() {
    let store = CredentialStore::new(Arc::new(MemoryStorage::new()));
    let record = store.authenticate_or_register("c@x.ac.in", "pw", &seed()).unwrap();
    let docs = DocumentRepository::new(&store).list(&record.identity()).unwrap();

    let skills = Section::Skills.view().apply(&Section::Skills.documents(&docs));
    assert_eq!(ids(&skills), vec!["seed-2"]);

    let mut view = ViewState::new();
    assert_eq!(ids(&view.apply(&docs)), vec!["seed-1", "seed-2", "seed-3"]);
    view.select_sort(SortKey::Name);
    assert_eq!(ids(&view.apply(&docs)), vec!["seed-3", "seed-2", "seed-1"]);
    view.toggle_tag("Physics");
    view.toggle_tag("Curriculum");
    assert_eq!(ids(&view.apply(&docs)), vec!["seed-3", "seed-1"]);
}
