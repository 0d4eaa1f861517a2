use hanamigen::generator::{ArtifactWriter, RenderedArtifact};
use hanamigen::ArtifactKind;
use std::fs;
use std::path::PathBuf;

fn artifact(kind: ArtifactKind, path: &str, contents: &str) -> RenderedArtifact {
    RenderedArtifact {
        kind,
        relative_path: PathBuf::from(path),
        contents: contents.to_string(),
    }
}

#[test]
fn test_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ArtifactWriter::new(dir.path().join("out"));
    let report = writer
        .write_all(&[artifact(ArtifactKind::Routes, "config/routes.rb", "routes\n")])
        .unwrap();

    let path = dir.path().join("out/config/routes.rb");
    assert_eq!(fs::read_to_string(&path).unwrap(), "routes\n");
    assert_eq!(report.written, vec![path]);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_overwrites_regenerated_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ArtifactWriter::new(dir.path());
    for kind in [
        ArtifactKind::Routes,
        ArtifactKind::Action,
        ArtifactKind::Contracts,
        ArtifactKind::Schemas,
    ] {
        let rel = format!("{kind}.rb");
        fs::write(dir.path().join(&rel), "hand edited").unwrap();
        writer.write_all(&[artifact(kind, &rel, "generated")]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join(&rel)).unwrap(), "generated");
    }
}

#[test]
fn test_existing_service_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let rel = "actions/books/get_books_service.rb";
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "custom logic").unwrap();

    let writer = ArtifactWriter::new(dir.path());
    let report = writer
        .write_all(&[artifact(ArtifactKind::Service, rel, "stub")])
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "custom logic");
    assert_eq!(report.skipped, vec![path]);
    assert!(report.written.is_empty());
}

#[test]
fn test_new_service_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let rel = "actions/books/get_books_service.rb";
    let writer = ArtifactWriter::new(dir.path());
    let report = writer
        .write_all(&[artifact(ArtifactKind::Service, rel, "stub")])
        .unwrap();
    assert_eq!(fs::read_to_string(dir.path().join(rel)).unwrap(), "stub");
    assert_eq!(report.written.len(), 1);
}

#[test]
fn test_dry_run_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let existing = "actions/books/get_books_service.rb";
    fs::create_dir_all(dir.path().join("actions/books")).unwrap();
    fs::write(dir.path().join(existing), "custom").unwrap();

    let writer = ArtifactWriter::new(dir.path()).dry_run(true);
    let report = writer
        .write_all(&[
            artifact(ArtifactKind::Routes, "config/routes.rb", "routes"),
            artifact(ArtifactKind::Service, existing, "stub"),
        ])
        .unwrap();

    assert_eq!(report.written, vec![dir.path().join("config/routes.rb")]);
    assert_eq!(report.skipped, vec![dir.path().join(existing)]);
    assert!(!dir.path().join("config").exists());
    assert_eq!(fs::read_to_string(dir.path().join(existing)).unwrap(), "custom");
}

#[test]
fn test_write_failure_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is needed.
    fs::write(dir.path().join("config"), "not a directory").unwrap();

    let writer = ArtifactWriter::new(dir.path());
    let err = writer
        .write_all(&[artifact(ArtifactKind::Routes, "config/routes.rb", "routes")])
        .unwrap_err();
    assert_eq!(err.stage(), "write");
    assert!(err.to_string().contains("config"));
}
