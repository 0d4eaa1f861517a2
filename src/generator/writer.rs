use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::naming::to_snake;
use crate::error::{ArtifactKind, GenerateError};

/// File extension of generated Ruby sources.
pub const RUBY_EXTENSION: &str = "rb";

/// How an artifact kind treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Regenerated on every run
    Overwrite,
    /// Written once; hand edits survive later runs
    CreateOnly,
}

impl WritePolicy {
    pub fn for_kind(kind: ArtifactKind) -> WritePolicy {
        match kind {
            ArtifactKind::Service => WritePolicy::CreateOnly,
            ArtifactKind::Routes
            | ArtifactKind::Action
            | ArtifactKind::Contracts
            | ArtifactKind::Schemas => WritePolicy::Overwrite,
        }
    }
}

/// Rendered text and where it goes, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub kind: ArtifactKind,
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Files written and files left alone by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Relative path of an artifact.
///
/// `module` and `operation_id` are required for actions and services and
/// ignored otherwise.
pub fn artifact_path(kind: ArtifactKind, module: &str, operation_id: &str, ext: &str) -> PathBuf {
    match kind {
        ArtifactKind::Routes => PathBuf::from("config").join(format!("routes.{ext}")),
        ArtifactKind::Contracts => PathBuf::from("actions").join(format!("contracts.{ext}")),
        ArtifactKind::Schemas => PathBuf::from("actions").join(format!("schemas.{ext}")),
        ArtifactKind::Action => PathBuf::from("actions")
            .join(to_snake(module))
            .join(format!("{}.{ext}", to_snake(operation_id))),
        ArtifactKind::Service => PathBuf::from("actions")
            .join(to_snake(module))
            .join(format!("{}.{ext}", to_snake(&format!("{operation_id}Service")))),
    }
}

/// Persists rendered artifacts under an output root.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
    dry_run: bool,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        ArtifactWriter {
            output_dir: output_dir.into(),
            dry_run: false,
        }
    }

    /// Report the same decisions without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Write every artifact in order, stopping at the first failure.
    pub fn write_all(&self, artifacts: &[RenderedArtifact]) -> Result<WriteReport, GenerateError> {
        let mut report = WriteReport::default();
        for artifact in artifacts {
            let path = self.output_dir.join(&artifact.relative_path);
            if self.write(artifact, &path)? {
                report.written.push(path);
            } else {
                report.skipped.push(path);
            }
        }
        Ok(report)
    }

    /// Returns `false` when a create-only file already existed.
    fn write(&self, artifact: &RenderedArtifact, path: &Path) -> Result<bool, GenerateError> {
        let policy = WritePolicy::for_kind(artifact.kind);
        let write_error = |source: io::Error| GenerateError::Write {
            path: path.to_path_buf(),
            source,
        };

        if self.dry_run {
            let skip = policy == WritePolicy::CreateOnly && path.exists();
            debug!(path = %path.display(), kind = %artifact.kind, skip, "Dry run");
            return Ok(!skip);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        match policy {
            WritePolicy::Overwrite => {
                fs::write(path, &artifact.contents).map_err(write_error)?;
                debug!(path = %path.display(), kind = %artifact.kind, "Wrote artifact");
                Ok(true)
            }
            WritePolicy::CreateOnly => {
                match OpenOptions::new().write(true).create_new(true).open(path) {
                    Ok(file) => {
                        fill_new_file(file, path, artifact.contents.as_bytes())
                            .map_err(write_error)?;
                        debug!(path = %path.display(), kind = %artifact.kind, "Created artifact");
                        Ok(true)
                    }
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                        debug!(path = %path.display(), kind = %artifact.kind, "Exists, skipping");
                        Ok(false)
                    }
                    Err(e) => Err(write_error(e)),
                }
            }
        }
    }
}

/// Fill a file that was just created. A create-only file is left either
/// complete or absent.
fn fill_new_file<W: Write>(mut file: W, path: &Path, contents: &[u8]) -> io::Result<()> {
    let result = file.write_all(contents).and_then(|()| file.flush());
    drop(file);
    if result.is_err() {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove partial artifact");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_create_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("get_books_service.rb");
        fs::write(&path, "class GetBo").unwrap();

        let err = fill_new_file(FailingWriter, &path, b"class GetBooksService\n").unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(!path.exists());
    }

    #[test]
    fn test_fill_new_file_writes_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("get_books_service.rb");
        let file = OpenOptions::new().write(true).create_new(true).open(&path).unwrap();

        fill_new_file(file, &path, b"stub\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "stub\n");
    }

    #[test]
    fn test_artifact_paths() {
        let ext = RUBY_EXTENSION;
        assert_eq!(
            artifact_path(ArtifactKind::Routes, "", "", ext),
            PathBuf::from("config/routes.rb")
        );
        assert_eq!(
            artifact_path(ArtifactKind::Contracts, "", "", ext),
            PathBuf::from("actions/contracts.rb")
        );
        assert_eq!(
            artifact_path(ArtifactKind::Schemas, "", "", ext),
            PathBuf::from("actions/schemas.rb")
        );
        assert_eq!(
            artifact_path(ArtifactKind::Action, "books", "GetBookById", ext),
            PathBuf::from("actions/books/get_book_by_id.rb")
        );
        assert_eq!(
            artifact_path(ArtifactKind::Service, "PetStore", "GetBookById", ext),
            PathBuf::from("actions/pet_store/get_book_by_id_service.rb")
        );
    }

    #[test]
    fn test_policy_per_kind() {
        for kind in ArtifactKind::ALL {
            let expected = if kind == ArtifactKind::Service {
                WritePolicy::CreateOnly
            } else {
                WritePolicy::Overwrite
            };
            assert_eq!(WritePolicy::for_kind(kind), expected);
        }
    }
}
