#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Path to a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Write `content` as `openapi.yaml` inside `dir` and return its path.
pub fn write_spec(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("openapi.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

/// A minimal document with a single operation; `operation` is the YAML body
/// of `paths./things.get`, indented by six spaces.
pub fn single_operation_spec(operation: &str) -> String {
    format!(
        "openapi: 3.1.0\ninfo:\n  title: Things\n  version: 1.0.0\npaths:\n  /things:\n    get:\n{operation}"
    )
}

/// All regular files under `root`, as sorted relative paths.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(root, &path, out);
            } else if let Ok(rel) = path.strip_prefix(root) {
                out.push(rel.to_path_buf());
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
