//! Target discovery: expand root paths into a deterministic file list.
//!
//! Directories are expanded through the configured include globs and
//! filtered by the exclude globs; common virtualenv/VCS/cache
//! directories are pruned by default. Explicitly named files are taken
//! when they match an include pattern. The result is sorted
//! lexicographically and deduplicated so downstream ordering is stable.

use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Directory names never descended into.
const PRUNED_DIRS: &[&str] = &[
    "venv",
    ".venv",
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".tox",
    ".eggs",
    "node_modules",
];

#[derive(Debug, Default)]
/// Discovery outcome: resolved files plus roots that do not exist.
pub struct Targets {
    pub files: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
}

/// Resolve `roots` into concrete target files.
///
/// Nonexistent roots are reported in `missing` rather than aborting the
/// run; the caller surfaces them as unchecked files.
pub fn resolve_targets(roots: &[String], include: &[String], exclude: &[String]) -> Targets {
    let excludes: Vec<Pattern> = exclude.iter().filter_map(|p| Pattern::new(p).ok()).collect();
    let mut files: Vec<PathBuf> = Vec::new();
    let mut missing: Vec<PathBuf> = Vec::new();

    for root in roots {
        let path = PathBuf::from(root);
        if !path.exists() {
            missing.push(path);
            continue;
        }
        if path.is_file() {
            if include.iter().any(|pat| named_file_matches(pat, &path)) {
                files.push(path);
            }
            continue;
        }
        for pat in include {
            let abs_glob = path.join(pat);
            let Ok(entries) = glob(&abs_glob.to_string_lossy()) else {
                continue;
            };
            for entry in entries.flatten() {
                if !entry.is_file() {
                    continue;
                }
                let rel = entry.strip_prefix(&path).unwrap_or(&entry);
                if in_pruned_dir(rel) || is_excluded(&excludes, rel) {
                    continue;
                }
                files.push(entry);
            }
        }
    }

    files.sort();
    files.dedup();
    missing.sort();
    Targets { files, missing }
}

/// An explicitly named file matches when the include pattern covers its
/// full path or its final component (so `**/*.py` admits `foo.py`).
fn named_file_matches(pattern: &str, path: &Path) -> bool {
    if let Ok(p) = Pattern::new(pattern) {
        if p.matches_path(path) {
            return true;
        }
    }
    let tail = pattern.rsplit('/').next().unwrap_or(pattern);
    match (Pattern::new(tail), path.file_name()) {
        (Ok(p), Some(name)) => p.matches(&name.to_string_lossy()),
        _ => false,
    }
}

fn in_pruned_dir(rel: &Path) -> bool {
    rel.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        PRUNED_DIRS.contains(&name.as_ref())
    })
}

fn is_excluded(excludes: &[Pattern], rel: &Path) -> bool {
    excludes.iter().any(|p| {
        p.matches_path(rel)
            || rel
                .file_name()
                .is_some_and(|n| p.matches(&n.to_string_lossy()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x = 1\n").unwrap();
    }

    #[test]
    fn test_directory_expansion_sorted_and_pruned() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b.py"));
        touch(&root.join("a.py"));
        touch(&root.join("sub/c.py"));
        touch(&root.join("venv/x.py"));
        touch(&root.join("__pycache__/y.py"));
        touch(&root.join("readme.md"));

        let t = resolve_targets(
            &[root.to_string_lossy().to_string()],
            &["**/*.py".to_string()],
            &[],
        );
        let rel: Vec<String> = t
            .files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        assert_eq!(rel, ["a.py", "b.py", "sub/c.py"]);
        assert!(t.missing.is_empty());
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("keep.py"));
        touch(&root.join("gen/skip.py"));
        touch(&root.join("skip_pb2.py"));

        let t = resolve_targets(
            &[root.to_string_lossy().to_string()],
            &["**/*.py".to_string()],
            &["gen/**".to_string(), "*_pb2.py".to_string()],
        );
        let rel: Vec<String> = t
            .files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        assert_eq!(rel, ["keep.py"]);
    }

    #[test]
    fn test_named_file_and_missing_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("one.py"));
        touch(&root.join("notes.txt"));

        let t = resolve_targets(
            &[
                root.join("one.py").to_string_lossy().to_string(),
                root.join("notes.txt").to_string_lossy().to_string(),
                root.join("gone.py").to_string_lossy().to_string(),
            ],
            &["**/*.py".to_string()],
            &[],
        );
        assert_eq!(t.files, vec![root.join("one.py")]);
        assert_eq!(t.missing, vec![root.join("gone.py")]);
    }

    #[test]
    fn test_duplicate_roots_deduplicated() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a.py"));
        let r = root.to_string_lossy().to_string();
        let t = resolve_targets(&[r.clone(), r], &["**/*.py".to_string()], &[]);
        assert_eq!(t.files.len(), 1);
    }
}
