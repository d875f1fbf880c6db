//! Candidate file discovery.
//!
//! A hand-rolled recursive walk: no positional paths means "walk the
//! current directory," an explicit path is either a matching file or a
//! directory to walk. Symlinks are not followed and dot-directories are
//! skipped, both to avoid walking into cycles or noise like `.git`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error raised when a positional argument is neither a matching file nor
/// an existing directory.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("not a .http/.httpspec file or a directory: {0}")]
    InvalidPath(PathBuf),
}

fn has_spec_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("http") | Some("httpspec")
    )
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            continue;
        }

        if file_type.is_dir() {
            let is_hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if !is_hidden {
                walk(&path, out)?;
            }
        } else if has_spec_extension(&path) {
            out.push(path);
        }
    }

    Ok(())
}

/// Resolves the CLI's positional `paths` into a flat list of candidate
/// files. An empty `paths` recursively discovers matching files under the
/// current directory. Each non-empty entry must either name a
/// `.http`/`.httpspec` file directly or be an existing directory to walk.
pub fn resolve(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    if paths.is_empty() {
        let mut out = Vec::new();
        let cwd = std::env::current_dir().map_err(|_| CliError::InvalidPath(PathBuf::from(".")))?;
        walk(&cwd, &mut out).map_err(|_| CliError::InvalidPath(cwd))?;
        return Ok(out);
    }

    let mut out = Vec::new();
    for path in paths {
        if path.is_file() && has_spec_extension(path) {
            out.push(path.clone());
        } else if path.is_dir() {
            walk(path, &mut out).map_err(|_| CliError::InvalidPath(path.clone()))?;
        } else {
            return Err(CliError::InvalidPath(path.clone()));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("httpspec-discovery-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn discovers_nested_http_files() {
        let dir = scratch_dir("nested");
        fs::write(dir.join("a.http"), "GET http://a\n").unwrap();
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("sub").join("b.httpspec"), "GET http://b\n").unwrap();
        fs::write(dir.join("ignore.txt"), "not a spec file").unwrap();

        let found = resolve(&[dir.clone()]).unwrap();
        assert_eq!(found.len(), 2);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn skips_hidden_directories() {
        let dir = scratch_dir("hidden");
        fs::create_dir_all(dir.join(".git")).unwrap();
        fs::write(dir.join(".git").join("x.http"), "GET http://a\n").unwrap();

        let found = resolve(&[dir.clone()]).unwrap();
        assert!(found.is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn invalid_path_is_an_error() {
        let dir = scratch_dir("invalid");
        let missing = dir.join("does-not-exist");
        assert!(matches!(resolve(&[missing]), Err(CliError::InvalidPath(_))));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn direct_file_argument_is_accepted() {
        let dir = scratch_dir("direct");
        let file = dir.join("one.http");
        fs::write(&file, "GET http://a\n").unwrap();
        let found = resolve(&[file.clone()]).unwrap();
        assert_eq!(found, vec![file]);
        fs::remove_dir_all(&dir).ok();
    }
}
