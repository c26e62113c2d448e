//! Executable lookup against a colon-separated search list.
//!
//! Names that begin with `/`, `./` or `../` are checked as given. Any other
//! name is joined onto each directory of the list in order, and the first
//! regular file with an execute permission bit wins.

use crate::error::{Error, Result};
use std::fs::{self, Metadata};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Environment variable consulted by [`resolve_from_env`]
pub const PATH_VAR: &str = "PATH";

/// A successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The matching path, as given or as joined from the search list
    pub path: PathBuf,
    /// False only when an explicit path names a directory
    pub executable: bool,
}

/// What a stat result says about a lookup candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Directory,
    Executable,
    NotExecutable,
}

impl Candidate {
    fn classify(meta: &Metadata) -> Self {
        if meta.is_dir() {
            Candidate::Directory
        } else if has_execute_bit(meta) {
            Candidate::Executable
        } else {
            Candidate::NotExecutable
        }
    }
}

#[cfg(unix)]
fn has_execute_bit(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_execute_bit(_meta: &Metadata) -> bool {
    true
}

fn is_explicit(name: &str) -> bool {
    name.starts_with('/') || name.starts_with("./") || name.starts_with("../")
}

/// Resolve `name` against `search_path`.
///
/// An explicit path that names a directory resolves with
/// `executable: false`. During a search, directories are skipped, and a
/// non-executable match is only reported when nothing better turns up.
pub fn resolve(name: &str, search_path: &str) -> Result<Resolved> {
    if is_explicit(name) {
        let meta = fs::metadata(name).map_err(|e| Error::path_stat(name, e))?;
        return match Candidate::classify(&meta) {
            Candidate::Directory => Ok(Resolved {
                path: name.into(),
                executable: false,
            }),
            Candidate::Executable => Ok(Resolved {
                path: name.into(),
                executable: true,
            }),
            Candidate::NotExecutable => Err(Error::permission_denied(name)),
        };
    }

    if search_path.is_empty() {
        return Err(Error::command_not_found(name));
    }

    let mut denied: Option<PathBuf> = None;
    for dir in search_path.split(':') {
        let path = PathBuf::from(format!("{dir}/{name}"));
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) => {
                trace!("No candidate at {}: {}", path.display(), e);
                continue;
            }
        };
        match Candidate::classify(&meta) {
            Candidate::Executable => {
                debug!("Resolved {} to {}", name, path.display());
                return Ok(Resolved {
                    path,
                    executable: true,
                });
            }
            Candidate::NotExecutable => {
                trace!("Skipping non-executable {}", path.display());
                denied.get_or_insert(path);
            }
            Candidate::Directory => {
                trace!("Skipping directory {}", path.display());
            }
        }
    }

    Err(match denied {
        Some(path) => Error::permission_denied(path),
        None => Error::command_not_found(name),
    })
}

/// Resolve `name` against the `PATH` environment variable.
pub fn resolve_from_env(name: &str) -> Result<Resolved> {
    let search_path = std::env::var_os(PATH_VAR).unwrap_or_default();
    resolve(name, &search_path.to_string_lossy())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path, mode: u32) {
        fs::write(path, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    fn search_list(dirs: &[&Path]) -> String {
        dirs.iter()
            .map(|d| d.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(":")
    }

    #[test]
    fn test_is_explicit() {
        assert!(is_explicit("/bin/sh"));
        assert!(is_explicit("./run"));
        assert!(is_explicit("../run"));
        assert!(!is_explicit("run"));
        assert!(!is_explicit(".run"));
        assert!(!is_explicit("..."));
    }

    #[test]
    fn test_resolve_first_executable_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        touch(&first.path().join("tool"), 0o755);
        touch(&second.path().join("tool"), 0o755);

        let list = search_list(&[first.path(), second.path()]);
        let resolved = resolve("tool", &list).unwrap();
        assert_eq!(resolved.path, first.path().join("tool"));
        assert!(resolved.executable);
    }

    #[test]
    fn test_resolve_skips_directories_and_non_executables() {
        let dirs = TempDir::new().unwrap();
        let plain = TempDir::new().unwrap();
        let bins = TempDir::new().unwrap();
        fs::create_dir(dirs.path().join("tool")).unwrap();
        touch(&plain.path().join("tool"), 0o644);
        touch(&bins.path().join("tool"), 0o700);

        let list = search_list(&[dirs.path(), plain.path(), bins.path()]);
        let resolved = resolve("tool", &list).unwrap();
        assert_eq!(resolved.path, bins.path().join("tool"));
    }

    #[test]
    fn test_resolve_reports_permission_denied() {
        let plain = TempDir::new().unwrap();
        touch(&plain.path().join("tool"), 0o644);

        let list = search_list(&[plain.path()]);
        match resolve("tool", &list).unwrap_err() {
            Error::PermissionDenied { path } => assert_eq!(path, plain.path().join("tool")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_command_not_found() {
        let empty = TempDir::new().unwrap();
        let list = search_list(&[empty.path()]);
        let err = resolve("missing", &list).unwrap_err();
        assert_eq!(err.to_string(), "missing: command not found");

        assert!(matches!(
            resolve("missing", "").unwrap_err(),
            Error::CommandNotFound { .. }
        ));
    }

    #[test]
    fn test_resolve_from_env_explicit_path() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("run");
        touch(&exe, 0o755);

        // Explicit paths never consult the search list
        let resolved = resolve_from_env(exe.to_str().unwrap()).unwrap();
        assert_eq!(resolved.path, exe);
        assert!(resolved.executable);
    }

    #[test]
    fn test_resolve_explicit_path() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("run");
        let plain = dir.path().join("notes");
        touch(&exe, 0o755);
        touch(&plain, 0o600);

        let exe_str = exe.to_str().unwrap();
        let resolved = resolve(exe_str, "").unwrap();
        assert_eq!(resolved.path, exe);
        assert!(resolved.executable);

        let resolved = resolve(dir.path().to_str().unwrap(), "").unwrap();
        assert!(!resolved.executable);

        assert!(matches!(
            resolve(plain.to_str().unwrap(), "/usr/bin").unwrap_err(),
            Error::PermissionDenied { .. }
        ));

        let missing = dir.path().join("missing");
        assert!(matches!(
            resolve(missing.to_str().unwrap(), "").unwrap_err(),
            Error::PathStat { .. }
        ));
    }
}
