//! Platform detection helpers.

use std::path::{Path, PathBuf};

/// Check if running under a CI system.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Locate an executable.
///
/// A name containing a path separator is checked as-is; a bare name is
/// looked up on `PATH` (with `.exe` appended on Windows). Does NOT use the
/// `which` command.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let entries: Vec<PathBuf> = std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default();
    resolve_in(name, &entries)
}

fn resolve_in(name: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let file_name = if cfg!(windows) && !name.ends_with(".exe") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    };

    path_entries
        .iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && path
            .metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn create_fake_binary(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn resolve_in_finds_first_match() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        create_fake_binary(&second.path().join("pwsh"));

        let entries = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(
            resolve_in("pwsh", &entries),
            Some(second.path().join("pwsh"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pwsh"), "text").unwrap();
        assert!(resolve_in("pwsh", &[dir.path().to_path_buf()]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn explicit_path_is_checked_directly() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("pwsh");
        create_fake_binary(&bin);
        assert_eq!(find_executable(bin.to_str().unwrap()), Some(bin));
    }

    #[test]
    fn missing_explicit_path_is_none() {
        assert!(find_executable("/nonexistent/dir/pwsh").is_none());
    }
}
