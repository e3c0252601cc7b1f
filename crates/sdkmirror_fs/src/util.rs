use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::spec::MirrorError;

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Validate a `/`-separated subdirectory name: non-empty, relative, no `..`.
pub(crate) fn validate_subdir_name(name_dir: &str) -> Result<(), MirrorError> {
    if name_dir.split('/').all(|s| s.is_empty()) {
        return Err(MirrorError::InvalidTransfer(format!(
            "Subdirectory name must not be empty: `{name_dir}`"
        )));
    }
    let path_rel = Path::new(name_dir);
    for component in path_rel.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(MirrorError::InvalidTransfer(format!(
                    "Subdirectory name must not contain `..`: `{name_dir}`"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(MirrorError::InvalidTransfer(format!(
                    "Subdirectory name must be relative: `{name_dir}`"
                )));
            }
        }
    }
    Ok(())
}

/// Join `name_dir` onto `path_root` one `/`-separated segment at a time.
pub(crate) fn join_relative(path_root: &Path, name_dir: &str) -> PathBuf {
    name_dir
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(path_root.to_path_buf(), |path, segment| path.join(segment))
}

fn _normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

pub(crate) fn is_same_directory(path_a: &Path, path_b: &Path) -> bool {
    _normalize_path(path_a) == _normalize_path(path_b)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DirectoryUtilities

/// Create `path_dir` (and missing parents) unless it is already a directory.
///
/// Returns `true` when the directory had to be created.
pub(crate) fn ensure_destination_dir(path_dir: &Path) -> Result<bool, MirrorError> {
    match fs::metadata(path_dir) {
        Ok(meta_dir) if meta_dir.is_dir() => return Ok(false),
        Ok(_) => {
            return Err(MirrorError::DestinationConflict {
                path: path_dir.to_path_buf(),
                message: "Destination is a file, expected directory".to_string(),
            });
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(MirrorError::from_io(path_dir, &e)),
    }

    fs::create_dir_all(path_dir).map_err(|e| MirrorError::from_io(path_dir, &e))?;
    Ok(true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnumEntryKind {
    /// Regular file, or a symlink resolving to one.
    RegularFile,
    /// Directory, or a symlink resolving to one.
    Directory,
    /// Symlink whose target does not exist.
    BrokenSymlink,
    /// Symlink that cannot be resolved (loop, untraversable target).
    UnresolvableSymlink,
    /// FIFO, socket, device node.
    Special,
}

#[derive(Debug, Clone)]
pub(crate) struct SpecSourceEntry {
    pub(crate) name_file: OsString,
    pub(crate) path_entry: PathBuf,
    pub(crate) enum_kind: EnumEntryKind,
}

/// List immediate entries of `path_dir`, sorted by name.
pub(crate) fn list_source_entries(path_dir: &Path) -> Result<Vec<SpecSourceEntry>, MirrorError> {
    let iter_entries = fs::read_dir(path_dir).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
            MirrorError::MissingSource(path_dir.to_path_buf())
        }
        _ => MirrorError::from_io(path_dir, &e),
    })?;

    let mut l_entries = Vec::new();
    for _entry_res in iter_entries {
        let entry = _entry_res.map_err(|e| MirrorError::from_io(path_dir, &e))?;
        let path_entry = entry.path();
        let enum_kind = match fs::metadata(&path_entry) {
            Ok(meta_target) if meta_target.is_file() => EnumEntryKind::RegularFile,
            Ok(meta_target) if meta_target.is_dir() => EnumEntryKind::Directory,
            Ok(_) => EnumEntryKind::Special,
            Err(e) if e.kind() == io::ErrorKind::NotFound => EnumEntryKind::BrokenSymlink,
            Err(e) => match fs::symlink_metadata(&path_entry) {
                Ok(meta_link) if meta_link.file_type().is_symlink() => {
                    EnumEntryKind::UnresolvableSymlink
                }
                _ => return Err(MirrorError::from_io(&path_entry, &e)),
            },
        };
        l_entries.push(SpecSourceEntry {
            name_file: entry.file_name(),
            path_entry,
            enum_kind,
        });
    }

    l_entries.sort_by(|a, b| a.name_file.cmp(&b.name_file));
    Ok(l_entries)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileCopy

/// Copy bytes and permission bits, overwriting `path_file_dst`.
///
/// Errors are attributed to the side that failed: opening or inspecting the
/// source maps to `path_file_src`, everything else to `path_file_dst`.
///
/// On Linux, access/modify times and extended attributes are carried over too,
/// best effort. A timestamp failure comes back as `Ok(Some(warning))`.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<Option<String>, MirrorError> {
    let mut file_src =
        fs::File::open(path_file_src).map_err(|e| MirrorError::from_io(path_file_src, &e))?;
    let stat_src = file_src
        .metadata()
        .map_err(|e| MirrorError::from_io(path_file_src, &e))?;

    let mut file_dst =
        fs::File::create(path_file_dst).map_err(|e| MirrorError::from_io(path_file_dst, &e))?;
    io::copy(&mut file_src, &mut file_dst).map_err(|e| MirrorError::from_io(path_file_dst, &e))?;
    drop(file_dst);

    #[cfg(target_os = "linux")]
    let warning_times = {
        copy_xattrs_linux(path_file_src, path_file_dst);
        carry_file_times_linux(&stat_src, path_file_dst)
            .err()
            .map(|e| {
                format!(
                    "Timestamps not preserved for {} ({e})",
                    path_file_dst.display()
                )
            })
    };
    #[cfg(not(target_os = "linux"))]
    let warning_times = None;

    // Last, so a read-only mode does not block the xattr writes above.
    fs::set_permissions(path_file_dst, stat_src.permissions())
        .map_err(|e| MirrorError::from_io(path_file_dst, &e))?;

    Ok(warning_times)
}

#[cfg(target_os = "linux")]
pub(crate) fn carry_file_times_linux(
    stat_src: &fs::Metadata,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let file_time_access = FileTime::from_last_access_time(stat_src);
    let file_time_modify = FileTime::from_last_modification_time(stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)
}

// Best effort: destination filesystems without xattr support are fine.
#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{copy_file_with_metadata, join_relative, validate_subdir_name};
    use crate::spec::MirrorError;

    fn make_test_dir(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "sdkmirror_fs_util_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).expect("create test dir");
        path
    }

    #[test]
    fn join_relative_splits_on_slash() {
        let path = join_relative(Path::new("/toolkit"), "lib/x64");
        assert_eq!(path, PathBuf::from("/toolkit").join("lib").join("x64"));

        let path = join_relative(Path::new("/toolkit"), "bin");
        assert_eq!(path, PathBuf::from("/toolkit/bin"));
    }

    #[test]
    fn validate_subdir_name_rejects_unsafe_names() {
        assert!(validate_subdir_name("lib/x64").is_ok());
        assert!(matches!(
            validate_subdir_name(""),
            Err(MirrorError::InvalidTransfer(_))
        ));
        assert!(matches!(
            validate_subdir_name("../bin"),
            Err(MirrorError::InvalidTransfer(_))
        ));
        assert!(matches!(
            validate_subdir_name("/bin"),
            Err(MirrorError::InvalidTransfer(_))
        ));
    }

    #[test]
    fn copy_file_reports_missing_source_against_source_path() {
        let tmp = make_test_dir("missing_src");
        let path_file_src = tmp.join("absent.dll");
        let path_file_dst = tmp.join("out.dll");

        let err = copy_file_with_metadata(&path_file_src, &path_file_dst)
            .expect_err("missing source must fail");
        assert!(matches!(err, MirrorError::Io { ref path, .. } if path == &path_file_src));
        assert!(!path_file_dst.exists());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn copy_file_reports_unwritable_destination_against_destination_path() {
        let tmp = make_test_dir("bad_dst");
        let path_file_src = tmp.join("a.dll");
        std::fs::write(&path_file_src, "a").expect("write src");
        let path_file_dst = tmp.join("no_such_dir").join("a.dll");

        let err = copy_file_with_metadata(&path_file_src, &path_file_dst)
            .expect_err("missing parent must fail");
        assert!(matches!(err, MirrorError::Io { ref path, .. } if path == &path_file_dst));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn carry_file_times_failure_is_not_fatal_for_copy() {
        use super::carry_file_times_linux;

        let tmp = make_test_dir("times");
        let path_file_src = tmp.join("a.dll");
        let path_file_dst = tmp.join("b.dll");
        std::fs::write(&path_file_src, "a").expect("write src");
        let stat_src = std::fs::metadata(&path_file_src).expect("src metadata");

        assert!(carry_file_times_linux(&stat_src, &tmp.join("gone.dll")).is_err());

        let warning = copy_file_with_metadata(&path_file_src, &path_file_dst).expect("copy");
        assert_eq!(warning, None);
        assert_eq!(std::fs::read_to_string(&path_file_dst).expect("read dst"), "a");
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
