//! Mirror configuration models and top-level error types.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

////////////////////////////////////////////////////////////////////////////////
// #region Defaults

/// Extracted SDK archive, relative to the working directory.
pub const C_PATH_DIR_SRC_ROOT_DEFAULT: &str = "cudnn-windows-x86_64-9.2.0.82_cuda12-archive";

/// Installed toolkit tree receiving the SDK files.
pub const C_PATH_DIR_DST_ROOT_DEFAULT: &str =
    r"C:\Program Files\NVIDIA GPU Computing Toolkit\CUDA\v12.5";

/// Product name used in the completion line.
pub const C_NAME_PRODUCT_DEFAULT: &str = "cuDNN";

/// Out-of-the-box subdirectory mapping, processed in this order.
pub const TRANSFERS_DEFAULT: [SpecTransfer; 3] = [
    SpecTransfer::new("bin", "bin"),
    SpecTransfer::new("include", "include"),
    SpecTransfer::new("lib", "lib/x64"),
];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Structs

/// One `(source subdirectory, destination subdirectory)` pair.
///
/// Both names are relative to their root. Segments are separated by `/`
/// regardless of platform and joined component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecTransfer {
    /// Subdirectory under the source root.
    pub name_dir_src: &'static str,
    /// Subdirectory under the destination root.
    pub name_dir_dst: &'static str,
}

impl SpecTransfer {
    pub const fn new(name_dir_src: &'static str, name_dir_dst: &'static str) -> Self {
        Self {
            name_dir_src,
            name_dir_dst,
        }
    }
}

/// Input options for [`crate::mirror`].
#[derive(Debug, Clone)]
pub struct SpecMirrorOptions {
    /// Root of the downloaded SDK archive.
    pub path_dir_src_root: PathBuf,
    /// Root of the installed toolkit.
    pub path_dir_dst_root: PathBuf,
    /// Ordered transfers. Processing stops at the first failing one.
    pub l_transfers: Vec<SpecTransfer>,
    /// Product name shown in the completion message.
    pub name_product: String,
}

impl SpecMirrorOptions {
    /// Options with the default transfer list and product name.
    pub fn new<P, Q>(dir_source_root: P, dir_destination_root: Q) -> Self
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        Self {
            path_dir_src_root: dir_source_root.as_ref().to_path_buf(),
            path_dir_dst_root: dir_destination_root.as_ref().to_path_buf(),
            l_transfers: TRANSFERS_DEFAULT.to_vec(),
            name_product: C_NAME_PRODUCT_DEFAULT.to_string(),
        }
    }

    /// Replace the product name.
    pub fn with_product(mut self, name_product: impl Into<String>) -> Self {
        self.name_product = name_product.into();
        self
    }
}

impl Default for SpecMirrorOptions {
    fn default() -> Self {
        Self::new(C_PATH_DIR_SRC_ROOT_DEFAULT, C_PATH_DIR_DST_ROOT_DEFAULT)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Fatal mirror errors. Any of these aborts the whole run.
#[derive(Debug)]
pub enum MirrorError {
    /// Transfer list or subdirectory name is unusable.
    InvalidTransfer(String),
    /// Source root or source subdirectory is absent or not a directory.
    MissingSource(PathBuf),
    /// A required directory path is occupied by a non-directory, or a file
    /// destination is occupied by a directory.
    DestinationConflict {
        /// Conflicting destination path.
        path: PathBuf,
        /// User-facing detail.
        message: String,
    },
    /// Source and destination subdirectories resolve to the same directory.
    SourceDestinationOverlap {
        /// Normalized source directory.
        source: PathBuf,
        /// Normalized destination directory.
        destination: PathBuf,
    },
    /// Read or write access denied.
    PermissionDenied {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Any other IO failure (disk full, device error, ...).
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl MirrorError {
    /// Classify an IO error raised while touching `path`.
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_path_buf();
        let message = err.to_string();
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, message },
            io::ErrorKind::AlreadyExists
            | io::ErrorKind::NotADirectory
            | io::ErrorKind::IsADirectory => Self::DestinationConflict { path, message },
            _ => Self::Io { path, message },
        }
    }
}

impl fmt::Display for MirrorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransfer(msg) => write!(f, "{msg}"),
            Self::MissingSource(path) => {
                write!(f, "Source is not a directory: {}", path.display())
            }
            Self::DestinationConflict { path, message } => write!(
                f,
                "Destination conflict at {}: {message}",
                path.display()
            ),
            Self::SourceDestinationOverlap {
                source,
                destination,
            } => write!(
                f,
                "Source and destination directories are the same: {} <-> {}",
                source.display(),
                destination.display()
            ),
            Self::PermissionDenied { path, message } => {
                write!(f, "Permission denied for {}: {message}", path.display())
            }
            Self::Io { path, message } => {
                write!(f, "IO failure at {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for MirrorError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::Path;

    use super::{MirrorError, SpecMirrorOptions, TRANSFERS_DEFAULT};

    #[test]
    fn default_options_keep_documented_mapping() {
        let spec_options = SpecMirrorOptions::new("/sdk", "/toolkit");
        let l_pairs = spec_options
            .l_transfers
            .iter()
            .map(|t| (t.name_dir_src, t.name_dir_dst))
            .collect::<Vec<_>>();
        assert_eq!(
            l_pairs,
            vec![("bin", "bin"), ("include", "include"), ("lib", "lib/x64")]
        );
        assert_eq!(spec_options.name_product, "cuDNN");
        assert_eq!(spec_options.l_transfers, TRANSFERS_DEFAULT.to_vec());
    }

    #[test]
    fn from_io_classifies_by_kind() {
        let path = Path::new("/x");
        let err = MirrorError::from_io(path, &io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, MirrorError::PermissionDenied { .. }));

        let err = MirrorError::from_io(path, &io::Error::from(io::ErrorKind::AlreadyExists));
        assert!(matches!(err, MirrorError::DestinationConflict { .. }));

        let err = MirrorError::from_io(path, &io::Error::other("disk full"));
        assert!(matches!(err, MirrorError::Io { .. }));
        assert_eq!(err.to_string(), "IO failure at /x: disk full");
    }
}
