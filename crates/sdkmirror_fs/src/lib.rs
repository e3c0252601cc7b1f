//! `sdkmirror_fs` v1:
//! Rust-side SDK-to-toolkit directory mirror engine.
//!
//! - `mirror` : per-transfer orchestration
//! - `spec`   : configuration structure and errors
//! - `report` : progress records and completion report
//! - `util`   : shared filesystem helpers

pub mod mirror;
pub mod report;
pub mod spec;
mod util;

pub use mirror::{destination_dir, mirror};
pub use report::{ReportMirror, ReportMirrorBuilder, SpecCopyRecord};
pub use spec::{
    C_NAME_PRODUCT_DEFAULT, C_PATH_DIR_DST_ROOT_DEFAULT, C_PATH_DIR_SRC_ROOT_DEFAULT,
    MirrorError, SpecMirrorOptions, SpecTransfer, TRANSFERS_DEFAULT,
};
