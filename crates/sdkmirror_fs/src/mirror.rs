//! Transfer-by-transfer mirror orchestration.

use std::path::{Path, PathBuf};

use crate::report::{ReportMirror, ReportMirrorBuilder, SpecCopyRecord};
use crate::spec::{MirrorError, SpecMirrorOptions, SpecTransfer};
use crate::util::{
    EnumEntryKind, copy_file_with_metadata, ensure_destination_dir, is_same_directory,
    join_relative, list_source_entries, validate_subdir_name,
};

/// Copy the flat file contents of every configured source subdirectory into
/// its destination subdirectory.
///
/// Transfers run in order. For each one the destination directory is created
/// if absent, then every entry resolving to a regular file is copied (sorted
/// by name), overwriting same-named files. Nested directories are not
/// descended into and nothing in the destination is ever removed.
///
/// `on_copied` is called right after each file lands, before the next copy
/// starts.
///
/// The first error aborts the run. Files copied before that point stay in
/// place and no report is produced.
pub fn mirror<F>(
    spec_options: &SpecMirrorOptions,
    mut on_copied: F,
) -> Result<ReportMirror, MirrorError>
where
    F: FnMut(&SpecCopyRecord),
{
    if spec_options.l_transfers.is_empty() {
        return Err(MirrorError::InvalidTransfer(
            "At least one transfer is required.".to_string(),
        ));
    }
    for spec_transfer in &spec_options.l_transfers {
        validate_subdir_name(spec_transfer.name_dir_src)?;
        validate_subdir_name(spec_transfer.name_dir_dst)?;
    }

    if !spec_options.path_dir_src_root.is_dir() {
        return Err(MirrorError::MissingSource(
            spec_options.path_dir_src_root.clone(),
        ));
    }

    let mut builder_report = ReportMirrorBuilder::default();
    for spec_transfer in &spec_options.l_transfers {
        mirror_transfer(
            &spec_options.path_dir_src_root,
            &spec_options.path_dir_dst_root,
            spec_transfer,
            &mut builder_report,
            &mut on_copied,
        )?;
    }

    Ok(builder_report.build(&spec_options.name_product))
}

fn mirror_transfer<F>(
    path_dir_src_root: &Path,
    path_dir_dst_root: &Path,
    spec_transfer: &SpecTransfer,
    builder_report: &mut ReportMirrorBuilder,
    on_copied: &mut F,
) -> Result<(), MirrorError>
where
    F: FnMut(&SpecCopyRecord),
{
    let path_dir_src = join_relative(path_dir_src_root, spec_transfer.name_dir_src);
    let path_dir_dst = join_relative(path_dir_dst_root, spec_transfer.name_dir_dst);

    if !path_dir_src.is_dir() {
        return Err(MirrorError::MissingSource(path_dir_src));
    }
    if is_same_directory(&path_dir_src, &path_dir_dst) {
        return Err(MirrorError::SourceDestinationOverlap {
            source: path_dir_src,
            destination: path_dir_dst,
        });
    }

    if ensure_destination_dir(&path_dir_dst)? {
        builder_report.add_dir_created();
    }

    for spec_entry in list_source_entries(&path_dir_src)? {
        builder_report.add_scanned();
        match spec_entry.enum_kind {
            EnumEntryKind::RegularFile => {}
            EnumEntryKind::Directory => {
                builder_report.add_skipped();
                continue;
            }
            EnumEntryKind::BrokenSymlink => {
                builder_report.add_warning(format!(
                    "Broken symlink skipped: {}",
                    spec_entry.path_entry.display()
                ));
                builder_report.add_skipped();
                continue;
            }
            EnumEntryKind::UnresolvableSymlink => {
                builder_report.add_warning(format!(
                    "Unresolvable symlink skipped: {}",
                    spec_entry.path_entry.display()
                ));
                builder_report.add_skipped();
                continue;
            }
            EnumEntryKind::Special => {
                builder_report.add_warning(format!(
                    "Special file skipped: {}",
                    spec_entry.path_entry.display()
                ));
                builder_report.add_skipped();
                continue;
            }
        }

        let path_file_dst = path_dir_dst.join(&spec_entry.name_file);
        if path_file_dst.is_dir() {
            return Err(MirrorError::DestinationConflict {
                path: path_file_dst,
                message: "Destination is a directory, expected file".to_string(),
            });
        }

        if let Some(warning) = copy_file_with_metadata(&spec_entry.path_entry, &path_file_dst)? {
            builder_report.add_warning(warning);
        }

        let spec_record = SpecCopyRecord {
            path_file_src: spec_entry.path_entry,
            path_dir_dst: path_dir_dst.clone(),
            path_file_dst,
        };
        on_copied(&spec_record);
        builder_report.add_copied(spec_record);
    }

    Ok(())
}

/// Resolve the destination directory a transfer writes into.
pub fn destination_dir(
    spec_options: &SpecMirrorOptions,
    spec_transfer: &SpecTransfer,
) -> PathBuf {
    join_relative(&spec_options.path_dir_dst_root, spec_transfer.name_dir_dst)
}
