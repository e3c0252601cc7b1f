//! Progress records, completion report and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Emitted once per successfully copied file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyRecord {
    /// Full source file path.
    pub path_file_src: PathBuf,
    /// Destination directory the file was copied into.
    pub path_dir_dst: PathBuf,
    /// Full destination file path.
    pub path_file_dst: PathBuf,
}

impl fmt::Display for SpecCopyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Copied {} to {}",
            self.path_file_src.display(),
            self.path_dir_dst.display()
        )
    }
}

/// Aggregate counters and diagnostics for one successful `mirror` run.
#[derive(Debug, Default, Clone)]
pub struct ReportMirror {
    /// Directory entries seen under all source subdirectories.
    pub cnt_scanned: u64,
    /// Files copied.
    pub cnt_copied: u64,
    /// Entries that were not regular files.
    pub cnt_skipped: u64,
    /// Destination subdirectories that had to be created.
    pub cnt_dirs_created: u64,
    /// Non-fatal warnings (broken symlinks, special files).
    pub warnings: Vec<String>,
    /// Copy records in processing order.
    pub records: Vec<SpecCopyRecord>,
    /// Product name for the completion message.
    pub name_product: String,
}

impl ReportMirror {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Final confirmation line.
    pub fn completion_message(&self) -> String {
        format!(
            "All {} files have been successfully copied.",
            self.name_product
        )
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_dirs_created".to_string(), self.cnt_dirs_created);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} copied={} skipped={} dirs_created={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_copied"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_dirs_created"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[MIRROR]"))
    }
}

/// Mutable accumulator for mirror statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportMirrorBuilder {
    pub cnt_scanned: u64,
    pub cnt_copied: u64,
    pub cnt_skipped: u64,
    pub cnt_dirs_created: u64,
    pub warnings: Vec<String>,
    pub records: Vec<SpecCopyRecord>,
}

impl ReportMirrorBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    /// Count one copied file and keep its record.
    pub fn add_copied(&mut self, spec_record: SpecCopyRecord) {
        self.cnt_copied += 1;
        self.records.push(spec_record);
    }

    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    pub fn add_dir_created(&mut self) {
        self.cnt_dirs_created += 1;
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self, name_product: &str) -> ReportMirror {
        ReportMirror {
            cnt_scanned: self.cnt_scanned,
            cnt_copied: self.cnt_copied,
            cnt_skipped: self.cnt_skipped,
            cnt_dirs_created: self.cnt_dirs_created,
            warnings: self.warnings,
            records: self.records,
            name_product: name_product.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ReportMirror, ReportMirrorBuilder, SpecCopyRecord};

    #[test]
    fn report_mirror_to_dict_and_format() {
        let report = ReportMirror {
            cnt_scanned: 7,
            cnt_copied: 5,
            cnt_skipped: 2,
            cnt_dirs_created: 1,
            warnings: vec!["w".to_string()],
            records: vec![],
            name_product: "cuDNN".to_string(),
        };

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_scanned"], 7);
        assert_eq!(dict_counts["cnt_copied"], 5);
        assert_eq!(dict_counts["cnt_skipped"], 2);
        assert_eq!(dict_counts["cnt_dirs_created"], 1);
        assert_eq!(dict_counts["cnt_warnings"], 1);

        let txt = report.format("[MIRROR]");
        assert_eq!(
            txt,
            "[MIRROR] scanned=7 copied=5 skipped=2 dirs_created=1 warnings=1"
        );
        assert_eq!(report.to_string(), txt);
        assert_eq!(
            report.completion_message(),
            "All cuDNN files have been successfully copied."
        );
    }

    #[test]
    fn copy_record_renders_progress_line() {
        let spec_record = SpecCopyRecord {
            path_file_src: PathBuf::from("/sdk/bin/a.dll"),
            path_dir_dst: PathBuf::from("/toolkit/bin"),
            path_file_dst: PathBuf::from("/toolkit/bin/a.dll"),
        };
        assert_eq!(spec_record.to_string(), "Copied /sdk/bin/a.dll to /toolkit/bin");

        let mut builder = ReportMirrorBuilder::default();
        builder.add_scanned();
        builder.add_copied(spec_record.clone());
        let report = builder.build("cuDNN");
        assert_eq!(report.cnt_copied, 1);
        assert_eq!(report.records, vec![spec_record]);
    }
}
