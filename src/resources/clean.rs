//! Removal of stale deployment artifacts from the destination's top level.
use std::path::{Path, PathBuf};

use crate::error::DeployError;
use crate::logging::Log;
use crate::operations::{EntryKind, FileSystemOps};

/// File extensions removed from the destination's top level, compared
/// without regard to case.
pub const STALE_EXTENSIONS: &[&str] = &["dtb", "ini", "orig", "tony"];

/// Top-level directory removed with all its contents.
pub const BITMAP_DIR: &str = "BMPs";

/// Outcome of [`clean`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Entries that were removed.
    pub removed: Vec<PathBuf>,
    /// Entries that could not be removed, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

/// Whether a top-level entry is a stale artifact.
///
/// A `BMPs` symlink counts as stale so that later copies never write
/// through it.
fn is_stale(name: &str, kind: EntryKind) -> bool {
    match kind {
        EntryKind::Dir => name == BITMAP_DIR,
        EntryKind::Symlink if name == BITMAP_DIR => true,
        EntryKind::File | EntryKind::Symlink => Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                STALE_EXTENSIONS
                    .iter()
                    .any(|stale| ext.eq_ignore_ascii_case(stale))
            }),
    }
}

/// Remove stale artifacts directly under `root`.
///
/// Files ending in `.dtb`, `.ini`, `.orig` or `.tony` are deleted, as is
/// the `BMPs` directory with everything under it. Subdirectories are never
/// searched. A failure to delete one entry is logged as a warning and the
/// remaining entries are still processed.
///
/// Running it twice in a row deletes nothing the second time.
///
/// # Errors
///
/// Returns [`DeployError::CleanFailed`] if `root` cannot be listed.
pub fn clean(
    fs: &dyn FileSystemOps,
    root: &Path,
    log: &dyn Log,
) -> Result<CleanReport, DeployError> {
    let entries = fs.read_dir(root).map_err(|source| DeployError::CleanFailed {
        path: root.to_path_buf(),
        source,
    })?;

    let mut report = CleanReport::default();
    for entry in entries {
        let Some(name) = entry.file_name() else {
            continue;
        };
        if !is_stale(name, entry.kind) {
            continue;
        }

        let result = match entry.kind {
            EntryKind::Dir => fs.remove_dir_all(&entry.path),
            EntryKind::File | EntryKind::Symlink => fs.remove_file(&entry.path),
        };
        match result {
            Ok(()) => {
                log.debug(&format!("removed {}", entry.path.display()));
                report.removed.push(entry.path);
            }
            Err(e) => {
                log.warn(&format!("failed to remove {}: {e}", entry.path.display()));
                report.failures.push((entry.path, e.to_string()));
            }
        }
    }
    Ok(report)
}
