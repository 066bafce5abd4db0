//! Recursive merge-copy of a bundle into the destination tree.
use std::path::Path;

use crate::error::DeployError;
use crate::operations::{EntryKind, FileSystemOps};

/// Counts gathered by [`copy_tree`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    /// Files written.
    pub files: usize,
    /// Directories that did not exist before the copy.
    pub dirs_created: usize,
    /// Bytes written.
    pub bytes: u64,
}

/// Copy every entry under `src` to the same relative path under `dst`.
///
/// Directories are created as needed and existing files are overwritten,
/// so a later bundle wins over an earlier one at the same path. Symbolic
/// links are copied as the file they point to.
///
/// Nothing is rolled back on failure; files copied before the error stay.
///
/// # Errors
///
/// - [`DeployError::NotFound`] if `src` does not exist.
/// - [`DeployError::NotADirectory`] if `src` is not a directory.
/// - [`DeployError::CopyFailed`] on the first directory or file that cannot
///   be written, including links to directories or to missing targets.
pub fn copy_tree(fs: &dyn FileSystemOps, src: &Path, dst: &Path) -> Result<CopyStats, DeployError> {
    match fs.kind(src) {
        Ok(EntryKind::Dir) => {}
        Ok(EntryKind::File | EntryKind::Symlink) => {
            return Err(DeployError::NotADirectory {
                path: src.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DeployError::NotFound {
                path: src.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(DeployError::CopyFailed {
                path: src.to_path_buf(),
                source,
            });
        }
    }

    let mut stats = CopyStats::default();
    copy_dir(fs, src, dst, &mut stats)?;
    Ok(stats)
}

fn copy_dir(
    fs: &dyn FileSystemOps,
    src: &Path,
    dst: &Path,
    stats: &mut CopyStats,
) -> Result<(), DeployError> {
    if !fs.exists(dst) {
        stats.dirs_created += 1;
    }
    fs.create_dir_all(dst)
        .map_err(|source| DeployError::CopyFailed {
            path: dst.to_path_buf(),
            source,
        })?;

    let entries = fs.read_dir(src).map_err(|source| DeployError::CopyFailed {
        path: src.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let Some(name) = entry.path.file_name() else {
            continue;
        };
        let target = dst.join(name);
        match entry.kind {
            EntryKind::Dir => copy_dir(fs, &entry.path, &target, stats)?,
            EntryKind::File | EntryKind::Symlink => {
                let bytes = fs
                    .copy_file(&entry.path, &target)
                    .map_err(|source| DeployError::CopyFailed {
                        path: target.clone(),
                        source,
                    })?;
                stats.files += 1;
                stats.bytes += bytes;
            }
        }
    }
    Ok(())
}
