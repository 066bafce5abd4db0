//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the cleaner and the copier
//! can be unit-tested without touching the real filesystem. Production code
//! uses [`SystemFileSystemOps`]; `--dry-run` wraps it in
//! [`DryRunFileSystemOps`]; tests use [`MemoryFileSystem`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::logging::Log;

/// Kind of a filesystem entry as seen without following symbolic links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory.
    Dir,
    /// A regular file.
    File,
    /// A symbolic link (its target may or may not resolve).
    Symlink,
}

/// One child of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Kind of the entry, links not followed.
    pub kind: EntryKind,
}

impl DirEntry {
    /// File name component of the entry path.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Abstraction over the filesystem calls made during a deployment.
///
/// Implement this trait to swap in an in-memory filesystem during unit
/// tests, keeping cleaning and copying logic independent of real I/O.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists (links followed).
    fn exists(&self, path: &Path) -> bool;

    /// Kind of the entry at `path`, following symbolic links.
    ///
    /// # Errors
    ///
    /// Returns an error (kind `NotFound` when absent) if `path` cannot be
    /// inspected.
    fn kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Immediate children of `path`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a component cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate `dst` and copy the bytes of `src` into it.
    /// Returns the number of bytes copied.
    ///
    /// # Errors
    ///
    /// Returns an error if `src` cannot be read or `dst` cannot be written.
    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<u64>;

    /// Remove the file or symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove the directory at `path` and everything beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create an empty marker file at `path`, leaving an existing file as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    fn create_marker(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        let meta = fs::metadata(path)?;
        Ok(if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                path: entry.path(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        let mut input = fs::File::open(src)?;
        let mut output = fs::File::create(dst)?;
        io::copy(&mut input, &mut output)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn create_marker(&self, path: &Path) -> io::Result<()> {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(drop)
    }
}

/// [`FileSystemOps`] wrapper for `--dry-run`: reads go to the inner
/// implementation, every mutation is reported through the logger instead.
pub struct DryRunFileSystemOps {
    inner: Arc<dyn FileSystemOps>,
    log: Arc<dyn Log>,
}

impl std::fmt::Debug for DryRunFileSystemOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DryRunFileSystemOps")
            .field("inner", &self.inner)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl DryRunFileSystemOps {
    /// Wrap `inner`, reporting skipped mutations to `log`.
    #[must_use]
    pub fn new(inner: Arc<dyn FileSystemOps>, log: Arc<dyn Log>) -> Self {
        Self { inner, log }
    }
}

impl FileSystemOps for DryRunFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        self.inner.kind(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        self.inner.read_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if !self.inner.exists(path) {
            self.log
                .dry_run(&format!("would create directory {}", path.display()));
        }
        Ok(())
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        self.log.debug(&format!(
            "would copy {} -> {}",
            src.display(),
            dst.display()
        ));
        // Nothing is written, so no bytes are counted.
        self.inner.kind(src)?;
        Ok(0)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.log
            .dry_run(&format!("would remove file {}", path.display()));
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.log
            .dry_run(&format!("would remove directory {}", path.display()));
        Ok(())
    }

    fn create_marker(&self, path: &Path) -> io::Result<()> {
        self.log
            .dry_run(&format!("would create marker {}", path.display()));
        Ok(())
    }
}

/// A node of the in-memory filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Paths are stored verbatim, so tests should use absolute paths such as
/// `/assets/r36max/a.dtb`. Individual paths can be configured to fail on
/// write or removal to exercise error handling.
///
/// # Example
///
/// ```
/// use dtb_selector::operations::{FileSystemOps, MemoryFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new()
///     .with_file("/assets/unit/file.txt", "hello")
///     .with_dir("/dest");
/// assert!(fs.exists(Path::new("/assets/unit")));
/// assert_eq!(fs.read(Path::new("/assets/unit/file.txt")).as_deref(), Some(&b"hello"[..]));
/// ```
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
    failing: Vec<PathBuf>,
}

impl MemoryFileSystem {
    /// Create an empty filesystem containing only `/`.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            nodes: Mutex::new(nodes),
            failing: Vec::new(),
        }
    }

    /// Add a directory (and its ancestors).
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.insert_dirs(&path.into());
        self
    }

    /// Add a file with `content` (and its parent directories).
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl AsRef<[u8]>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.insert_dirs(parent);
        }
        self.lock().insert(path, Node::File(content.as_ref().to_vec()));
        self
    }

    /// Make every write or removal at `path` fail with `PermissionDenied`.
    #[must_use]
    pub fn failing_at(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.push(path.into());
        self
    }

    /// Contents of the file at `path`, if it is a file.
    #[must_use]
    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        match self.lock().get(path) {
            Some(Node::File(bytes)) => Some(bytes.clone()),
            _ => None,
        }
    }

    /// All file paths currently stored, sorted.
    #[must_use]
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock()
            .iter()
            .filter(|(_, node)| matches!(node, Node::File(_)))
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, Node>> {
        self.nodes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn insert_dirs(&self, path: &Path) {
        let mut nodes = self.lock();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }

    fn check_writable(&self, path: &Path) -> io::Result<()> {
        if self.failing.iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("mock: {} is read-only", path.display()),
            ));
        }
        Ok(())
    }
}

impl FileSystemOps for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        match self.lock().get(path) {
            Some(Node::Dir) => Ok(EntryKind::Dir),
            Some(Node::File(_)) => Ok(EntryKind::File),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let nodes = self.lock();
        match nodes.get(path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => return Err(io::Error::from(io::ErrorKind::NotADirectory)),
            None => return Err(io::Error::from(io::ErrorKind::NotFound)),
        }
        Ok(nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path) && p.as_path() != path)
            .map(|(p, node)| DirEntry {
                path: p.clone(),
                kind: match node {
                    Node::Dir => EntryKind::Dir,
                    Node::File(_) => EntryKind::File,
                },
            })
            .collect())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_writable(path)?;
        if let Some(Node::File(_)) = self.lock().get(path) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        self.insert_dirs(path);
        Ok(())
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        self.check_writable(dst)?;
        let bytes = self
            .read(src)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        let mut nodes = self.lock();
        match dst.parent().and_then(|p| nodes.get(p)) {
            Some(Node::Dir) => {}
            _ => return Err(io::Error::from(io::ErrorKind::NotFound)),
        }
        if let Some(Node::Dir) = nodes.get(dst) {
            return Err(io::Error::from(io::ErrorKind::IsADirectory));
        }
        let len = bytes.len() as u64;
        nodes.insert(dst.to_path_buf(), Node::File(bytes));
        Ok(len)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check_writable(path)?;
        let mut nodes = self.lock();
        match nodes.get(path) {
            Some(Node::File(_)) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir) => Err(io::Error::from(io::ErrorKind::IsADirectory)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_writable(path)?;
        let mut nodes = self.lock();
        if !matches!(nodes.get(path), Some(Node::Dir)) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        nodes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn create_marker(&self, path: &Path) -> io::Result<()> {
        self.check_writable(path)?;
        let mut nodes = self.lock();
        nodes
            .entry(path.to_path_buf())
            .or_insert_with(|| Node::File(Vec::new()));
        Ok(())
    }
}
