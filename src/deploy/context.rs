//! Shared state for one deployment run.
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::logging::Log;
use crate::operations::{DryRunFileSystemOps, FileSystemOps, SystemFileSystemOps};
use crate::prompt::Prompter;

/// Shared context for one deployment run.
pub struct Context {
    /// Catalog and asset/destination locations.
    pub config: Arc<Config>,
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// Operator I/O.
    pub prompter: Arc<dyn Prompter>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("prompter", &"<dyn Prompter>")
            .field("dry_run", &self.dry_run)
            .field("fs_ops", &self.fs_ops)
            .finish()
    }
}

impl Context {
    /// Creates a context over the real filesystem.
    ///
    /// With `dry_run` set, every mutation is reported through `log` instead
    /// of being applied.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        log: Arc<dyn Log>,
        prompter: Arc<dyn Prompter>,
        dry_run: bool,
    ) -> Self {
        let ctx = Self {
            config,
            log,
            prompter,
            dry_run,
            fs_ops: Arc::new(SystemFileSystemOps),
        };
        ctx.with_fs_ops(Arc::new(SystemFileSystemOps))
    }

    /// Replace the filesystem backend, keeping the dry-run wrapper when
    /// `dry_run` is set.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = if self.dry_run {
            Arc::new(DryRunFileSystemOps::new(fs_ops, Arc::clone(&self.log)))
        } else {
            fs_ops
        };
        self
    }

    /// Destination tree root.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.config.destination
    }
}
