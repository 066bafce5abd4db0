// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed asset store and destination tree
// plus a fluent builder so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dtb_selector::cli::{DeployOpts, GlobalOpts};
use dtb_selector::commands;
use dtb_selector::config::Config;
use dtb_selector::logging::Logger;
use dtb_selector::prompt::ScriptedPrompter;

/// Catalog with one brand `Test` and one device `Unit` without overlays.
pub const UNIT_CATALOG: &str = r#"brands = ["Test"]

[[devices]]
source = "unit"
name = "Unit"
brand = "Test"
"#;

/// An isolated asset store and destination backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `assets/`  asset store, one directory per bundle, `catalog.toml`
/// - `dest/`    destination tree
pub struct IntegrationTestContext {
    /// Temporary directory holding both trees.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create empty `assets/` and `dest/` directories.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("assets")).expect("create assets dir");
        std::fs::create_dir_all(root.path().join("dest")).expect("create dest dir");
        Self { root }
    }

    /// Path to the asset store.
    pub fn assets(&self) -> PathBuf {
        self.root.path().join("assets")
    }

    /// Path to the destination tree.
    pub fn dest(&self) -> PathBuf {
        self.root.path().join("dest")
    }

    /// Global options pointing at this context.
    pub fn global(&self, dry_run: bool) -> GlobalOpts {
        GlobalOpts {
            assets: Some(self.assets()),
            dest: Some(self.dest()),
            catalog: None,
            dry_run,
        }
    }

    /// Load configuration the way the commands do.
    pub fn load_config(&self) -> Config {
        Config::load(&self.assets(), &self.dest(), None).expect("load config")
    }

    /// Contents of `rel` under the destination, if it is a readable file.
    pub fn read_dest(&self, rel: &str) -> Option<String> {
        std::fs::read_to_string(self.dest().join(rel)).ok()
    }

    /// Whether `rel` exists under the destination.
    pub fn dest_has(&self, rel: &str) -> bool {
        self.dest().join(rel).exists()
    }

    /// Sorted relative paths of every file under the destination.
    pub fn dest_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        collect_files(&self.dest(), &self.dest(), &mut files);
        files.sort();
        files
    }

    /// Run `deploy` with scripted answers and return the logger used.
    pub fn deploy(
        &self,
        answers: &[&str],
        opts: &DeployOpts,
        dry_run: bool,
    ) -> (anyhow::Result<()>, Arc<Logger>) {
        let log = Arc::new(Logger::with_log_file(None));
        let prompter = Arc::new(ScriptedPrompter::new(answers.iter().copied()));
        let result =
            commands::deploy::run_with_prompter(&self.global(dry_run), opts, &log, prompter);
        (result, log)
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).expect("relative path");
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context with empty trees.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `assets/catalog.toml`.
    pub fn with_catalog(self, content: &str) -> Self {
        write_file(&self.ctx.assets().join("catalog.toml"), content);
        self
    }

    /// Write `content` to `rel` inside the asset store.
    pub fn with_asset(self, rel: &str, content: &str) -> Self {
        write_file(&self.ctx.assets().join(rel), content);
        self
    }

    /// Write `content` to `rel` inside the destination.
    pub fn with_dest_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.ctx.dest().join(rel), content);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
