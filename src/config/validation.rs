//! Catalog checks against the asset store.
use std::path::Path;

use super::catalog::Catalog;
use crate::operations::{EntryKind, FileSystemOps};

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Deployment still works, possibly with fewer files.
    Warning,
    /// Deploying the affected device would fail.
    Error,
}

/// A validation finding detected while checking the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "catalog").
    pub source: String,
    /// The device, brand, or bundle that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
    /// Whether deployment of the item would fail.
    pub severity: Severity,
}

impl ValidationWarning {
    /// Create a warning-level finding.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Mark this finding as an error.
    #[must_use]
    pub const fn into_error(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }

    /// Whether this finding is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Trait for configuration validators.
///
/// Implementations check configuration against the asset store:
/// - Missing bundle directories
/// - Bundles that are files rather than directories
/// - Empty groupings
pub trait ConfigValidator {
    /// Validate against the asset store at `assets` and return any findings.
    fn validate(&self, assets: &Path, fs: &dyn FileSystemOps) -> Vec<ValidationWarning>;

    /// Return a human-readable name for this validator.
    fn name(&self) -> &'static str;
}

/// Validator for the device catalog.
#[derive(Debug)]
pub struct CatalogValidator<'a> {
    catalog: &'a Catalog,
}

impl<'a> CatalogValidator<'a> {
    /// Create a validator for `catalog`.
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }
}

/// Describe why `path` is not a usable bundle, or `None` if it is a directory.
fn bundle_problem(fs: &dyn FileSystemOps, path: &Path) -> Option<String> {
    match fs.kind(path) {
        Ok(EntryKind::Dir) => None,
        Ok(EntryKind::File | EntryKind::Symlink) => {
            Some(format!("bundle is not a directory: {}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Some(format!("bundle does not exist: {}", path.display()))
        }
        Err(e) => Some(format!("cannot inspect {}: {e}", path.display())),
    }
}

impl ConfigValidator for CatalogValidator<'_> {
    fn validate(&self, assets: &Path, fs: &dyn FileSystemOps) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for brand in self.catalog.list_brands() {
            if self.catalog.list_profiles(brand).is_empty() {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    brand,
                    "brand has no devices",
                ));
            }
        }

        for profile in self.catalog.profiles() {
            let primary = assets.join(&profile.source_id);
            if let Some(problem) = bundle_problem(fs, &primary) {
                warnings.push(
                    ValidationWarning::new(self.name(), &profile.display_name, problem)
                        .into_error(),
                );
            }

            for overlay in &profile.overlay_sources {
                // Absolute overlay paths replace the asset root when joined.
                let path = assets.join(overlay);
                if let Some(problem) = bundle_problem(fs, &path) {
                    warnings.push(ValidationWarning::new(
                        self.name(),
                        &profile.display_name,
                        format!("overlay will be skipped, {problem}"),
                    ));
                }
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "catalog"
    }
}
