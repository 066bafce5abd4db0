//! Configuration: the device catalog and the locations it is resolved against.
pub mod catalog;
pub mod toml_loader;
pub mod validation;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::operations::FileSystemOps;
use catalog::Catalog;
use validation::{CatalogValidator, ConfigValidator, ValidationWarning};

/// File name of the optional catalog override inside the asset store.
pub const CATALOG_FILE: &str = "catalog.toml";

/// Everything a command needs to know about where assets come from and
/// where they go.
#[derive(Debug, Clone)]
pub struct Config {
    /// Device catalog in effect for this run.
    pub catalog: Arc<Catalog>,
    /// Root of the asset store holding one directory per bundle.
    pub assets: PathBuf,
    /// Destination tree that gets cleaned and populated.
    pub destination: PathBuf,
    /// Where the catalog came from, or `None` for the built-in table.
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for the given asset store and destination.
    ///
    /// The catalog comes from `catalog_path` when given, otherwise from
    /// `<assets>/catalog.toml` when that file exists, otherwise the
    /// built-in table is used.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog file exists but cannot be loaded.
    pub fn load(assets: &Path, destination: &Path, catalog_path: Option<&Path>) -> Result<Self> {
        let candidate = catalog_path.map_or_else(|| assets.join(CATALOG_FILE), Path::to_path_buf);

        let (catalog, catalog_path) = if catalog_path.is_some() || candidate.is_file() {
            let catalog = Catalog::load(&candidate)
                .with_context(|| format!("loading {}", candidate.display()))?;
            (Arc::new(catalog), Some(candidate))
        } else {
            (Catalog::builtin(), None)
        };

        Ok(Self {
            catalog,
            assets: assets.to_path_buf(),
            destination: destination.to_path_buf(),
            catalog_path,
        })
    }

    /// Location of the bundle `id` in the asset store.
    ///
    /// Absolute identifiers are returned unchanged.
    #[must_use]
    pub fn source_path(&self, id: &str) -> PathBuf {
        self.assets.join(id)
    }

    /// Check the catalog against the asset store.
    #[must_use]
    pub fn validate(&self, fs: &dyn FileSystemOps) -> Vec<ValidationWarning> {
        CatalogValidator::new(&self.catalog).validate(&self.assets, fs)
    }

    /// Human-readable origin of the catalog.
    #[must_use]
    pub fn catalog_origin(&self) -> String {
        self.catalog_path
            .as_ref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn builtin_catalog_without_override() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), dir.path(), None).unwrap();
        assert!(Arc::ptr_eq(&config.catalog, &Catalog::builtin()));
        assert_eq!(config.catalog_origin(), "built-in");
    }

    #[test]
    fn catalog_file_in_asset_store_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CATALOG_FILE),
            "[[devices]]\nsource = \"unit\"\nname = \"Unit\"\nbrand = \"Test\"\n",
        )
        .unwrap();
        let config = Config::load(dir.path(), dir.path(), None).unwrap();
        assert_eq!(config.catalog.list_brands(), ["Test"]);
        assert_eq!(config.catalog_path, Some(dir.path().join(CATALOG_FILE)));
    }

    #[test]
    fn explicit_catalog_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load(dir.path(), dir.path(), Some(&missing)).unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"));
    }

    #[test]
    fn source_path_joins_relative_and_keeps_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), dir.path(), None).unwrap();
        assert_eq!(config.source_path("r36max"), dir.path().join("r36max"));
        let abs = dir.path().join("elsewhere");
        assert_eq!(config.source_path(abs.to_str().unwrap()), abs);
    }
}
