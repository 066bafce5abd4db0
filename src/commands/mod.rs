//! Subcommand implementations and their shared setup.
pub mod check;
pub mod completions;
pub mod deploy;
pub mod list;
pub mod version;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::logging::Logger;

/// Environment variable naming the asset store.
pub const ASSETS_ENV: &str = "DTB_SELECTOR_ASSETS";

/// Directory name searched for the asset store next to the destination and
/// next to the executable.
pub const ASSETS_DIR: &str = "consoles";

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates destination and asset resolution plus catalog loading so
/// that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded catalog and resolved paths.
    pub config: Config,
}

impl CommandSetup {
    /// Resolve the destination and asset store, then load the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset store cannot be found or the catalog
    /// file fails to load.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        log.stage("Loading configuration");
        let destination = resolve_destination(global)?;
        let assets = resolve_assets(global, &destination)?;
        log.info(&format!("assets: {}", assets.display()));
        log.info(&format!("destination: {}", destination.display()));

        let config = Config::load(&assets, &destination, global.catalog.as_deref())?;
        log.debug(&format!("catalog: {}", config.catalog_origin()));
        log.debug(&format!("{} brands", config.catalog.list_brands().len()));
        log.debug(&format!("{} devices", config.catalog.profiles().len()));

        Ok(Self { config })
    }
}

/// Destination tree: `--dest`, or the current directory.
///
/// # Errors
///
/// Returns an error if the directory does not exist.
pub fn resolve_destination(global: &GlobalOpts) -> Result<PathBuf> {
    let dest = match &global.dest {
        Some(dest) => dest.clone(),
        None => std::env::current_dir().context("reading current directory")?,
    };
    dunce::canonicalize(&dest).with_context(|| format!("destination {}", dest.display()))
}

/// Resolve the asset store from CLI arguments or auto-detection.
///
/// # Errors
///
/// Returns an error if no candidate directory exists.
pub fn resolve_assets(global: &GlobalOpts, destination: &Path) -> Result<PathBuf> {
    let env = std::env::var_os(ASSETS_ENV).map(PathBuf::from);
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let assets = find_assets(global.assets.as_deref(), env, destination, exe_dir.as_deref())
        .with_context(|| {
            format!(
                "cannot find the asset store. Use --assets, set {ASSETS_ENV}, or place a \
                 '{ASSETS_DIR}' directory in {}",
                destination.display()
            )
        })?;
    dunce::canonicalize(&assets).with_context(|| format!("asset store {}", assets.display()))
}

/// Pick the asset store: explicit path, environment, `<dest>/consoles`,
/// then `<exe dir>/consoles`. Only the last two are checked for existence.
fn find_assets(
    explicit: Option<&Path>,
    env: Option<PathBuf>,
    destination: &Path,
    exe_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Some(path);
    }
    std::iter::once(destination.join(ASSETS_DIR))
        .chain(exe_dir.map(|dir| dir.join(ASSETS_DIR)))
        .find(|candidate| candidate.is_dir())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_assets_win() {
        let dest = tempfile::tempdir().unwrap();
        std::fs::create_dir(dest.path().join(ASSETS_DIR)).unwrap();
        let found = find_assets(
            Some(Path::new("/media/assets")),
            Some(PathBuf::from("/env")),
            dest.path(),
            None,
        );
        assert_eq!(found, Some(PathBuf::from("/media/assets")));
    }

    #[test]
    fn env_beats_detection() {
        let dest = tempfile::tempdir().unwrap();
        std::fs::create_dir(dest.path().join(ASSETS_DIR)).unwrap();
        let found = find_assets(None, Some(PathBuf::from("/env")), dest.path(), None);
        assert_eq!(found, Some(PathBuf::from("/env")));
    }

    #[test]
    fn destination_consoles_before_exe_dir() {
        let dest = tempfile::tempdir().unwrap();
        let exe = tempfile::tempdir().unwrap();
        std::fs::create_dir(dest.path().join(ASSETS_DIR)).unwrap();
        std::fs::create_dir(exe.path().join(ASSETS_DIR)).unwrap();
        let found = find_assets(None, None, dest.path(), Some(exe.path()));
        assert_eq!(found, Some(dest.path().join(ASSETS_DIR)));
    }

    #[test]
    fn exe_dir_used_as_last_resort() {
        let dest = tempfile::tempdir().unwrap();
        let exe = tempfile::tempdir().unwrap();
        std::fs::create_dir(exe.path().join(ASSETS_DIR)).unwrap();
        let found = find_assets(None, Some(PathBuf::new()), dest.path(), Some(exe.path()));
        assert_eq!(found, Some(exe.path().join(ASSETS_DIR)));
    }

    #[test]
    fn nothing_found() {
        let dest = tempfile::tempdir().unwrap();
        assert_eq!(find_assets(None, None, dest.path(), None), None);
    }
}
