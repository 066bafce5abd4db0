//! Command: validate the catalog against the asset store.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::operations::SystemFileSystemOps;

/// Check the catalog against the asset store.
///
/// Missing overlays and empty brands are reported as warnings. Missing
/// primary bundles are errors and make the command fail.
///
/// # Errors
///
/// Returns an error if setup fails or any primary bundle is missing.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let config = &setup.config;

    log.stage("Checking catalog");
    let warnings = config.validate(&SystemFileSystemOps);
    let mut errors = 0usize;
    for warning in &warnings {
        let line = format!("{} [{}]: {}", warning.source, warning.item, warning.message);
        if warning.is_error() {
            errors += 1;
            log.error(&line);
        } else {
            log.warn(&line);
        }
    }

    log.info(&format!(
        "{} brands, {} devices, {} warning(s), {errors} error(s)",
        config.catalog.list_brands().len(),
        config.catalog.profiles().len(),
        warnings.len() - errors,
    ));

    if errors > 0 {
        anyhow::bail!("{errors} device(s) cannot be deployed");
    }
    Ok(())
}
