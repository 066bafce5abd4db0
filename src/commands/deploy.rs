//! Command: interactive selection and deployment.
use anyhow::{Context as _, Result};
use std::sync::Arc;

use crate::cli::{DeployOpts, GlobalOpts};
use crate::deploy::{self, Context, DeployOptions, DeployOutcome};
use crate::logging::Logger;
use crate::prompt::{ConsolePrompter, Prompter};

/// Run the deploy command against the console.
///
/// # Errors
///
/// Returns an error if setup fails or the deployment does not complete.
pub fn run(global: &GlobalOpts, opts: &DeployOpts, log: &Arc<Logger>) -> Result<()> {
    run_with_prompter(global, opts, log, Arc::new(ConsolePrompter))
}

/// Run the deploy command with the given operator I/O.
///
/// # Errors
///
/// Returns an error if setup fails or the deployment does not complete.
pub fn run_with_prompter(
    global: &GlobalOpts,
    opts: &DeployOpts,
    log: &Arc<Logger>,
    prompter: Arc<dyn Prompter>,
) -> Result<()> {
    log.info(&format!("dtb-selector {}", super::version::version()));

    let setup = super::CommandSetup::init(global, log)?;
    let ctx = Context::new(
        Arc::new(setup.config),
        Arc::clone(log) as Arc<dyn crate::logging::Log>,
        Arc::clone(&prompter),
        global.dry_run,
    );
    let options = DeployOptions {
        assume_yes: opts.yes,
        language: opts.language.map(Into::into),
    };

    let outcome = deploy::run(&ctx, &options);
    log.print_summary();

    match outcome.context("deployment failed")? {
        DeployOutcome::Deployed {
            display_name,
            language,
            ..
        } => {
            log.info(&format!(
                "deployed {display_name} (language: {})",
                language.code()
            ));
        }
        DeployOutcome::Cancelled => prompter.notice("Cancelled, bye!"),
    }
    Ok(())
}
