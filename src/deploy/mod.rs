//! Interactive deployment: acknowledge, select, clean, copy, tag language.
//!
//! Ordering is strict. Cleaning finishes before the primary bundle is
//! copied, and the primary bundle finishes before the first overlay.
//! Overlays are applied in catalog order, so later overlays win on
//! conflicting paths. Nothing is rolled back on failure.
mod context;

pub use context::Context;

use crate::config::catalog::DeviceProfile;
use crate::error::DeployError;
use crate::logging::StepStatus;
use crate::resources::{self, Language, ResourceChange};
use crate::selection;

/// Lines shown before the operator is asked to continue.
const INTRO: &[&str] = &[
    "DTB Selector: select your console",
    "",
    "Only the consoles listed in the menus are supported. If your clone is",
    "not listed it cannot be set up with this tool yet.",
    "Do NOT use the dtb files from a stock EmuELEC card with this system,",
    "the device will not boot.",
    "",
    "Before selecting a console:",
    "  * top-level .dtb, .ini, .orig and .tony files and the BMPs folder",
    "    in the destination are removed;",
    "  * the chosen console and its extra resources are then copied.",
];

/// Choices that do not come from the menus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Skip the introductory notice.
    pub assume_yes: bool,
    /// Language to apply without asking.
    pub language: Option<Language>,
}

/// How a deployment run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// A profile was deployed.
    Deployed {
        /// Display name of the deployed profile.
        display_name: String,
        /// Primary bundle identifier.
        source_id: String,
        /// Overlays that were copied, in order.
        overlays_applied: Vec<String>,
        /// Overlays whose source was missing.
        overlays_skipped: Vec<String>,
        /// Language applied after the copy.
        language: Language,
    },
    /// The operator quit before anything was changed.
    Cancelled,
}

/// Run one deployment.
///
/// # Errors
///
/// - [`DeployError::InputUnavailable`] if input runs out during selection.
/// - [`DeployError::CleanFailed`] if the destination cannot be listed.
/// - [`DeployError::NotFound`] or [`DeployError::NotADirectory`] if the
///   primary bundle is missing.
/// - [`DeployError::CopyFailed`] on the first write error.
/// - [`DeployError::MarkerFailed`] if the language tag cannot be written.
pub fn run(ctx: &Context, opts: &DeployOptions) -> Result<DeployOutcome, DeployError> {
    if !opts.assume_yes && !acknowledge(ctx) {
        ctx.log.info("cancelled");
        return Ok(DeployOutcome::Cancelled);
    }

    ctx.log.stage("Selecting device");
    let catalog = &ctx.config.catalog;
    let Some(profile) = selection::select_profile(catalog, ctx.prompter.as_ref())? else {
        ctx.log.info("no device selected");
        return Ok(DeployOutcome::Cancelled);
    };
    ctx.log.info(&format!(
        "selected {} ({})",
        profile.display_name, profile.source_id
    ));

    let (overlays_applied, overlays_skipped) = deploy_profile(ctx, profile)?;
    ctx.prompter.notice(&format!(
        "Operation completed! Copied console: {}",
        profile.display_name
    ));
    ctx.prompter
        .notice("Tip: verify the files in the destination directory.");

    let language = match opts.language {
        Some(language) => language,
        None => choose_language(ctx)?,
    };
    apply_language(ctx, language)?;

    Ok(DeployOutcome::Deployed {
        display_name: profile.display_name.clone(),
        source_id: profile.source_id.clone(),
        overlays_applied,
        overlays_skipped,
        language,
    })
}

/// Show the introduction and wait for the operator.
///
/// `q` quits, as does running out of input. Anything else continues.
fn acknowledge(ctx: &Context) -> bool {
    for line in INTRO {
        ctx.prompter.notice(line);
    }
    match ctx
        .prompter
        .read_line("Press Enter to continue, or type q to quit: ")
    {
        Ok(answer) => !answer.trim().eq_ignore_ascii_case("q"),
        Err(e) => {
            ctx.log.debug(&format!("acknowledgement: {e}"));
            false
        }
    }
}

/// Status recorded for a step that changed the destination.
const fn applied(ctx: &Context) -> StepStatus {
    if ctx.dry_run {
        StepStatus::DryRun
    } else {
        StepStatus::Ok
    }
}

/// Record `err` as a failed step and hand it back.
fn fail(ctx: &Context, step: &str, err: DeployError) -> DeployError {
    ctx.log.error(&format!("{step}: {err}"));
    ctx.log.record_step(step, StepStatus::Failed, Some(&err.to_string()));
    err
}

/// Clean the destination, then copy the primary bundle and each overlay.
///
/// Returns the overlays applied and the overlays skipped.
fn deploy_profile(
    ctx: &Context,
    profile: &DeviceProfile,
) -> Result<(Vec<String>, Vec<String>), DeployError> {
    let fs = ctx.fs_ops.as_ref();
    let dest = ctx.destination();

    ctx.log.stage("Cleaning destination");
    let report = resources::clean(fs, dest, ctx.log.as_ref())
        .map_err(|e| fail(ctx, "clean destination", e))?;
    let summary = format!(
        "{} removed, {} failed",
        report.removed.len(),
        report.failures.len()
    );
    ctx.log.info(&summary);
    ctx.log
        .record_step("clean destination", applied(ctx), Some(&summary));

    ctx.log.stage(&format!("Copying {}", profile.display_name));
    let step = format!("copy {}", profile.source_id);
    let source = ctx.config.source_path(&profile.source_id);
    let stats = resources::copy_tree(fs, &source, dest).map_err(|e| fail(ctx, &step, e))?;
    let detail = format!(
        "{} files, {} directories created",
        stats.files, stats.dirs_created
    );
    ctx.log.info(&detail);
    ctx.log.record_step(&step, applied(ctx), Some(&detail));

    let mut overlays_applied = Vec::new();
    let mut overlays_skipped = Vec::new();
    if !profile.overlay_sources.is_empty() {
        ctx.log.stage("Copying extra resources");
    }
    for overlay in &profile.overlay_sources {
        let step = format!("overlay {overlay}");
        let source = ctx.config.source_path(overlay);
        match resources::copy_tree(fs, &source, dest) {
            Ok(stats) => {
                ctx.log.info(&format!("{overlay}: {} files", stats.files));
                ctx.log.record_step(&step, applied(ctx), None);
                overlays_applied.push(overlay.clone());
            }
            Err(e) if e.is_missing_source() => {
                ctx.log.warn(&format!("extra source skipped: {e}"));
                ctx.log
                    .record_step(&step, StepStatus::Skipped, Some(&e.to_string()));
                overlays_skipped.push(overlay.clone());
            }
            Err(e) => return Err(fail(ctx, &step, e)),
        }
    }

    Ok((overlays_applied, overlays_skipped))
}

/// Ask which interface language to use.
///
/// Invalid answers are asked again. Running out of input keeps English.
fn choose_language(ctx: &Context) -> Result<Language, DeployError> {
    ctx.log.stage("Selecting language");
    for line in ["Select language:", "  1. English (default)", "  2. 中文"] {
        ctx.prompter.notice(line);
    }
    loop {
        match ctx
            .prompter
            .read_line("Enter a number, or press Enter for English: ")
        {
            Ok(answer) => match Language::parse(&answer) {
                Some(language) => return Ok(language),
                None => ctx.prompter.notice("Invalid selection, please try again."),
            },
            Err(DeployError::InputUnavailable(reason)) => {
                ctx.log
                    .warn(&format!("no language chosen ({reason}), keeping English"));
                return Ok(Language::English);
            }
            Err(e) => return Err(e),
        }
    }
}

fn apply_language(ctx: &Context, language: Language) -> Result<(), DeployError> {
    let step = "language tag";
    match resources::apply_language(ctx.fs_ops.as_ref(), ctx.destination(), language) {
        Ok(ResourceChange::Applied) => {
            ctx.log
                .info(&format!("language marker created ({})", language.code()));
            ctx.log
                .record_step(step, applied(ctx), Some(language.code()));
        }
        Ok(ResourceChange::AlreadyCorrect) => {
            ctx.log
                .record_step(step, StepStatus::Ok, Some("already present"));
        }
        Ok(ResourceChange::Skipped { reason }) => {
            ctx.log.debug(&reason);
            ctx.log
                .record_step(step, StepStatus::Skipped, Some(&reason));
        }
        Err(e) => return Err(fail(ctx, step, e)),
    }
    Ok(())
}
