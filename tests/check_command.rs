#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `check` and `list` commands and catalog loading
//! from an asset store.

mod common;

use common::{TestContextBuilder, UNIT_CATALOG};
use dtb_selector::commands;
use dtb_selector::config::catalog::Catalog;
use dtb_selector::logging::Logger;

const TWO_BRANDS: &str = r#"brands = ["Test", "Spare"]

[[devices]]
source = "unit"
name = "Unit"
brand = "Test"
overlays = ["logo/"]

[[devices]]
source = "absent"
name = "Absent"
brand = "Test"
"#;

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

/// A complete asset store passes.
#[test]
fn check_passes_for_complete_store() {
    let ctx = TestContextBuilder::new()
        .with_catalog(UNIT_CATALOG)
        .with_asset("unit/file.txt", "hello")
        .build();
    let log = Logger::with_log_file(None);

    commands::check::run(&ctx.global(false), &log).unwrap();
}

/// A missing primary bundle fails the check.
#[test]
fn check_fails_for_missing_primary() {
    let ctx = TestContextBuilder::new()
        .with_catalog(TWO_BRANDS)
        .with_asset("unit/file.txt", "hello")
        .with_asset("logo/logo.bmp", "logo")
        .build();
    let log = Logger::with_log_file(None);

    let err = commands::check::run(&ctx.global(false), &log).unwrap_err();
    assert!(err.to_string().contains("1 device(s)"), "got: {err}");
}

/// Validation separates errors from warnings.
#[test]
fn validation_findings() {
    let ctx = TestContextBuilder::new()
        .with_catalog(TWO_BRANDS)
        .with_asset("absent/file.txt", "x")
        .build();
    let config = ctx.load_config();

    let warnings = config.validate(&dtb_selector::operations::SystemFileSystemOps);

    let mut lines: Vec<String> = warnings
        .iter()
        .map(|w| format!("{:?} {}", w.severity, w.item))
        .collect();
    lines.sort();
    assert_eq!(lines, ["Error Unit", "Warning Spare", "Warning Unit"]);
}

// ---------------------------------------------------------------------------
// Catalog loading
// ---------------------------------------------------------------------------

/// `catalog.toml` in the asset store replaces the built-in catalog.
#[test]
fn asset_store_catalog_is_used() {
    let ctx = TestContextBuilder::new().with_catalog(TWO_BRANDS).build();
    let config = ctx.load_config();

    assert_eq!(config.catalog.list_brands(), ["Test", "Spare"]);
    assert!(config.catalog.find("absent").is_some());
    insta::assert_snapshot!(commands::list::render_text(&config.catalog), @r"
    1. Test
       1. Absent [absent]
       2. Unit [unit]
    2. Spare
       (no devices)
    ");
}

/// Without a catalog file the built-in table is used.
#[test]
fn builtin_catalog_without_file() {
    let ctx = TestContextBuilder::new().build();
    let config = ctx.load_config();

    assert!(std::sync::Arc::ptr_eq(&config.catalog, &Catalog::builtin()));
    assert_eq!(config.catalog.list_brands().len(), 5);
}

/// A broken catalog file is reported with its path.
#[test]
fn broken_catalog_is_rejected() {
    let ctx = TestContextBuilder::new()
        .with_catalog("[[devices]]\nsource = 1\n")
        .build();

    let err = dtb_selector::config::Config::load(&ctx.assets(), &ctx.dest(), None).unwrap_err();
    assert!(format!("{err:#}").contains("catalog.toml"));
}

/// Duplicate sources are rejected at load time.
#[test]
fn duplicate_sources_are_rejected() {
    let ctx = TestContextBuilder::new()
        .with_catalog(
            "[[devices]]\nsource = \"unit\"\nname = \"A\"\nbrand = \"T\"\n\n\
             [[devices]]\nsource = \"unit\"\nname = \"B\"\nbrand = \"T\"\n",
        )
        .build();

    let err = dtb_selector::config::Config::load(&ctx.assets(), &ctx.dest(), None).unwrap_err();
    assert!(format!("{err:#}").contains("Duplicate device source 'unit'"));
}
